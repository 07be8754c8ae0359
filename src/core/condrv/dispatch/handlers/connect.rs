// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Connect/disconnect (spec.md §4.3). Connect allocates a process record plus its
//! paired input and output handles against the session's main screen buffer;
//! disconnect tears all three down along with any history/alias reservation.

use crate::core::condrv::{
    dispatch::request::ApiReply,
    handles::{AccessRights, HandleKind, ObjectHandle, ProcessState},
    server_state::ServerState,
};

pub fn connect(state: &mut ServerState, pid: u64, tid: u64) -> ApiReply {
    let output_handle = state.handles.insert(ObjectHandle {
        kind: HandleKind::Output,
        desired_access: AccessRights::READ | AccessRights::WRITE,
        share_mode: AccessRights::READ | AccessRights::WRITE,
        owning_process: 0,
        screen_buffer: Some(state.active_screen_buffer.clone()),
    });
    let input_handle = state.handles.insert(ObjectHandle {
        kind: HandleKind::Input,
        desired_access: AccessRights::READ | AccessRights::WRITE,
        share_mode: AccessRights::READ | AccessRights::WRITE,
        owning_process: 0,
        screen_buffer: None,
    });
    let process_handle = state.processes.insert(ProcessState {
        pid,
        tid,
        process_handle: 0,
        connect_sequence: state.processes.len() as u64,
        input_handle,
        output_handle,
    });
    if let Some(h) = state.handles.get_mut(input_handle) {
        h.owning_process = process_handle;
    }
    if let Some(h) = state.handles.get_mut(output_handle) {
        h.owning_process = process_handle;
    }
    ApiReply::Connected { process_handle, input_handle, output_handle }
}

/// Returns `true` when tearing this process down leaves the session with no
/// remaining clients (spec.md §4.3 `request_exit` "no remaining clients").
pub fn disconnect(state: &mut ServerState, process_handle: u64) -> bool {
    state.disconnect_process(process_handle);
    state.is_empty_of_clients()
}
