// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Object lifecycle, mode flags, and code page handlers (spec.md §4.3).

use crate::core::condrv::{
    dispatch::request::ApiReply,
    error::DomainError,
    handles::{AccessRights, HandleKind, ObjectHandle},
    server_state::ServerState,
};

pub fn create_object(
    state: &mut ServerState,
    owning_process: u64,
    kind: HandleKind,
    desired_access: AccessRights,
    share_mode: AccessRights,
) -> ApiReply {
    let screen_buffer = match kind {
        HandleKind::Output => Some(state.active_screen_buffer.clone()),
        HandleKind::Input => None,
    };
    let id = state.handles.insert(ObjectHandle { kind, desired_access, share_mode, owning_process, screen_buffer });
    ApiReply::Handle(id)
}

pub fn close_object(state: &mut ServerState, handle: u64) -> Result<ApiReply, DomainError> {
    state.handles.remove(handle).ok_or(DomainError::UnknownHandle(handle))?;
    Ok(ApiReply::None)
}

pub fn get_mode(state: &ServerState, handle: u64) -> Result<ApiReply, DomainError> {
    let obj = state.handles.get(handle).ok_or(DomainError::UnknownHandle(handle))?;
    let mode = match obj.kind {
        HandleKind::Input => state.input_modes,
        HandleKind::Output => state.output_modes,
    };
    Ok(ApiReply::Mode(mode))
}

pub fn set_mode(state: &mut ServerState, handle: u64, mode: u32) -> Result<ApiReply, DomainError> {
    let kind = state.handles.get(handle).ok_or(DomainError::UnknownHandle(handle))?.kind;
    match kind {
        HandleKind::Input => state.input_modes = mode,
        HandleKind::Output => state.output_modes = mode,
    }
    Ok(ApiReply::None)
}

pub fn get_code_page(state: &ServerState, output: bool) -> ApiReply {
    ApiReply::CodePage(if output { state.output_code_page } else { state.input_code_page })
}

pub fn set_code_page(state: &mut ServerState, output: bool, code_page: u32) -> ApiReply {
    if output {
        state.output_code_page = code_page;
    } else {
        state.input_code_page = code_page;
    }
    ApiReply::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::condrv::screen_buffer::{BufferSize, ScreenBufferSettings};

    fn state() -> ServerState {
        ServerState::new(
            ScreenBufferSettings {
                buffer_size: BufferSize { width: 80, height: 25 },
                text_attributes: 0x07,
                max_window_size: BufferSize { width: 80, height: 25 },
            },
            65001,
        )
        .unwrap()
    }

    #[test]
    fn create_then_close_round_trips() {
        let mut s = state();
        let ApiReply::Handle(h) = create_object(&mut s, 1, HandleKind::Output, AccessRights::READ, AccessRights::READ)
        else {
            panic!()
        };
        assert!(s.handles.get(h).is_some());
        close_object(&mut s, h).unwrap();
        assert!(s.handles.get(h).is_none());
    }

    #[test]
    fn close_unknown_handle_errors() {
        let mut s = state();
        assert!(close_object(&mut s, 999).is_err());
    }

    #[test]
    fn mode_round_trips_per_handle_kind() {
        let mut s = state();
        let ApiReply::Handle(h) = create_object(&mut s, 1, HandleKind::Input, AccessRights::READ, AccessRights::READ)
        else {
            panic!()
        };
        set_mode(&mut s, h, 0x0007).unwrap();
        let ApiReply::Mode(m) = get_mode(&s, h).unwrap() else { panic!() };
        assert_eq!(m, 0x0007);
    }
}
