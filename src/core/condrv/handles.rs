// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Process and object handle tables (spec.md §3 `ObjectHandle`, `ProcessState`).
//! Both tables are keyed by opaque identifiers rather than holding pointers to
//! each other, avoiding the pointer-graph cycles the original implementation has
//! between process records and handles (spec.md §9 design note): relationships
//! are lookups through [`ServerState`](super::server_state::ServerState), not
//! stored references.

use std::{cell::RefCell, rc::Rc};

use rustc_hash::FxHashMap;

use crate::core::condrv::screen_buffer::ScreenBuffer;

/// Kind of an [`ObjectHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Input,
    Output,
}

/// Desired-access bits, modeled loosely on the Win32 generic access mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRights(u32);

impl AccessRights {
    pub const READ: AccessRights = AccessRights(0b0001);
    pub const WRITE: AccessRights = AccessRights(0b0010);

    pub const fn contains(self, other: AccessRights) -> bool { self.0 & other.0 == other.0 }
}

impl std::ops::BitOr for AccessRights {
    type Output = AccessRights;
    fn bitor(self, rhs: AccessRights) -> AccessRights { AccessRights(self.0 | rhs.0) }
}

/// A client-visible console object: an input handle, or an output handle backed
/// by a screen buffer. The dispatch thread is the sole writer of any buffer
/// reachable this way, so a non-atomic `Rc<RefCell<_>>` is sufficient (spec.md
/// §9 "implicit shared ownership of screen buffers").
#[derive(Clone)]
pub struct ObjectHandle {
    pub kind: HandleKind,
    pub desired_access: AccessRights,
    pub share_mode: AccessRights,
    pub owning_process: u64,
    /// Non-null for output handles; `None` for input handles.
    pub screen_buffer: Option<Rc<RefCell<ScreenBuffer>>>,
}

/// A connected client process (spec.md §3 `ProcessState`).
#[derive(Debug, Clone)]
pub struct ProcessState {
    pub pid: u64,
    pub tid: u64,
    pub process_handle: u64,
    pub connect_sequence: u64,
    pub input_handle: u64,
    pub output_handle: u64,
}

/// Owning map of [`ObjectHandle`]s keyed by an opaque handle id.
#[derive(Default)]
pub struct HandleTable {
    next_id: u64,
    handles: FxHashMap<u64, ObjectHandle>,
}

impl HandleTable {
    pub fn new() -> Self { Self { next_id: 1, handles: FxHashMap::default() } }

    pub fn insert(&mut self, handle: ObjectHandle) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.handles.insert(id, handle);
        id
    }

    pub fn get(&self, id: u64) -> Option<&ObjectHandle> { self.handles.get(&id) }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut ObjectHandle> { self.handles.get_mut(&id) }

    pub fn remove(&mut self, id: u64) -> Option<ObjectHandle> { self.handles.remove(&id) }

    pub fn len(&self) -> usize { self.handles.len() }

    pub fn is_empty(&self) -> bool { self.handles.is_empty() }

    pub fn retain_owned_by(&mut self, process_handle: u64) -> Vec<u64> {
        let ids: Vec<u64> = self
            .handles
            .iter()
            .filter(|(_, h)| h.owning_process == process_handle)
            .map(|(id, _)| *id)
            .collect();
        for id in &ids {
            self.handles.remove(id);
        }
        ids
    }
}

/// Owning map of [`ProcessState`]s keyed by an opaque process-handle id.
#[derive(Default)]
pub struct ProcessTable {
    next_id: u64,
    processes: FxHashMap<u64, ProcessState>,
}

impl ProcessTable {
    pub fn new() -> Self { Self { next_id: 1, processes: FxHashMap::default() } }

    pub fn insert(&mut self, mut state: ProcessState) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        state.process_handle = id;
        self.processes.insert(id, state);
        id
    }

    pub fn get(&self, id: u64) -> Option<&ProcessState> { self.processes.get(&id) }

    pub fn remove(&mut self, id: u64) -> Option<ProcessState> { self.processes.remove(&id) }

    pub fn len(&self) -> usize { self.processes.len() }

    pub fn is_empty(&self) -> bool { self.processes.is_empty() }
}
