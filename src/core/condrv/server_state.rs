// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! `ServerState`: the aggregate console session state (spec.md §3). Created once
//! per session, destroyed when the dispatch loop exits; mutated only by request
//! handlers on the dispatch thread (spec.md §5, §9 "single-writer by
//! construction").

use std::{cell::RefCell, rc::Rc};

use crate::core::condrv::{
    alias_table::AliasTable,
    error::DomainError,
    handles::{HandleTable, ProcessTable},
    history::CommandHistoryPool,
    screen_buffer::{ScreenBuffer, ScreenBufferSettings},
};

/// Font descriptor carried by `ServerState` for get/set-font-info handlers
/// (spec.md §4.3 handler categories).
#[derive(Debug, Clone, PartialEq)]
pub struct FontInfo {
    pub family: String,
    pub size: (u16, u16),
}

impl Default for FontInfo {
    fn default() -> Self { Self { family: "Consolas".to_string(), size: (8, 16) } }
}

/// The full console session: screen buffers, input/process/handle tables,
/// command history, aliases, modes, and miscellaneous per-session settings.
pub struct ServerState {
    pub main_screen_buffer: Rc<RefCell<ScreenBuffer>>,
    pub active_screen_buffer: Rc<RefCell<ScreenBuffer>>,
    pub processes: ProcessTable,
    pub handles: HandleTable,
    pub history_pool: CommandHistoryPool,
    pub aliases: AliasTable,
    pub input_code_page: u32,
    pub output_code_page: u32,
    pub input_modes: u32,
    pub output_modes: u32,
    pub font: FontInfo,
    pub title: String,
    pub default_history_max_commands: usize,
    pub history_max_buffers: usize,
}

impl ServerState {
    pub fn new(settings: ScreenBufferSettings, code_page: u32) -> Result<Self, DomainError> {
        let main = Rc::new(RefCell::new(ScreenBuffer::create(settings)?));
        Ok(Self {
            main_screen_buffer: main.clone(),
            active_screen_buffer: main,
            processes: ProcessTable::new(),
            handles: HandleTable::new(),
            history_pool: CommandHistoryPool::new(16),
            aliases: AliasTable::new(),
            input_code_page: code_page,
            output_code_page: code_page,
            input_modes: 0,
            output_modes: 0,
            font: FontInfo::default(),
            title: String::new(),
            default_history_max_commands: 50,
            history_max_buffers: 4,
        })
    }

    /// True exactly when the active buffer is the alternate buffer (spec.md §3
    /// "exactly one active screen buffer at any time").
    pub fn is_on_alternate_buffer(&self) -> bool {
        !Rc::ptr_eq(&self.active_screen_buffer, &self.main_screen_buffer)
    }

    pub fn disconnect_process(&mut self, process_handle: u64) {
        self.handles.retain_owned_by(process_handle);
        self.history_pool.free_for_process(process_handle);
        self.processes.remove(process_handle);
    }

    pub fn is_empty_of_clients(&self) -> bool { self.processes.is_empty() }
}
