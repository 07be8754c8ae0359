// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Alias table and command-history handlers (spec.md §4.8, §4.3).

use crate::core::condrv::{dispatch::request::ApiReply, error::DomainError, server_state::ServerState};

pub fn get_alias(state: &ServerState, exe: &str, source: &str) -> ApiReply {
    ApiReply::Alias(state.aliases.get(exe, source).map(str::to_string))
}

pub fn set_alias(state: &mut ServerState, exe: &str, source: &str, target: &str) -> Result<ApiReply, DomainError> {
    state.aliases.set(exe, source, target)?;
    Ok(ApiReply::None)
}

/// Clears the recorded commands for every history entry matching `app`
/// (allocated or not), regardless of which process currently owns it (spec.md
/// §4.8 "expunge" acts on the app-keyed history, not one process's view of it).
pub fn expunge_command_history(state: &mut ServerState, app: &str) -> ApiReply {
    state.history_pool.clear_commands_for_app(app);
    ApiReply::None
}

pub fn set_history_info(state: &mut ServerState, max_commands: usize, max_buffers: usize) -> ApiReply {
    state.default_history_max_commands = max_commands;
    state.history_max_buffers = max_buffers;
    ApiReply::None
}

pub fn get_history_info(state: &ServerState) -> ApiReply {
    ApiReply::Count(state.default_history_max_commands as u32)
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
    fn alias_set_then_get() {
        let mut s = state();
        set_alias(&mut s, "cmd.exe", "ll", "dir /w").unwrap();
        assert_eq!(get_alias(&s, "cmd.exe", "ll"), ApiReply::Alias(Some("dir /w".to_string())));
    }

    #[test]
    fn expunge_clears_matching_app_history() {
        let mut s = state();
        s.history_pool.allocate_for_process("cmd.exe", 1, 10);
        s.history_pool.get_mut(1).unwrap().add("dir", false);
        expunge_command_history(&mut s, "cmd.exe");
        assert!(s.history_pool.get(1).unwrap().commands.is_empty());
    }
}
