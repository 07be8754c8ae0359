// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Per-executable command history pool (spec.md §4.8). The MRU-front ordering
//! is a plain move-to-front on an ordered `Vec`; the reuse rules here
//! (match-by-app-name, prefer-empty-unallocated fallback) are specific enough
//! that a generic LRU cache type wouldn't fit directly.

/// A single process's bounded, ordered command-line history.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    pub app_name: String,
    pub max_commands: usize,
    pub commands: Vec<String>,
    pub allocated: bool,
    pub process_handle: u64,
}

impl CommandHistory {
    fn new(app_name: String, max_commands: usize, process_handle: u64) -> Self {
        Self { app_name, max_commands, commands: Vec::new(), allocated: true, process_handle }
    }

    /// Drops empty commands, skips a repeat of the most-recent entry, optionally
    /// removes an existing equal command (moving it to the end), and evicts the
    /// oldest entry when at capacity.
    pub fn add(&mut self, command: &str, suppress_duplicates: bool) {
        if command.is_empty() || self.max_commands == 0 {
            return;
        }
        if self.commands.last().map(|s| s.as_str()) == Some(command) {
            return;
        }
        if suppress_duplicates {
            if let Some(pos) = self.commands.iter().position(|c| c == command) {
                self.commands.remove(pos);
            }
        }
        if self.commands.len() >= self.max_commands {
            // Spec §9 open question: realloc/shrink truncates the tail (newest
            // commands dropped) in the reference implementation; kept here for
            // the at-capacity eviction too, i.e. the *oldest* command is dropped
            // on ordinary insert (that is the normal ring behavior), matching
            // client-visible history semantics.
            self.commands.remove(0);
        }
        self.commands.push(command.to_string());
    }
}

/// LRU-ordered pool of [`CommandHistory`] entries (spec.md §3 `CommandHistoryPool`,
/// owned by `ServerState`). Index 0 is most-recently-used.
#[derive(Debug, Clone, Default)]
pub struct CommandHistoryPool {
    entries: Vec<CommandHistory>,
    max_histories: usize,
}

impl CommandHistoryPool {
    pub fn new(max_histories: usize) -> Self { Self { entries: Vec::new(), max_histories } }

    /// Reuses an unallocated entry matching `app` (case-insensitive ordinal
    /// compare), else creates a new entry if under the pool's capacity, else
    /// reuses any unallocated entry (preferring one with empty commands). The
    /// reused/created entry is moved to the MRU (front) position.
    pub fn allocate_for_process(
        &mut self,
        app: &str,
        process_handle: u64,
        default_max_commands: usize,
    ) -> &CommandHistory {
        if let Some(pos) = self
            .entries
            .iter()
            .position(|e| !e.allocated && e.app_name.eq_ignore_ascii_case(app))
        {
            let mut entry = self.entries.remove(pos);
            entry.allocated = true;
            entry.process_handle = process_handle;
            self.entries.insert(0, entry);
            return &self.entries[0];
        }

        if self.entries.len() < self.max_histories {
            let entry = CommandHistory::new(app.to_string(), default_max_commands, process_handle);
            self.entries.insert(0, entry);
            return &self.entries[0];
        }

        let reuse_pos = self
            .entries
            .iter()
            .position(|e| !e.allocated && e.commands.is_empty())
            .or_else(|| self.entries.iter().position(|e| !e.allocated))
            .expect("pool at capacity with no unallocated entry to reuse");
        let mut entry = self.entries.remove(reuse_pos);
        entry.app_name = app.to_string();
        entry.allocated = true;
        entry.process_handle = process_handle;
        entry.commands.clear();
        entry.max_commands = default_max_commands;
        self.entries.insert(0, entry);
        &self.entries[0]
    }

    /// Marks the entry owned by `process_handle` unallocated without clearing
    /// its commands (so a later process for the same app can reuse the history).
    pub fn free_for_process(&mut self, process_handle: u64) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.process_handle == process_handle && e.allocated) {
            entry.allocated = false;
        }
    }

    pub fn get_mut(&mut self, process_handle: u64) -> Option<&mut CommandHistory> {
        self.entries.iter_mut().find(|e| e.process_handle == process_handle && e.allocated)
    }

    pub fn get(&self, process_handle: u64) -> Option<&CommandHistory> {
        self.entries.iter().find(|e| e.process_handle == process_handle && e.allocated)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Clears recorded commands for every entry matching `app` (allocated or not).
    pub fn clear_commands_for_app(&mut self, app: &str) {
        for entry in self.entries.iter_mut().filter(|e| e.app_name.eq_ignore_ascii_case(app)) {
            entry.commands.clear();
        }
    }
}
