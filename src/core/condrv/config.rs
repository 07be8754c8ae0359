// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Plain configuration record handed to the acceptor/initiator entry points by an
//! external collaborator (spec.md §6 "Persisted state: none"). The core never reads
//! environment variables or files itself; it only consumes `ServerConfig` by value.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::condrv::screen_buffer::BufferSize;

/// Construction-time parameters for a `ServerState` + dispatch loop instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// `tracing` level filter string (e.g. `"info"`, `"condrv_core=debug"`).
    pub log_level: String,
    /// How long the handoff acceptor waits for an embedding peer before giving up.
    /// `None` means wait indefinitely (spec.md §4.6, §8 scenario 6).
    pub embedding_wait_timeout: Option<Duration>,
    /// When delegating to a third-party terminal, prefer ConPTY-style headless
    /// operation over classic screen-buffer rendering.
    pub prefer_pseudoconsole: bool,
    /// Initial screen buffer dimensions for a freshly created session.
    pub initial_buffer_size: BufferSize,
    /// Initial output/input code page (e.g. 437, 65001 for UTF-8).
    pub initial_code_page: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            embedding_wait_timeout: Some(Duration::from_secs(5)),
            prefer_pseudoconsole: true,
            initial_buffer_size: BufferSize { width: 80, height: 25 },
            initial_code_page: 65001,
        }
    }
}
