// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`ProcessLauncher`]: the narrow capability the handoff initiator needs to
//! delegate to a third-party terminal (SPEC_FULL.md §4.9), reduced to its
//! contract — spawning a command and getting back the pair of host-input/
//! host-output byte streams plus a lifetime handle. No concrete launcher ships
//! in this crate (PTY spawning is out of scope, spec.md §1); tests use
//! [`MockProcessLauncher`].
//!
//! Associated types rather than `impl Trait`-returning methods or boxed
//! `dyn Read`/`dyn Write`, since the dispatch thread's host-input reader and
//! host-output writer are plain blocking `std::io` code (spec.md §5), not async
//! tasks.

use std::io::{Read, Write};

use crate::core::condrv::error::HandoffError;

pub trait ProcessLauncher {
    type HostInput: Read + Send + 'static;
    type HostOutput: Write + Send + 'static;

    /// Spawns `command_line` and returns the host-input/host-output byte
    /// streams plus an opaque lifetime-tracking handle for the spawned peer.
    ///
    /// # Errors
    /// Returns [`HandoffError::NoPeer`] if no launchable peer is configured, or
    /// [`HandoffError::Transport`] if spawning fails at the I/O layer.
    fn spawn(&self, command_line: &str) -> Result<(Self::HostInput, Self::HostOutput, u64), HandoffError>;
}

/// In-process stand-in for a real PTY-spawning launcher. `scripted_output` is
/// replayed as the peer's host-input bytes; written host-output bytes accumulate
/// in the returned `Vec<u8>` for assertions.
#[derive(Debug, Clone, Default)]
pub struct MockProcessLauncher {
    pub scripted_output: Vec<u8>,
    pub lifetime_handle: u64,
}

impl MockProcessLauncher {
    #[must_use]
    pub fn new(scripted_output: impl Into<Vec<u8>>) -> Self {
        Self { scripted_output: scripted_output.into(), lifetime_handle: 1 }
    }
}

impl ProcessLauncher for MockProcessLauncher {
    type HostInput = std::io::Cursor<Vec<u8>>;
    type HostOutput = Vec<u8>;

    fn spawn(&self, _command_line: &str) -> Result<(Self::HostInput, Self::HostOutput, u64), HandoffError> {
        Ok((std::io::Cursor::new(self.scripted_output.clone()), Vec::new(), self.lifetime_handle))
    }
}
