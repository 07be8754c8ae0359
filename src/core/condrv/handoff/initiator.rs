// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Handoff initiator (spec.md §4.6): when delegating the UI to a third-party
//! terminal, resolves the configured peer, spawns it through a
//! [`ProcessLauncher`], and returns the byte-pipe pair the caller wires into a
//! headless dispatch loop. Peer class-id resolution, the "reference" object,
//! and process-handle duplication are COM/Win32-specific (spec.md §1
//! Non-goals); this crate's contract with that machinery is only the resulting
//! pair of host-input/host-output streams.

use std::sync::{atomic::{AtomicBool, Ordering}, Arc};

use crate::core::condrv::error::HandoffError;

use super::process_launcher::ProcessLauncher;

/// Which peer (if any) the initiator should delegate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerSelection {
    /// No peer configured; run the classic (non-delegated) console.
    None,
    /// The configured peer resolves to this process itself; skip delegation
    /// (spec.md §4.6 "if none or self-equivalent, skip").
    SelfEquivalent,
    /// A real peer class id to delegate to.
    Configured(String),
}

/// The byte-pipe pair handed back by a successful delegation, plus the
/// out-of-band shutdown signal (spec.md §4.6 "closing the signal-pipe write end
/// is the out-of-band request to the peer to shut down").
pub struct DelegatedTerminal<L: ProcessLauncher> {
    pub host_input: L::HostInput,
    pub host_output: L::HostOutput,
    pub peer_lifetime_handle: u64,
    shutdown_requested: Arc<AtomicBool>,
}

impl<L: ProcessLauncher> DelegatedTerminal<L> {
    pub fn request_peer_shutdown(&self) { self.shutdown_requested.store(true, Ordering::SeqCst); }

    #[must_use]
    pub fn is_peer_shutdown_requested(&self) -> bool { self.shutdown_requested.load(Ordering::SeqCst) }
}

/// Resolves `peer` and, if it names a real delegate, spawns it. Returns `None`
/// when no delegation should happen (spec.md §4.6 "if none or self-equivalent,
/// skip") — the caller then runs the classic, non-delegated console.
///
/// # Errors
/// Propagates [`ProcessLauncher::spawn`]'s error.
pub fn delegate_to_peer<L: ProcessLauncher>(
    peer: &PeerSelection,
    launcher: &L,
    command_line: &str,
) -> Result<Option<DelegatedTerminal<L>>, HandoffError> {
    match peer {
        PeerSelection::None | PeerSelection::SelfEquivalent => Ok(None),
        PeerSelection::Configured(_class_id) => {
            let (host_input, host_output, peer_lifetime_handle) = launcher.spawn(command_line)?;
            Ok(Some(DelegatedTerminal {
                host_input,
                host_output,
                peer_lifetime_handle,
                shutdown_requested: Arc::new(AtomicBool::new(false)),
            }))
        }
    }
}
