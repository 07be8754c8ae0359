// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`DriverTransport`]: the driver-facing boundary (spec.md §6), reduced to its
//! three operations. A real Windows backend implements this over
//! `DeviceIoControl`/named-pipe ConDrv handles (out of scope here — the trait is
//! the full contract); tests and the rest of this crate use [`MockDriverTransport`].

use std::collections::VecDeque;

use crate::core::condrv::{dispatch::{ApiMessage, Completion}, error::TransportError};

/// The driver-facing boundary. `read_io` blocks (in a real backend) until the next
/// request is available or the driver connection goes away; the dispatch thread's
/// only suspension point is inside this call (spec.md §5).
pub trait DriverTransport {
    /// Fetches the next request, optionally piggybacking `reply` as the completion
    /// for a previously dispatched message (spec.md §5 "completions ... piggyback
    /// onto the subsequent `ReadIo`").
    ///
    /// # Errors
    /// Returns [`TransportError::PeerDisconnected`] on `pipe_not_connected` (a
    /// graceful shutdown condition, not a fatal one) or
    /// [`TransportError::TransientCancellation`] on a cancelled/aborted read that
    /// callers should retry per spec.md §7.
    fn read_io(&mut self, reply: Option<(u64, Completion)>) -> Result<ApiMessage, TransportError>;

    /// Registers the input-availability event the driver polls/waits on. Called
    /// once per session; a redundant call during handoff is `bad_command` and
    /// treated as non-fatal by callers (spec.md §6).
    ///
    /// # Errors
    /// Returns [`TransportError::Io`] if the underlying registration fails.
    fn set_server_information(&mut self, input_available_event: u64) -> Result<(), TransportError>;

    /// Completes a message out of band, outside the normal `ReadIo` piggyback path
    /// (spec.md §6), e.g. when the dispatch loop is tearing down and needs to flush
    /// pending completions before the driver connection is closed.
    ///
    /// # Errors
    /// Returns [`TransportError::PeerDisconnected`] if the driver connection is
    /// already gone.
    fn complete_io(&mut self, identifier: u64, completion: Completion) -> Result<(), TransportError>;
}

/// In-process stand-in for the driver, used by the dispatch loop's own tests and
/// the crate's `tests/` scenarios (spec.md §8). Requests are fed in via
/// [`Self::enqueue_request`]; completions handed to `read_io`/`complete_io` are
/// recorded for assertions.
#[derive(Debug, Default)]
pub struct MockDriverTransport {
    pending_requests: VecDeque<ApiMessage>,
    pub completions: Vec<(u64, Completion)>,
    pub registered_event: Option<u64>,
    pub connected: bool,
}

impl MockDriverTransport {
    #[must_use]
    pub fn new() -> Self { Self { connected: true, ..Self::default() } }

    pub fn enqueue_request(&mut self, message: ApiMessage) { self.pending_requests.push_back(message); }

    pub fn disconnect(&mut self) { self.connected = false; }
}

impl DriverTransport for MockDriverTransport {
    fn read_io(&mut self, reply: Option<(u64, Completion)>) -> Result<ApiMessage, TransportError> {
        if let Some((identifier, completion)) = reply {
            self.completions.push((identifier, completion));
        }
        if !self.connected {
            return Err(TransportError::PeerDisconnected { context: "mock driver transport" });
        }
        self.pending_requests
            .pop_front()
            .ok_or(TransportError::TransientCancellation { context: "mock transport has no queued request" })
    }

    fn set_server_information(&mut self, input_available_event: u64) -> Result<(), TransportError> {
        self.registered_event = Some(input_available_event);
        Ok(())
    }

    fn complete_io(&mut self, identifier: u64, completion: Completion) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::PeerDisconnected { context: "mock driver transport" });
        }
        self.completions.push((identifier, completion));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::condrv::dispatch::{ApiFunction, ApiRequest};

    #[test]
    fn read_io_returns_queued_requests_in_order() {
        let mut transport = MockDriverTransport::new();
        transport.enqueue_request(ApiMessage::new(1, 0, 0, ApiFunction::Connect, ApiRequest::Connect {
            pid: 1,
            tid: 1,
        }));
        transport.enqueue_request(ApiMessage::new(2, 0, 0, ApiFunction::Disconnect, ApiRequest::Disconnect));

        let first = transport.read_io(None).unwrap();
        assert_eq!(first.identifier, 1);
        let second = transport.read_io(None).unwrap();
        assert_eq!(second.identifier, 2);
    }

    #[test]
    fn read_io_after_disconnect_reports_peer_disconnected() {
        let mut transport = MockDriverTransport::new();
        transport.disconnect();
        assert!(matches!(transport.read_io(None), Err(TransportError::PeerDisconnected { .. })));
    }

    #[test]
    fn completion_is_recorded() {
        let mut transport = MockDriverTransport::new();
        transport.complete_io(7, Completion { status: 0, information: 3 }).unwrap();
        assert_eq!(transport.completions, vec![(7, Completion { status: 0, information: 3 })]);
    }
}
