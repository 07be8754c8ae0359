// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Handoff acceptor (spec.md §4.6): registers a single-use class object, waits
//! for a single [`SessionDescriptor`] (or a timeout), and turns it into the
//! dispatch loop's first request. Duplicating incoming handles into the local
//! process and handing a reference back to the peer are Win32-specific steps
//! (COM embedding-server plumbing, spec.md §1 Non-goals) folded here into
//! [`HandoffChannel`]'s contract rather than implemented — a real backend
//! performs them inside its `wait_for_descriptor`.

use std::time::Duration;

use crate::core::condrv::{dispatch::ApiMessage, error::HandoffError};

use super::session_descriptor::SessionDescriptor;

/// The class-object / single-descriptor-wait boundary a real backend implements
/// over COM's embedding-server activation. `timeout = None` waits indefinitely
/// (spec.md §5 "the handoff-accept wait has an explicit timeout (0 ⇒
/// infinite)").
pub trait HandoffChannel {
    /// # Errors
    /// Returns [`HandoffError::TimedOut`] if no descriptor arrives within
    /// `timeout`.
    fn wait_for_descriptor(&mut self, timeout: Option<Duration>) -> Result<SessionDescriptor, HandoffError>;
}

/// Accepts one handoff: waits for a descriptor, then decodes its initial
/// request. The caller is responsible for signalling "handoff succeeded" back
/// to the peer (a channel-specific operation) and for starting the dispatch
/// loop with the returned message as the first one processed, ahead of the
/// loop's normal `ReadIo` cycle (spec.md §4.6).
///
/// # Errors
/// Propagates [`HandoffChannel::wait_for_descriptor`]'s error, or
/// [`HandoffError::MalformedDescriptor`] if the descriptor's initial request
/// can't be decoded.
pub fn accept<C: HandoffChannel>(
    channel: &mut C,
    timeout: Option<Duration>,
) -> Result<(SessionDescriptor, ApiMessage), HandoffError> {
    let descriptor = channel.wait_for_descriptor(timeout)?;
    let initial_message = descriptor.into_initial_message()?;
    Ok((descriptor, initial_message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::condrv::{dispatch::{ApiFunction, ApiRequest}, handoff::session_descriptor::SessionHandles, screen_buffer::BufferSize};

    fn descriptor() -> SessionDescriptor {
        SessionDescriptor {
            id_low: 1,
            id_high: 0,
            process: 9,
            object: 0,
            function: ApiFunction::Connect.code(),
            input_size: 0,
            output_size: 0,
            handles: SessionHandles {
                server_endpoint: 1,
                input_available_event: 2,
                outbound_signal_channel: 3,
                peer_lifetime_handle: 4,
            },
            initial_size: BufferSize { width: 80, height: 25 },
            headless: false,
            in_conpty_mode: false,
        }
    }

    struct FixedChannel(Option<SessionDescriptor>);

    impl HandoffChannel for FixedChannel {
        fn wait_for_descriptor(&mut self, _timeout: Option<Duration>) -> Result<SessionDescriptor, HandoffError> {
            self.0.take().ok_or(HandoffError::TimedOut)
        }
    }

    #[test]
    fn accept_decodes_initial_connect_message() {
        let mut channel = FixedChannel(Some(descriptor()));
        let (returned_descriptor, message) = accept(&mut channel, None).unwrap();
        assert_eq!(returned_descriptor.process, 9);
        assert!(matches!(message.request, ApiRequest::Connect { pid: 9, .. }));
    }

    #[test]
    fn accept_times_out_when_no_peer_connects() {
        let mut channel = FixedChannel(None);
        assert!(matches!(accept(&mut channel, Some(Duration::from_millis(1))), Err(HandoffError::TimedOut)));
    }
}
