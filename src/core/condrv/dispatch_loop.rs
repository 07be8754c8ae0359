// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The dispatch thread's own loop (spec.md §4.3-§4.4, §5 thread 1): drains the
//! pending-reply queue (bounded per pass so a stuck request can't starve the
//! driver), then fetches and dispatches the next request, piggybacking the
//! previous completion. The actual suspension point is inside
//! [`DriverTransport::read_io`] — a real backend blocks there until the driver has
//! more work; the mock transport used in tests returns immediately.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tracing::{debug, info_span};

use crate::core::condrv::{
    dispatch::{dispatch_message, ApiMessage, Completion, HostIoContext},
    driver_transport::DriverTransport,
    error::{CoreError, TransportError},
    server_state::ServerState,
    snapshot::SnapshotPublisher,
};

/// Bound on how many pending-reply messages are retried in a single pass before
/// the loop gives up for this iteration and goes back to the driver (spec.md §5
/// "retrying pending requests is bounded per drain to avoid starving the
/// driver").
const MAX_PENDING_DRAIN_PER_ITERATION: usize = 8;

/// Construction parameters for [`run_session`].
#[derive(Debug, Clone)]
pub struct DispatchLoopConfig {
    /// Bounded wait applied before retrying a non-empty pending-reply queue, so
    /// the loop doesn't busy-spin while a `ReadConsole`-style request waits on
    /// input that hasn't arrived yet.
    pub pending_retry_wait: Option<Duration>,
}

impl Default for DispatchLoopConfig {
    fn default() -> Self { Self { pending_retry_wait: Some(Duration::from_millis(50)) } }
}

/// Cooperative shutdown flag shared with the signal monitor thread (spec.md §5
/// thread 3). Setting it asks the dispatch loop to exit at its next iteration
/// boundary (spec.md §5 "Stop is cooperative").
#[derive(Clone, Default)]
pub struct StopRequested(Arc<AtomicBool>);

impl StopRequested {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn request_stop(&self) { self.0.store(true, Ordering::SeqCst); }

    #[must_use]
    pub fn is_set(&self) -> bool { self.0.load(Ordering::SeqCst) }
}

/// Runs the dispatch loop until the driver disconnects, `stop` is requested, or a
/// handler reports no remaining clients (spec.md §4.3 "no remaining clients").
/// `publisher` is updated inline after every dispatched message, regardless of
/// whether that message's buffer mutation actually advanced the revision
/// (`SnapshotPublisher::publish` is itself a no-op when it hasn't).
///
/// # Errors
/// Returns [`CoreError::Transport`] if the driver transport reports a fatal
/// (non-`PeerDisconnected`, non-retryable) failure.
pub fn run_session(
    state: &mut ServerState,
    transport: &mut dyn DriverTransport,
    io: &mut HostIoContext,
    publisher: &SnapshotPublisher,
    stop: &StopRequested,
    config: &DispatchLoopConfig,
) -> Result<(), CoreError> {
    let span = info_span!("dispatch_loop");
    let _enter = span.enter();

    let mut pending: VecDeque<ApiMessage> = VecDeque::new();
    let mut next_reply: Option<(u64, Completion)> = None;

    loop {
        if stop.is_set() {
            debug!("stop requested, exiting dispatch loop");
            return Ok(());
        }

        if !pending.is_empty() {
            io.input_queue.wait_for_input(config.pending_retry_wait);
        }

        let mut drained = 0;
        while drained < MAX_PENDING_DRAIN_PER_ITERATION {
            let Some(mut message) = pending.pop_front() else { break };
            let outcome = dispatch_message(state, &mut message, io);
            publisher.publish(&state.active_screen_buffer.borrow());
            if outcome.reply_pending {
                pending.push_back(message);
                drained += 1;
                continue;
            }
            let completion = message.completion();
            if outcome.request_exit {
                // No subsequent `ReadIo` will carry this reply (no remaining
                // clients), so complete it directly (spec.md §4.4 slow-path).
                let _ = transport.complete_io(message.identifier, completion);
                debug!("no remaining clients, exiting dispatch loop");
                return Ok(());
            }
            next_reply = Some((message.identifier, completion));
            break;
        }

        let request = match transport.read_io(next_reply.take()) {
            Ok(request) => request,
            Err(TransportError::PeerDisconnected { .. }) => {
                debug!("driver pipe not connected, exiting dispatch loop");
                return Ok(());
            }
            Err(TransportError::TransientCancellation { .. }) => continue,
            Err(other) => return Err(CoreError::Transport(other)),
        };

        let mut message = request;
        let outcome = dispatch_message(state, &mut message, io);
        publisher.publish(&state.active_screen_buffer.borrow());
        if outcome.reply_pending {
            pending.push_back(message);
            next_reply = None;
        } else {
            let completion = message.completion();
            if outcome.request_exit {
                let _ = transport.complete_io(message.identifier, completion);
                debug!("no remaining clients, exiting dispatch loop");
                return Ok(());
            }
            next_reply = Some((message.identifier, completion));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::condrv::{
        dispatch::{ApiFunction, ApiReply, ApiRequest},
        driver_transport::MockDriverTransport,
        input_queue::InputQueue,
        screen_buffer::{BufferSize, ScreenBufferSettings},
    };

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
    fn session_exits_when_last_client_disconnects() {
        let mut state = state();
        let mut io = HostIoContext::new(InputQueue::new());
        let publisher = SnapshotPublisher::new();
        let stop = StopRequested::new();
        let config = DispatchLoopConfig::default();

        // Connect directly (not through the loop) to learn the allocated handle,
        // mirroring a real session's handshake before the loop ever sees traffic.
        let mut connect_msg = ApiMessage::new(1, 0, 0, ApiFunction::Connect, ApiRequest::Connect { pid: 1, tid: 1 });
        dispatch_message(&mut state, &mut connect_msg, &mut io);
        let ApiReply::Connected { process_handle, .. } = connect_msg.reply else { panic!() };

        let mut transport = MockDriverTransport::new();
        transport.enqueue_request(ApiMessage::new(
            2,
            process_handle,
            0,
            ApiFunction::Disconnect,
            ApiRequest::Disconnect,
        ));

        run_session(&mut state, &mut transport, &mut io, &publisher, &stop, &config).unwrap();
        assert!(publisher.latest().is_some());
    }

    #[test]
    fn session_exits_gracefully_on_peer_disconnect() {
        let mut state = state();
        let mut io = HostIoContext::new(InputQueue::new());
        let publisher = SnapshotPublisher::new();
        let stop = StopRequested::new();
        let config = DispatchLoopConfig::default();

        let mut transport = MockDriverTransport::new();
        transport.disconnect();

        run_session(&mut state, &mut transport, &mut io, &publisher, &stop, &config).unwrap();
    }

    #[test]
    fn session_exits_when_stop_requested_before_any_traffic() {
        let mut state = state();
        let mut io = HostIoContext::new(InputQueue::new());
        let publisher = SnapshotPublisher::new();
        let stop = StopRequested::new();
        stop.request_stop();
        let config = DispatchLoopConfig::default();

        let mut transport = MockDriverTransport::new();
        run_session(&mut state, &mut transport, &mut io, &publisher, &stop, &config).unwrap();
    }
}
