// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The host-signal inbound reader thread (spec.md §4.5 "Host signal (inbound)",
//! §5 thread 4), grounded on
//! `original_source/src/runtime/host_signal_input_thread.cpp`: reads packets off
//! an external host-signal channel and dispatches each to a
//! [`HostSignalTarget`], terminating on EOF, a short read, an unknown code, or a
//! cooperative stop request.

use std::{
    io::Read,
    panic::{catch_unwind, AssertUnwindSafe},
    thread::{self, JoinHandle},
};

use tracing::{info_span, warn};

use super::host_signal_codec::HostSignal;

/// What a decoded host signal is dispatched to. Implemented by the real
/// session's connection-aware handler in production and by a recording
/// fixture in tests.
pub trait HostSignalTarget {
    fn notify_app(&mut self, process_id: u32);
    fn set_foreground(&mut self, process_handle: u32, is_foreground: bool);
    fn end_task(&mut self, process_id: u32, event_type: u32, ctrl_flags: u32);
    /// Called exactly once, when the channel closes (EOF, short read, unknown
    /// code, or a panic inside the reader).
    fn signal_pipe_disconnected(&mut self);
}

fn dispatch(signal: HostSignal, target: &mut dyn HostSignalTarget) {
    match signal {
        HostSignal::NotifyApp { process_id } => target.notify_app(process_id),
        HostSignal::SetForeground { process_handle, is_foreground } => {
            target.set_foreground(process_handle, is_foreground);
        }
        HostSignal::EndTask { process_id, event_type, ctrl_flags } => {
            target.end_task(process_id, event_type, ctrl_flags);
        }
    }
}

/// Runs the read loop until `source` reports a short read/EOF or sends an
/// undecodable packet, then calls `target.signal_pipe_disconnected()` exactly
/// once. Does not spawn a thread; see [`spawn_host_signal_reader`] for that.
pub fn run_host_signal_reader<R: Read>(mut source: R, target: &mut dyn HostSignalTarget) {
    loop {
        match HostSignal::decode_from(&mut source) {
            Ok(signal) => dispatch(signal, target),
            Err(_) => {
                target.signal_pipe_disconnected();
                return;
            }
        }
    }
}

/// Spawns the host-signal inbound reader thread. Runs the read loop inside
/// [`catch_unwind`] so a panic surfaces as a disconnected target rather than
/// silently killing the thread (mirroring
/// [`super::host_input_reader::spawn_host_input_reader`]'s panic containment).
///
/// Unlike that reader, `signal_pipe_disconnected` is called from *inside* the
/// panic branch only: [`run_host_signal_reader`] already guarantees exactly
/// one call on every normal exit path, and calling it again here would violate
/// that guarantee.
pub fn spawn_host_signal_reader<R, T>(source: R, mut target: T) -> JoinHandle<()>
where
    R: Read + Send + 'static,
    T: HostSignalTarget + Send + 'static,
{
    thread::Builder::new()
        .name("condrv-host-signal-reader".to_string())
        .spawn(move || {
            let span = info_span!("host_signal_reader");
            let _enter = span.enter();
            let result = catch_unwind(AssertUnwindSafe(|| run_host_signal_reader(source, &mut target)));
            if result.is_err() {
                warn!("host-signal reader thread panicked");
                target.signal_pipe_disconnected();
            }
        })
        .expect("failed to spawn host-signal reader thread")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[derive(Default)]
    struct Recording {
        notify_app: Vec<u32>,
        set_foreground: Vec<(u32, bool)>,
        end_task: Vec<(u32, u32, u32)>,
        disconnects: u32,
    }

    impl HostSignalTarget for Recording {
        fn notify_app(&mut self, process_id: u32) { self.notify_app.push(process_id); }

        fn set_foreground(&mut self, process_handle: u32, is_foreground: bool) {
            self.set_foreground.push((process_handle, is_foreground));
        }

        fn end_task(&mut self, process_id: u32, event_type: u32, ctrl_flags: u32) {
            self.end_task.push((process_id, event_type, ctrl_flags));
        }

        fn signal_pipe_disconnected(&mut self) { self.disconnects += 1; }
    }

    #[test]
    fn end_task_then_eof_disconnects_exactly_once() {
        let bytes = HostSignal::EndTask { process_id: 4242, event_type: 0, ctrl_flags: 1 }.encode();
        let mut target = Recording::default();
        run_host_signal_reader(Cursor::new(bytes), &mut target);
        assert_eq!(target.end_task, vec![(4242, 0, 1)]);
        assert_eq!(target.disconnects, 1);
    }

    #[test]
    fn dispatches_multiple_packets_in_order() {
        let mut bytes = HostSignal::NotifyApp { process_id: 7 }.encode();
        bytes.extend(HostSignal::SetForeground { process_handle: 9, is_foreground: true }.encode());
        let mut target = Recording::default();
        run_host_signal_reader(Cursor::new(bytes), &mut target);
        assert_eq!(target.notify_app, vec![7]);
        assert_eq!(target.set_foreground, vec![(9, true)]);
        assert_eq!(target.disconnects, 1);
    }

    #[test]
    fn unknown_code_disconnects_without_partial_dispatch() {
        let bytes = vec![99u8, 8, 0, 0, 0, 1, 2, 3, 4];
        let mut target = Recording::default();
        run_host_signal_reader(Cursor::new(bytes), &mut target);
        assert!(target.notify_app.is_empty());
        assert_eq!(target.disconnects, 1);
    }

    #[derive(Clone, Default)]
    struct SharedRecording(std::sync::Arc<std::sync::Mutex<Recording>>);

    impl HostSignalTarget for SharedRecording {
        fn notify_app(&mut self, process_id: u32) { self.0.lock().unwrap().notify_app(process_id); }

        fn set_foreground(&mut self, process_handle: u32, is_foreground: bool) {
            self.0.lock().unwrap().set_foreground(process_handle, is_foreground);
        }

        fn end_task(&mut self, process_id: u32, event_type: u32, ctrl_flags: u32) {
            self.0.lock().unwrap().end_task(process_id, event_type, ctrl_flags);
        }

        fn signal_pipe_disconnected(&mut self) { self.0.lock().unwrap().signal_pipe_disconnected(); }
    }

    #[test]
    fn spawn_joins_and_disconnects_on_eof() {
        let target = SharedRecording::default();
        let handle = spawn_host_signal_reader(Cursor::new(Vec::<u8>::new()), target.clone());
        handle.join().unwrap();
        assert_eq!(target.0.lock().unwrap().disconnects, 1);
    }

    struct Panicking;

    impl Read for Panicking {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> { panic!("boom") }
    }

    #[test]
    fn panic_in_reader_disconnects_exactly_once() {
        let target = SharedRecording::default();
        let handle = spawn_host_signal_reader(Panicking, target.clone());
        handle.join().unwrap();
        assert_eq!(target.0.lock().unwrap().disconnects, 1);
    }
}
