// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The host-input reader thread (spec.md §5 thread 2): reads bytes from an
//! external host-input channel and pushes them into the shared [`InputQueue`]
//! until EOF, a read error, or a cooperative stop request.

use std::{
    io::Read,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
};

use tracing::{info_span, warn};

use crate::core::condrv::input_queue::InputQueue;

/// Cooperative stop flag for a background I/O thread (spec.md §5 "Stop is
/// cooperative"). Distinct from [`super::super::dispatch_loop::StopRequested`]
/// because each background role owns its own lifetime; the signal monitor thread
/// fans a single session-wide stop out to each of them.
#[derive(Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn request_stop(&self) { self.0.store(true, Ordering::SeqCst); }

    #[must_use]
    pub fn is_stop_requested(&self) -> bool { self.0.load(Ordering::SeqCst) }
}

/// Spawns the host-input reader thread. Runs the read loop inside
/// [`catch_unwind`] so a panic surfaces as a disconnected queue rather than
/// silently killing the thread (SPEC_FULL.md §5, mirroring the teacher's
/// `rrt.rs` panic containment at its single dedicated thread's entry point).
pub fn spawn_host_input_reader<R>(mut source: R, queue: InputQueue, stop: StopFlag) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name("condrv-host-input-reader".to_string())
        .spawn(move || {
            let span = info_span!("host_input_reader");
            let _enter = span.enter();
            let result = catch_unwind(AssertUnwindSafe(|| {
                let mut buf = [0u8; 4096];
                loop {
                    if stop.is_stop_requested() {
                        break;
                    }
                    match source.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => queue.push(&buf[..n]),
                        Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            warn!(error = %e, "host-input channel read failed");
                            break;
                        }
                    }
                }
            }));
            if result.is_err() {
                warn!("host-input reader thread panicked");
            }
            queue.mark_disconnected();
        })
        .expect("failed to spawn host-input reader thread")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn reader_pushes_bytes_then_marks_disconnected_on_eof() {
        let queue = InputQueue::new();
        let handle = spawn_host_input_reader(std::io::Cursor::new(b"hello".to_vec()), queue.clone(), StopFlag::new());
        handle.join().unwrap();
        assert!(queue.is_disconnected());
        let mut buf = [0u8; 16];
        assert_eq!(queue.pop(&mut buf), 5);
        assert_eq!(&buf[..5], b"hello");
    }

    struct Blocking;

    impl Read for Blocking {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            std::thread::sleep(Duration::from_millis(5));
            Ok(0)
        }
    }

    #[test]
    fn reader_stops_when_stop_flag_set_before_any_read() {
        let queue = InputQueue::new();
        let stop = StopFlag::new();
        stop.request_stop();
        let handle = spawn_host_input_reader(Blocking, queue.clone(), stop);
        handle.join().unwrap();
        assert!(queue.is_disconnected());
    }
}
