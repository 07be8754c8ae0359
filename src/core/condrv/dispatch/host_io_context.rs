// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The host-I/O handle a handler sees: the shared input queue plus an optional
//! sink for bytes the dispatch loop wants to forward to the attached terminal
//! (spec.md §4.2, §4.5). Handlers never touch a transport or a socket directly;
//! [`OutputSink`] is implemented by [`crate::core::condrv::host_io`] in the real
//! binary and by an in-memory recorder in tests.

use crate::core::condrv::input_queue::InputQueue;

/// Receives bytes a handler wants written to the host terminal (VT-encoded key
/// echo, answerback to a cursor-position query, and so on).
pub trait OutputSink {
    fn write_bytes(&self, bytes: &[u8]);
}

/// Bundles everything a handler needs to talk to the world outside `ServerState`.
pub struct HostIoContext {
    pub input_queue: InputQueue,
    pub output: Option<Box<dyn OutputSink>>,
    /// Whether the attached terminal is VT-aware and should receive VT query
    /// answerbacks (spec.md §4.5 `vt_should_answer_queries`).
    pub vt_should_answer_queries: bool,
}

impl HostIoContext {
    pub fn new(input_queue: InputQueue) -> Self {
        Self { input_queue, output: None, vt_should_answer_queries: false }
    }

    pub fn with_output(mut self, sink: Box<dyn OutputSink>) -> Self {
        self.output = Some(sink);
        self
    }

    pub fn write_output(&self, bytes: &[u8]) {
        if let Some(sink) = &self.output {
            sink.write_bytes(bytes);
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;

    use super::OutputSink;

    #[derive(Default)]
    pub struct RecordingSink {
        pub written: RefCell<Vec<u8>>,
    }

    impl OutputSink for RecordingSink {
        fn write_bytes(&self, bytes: &[u8]) { self.written.borrow_mut().extend_from_slice(bytes); }
    }
}
