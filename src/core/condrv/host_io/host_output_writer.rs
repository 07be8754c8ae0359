// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`HostOutputWriter`]: the concrete [`OutputSink`] that forwards handler output
//! to a real host-output channel (spec.md §4.5). Generic over `Write` so the same
//! type serves a real pipe and an in-memory buffer in tests.

use std::{io::Write, sync::Mutex};

use crate::core::condrv::dispatch::OutputSink;

pub struct HostOutputWriter<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> HostOutputWriter<W> {
    pub fn new(writer: W) -> Self { Self { writer: Mutex::new(writer) } }

    /// Consumes the sink and returns the inner writer, e.g. to inspect a test
    /// buffer after the fact.
    pub fn into_inner(self) -> W { self.writer.into_inner().unwrap_or_else(|e| e.into_inner()) }
}

impl<W: Write + Send> OutputSink for HostOutputWriter<W> {
    fn write_bytes(&self, bytes: &[u8]) {
        let mut guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let _ = guard.write_all(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_bytes_to_inner_writer() {
        let sink = HostOutputWriter::new(Vec::new());
        sink.write_bytes(b"hi");
        assert_eq!(sink.into_inner(), b"hi");
    }
}
