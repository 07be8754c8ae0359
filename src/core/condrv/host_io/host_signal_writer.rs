// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The host-signal outbound channel (spec.md §4.5 "Host signal (outbound)"):
//! serializes a [`HostSignal`] and writes it to an external channel for a
//! privileged control request back to an upstream host. One bounded write per
//! signal (spec.md §6).

use std::{io::Write, sync::Mutex};

use crate::core::condrv::error::{HostSignalError, TransportError};

use super::host_signal_codec::HostSignal;

/// Sends encoded [`HostSignal`] packets to a real host-signal channel. Generic
/// over `Write` so the same type serves a real pipe and an in-memory buffer in
/// tests.
///
/// Unlike [`super::HostOutputWriter`]'s fire-and-forget render output, a
/// host-signal send reports its result: silent failure of a privileged control
/// request like `EndTask` would be a correctness bug, not a cosmetic one.
pub struct HostSignalWriter<W: Write + Send> {
    sink: Mutex<W>,
}

impl<W: Write + Send> HostSignalWriter<W> {
    pub fn new(sink: W) -> Self { Self { sink: Mutex::new(sink) } }

    /// Consumes the writer and returns the inner sink, e.g. to inspect a test
    /// buffer after the fact.
    pub fn into_inner(self) -> W { self.sink.into_inner().unwrap_or_else(|e| e.into_inner()) }

    /// Encodes `signal` and writes it to the channel in a single call.
    ///
    /// # Errors
    /// [`HostSignalError::Transport`] if the underlying write fails.
    pub fn send(&self, signal: HostSignal) -> Result<(), HostSignalError> {
        let bytes = signal.encode();
        let mut guard = self.sink.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .write_all(&bytes)
            .map_err(|source| TransportError::Io { context: "host signal outbound write", source })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_writes_the_exact_wire_bytes() {
        let writer = HostSignalWriter::new(Vec::new());
        writer.send(HostSignal::EndTask { process_id: 4242, event_type: 0, ctrl_flags: 1 }).unwrap();
        assert_eq!(
            writer.into_inner(),
            [0x07, 0x10, 0x00, 0x00, 0x00, 0x92, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]
        );
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
    }

    #[test]
    fn send_reports_transport_error_on_write_failure() {
        let writer = HostSignalWriter::new(FailingWriter);
        let result = writer.send(HostSignal::NotifyApp { process_id: 1 });
        assert!(matches!(result, Err(HostSignalError::Transport(TransportError::Io { .. }))));
    }
}
