// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Error hierarchy for the ConDrv core, one [`thiserror::Error`] enum per fallible
//! boundary (spec.md §7), each also deriving [`miette::Diagnostic`] so a host binary
//! can render a rich report at its top-level exit path. The dispatch loop's outer
//! `run()` entry point returns [`CoreError`]; everything else is handled internally
//! (handlers answer with a status code, background channels tear down per-channel).

/// Rejected request arguments; handlers populate the reply status with this and
/// return dispatch success — the dispatch loop never treats this as fatal.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum DomainError {
    #[error("invalid parameter: {reason}")]
    #[diagnostic(code(condrv_core::domain::invalid_parameter))]
    InvalidParameter { reason: &'static str },

    #[error("region out of range for a {width}x{height} buffer")]
    #[diagnostic(code(condrv_core::domain::out_of_range))]
    OutOfRange { width: u16, height: u16 },

    #[error("handle {0} is unknown to this session")]
    #[diagnostic(code(condrv_core::domain::unknown_handle))]
    UnknownHandle(u64),

    #[error("process {0} is unknown to this session")]
    #[diagnostic(code(condrv_core::domain::unknown_process))]
    UnknownProcess(u64),

    #[error("allocation failed")]
    #[diagnostic(code(condrv_core::domain::out_of_memory))]
    OutOfMemory,
}

/// Driver or host-I/O transport failures (spec.md §7 `Transport`).
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum TransportError {
    #[error("driver transport is not connected")]
    #[diagnostic(code(condrv_core::transport::not_connected))]
    NotConnected,

    #[error("driver I/O failed: {context}")]
    #[diagnostic(code(condrv_core::transport::io_failed))]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("synchronous I/O was cancelled ({context})")]
    #[diagnostic(
        code(condrv_core::transport::transient_cancellation),
        help("retried up to the bounded retry count; see spec.md §4.4")
    )]
    TransientCancellation { context: &'static str },

    #[error("peer disconnected ({context})")]
    #[diagnostic(code(condrv_core::transport::peer_disconnected))]
    PeerDisconnected { context: &'static str },
}

/// Failures during the handoff acceptor/initiator exchange (spec.md §4.6).
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum HandoffError {
    #[error("handoff wait timed out")]
    #[diagnostic(code(condrv_core::handoff::timed_out))]
    TimedOut,

    #[error("no peer is configured for pty delegation")]
    #[diagnostic(code(condrv_core::handoff::no_peer))]
    NoPeer,

    #[error("handoff transport failed")]
    #[diagnostic(code(condrv_core::handoff::transport))]
    Transport(#[from] TransportError),

    #[error("malformed session descriptor: {reason}")]
    #[diagnostic(code(condrv_core::handoff::malformed_descriptor))]
    MalformedDescriptor { reason: &'static str },
}

/// Failures decoding/encoding the host-signal wire packets (spec.md §6).
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum HostSignalError {
    #[error("unknown host-signal code {0}")]
    #[diagnostic(code(condrv_core::host_signal::unknown_code))]
    UnknownCode(u8),

    #[error("host-signal payload shorter than declared sizeInBytes ({declared} < {minimum})")]
    #[diagnostic(code(condrv_core::host_signal::short_payload))]
    ShortPayload { declared: u32, minimum: u32 },

    #[error("short read on host-signal channel")]
    #[diagnostic(code(condrv_core::host_signal::short_read))]
    ShortRead,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Transport(#[from] TransportError),
}

/// Aggregate error returned by the dispatch loop's outer `run()` entry point.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum CoreError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Handoff(#[from] HandoffError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    HostSignal(#[from] HostSignalError),

    #[error("out of memory")]
    #[diagnostic(code(condrv_core::out_of_memory))]
    OutOfMemory,
}
