// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A from-scratch reimplementation of the legacy Windows console host's driver-
//! facing core: request dispatch, the screen-buffer model, the input queue, and
//! the handoff/host-signal plumbing that lets a third-party terminal take over
//! rendering (spec.md §1-§2). `server_state` owns all per-session state; every
//! other module here is either a pure value type, a handler, or a background
//! I/O role that talks to `server_state` only through `dispatch`.

pub mod alias_table;
pub mod byte_utils;
pub mod config;
pub mod dispatch;
pub mod dispatch_loop;
pub mod driver_transport;
pub mod error;
pub mod handles;
pub mod handoff;
pub mod history;
pub mod host_io;
pub mod input_queue;
pub mod screen_buffer;
pub mod server_state;
pub mod snapshot;

pub use alias_table::AliasTable;
pub use config::ServerConfig;
pub use dispatch_loop::{run_session, DispatchLoopConfig};
pub use driver_transport::DriverTransport;
pub use error::{CoreError, DomainError, HandoffError, HostSignalError, TransportError};
pub use handles::{AccessRights, HandleKind, HandleTable, ObjectHandle, ProcessState, ProcessTable};
pub use history::{CommandHistory, CommandHistoryPool};
pub use input_queue::InputQueue;
pub use screen_buffer::{BufferSize, Cell, CharInfo, Position, Rect, ScreenBuffer, ScreenBufferSettings};
pub use server_state::{FontInfo, ServerState};
pub use snapshot::{RendererWake, SnapshotPublisher, ViewportSnapshot};
