/*
 *   Copyright (c) 2022-2025 R3BL LLC
 *   All rights reserved.
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

//! # condrv-core
//!
//! An in-memory reimplementation of the legacy Windows console host's
//! driver-facing core: a request dispatch loop, a screen buffer with VT state,
//! the host I/O bridge that moves bytes between that buffer and a real
//! process's stdin/stdout, the handoff protocol that lets a third-party
//! terminal take over rendering, and a snapshot publisher that exposes the
//! current viewport without blocking the dispatch thread.
//!
//! This crate does not open a driver device, register a COM class object, or
//! spawn a PTY itself — those are Win32/COM-specific integration points left to
//! a host binary. What it owns is everything downstream of "a request arrived"
//! and upstream of "bytes went to the terminal": decoding driver requests,
//! mutating the screen buffer model, encoding VT output, and tracking the
//! handful of background threads (host-input reader, host-signal reader,
//! dispatch loop) that a real console host runs.
//!
//! ## Layout
//!
//! - [`core::condrv`] is the console-host core:
//!   - [`core::condrv::dispatch`] decodes driver requests into [`core::condrv::dispatch::ApiRequest`],
//!     routes them to per-category handlers, and encodes replies.
//!   - [`core::condrv::dispatch_loop`] is the session's main loop: wait for a request (or a pending
//!     reply to retry), dispatch it, publish a snapshot, repeat.
//!   - [`core::condrv::driver_transport`] abstracts the three driver I/O operations
//!     (`read_io`/`complete_io`/`set_server_information`) behind a trait so the dispatch loop can be
//!     tested without a real driver.
//!   - [`core::condrv::screen_buffer`] is the cell grid, cursor, and window/viewport state that
//!     handlers mutate.
//!   - [`core::condrv::host_io`] bridges the screen buffer to a real process's pipes: a background
//!     reader thread, an output writer, and the host-signal wire codec plus its own inbound reader
//!     and outbound writer threads.
//!   - [`core::condrv::handoff`] is the session handoff protocol: accepting a session descriptor and,
//!     optionally, delegating the UI to a third-party terminal.
//!   - [`core::condrv::snapshot`] publishes a read-only copy of the current viewport for a renderer to
//!     poll without contending with the dispatch thread.
//!   - [`core::condrv::server_state`], [`core::condrv::handles`], [`core::condrv::alias_table`],
//!     [`core::condrv::history`], [`core::condrv::input_queue`], [`core::condrv::config`],
//!     [`core::condrv::byte_utils`], and [`core::condrv::error`] hold the session's per-connection
//!     state, the object/handle table, command-line alias and history tables, the pending-input queue,
//!     server configuration, VT/UTF-8 byte-level helpers, and the crate's error types respectively.
//! - [`core::log`] is the ambient tracing setup: structured logging configuration and a rolling file
//!   appender, carried over largely unchanged from the library this crate grew out of.
//!
//! See `DESIGN.md` at the repository root for how each module is grounded, and
//! `SPEC_FULL.md` for the full behavioral specification this crate implements.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod core;

pub use core::condrv;
pub use core::log;
