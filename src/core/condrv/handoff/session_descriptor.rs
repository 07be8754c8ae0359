// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`SessionDescriptor`]: the portable record carried across the handoff
//! acceptor/initiator exchange (spec.md §4.6). The wire tuple is
//! `{ id_low, id_high, process, object, function, input_size, output_size }`
//! plus four OS handles; SPEC_FULL.md §3 additionally carries the initial
//! ConPTY size and mode flags (from `original_source`'s
//! `SessionOptions::{width, height, headless, in_conpty_mode}`, dropped by the
//! distillation) so the acceptor can size the first screen buffer correctly.

use serde::{Deserialize, Serialize};

use crate::core::condrv::{
    dispatch::{ApiFunction, ApiMessage, ApiRequest},
    error::HandoffError,
    screen_buffer::BufferSize,
};

/// Raw OS handle values carried alongside the descriptor. Modeled as opaque
/// `u64`s (as the session descriptor itself already does for `process`/`object`)
/// since this crate never dereferences a handle itself — it only threads values
/// through to the driver transport / host I/O layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHandles {
    pub server_endpoint: u64,
    pub input_available_event: u64,
    pub outbound_signal_channel: u64,
    pub peer_lifetime_handle: u64,
}

/// The portable handoff descriptor (spec.md §4.6, SPEC_FULL.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub id_low: u32,
    pub id_high: i32,
    pub process: u64,
    pub object: u64,
    pub function: u32,
    pub input_size: u32,
    pub output_size: u32,
    pub handles: SessionHandles,
    /// Initial ConPTY viewport, honored only when `in_conpty_mode` is set.
    pub initial_size: BufferSize,
    /// True when the acceptor should run the headless dispatch loop variant
    /// (no direct console window, output relayed purely as VT bytes).
    pub headless: bool,
    pub in_conpty_mode: bool,
}

impl SessionDescriptor {
    /// Turns the descriptor's function-code triple into the first request
    /// packet fed to the dispatch loop before it begins its normal `ReadIo`
    /// cycle (spec.md §4.6).
    ///
    /// # Errors
    /// Returns [`HandoffError::MalformedDescriptor`] if `function` doesn't
    /// decode to a known [`ApiFunction`] or its request payload can't be
    /// constructed from the descriptor alone (every function above `Connect`
    /// needs input buffer bytes this descriptor doesn't carry).
    pub fn into_initial_message(self) -> Result<ApiMessage, HandoffError> {
        let function = ApiFunction::from_code(self.function);
        if function != ApiFunction::Connect {
            return Err(HandoffError::MalformedDescriptor {
                reason: "handoff initial request must be a Connect",
            });
        }
        let identifier = (u64::from(self.id_high as u32) << 32) | u64::from(self.id_low);
        Ok(ApiMessage::new(
            identifier,
            self.process,
            self.object,
            ApiFunction::Connect,
            ApiRequest::Connect { pid: self.process, tid: 0 },
        ))
    }
}
