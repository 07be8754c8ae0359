// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! `condrv` is the console-host core (request dispatch, screen buffer, handoff);
//! `log` is the ambient tracing setup carried over from the teacher codebase.
//! None of this module owns console session state — that lives in
//! [`condrv::server_state`] and its siblings.

pub mod condrv;
pub mod log;

pub use log::*;
