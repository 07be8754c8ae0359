// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The host I/O bridge (spec.md §4.5): the background threads and wire codecs
//! that move bytes between this core and an external terminal process. Handlers
//! never see these types directly — they talk to [`super::dispatch::HostIoContext`]
//! only.

mod host_input_reader;
mod host_output_writer;
mod host_signal_codec;
mod host_signal_reader;
mod host_signal_writer;

pub use host_input_reader::{spawn_host_input_reader, StopFlag};
pub use host_output_writer::HostOutputWriter;
pub use host_signal_codec::HostSignal;
pub use host_signal_reader::{run_host_signal_reader, spawn_host_signal_reader, HostSignalTarget};
pub use host_signal_writer::HostSignalWriter;
