// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Handler functions grouped by spec.md §4.3 category. Each function takes the
//! mutable session state plus whatever the request needs and returns either the
//! typed reply or a [`DomainError`] for [`super::dispatch_fn::dispatch_message`]
//! to fold into the message's reply status; none of them touch the transport.

pub mod connect;
pub mod history_alias;
pub mod input_io;
pub mod misc;
pub mod objects;
pub mod output_io;
