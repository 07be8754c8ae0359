// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Input handlers (spec.md §4.2-§4.3). The data model names exactly one input
//! entity, `InputQueue` (a byte deque) — there is no separate typed event queue,
//! so `ReadConsoleInput`/`WriteConsoleInput` decode/encode through the same byte
//! queue the cooked-mode `ReadConsole` reads from: `WriteConsoleInput` re-encodes
//! each [`KeyEventRecord`] with the same VT encoder the host-input path would use,
//! `ReadConsoleInput` decodes bytes back into one synthetic character event per
//! decoded code unit (escape-sequence round-tripping back into named virtual keys
//! is not attempted — out of scope per spec.md §1 "no VT/ANSI terminal emulation").

use crossterm::event::{KeyCode, KeyModifiers};

use crate::core::condrv::{
    byte_utils::{encode_key_event, Utf8StreamDecoder},
    dispatch::{host_io_context::HostIoContext, request::{ApiReply, KeyEventRecord}},
    error::DomainError,
};

/// Decodes `bytes` one byte at a time, returning `(code_unit, bytes_consumed_so_far)`
/// for every UTF-16 unit emitted, so a caller can cut the stream at an exact event
/// boundary.
fn decode_with_offsets(bytes: &[u8]) -> Vec<(u16, usize)> {
    let mut decoder = Utf8StreamDecoder::new();
    let mut out = Vec::new();
    let mut result = Vec::new();
    for (i, &b) in bytes.iter().enumerate() {
        let before = out.len();
        decoder.decode_append(&[b], &mut out);
        for &unit in &out[before..] {
            result.push((unit, i + 1));
        }
    }
    result
}

fn events_for_units(units: &[u16]) -> Vec<KeyEventRecord> {
    char::decode_utf16(units.iter().copied())
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .map(|ch| KeyEventRecord {
            key_down: true,
            repeat_count: 1,
            virtual_key_code: KeyCode::Char(ch),
            unicode_char: ch,
            modifiers: KeyModifiers::NONE,
        })
        .collect()
}

pub fn read_console_input(io: &HostIoContext, max_events: usize, peek: bool) -> ApiReply {
    let available = io.input_queue.len();
    let mut buf = vec![0u8; available];
    io.input_queue.peek(&mut buf);
    let decoded = decode_with_offsets(&buf);
    let take = decoded.len().min(max_events);
    let units: Vec<u16> = decoded[..take].iter().map(|(u, _)| *u).collect();
    let bytes_consumed = decoded[..take].last().map(|(_, n)| *n).unwrap_or(0);

    if !peek && bytes_consumed > 0 {
        let mut discard = vec![0u8; bytes_consumed];
        io.input_queue.pop(&mut discard);
    }
    ApiReply::Events(events_for_units(&units))
}

pub fn write_console_input(io: &HostIoContext, events: &[KeyEventRecord]) -> ApiReply {
    for event in events {
        let bytes = encode_key_event(event.key_down, event.virtual_key_code, event.modifiers);
        io.input_queue.push(&bytes);
    }
    ApiReply::Count(events.len() as u32)
}

pub fn flush_console_input_buffer(io: &HostIoContext) -> ApiReply {
    io.input_queue.clear();
    ApiReply::None
}

/// Cooked-mode line read (spec.md §4.3, §8 scenario 2): returns `None` (reply
/// pending) until the queue holds a `\n`-terminated line, since `\n` can never
/// appear as a UTF-8 continuation or lead byte, scanning for it needs no decoding.
pub fn read_console(io: &HostIoContext, buffer_len: usize) -> Option<Result<ApiReply, DomainError>> {
    let available = io.input_queue.len();
    let mut buf = vec![0u8; available];
    io.input_queue.peek(&mut buf);

    let newline_at = buf.iter().position(|&b| b == b'\n');
    let bytes_consumed = match newline_at {
        Some(idx) => idx + 1,
        None if io.input_queue.is_disconnected() => buf.len(),
        None => return None,
    };

    let mut consumed = vec![0u8; bytes_consumed];
    io.input_queue.pop(&mut consumed);
    let mut units = Utf8StreamDecoder::decode(&consumed);
    units.truncate(buffer_len);
    Some(Ok(ApiReply::Chars(units)))
}
