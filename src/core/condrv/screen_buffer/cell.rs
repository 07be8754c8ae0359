// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Cell and small position/size value types (spec.md §3 `Cell`).

use serde::{Deserialize, Serialize};

/// One screen-buffer cell: a UTF-16 code unit (lone surrogates permitted, matching
/// the legacy console's wide-char cell storage) plus a raw legacy attribute word.
/// Owned inline by [`super::ScreenBuffer::cells`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub code_unit: u16,
    pub attributes: u16,
}

impl Cell {
    pub const fn blank(attributes: u16) -> Self { Self { code_unit: b' ' as u16, attributes } }
}

impl Default for Cell {
    fn default() -> Self { Self::blank(0x07) }
}

/// `(width, height)` in cells. Zero in either dimension means an empty buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferSize {
    pub width: u16,
    pub height: u16,
}

impl BufferSize {
    pub const fn area(self) -> usize { self.width as usize * self.height as usize }
    pub const fn is_empty(self) -> bool { self.width == 0 || self.height == 0 }
}

/// Zero-based `(x, y)` cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub const fn new(x: u16, y: u16) -> Self { Self { x, y } }
}

/// A `CHAR_INFO`-style bulk-transfer record used by the rectangular
/// read/write operations (spec.md §4.1 `write_output_char_info_rect`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharInfo {
    pub char_value: u16,
    pub attributes: u16,
}

/// State captured by [`super::ScreenBuffer::save_cursor_state`] and returned by
/// `restore_cursor_state` (spec.md §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCursorState {
    pub position: Position,
    pub attributes: u16,
    pub delayed_eol_wrap: bool,
    pub origin_mode: bool,
}

/// Construction parameters for [`super::ScreenBuffer::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenBufferSettings {
    pub buffer_size: BufferSize,
    pub text_attributes: u16,
    pub max_window_size: BufferSize,
}
