// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Typed request/reply payloads carried by an [`super::ApiMessage`]. The literal
//! driver wire format is a Windows-specific `DeviceIoControl` surface reduced to
//! the `DriverTransport` trait contract (spec.md §6); a real backend decodes raw
//! packet bytes into these types, the mock transport used by tests constructs
//! them directly.

use crossterm::event::{KeyCode, KeyModifiers};

use crate::core::condrv::{
    handles::{AccessRights, HandleKind},
    screen_buffer::{BufferSize, CharInfo, Position, Rect},
    server_state::FontInfo,
};

/// A single key event, as delivered through `ReadConsoleInput`/`WriteConsoleInput`
/// (spec.md §4.3; mouse/resize/menu events are out of scope per spec.md §1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEventRecord {
    pub key_down: bool,
    pub repeat_count: u16,
    pub virtual_key_code: KeyCode,
    pub unicode_char: char,
    pub modifiers: KeyModifiers,
}

/// A subset of `CONSOLE_SCREEN_BUFFER_INFO`, returned by `GetScreenBufferInfo`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBufferInfoSnapshot {
    pub buffer_size: BufferSize,
    pub cursor: Position,
    pub window_rect: Rect,
    pub max_window_size: BufferSize,
    pub text_attributes: u16,
}

/// The typed payload of a driver request, tagged by [`super::ApiFunction`].
#[derive(Debug, Clone)]
pub enum ApiRequest {
    Connect { pid: u64, tid: u64 },
    Disconnect,
    CreateObject { kind: HandleKind, desired_access: AccessRights, share_mode: AccessRights },
    CloseObject { handle: u64 },
    GetMode { handle: u64 },
    SetMode { handle: u64, mode: u32 },
    GetCodePage { output: bool },
    SetCodePage { output: bool, code_page: u32 },
    ReadOutputCharacters { handle: u64, pos: Position, count: u32 },
    WriteOutputCharacters { handle: u64, pos: Position, chars: Vec<u16> },
    ReadOutputAttributes { handle: u64, pos: Position, count: u32 },
    WriteOutputAttributes { handle: u64, pos: Position, attrs: Vec<u16> },
    ReadOutputAscii { handle: u64, pos: Position, count: u32 },
    WriteOutputAscii { handle: u64, pos: Position, bytes: Vec<u8> },
    ReadOutputCharInfoRect { handle: u64, region: Rect, unicode: bool },
    WriteOutputCharInfoRect { handle: u64, region: Rect, records: Vec<CharInfo>, unicode: bool },
    FillOutputCharacters { handle: u64, pos: Position, ch: u16, count: u32 },
    FillOutputAttributes { handle: u64, pos: Position, attr: u16, count: u32 },
    ScrollScreenBuffer {
        handle: u64,
        scroll_rect: Rect,
        clip_rect: Rect,
        dst_origin: Position,
        fill_ch: u16,
        fill_attr: u16,
    },
    SetScreenBufferSize { handle: u64, size: BufferSize },
    SetWindowInfo { handle: u64, rect: Rect },
    SetCursorPosition { handle: u64, pos: Position },
    SetCursorInfo { handle: u64, size: u8, visible: bool },
    SetTextAttribute { handle: u64, attr: u16 },
    GetScreenBufferInfo { handle: u64 },
    ReadConsoleInput { handle: u64, max_events: usize, peek: bool },
    WriteConsoleInput { handle: u64, events: Vec<KeyEventRecord> },
    /// Cooked-mode line read; `buffer_len` bounds how many UTF-16 units are
    /// returned. Reply-pending until a `\r\n`-terminated line is available.
    ReadConsole { handle: u64, buffer_len: usize },
    FlushConsoleInputBuffer { handle: u64 },
    GetAlias { exe: String, source: String },
    SetAlias { exe: String, source: String, target: String },
    ExpungeCommandHistory { app: String },
    SetHistoryInfo { max_commands: usize, max_buffers: usize },
    GetHistoryInfo,
    GetTitle,
    SetTitle { title: String },
    GetFontInfo,
    SetFontInfo { font: FontInfo },
    LegacyStub,
}

/// The typed reply payload populated by a handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ApiReply {
    #[default]
    None,
    Count(u32),
    Handle(u64),
    Connected { process_handle: u64, input_handle: u64, output_handle: u64 },
    Chars(Vec<u16>),
    Attrs(Vec<u16>),
    Ascii(Vec<u8>),
    CharInfos(Vec<CharInfo>),
    BufferInfo(ScreenBufferInfoSnapshot),
    Events(Vec<KeyEventRecord>),
    Mode(u32),
    CodePage(u32),
    Alias(Option<String>),
    Title(String),
    Font(FontInfo),
}
