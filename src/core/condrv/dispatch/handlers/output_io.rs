// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Output-buffer read/write/fill/scroll/resize handlers (spec.md §4.1, §4.3).
//! Each function resolves `handle` to a screen buffer and delegates straight to
//! the corresponding [`ScreenBuffer`] method; cell-level validation already
//! lives there, so these stay thin routing shims.

use std::{cell::RefCell, rc::Rc};

use crate::core::condrv::{
    dispatch::request::{ApiReply, ScreenBufferInfoSnapshot},
    error::DomainError,
    screen_buffer::{BufferSize, CharInfo, Position, Rect, ScreenBuffer},
    server_state::ServerState,
};

fn resolve_buffer(state: &ServerState, handle: u64) -> Result<Rc<RefCell<ScreenBuffer>>, DomainError> {
    state
        .handles
        .get(handle)
        .and_then(|h| h.screen_buffer.clone())
        .ok_or(DomainError::UnknownHandle(handle))
}

pub fn read_output_characters(
    state: &ServerState,
    handle: u64,
    pos: Position,
    count: u32,
) -> Result<ApiReply, DomainError> {
    let buf = resolve_buffer(state, handle)?;
    Ok(ApiReply::Chars(buf.borrow().read_output_characters(pos, count)))
}

pub fn write_output_characters(
    state: &ServerState,
    handle: u64,
    pos: Position,
    chars: &[u16],
) -> Result<ApiReply, DomainError> {
    let buf = resolve_buffer(state, handle)?;
    let n = buf.borrow_mut().write_output_characters(pos, chars);
    Ok(ApiReply::Count(n))
}

pub fn read_output_attributes(
    state: &ServerState,
    handle: u64,
    pos: Position,
    count: u32,
) -> Result<ApiReply, DomainError> {
    let buf = resolve_buffer(state, handle)?;
    Ok(ApiReply::Attrs(buf.borrow().read_output_attributes(pos, count)))
}

pub fn write_output_attributes(
    state: &ServerState,
    handle: u64,
    pos: Position,
    attrs: &[u16],
) -> Result<ApiReply, DomainError> {
    let buf = resolve_buffer(state, handle)?;
    let n = buf.borrow_mut().write_output_attributes(pos, attrs);
    Ok(ApiReply::Count(n))
}

pub fn read_output_ascii(state: &ServerState, handle: u64, pos: Position, count: u32) -> Result<ApiReply, DomainError> {
    let buf = resolve_buffer(state, handle)?;
    Ok(ApiReply::Ascii(buf.borrow().read_output_ascii(pos, count)))
}

pub fn write_output_ascii(state: &ServerState, handle: u64, pos: Position, bytes: &[u8]) -> Result<ApiReply, DomainError> {
    let buf = resolve_buffer(state, handle)?;
    let n = buf.borrow_mut().write_output_ascii(pos, bytes);
    Ok(ApiReply::Count(n))
}

pub fn read_output_char_info_rect(
    state: &ServerState,
    handle: u64,
    region: Rect,
    unicode: bool,
) -> Result<ApiReply, DomainError> {
    let buf = resolve_buffer(state, handle)?;
    Ok(ApiReply::CharInfos(buf.borrow().read_output_char_info_rect(region, unicode)))
}

pub fn write_output_char_info_rect(
    state: &ServerState,
    handle: u64,
    region: Rect,
    records: &[CharInfo],
    unicode: bool,
) -> Result<ApiReply, DomainError> {
    let buf = resolve_buffer(state, handle)?;
    let n = buf.borrow_mut().write_output_char_info_rect(region, records, unicode);
    Ok(ApiReply::Count(n as u32))
}

pub fn fill_output_characters(
    state: &ServerState,
    handle: u64,
    pos: Position,
    ch: u16,
    count: u32,
) -> Result<ApiReply, DomainError> {
    let buf = resolve_buffer(state, handle)?;
    let n = buf.borrow_mut().fill_output_characters(pos, ch, count);
    Ok(ApiReply::Count(n))
}

pub fn fill_output_attributes(
    state: &ServerState,
    handle: u64,
    pos: Position,
    attr: u16,
    count: u32,
) -> Result<ApiReply, DomainError> {
    let buf = resolve_buffer(state, handle)?;
    let n = buf.borrow_mut().fill_output_attributes(pos, attr, count);
    Ok(ApiReply::Count(n))
}

#[allow(clippy::too_many_arguments)]
pub fn scroll_screen_buffer(
    state: &ServerState,
    handle: u64,
    scroll_rect: Rect,
    clip_rect: Rect,
    dst_origin: Position,
    fill_ch: u16,
    fill_attr: u16,
) -> Result<ApiReply, DomainError> {
    let buf = resolve_buffer(state, handle)?;
    buf.borrow_mut().scroll_screen_buffer(scroll_rect, clip_rect, dst_origin, fill_ch, fill_attr);
    Ok(ApiReply::None)
}

pub fn set_screen_buffer_size(state: &ServerState, handle: u64, size: BufferSize) -> Result<ApiReply, DomainError> {
    let buf = resolve_buffer(state, handle)?;
    buf.borrow_mut().set_screen_buffer_size(size)?;
    Ok(ApiReply::None)
}

pub fn set_window_info(state: &ServerState, handle: u64, rect: Rect) -> Result<ApiReply, DomainError> {
    let buf = resolve_buffer(state, handle)?;
    buf.borrow_mut().set_window_rect(rect);
    Ok(ApiReply::None)
}

pub fn set_cursor_position(state: &ServerState, handle: u64, pos: Position) -> Result<ApiReply, DomainError> {
    let buf = resolve_buffer(state, handle)?;
    let mut buf = buf.borrow_mut();
    buf.set_cursor_position(pos);
    buf.snap_window_to_cursor();
    Ok(ApiReply::None)
}

pub fn set_cursor_info(state: &ServerState, handle: u64, size: u8, visible: bool) -> Result<ApiReply, DomainError> {
    let buf = resolve_buffer(state, handle)?;
    buf.borrow_mut().set_cursor_info(size, visible);
    Ok(ApiReply::None)
}

pub fn set_text_attribute(state: &ServerState, handle: u64, attr: u16) -> Result<ApiReply, DomainError> {
    let buf = resolve_buffer(state, handle)?;
    buf.borrow_mut().set_text_attributes(attr);
    Ok(ApiReply::None)
}

pub fn get_screen_buffer_info(state: &ServerState, handle: u64) -> Result<ApiReply, DomainError> {
    let buf = resolve_buffer(state, handle)?;
    let buf = buf.borrow();
    Ok(ApiReply::BufferInfo(ScreenBufferInfoSnapshot {
        buffer_size: buf.buffer_size,
        cursor: buf.cursor,
        window_rect: buf.window_rect,
        max_window_size: buf.max_window_size,
        text_attributes: buf.text_attributes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::condrv::{
        handles::{AccessRights, HandleKind, ObjectHandle},
        screen_buffer::ScreenBufferSettings,
    };

    fn state_with_output_handle() -> (ServerState, u64) {
        let mut s = ServerState::new(
            ScreenBufferSettings {
                buffer_size: BufferSize { width: 80, height: 25 },
                text_attributes: 0x07,
                max_window_size: BufferSize { width: 80, height: 25 },
            },
            65001,
        )
        .unwrap();
        let h = s.handles.insert(ObjectHandle {
            kind: HandleKind::Output,
            desired_access: AccessRights::READ | AccessRights::WRITE,
            share_mode: AccessRights::READ | AccessRights::WRITE,
            owning_process: 1,
            screen_buffer: Some(s.active_screen_buffer.clone()),
        });
        (s, h)
    }

    #[test]
    fn write_then_read_round_trips() {
        let (s, h) = state_with_output_handle();
        let chars: Vec<u16> = "hi".encode_utf16().collect();
        write_output_characters(&s, h, Position::ORIGIN, &chars).unwrap();
        let ApiReply::Chars(read) = read_output_characters(&s, h, Position::ORIGIN, 2).unwrap() else { panic!() };
        assert_eq!(read, chars);
    }

    #[test]
    fn unknown_handle_errors() {
        let (s, _) = state_with_output_handle();
        assert!(read_output_characters(&s, 9999, Position::ORIGIN, 1).is_err());
    }
}
