// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Title, font-info, and legacy-stub handlers (spec.md §4.3). The legacy group
//! (set cursor mode, NLS mode, menu close, key shortcuts, OS/2 legacy flags,
//! get-console-window, get largest window, get current font, get display mode)
//! has no session-visible state left to model; every one of them answers success
//! uniformly, matching the reference server's behavior for a headless session.

use crate::core::condrv::{dispatch::request::ApiReply, server_state::{FontInfo, ServerState}};

pub fn get_title(state: &ServerState) -> ApiReply { ApiReply::Title(state.title.clone()) }

pub fn set_title(state: &mut ServerState, title: String) -> ApiReply {
    state.title = title;
    ApiReply::None
}

pub fn get_font_info(state: &ServerState) -> ApiReply { ApiReply::Font(state.font.clone()) }

pub fn set_font_info(state: &mut ServerState, font: FontInfo) -> ApiReply {
    state.font = font;
    ApiReply::None
}

pub fn legacy_stub() -> ApiReply { ApiReply::None }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::condrv::screen_buffer::{BufferSize, ScreenBufferSettings};

    fn state() -> ServerState {
        ServerState::new(
            ScreenBufferSettings {
                buffer_size: BufferSize { width: 80, height: 25 },
                text_attributes: 0x07,
                max_window_size: BufferSize { width: 80, height: 25 },
            },
            65001,
        )
        .unwrap()
    }

    #[test]
    fn title_round_trips() {
        let mut s = state();
        set_title(&mut s, "my shell".to_string());
        assert_eq!(get_title(&s), ApiReply::Title("my shell".to_string()));
    }

    #[test]
    fn font_round_trips() {
        let mut s = state();
        let font = FontInfo { family: "Cascadia Code".to_string(), size: (10, 20) };
        set_font_info(&mut s, font.clone());
        assert_eq!(get_font_info(&s), ApiReply::Font(font));
    }
}
