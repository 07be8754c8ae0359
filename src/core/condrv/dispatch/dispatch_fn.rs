// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Request routing (spec.md §4.3): one `match` over [`ApiRequest`] that calls the
//! handler for its category and folds the result into the message's reply slots.
//! This is the only place that knows the full `ApiFunction` ⟷ `ApiRequest` ⟷
//! handler mapping; everything downstream of it is pure per-category logic.

use crate::core::condrv::{
    dispatch::{
        handlers::{connect, history_alias, input_io, misc, objects, output_io},
        host_io_context::HostIoContext,
        io_packet::{status, ApiMessage},
        request::ApiReply,
    },
    error::DomainError,
    server_state::ServerState,
};

use super::request::ApiRequest;

/// What the dispatch loop should do after routing one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    /// The handler could not complete yet (spec.md §4.3); the dispatch loop
    /// keeps `message` in its pending-reply queue and retries it later instead
    /// of treating it as answered.
    pub reply_pending: bool,
    /// A graceful session-termination condition was reached (spec.md §4.3
    /// "no remaining clients", a shutdown control event, etc.).
    pub request_exit: bool,
}

fn status_for(err: &DomainError) -> i32 {
    match err {
        DomainError::InvalidParameter { .. } | DomainError::OutOfRange { .. } => status::INVALID_PARAMETER,
        _ => status::UNSUCCESSFUL,
    }
}

fn fold(message: &mut ApiMessage, result: Result<ApiReply, DomainError>) {
    match result {
        Ok(reply) => message.succeed(reply),
        Err(err) => message.fail(status_for(&err)),
    }
}

/// Routes `message` against `state`, consulting/producing host I/O through `io`.
/// Never returns an `Err` for a rejected request — those are folded into the
/// message's own reply status; only used to let the caller observe truly fatal
/// conditions (currently none originate here, but the signature leaves room for
/// a handler category that someday needs to report transport-level failure).
pub fn dispatch_message(
    state: &mut ServerState,
    message: &mut ApiMessage,
    io: &mut HostIoContext,
) -> DispatchOutcome {
    let mut outcome = DispatchOutcome::default();

    match message.request.clone() {
        ApiRequest::Connect { pid, tid } => {
            let reply = connect::connect(state, pid, tid);
            message.succeed(reply);
        }
        ApiRequest::Disconnect => {
            outcome.request_exit = connect::disconnect(state, message.process);
            message.succeed(ApiReply::None);
        }
        ApiRequest::CreateObject { kind, desired_access, share_mode } => {
            let reply = objects::create_object(state, message.process, kind, desired_access, share_mode);
            message.succeed(reply);
        }
        ApiRequest::CloseObject { handle } => fold(message, objects::close_object(state, handle)),
        ApiRequest::GetMode { handle } => fold(message, objects::get_mode(state, handle)),
        ApiRequest::SetMode { handle, mode } => fold(message, objects::set_mode(state, handle, mode)),
        ApiRequest::GetCodePage { output } => message.succeed(objects::get_code_page(state, output)),
        ApiRequest::SetCodePage { output, code_page } => {
            message.succeed(objects::set_code_page(state, output, code_page))
        }
        ApiRequest::ReadOutputCharacters { handle, pos, count } => {
            fold(message, output_io::read_output_characters(state, handle, pos, count))
        }
        ApiRequest::WriteOutputCharacters { handle, pos, chars } => {
            fold(message, output_io::write_output_characters(state, handle, pos, &chars))
        }
        ApiRequest::ReadOutputAttributes { handle, pos, count } => {
            fold(message, output_io::read_output_attributes(state, handle, pos, count))
        }
        ApiRequest::WriteOutputAttributes { handle, pos, attrs } => {
            fold(message, output_io::write_output_attributes(state, handle, pos, &attrs))
        }
        ApiRequest::ReadOutputAscii { handle, pos, count } => {
            fold(message, output_io::read_output_ascii(state, handle, pos, count))
        }
        ApiRequest::WriteOutputAscii { handle, pos, bytes } => {
            fold(message, output_io::write_output_ascii(state, handle, pos, &bytes))
        }
        ApiRequest::ReadOutputCharInfoRect { handle, region, unicode } => {
            fold(message, output_io::read_output_char_info_rect(state, handle, region, unicode))
        }
        ApiRequest::WriteOutputCharInfoRect { handle, region, records, unicode } => {
            fold(message, output_io::write_output_char_info_rect(state, handle, region, &records, unicode))
        }
        ApiRequest::FillOutputCharacters { handle, pos, ch, count } => {
            fold(message, output_io::fill_output_characters(state, handle, pos, ch, count))
        }
        ApiRequest::FillOutputAttributes { handle, pos, attr, count } => {
            fold(message, output_io::fill_output_attributes(state, handle, pos, attr, count))
        }
        ApiRequest::ScrollScreenBuffer { handle, scroll_rect, clip_rect, dst_origin, fill_ch, fill_attr } => fold(
            message,
            output_io::scroll_screen_buffer(state, handle, scroll_rect, clip_rect, dst_origin, fill_ch, fill_attr),
        ),
        ApiRequest::SetScreenBufferSize { handle, size } => {
            fold(message, output_io::set_screen_buffer_size(state, handle, size))
        }
        ApiRequest::SetWindowInfo { handle, rect } => fold(message, output_io::set_window_info(state, handle, rect)),
        ApiRequest::SetCursorPosition { handle, pos } => {
            fold(message, output_io::set_cursor_position(state, handle, pos))
        }
        ApiRequest::SetCursorInfo { handle, size, visible } => {
            fold(message, output_io::set_cursor_info(state, handle, size, visible))
        }
        ApiRequest::SetTextAttribute { handle, attr } => {
            fold(message, output_io::set_text_attribute(state, handle, attr))
        }
        ApiRequest::GetScreenBufferInfo { handle } => {
            fold(message, output_io::get_screen_buffer_info(state, handle))
        }
        ApiRequest::ReadConsoleInput { handle: _, max_events, peek } => {
            message.succeed(input_io::read_console_input(io, max_events, peek))
        }
        ApiRequest::WriteConsoleInput { handle: _, events } => {
            message.succeed(input_io::write_console_input(io, &events))
        }
        ApiRequest::ReadConsole { handle: _, buffer_len } => match input_io::read_console(io, buffer_len) {
            Some(result) => fold(message, result),
            None => outcome.reply_pending = true,
        },
        ApiRequest::FlushConsoleInputBuffer { handle: _ } => {
            message.succeed(input_io::flush_console_input_buffer(io))
        }
        ApiRequest::GetAlias { exe, source } => message.succeed(history_alias::get_alias(state, &exe, &source)),
        ApiRequest::SetAlias { exe, source, target } => {
            fold(message, history_alias::set_alias(state, &exe, &source, &target))
        }
        ApiRequest::ExpungeCommandHistory { app } => {
            message.succeed(history_alias::expunge_command_history(state, &app))
        }
        ApiRequest::SetHistoryInfo { max_commands, max_buffers } => {
            message.succeed(history_alias::set_history_info(state, max_commands, max_buffers))
        }
        ApiRequest::GetHistoryInfo => message.succeed(history_alias::get_history_info(state)),
        ApiRequest::GetTitle => message.succeed(misc::get_title(state)),
        ApiRequest::SetTitle { title } => message.succeed(misc::set_title(state, title)),
        ApiRequest::GetFontInfo => message.succeed(misc::get_font_info(state)),
        ApiRequest::SetFontInfo { font } => message.succeed(misc::set_font_info(state, font)),
        ApiRequest::LegacyStub => message.succeed(misc::legacy_stub()),
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::condrv::{
        dispatch::{api_function::ApiFunction, request::ApiRequest},
        input_queue::InputQueue,
        screen_buffer::{BufferSize, Position, ScreenBufferSettings},
    };

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
    fn connect_then_write_output_round_trips() {
        let mut state = state();
        let mut io = HostIoContext::new(InputQueue::new());

        let mut connect_msg =
            ApiMessage::new(1, 0, 0, ApiFunction::Connect, ApiRequest::Connect { pid: 7, tid: 1 });
        dispatch_message(&mut state, &mut connect_msg, &mut io);
        let ApiReply::Connected { process_handle, output_handle, .. } = connect_msg.reply else { panic!() };

        let mut write_msg = ApiMessage::new(
            2,
            process_handle,
            output_handle,
            ApiFunction::WriteOutputCharacters,
            ApiRequest::WriteOutputCharacters {
                handle: output_handle,
                pos: Position::ORIGIN,
                chars: "hi".encode_utf16().collect(),
            },
        );
        dispatch_message(&mut state, &mut write_msg, &mut io);
        assert_eq!(write_msg.reply_status, status::SUCCESS);
        assert_eq!(write_msg.reply, ApiReply::Count(2));
    }

    #[test]
    fn read_console_reports_pending_then_ready() {
        let mut state = state();
        let mut io = HostIoContext::new(InputQueue::new());
        let mut msg =
            ApiMessage::new(1, 0, 0, ApiFunction::ReadConsole, ApiRequest::ReadConsole { handle: 1, buffer_len: 16 });

        let outcome = dispatch_message(&mut state, &mut msg, &mut io);
        assert!(outcome.reply_pending);

        io.input_queue.push(b"go\r\n");
        let outcome = dispatch_message(&mut state, &mut msg, &mut io);
        assert!(!outcome.reply_pending);
        assert_eq!(msg.reply_status, status::SUCCESS);
    }

    #[test]
    fn disconnect_of_only_client_requests_exit() {
        let mut state = state();
        let mut io = HostIoContext::new(InputQueue::new());
        let mut connect_msg =
            ApiMessage::new(1, 0, 0, ApiFunction::Connect, ApiRequest::Connect { pid: 1, tid: 1 });
        dispatch_message(&mut state, &mut connect_msg, &mut io);
        let ApiReply::Connected { process_handle, .. } = connect_msg.reply else { panic!() };

        let mut disconnect_msg =
            ApiMessage::new(2, process_handle, 0, ApiFunction::Disconnect, ApiRequest::Disconnect);
        let outcome = dispatch_message(&mut state, &mut disconnect_msg, &mut io);
        assert!(outcome.request_exit);
    }
}
