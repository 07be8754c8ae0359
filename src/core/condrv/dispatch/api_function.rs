// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The closed set of driver request function codes (SPEC_FULL.md §4.3 supplement):
//! one variant per named handler category from spec.md §4.3, plus an explicit
//! `Unknown(u32)` fallback so an unrecognized driver function code is rejected
//! with `DomainInvalid` rather than panicking, mirroring the real
//! `condrv_server.cpp` dispatch `switch`'s default case.

/// Driver request function code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum ApiFunction {
    Connect,
    Disconnect,
    CreateObject,
    CloseObject,
    GetMode,
    SetMode,
    GetCodePage,
    SetCodePage,
    ReadOutputCharacters,
    WriteOutputCharacters,
    ReadOutputAttributes,
    WriteOutputAttributes,
    ReadOutputAscii,
    WriteOutputAscii,
    ReadOutputCharInfoRect,
    WriteOutputCharInfoRect,
    FillOutputCharacters,
    FillOutputAttributes,
    ScrollScreenBuffer,
    SetScreenBufferSize,
    SetWindowInfo,
    SetCursorPosition,
    SetCursorInfo,
    SetTextAttribute,
    GetScreenBufferInfo,
    ReadConsoleInput,
    WriteConsoleInput,
    ReadConsole,
    PeekConsoleInput,
    FlushConsoleInputBuffer,
    GetAlias,
    SetAlias,
    ExpungeCommandHistory,
    SetHistoryInfo,
    GetHistoryInfo,
    GetTitle,
    SetTitle,
    GetFontInfo,
    SetFontInfo,
    /// NLS mode, menu-close, key-shortcuts, OS/2 legacy flags, get-console-window,
    /// get-largest-window, get-current-font, get-display-mode: legacy/no-op
    /// queries answered uniformly with success (spec.md §4.3 handler categories).
    LegacyStub,
    /// Unrecognized driver function code.
    Unknown(u32),
}

/// Named variants in declaration order map to their position here; `Unknown(n)`
/// carries its own code verbatim. Used only by the handoff descriptor's function
/// field (SPEC_FULL.md §3) to recover an `ApiFunction` from a bare `u32`.
const NAMED_FUNCTION_CODES: &[ApiFunction] = &[
    ApiFunction::Connect,
    ApiFunction::Disconnect,
    ApiFunction::CreateObject,
    ApiFunction::CloseObject,
    ApiFunction::GetMode,
    ApiFunction::SetMode,
    ApiFunction::GetCodePage,
    ApiFunction::SetCodePage,
    ApiFunction::ReadOutputCharacters,
    ApiFunction::WriteOutputCharacters,
    ApiFunction::ReadOutputAttributes,
    ApiFunction::WriteOutputAttributes,
    ApiFunction::ReadOutputAscii,
    ApiFunction::WriteOutputAscii,
    ApiFunction::ReadOutputCharInfoRect,
    ApiFunction::WriteOutputCharInfoRect,
    ApiFunction::FillOutputCharacters,
    ApiFunction::FillOutputAttributes,
    ApiFunction::ScrollScreenBuffer,
    ApiFunction::SetScreenBufferSize,
    ApiFunction::SetWindowInfo,
    ApiFunction::SetCursorPosition,
    ApiFunction::SetCursorInfo,
    ApiFunction::SetTextAttribute,
    ApiFunction::GetScreenBufferInfo,
    ApiFunction::ReadConsoleInput,
    ApiFunction::WriteConsoleInput,
    ApiFunction::ReadConsole,
    ApiFunction::PeekConsoleInput,
    ApiFunction::FlushConsoleInputBuffer,
    ApiFunction::GetAlias,
    ApiFunction::SetAlias,
    ApiFunction::ExpungeCommandHistory,
    ApiFunction::SetHistoryInfo,
    ApiFunction::GetHistoryInfo,
    ApiFunction::GetTitle,
    ApiFunction::SetTitle,
    ApiFunction::GetFontInfo,
    ApiFunction::SetFontInfo,
    ApiFunction::LegacyStub,
];

impl ApiFunction {
    /// Stable numeric code for this function: its position in
    /// `NAMED_FUNCTION_CODES`, or the wrapped value for `Unknown`.
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            ApiFunction::Unknown(code) => code,
            named => NAMED_FUNCTION_CODES
                .iter()
                .position(|candidate| *candidate == named)
                .expect("every named variant is listed in NAMED_FUNCTION_CODES") as u32,
        }
    }

    /// Inverse of [`Self::code`]: recovers a named variant for a code in range,
    /// otherwise `Unknown(code)`.
    #[must_use]
    pub fn from_code(code: u32) -> Self {
        NAMED_FUNCTION_CODES.get(code as usize).copied().unwrap_or(ApiFunction::Unknown(code))
    }
}
