// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Host-signal wire codec (spec.md §6), reproduced byte-exact from
//! `original_source/src/core/host_signals.hpp`: a 1-byte code followed by a
//! packed payload led by `sizeInBytes: u32`. Serialized by hand rather than via
//! `#[repr(C, packed)]` so endianness is explicit at every field instead of
//! depending on the host's native layout.

use std::io::Read;

use crate::core::condrv::error::HostSignalError;

const CODE_NOTIFY_APP: u8 = 1;
const CODE_SET_FOREGROUND: u8 = 5;
const CODE_END_TASK: u8 = 7;

/// One decoded host-signal packet (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    NotifyApp { process_id: u32 },
    /// `process_handle` is accepted as an opaque value (PID or handle), per the
    /// Open Question in spec.md §9.
    SetForeground { process_handle: u32, is_foreground: bool },
    EndTask { process_id: u32, event_type: u32, ctrl_flags: u32 },
}

impl HostSignal {
    fn code(&self) -> u8 {
        match self {
            HostSignal::NotifyApp { .. } => CODE_NOTIFY_APP,
            HostSignal::SetForeground { .. } => CODE_SET_FOREGROUND,
            HostSignal::EndTask { .. } => CODE_END_TASK,
        }
    }

    /// Packs into the wire format: 1-byte code, `sizeInBytes: u32`, little-endian
    /// payload fields in declaration order.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![self.code()];
        match *self {
            HostSignal::NotifyApp { process_id } => {
                out.extend_from_slice(&8u32.to_le_bytes());
                out.extend_from_slice(&process_id.to_le_bytes());
            }
            HostSignal::SetForeground { process_handle, is_foreground } => {
                out.extend_from_slice(&12u32.to_le_bytes());
                out.extend_from_slice(&process_handle.to_le_bytes());
                out.push(u8::from(is_foreground));
                out.extend_from_slice(&[0u8; 3]);
            }
            HostSignal::EndTask { process_id, event_type, ctrl_flags } => {
                out.extend_from_slice(&16u32.to_le_bytes());
                out.extend_from_slice(&process_id.to_le_bytes());
                out.extend_from_slice(&event_type.to_le_bytes());
                out.extend_from_slice(&ctrl_flags.to_le_bytes());
            }
        }
        out
    }

    /// Minimum `sizeInBytes` for a known code, or [`HostSignalError::UnknownCode`].
    fn minimum_for(code: u8) -> Result<u32, HostSignalError> {
        match code {
            CODE_NOTIFY_APP => Ok(8),
            CODE_SET_FOREGROUND => Ok(12),
            CODE_END_TASK => Ok(16),
            other => Err(HostSignalError::UnknownCode(other)),
        }
    }

    /// Parses the payload bytes of a known code (at least `minimum_for(code)`
    /// bytes; anything past the fields a variant actually reads is ignored).
    fn parse_known(code: u8, payload: &[u8]) -> Self {
        match code {
            CODE_NOTIFY_APP => {
                HostSignal::NotifyApp { process_id: u32::from_le_bytes(payload[0..4].try_into().unwrap()) }
            }
            CODE_SET_FOREGROUND => HostSignal::SetForeground {
                process_handle: u32::from_le_bytes(payload[0..4].try_into().unwrap()),
                is_foreground: payload[4] != 0,
            },
            CODE_END_TASK => HostSignal::EndTask {
                process_id: u32::from_le_bytes(payload[0..4].try_into().unwrap()),
                event_type: u32::from_le_bytes(payload[4..8].try_into().unwrap()),
                ctrl_flags: u32::from_le_bytes(payload[8..12].try_into().unwrap()),
            },
            other => unreachable!("unknown code {other} must be rejected before parse_known"),
        }
    }

    /// Decodes one packet from the front of `bytes`, returning the signal and the
    /// number of bytes consumed. `sizeInBytes` is trusted for the struct's known
    /// size; any declared trailing bytes beyond it are skipped, not parsed
    /// (spec.md §6 "to accommodate future extensions").
    ///
    /// # Errors
    /// [`HostSignalError::ShortRead`] if `bytes` doesn't hold a full header or
    /// declared payload; [`HostSignalError::ShortPayload`] if `sizeInBytes` is
    /// smaller than this code's known minimum; [`HostSignalError::UnknownCode`]
    /// for an unrecognized code byte.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), HostSignalError> {
        if bytes.len() < 5 {
            return Err(HostSignalError::ShortRead);
        }
        let code = bytes[0];
        let declared = u32::from_le_bytes(bytes[1..5].try_into().unwrap());
        let minimum = Self::minimum_for(code)?;
        if declared < minimum {
            return Err(HostSignalError::ShortPayload { declared, minimum });
        }
        let total = 1 + declared as usize;
        if bytes.len() < total {
            return Err(HostSignalError::ShortRead);
        }
        let payload = &bytes[5..total];
        Ok((Self::parse_known(code, payload), total))
    }

    /// Streaming counterpart to [`Self::decode`], used by the host-signal
    /// inbound reader thread: reads the 1-byte code and `sizeInBytes` header via
    /// `read_exact`, then the declared payload, discarding any trailing bytes
    /// beyond this code's known fields.
    ///
    /// Any I/O failure on the header read — including a clean EOF, which
    /// `read_exact` reports as `UnexpectedEof` — is reported as
    /// [`HostSignalError::ShortRead`], so a total disconnect and a disconnect
    /// mid-header are handled identically by callers.
    ///
    /// # Errors
    /// Same as [`Self::decode`], plus [`HostSignalError::ShortRead`] for any
    /// underlying I/O error while reading the header or payload.
    pub fn decode_from<R: Read>(reader: &mut R) -> Result<Self, HostSignalError> {
        let mut header = [0u8; 5];
        reader.read_exact(&mut header).map_err(|_| HostSignalError::ShortRead)?;
        let code = header[0];
        let declared = u32::from_le_bytes(header[1..5].try_into().unwrap());
        let minimum = Self::minimum_for(code)?;
        if declared < minimum {
            return Err(HostSignalError::ShortPayload { declared, minimum });
        }
        let mut payload = vec![0u8; declared as usize - 4];
        reader.read_exact(&mut payload).map_err(|_| HostSignalError::ShortRead)?;
        Ok(Self::parse_known(code, &payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_app_round_trips() {
        let signal = HostSignal::NotifyApp { process_id: 42 };
        let bytes = signal.encode();
        let (decoded, consumed) = HostSignal::decode(&bytes).unwrap();
        assert_eq!(decoded, signal);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn set_foreground_round_trips() {
        let signal = HostSignal::SetForeground { process_handle: 7, is_foreground: true };
        let bytes = signal.encode();
        let (decoded, _) = HostSignal::decode(&bytes).unwrap();
        assert_eq!(decoded, signal);
    }

    #[test]
    fn end_task_round_trips() {
        let signal = HostSignal::EndTask { process_id: 1, event_type: 2, ctrl_flags: 3 };
        let bytes = signal.encode();
        let (decoded, _) = HostSignal::decode(&bytes).unwrap();
        assert_eq!(decoded, signal);
    }

    #[test]
    fn unknown_code_errors() {
        let bytes = [99u8, 8, 0, 0, 0, 1, 2, 3, 4];
        assert!(matches!(HostSignal::decode(&bytes), Err(HostSignalError::UnknownCode(99))));
    }

    #[test]
    fn declared_size_smaller_than_minimum_errors() {
        let bytes = [CODE_NOTIFY_APP, 2, 0, 0, 0, 1, 2];
        assert!(matches!(HostSignal::decode(&bytes), Err(HostSignalError::ShortPayload { .. })));
    }

    #[test]
    fn trailing_bytes_beyond_declared_size_are_discarded() {
        let mut bytes = HostSignal::NotifyApp { process_id: 5 }.encode();
        bytes.extend_from_slice(&[0xFF, 0xFF]);
        let (decoded, consumed) = HostSignal::decode(&bytes).unwrap();
        assert_eq!(decoded, HostSignal::NotifyApp { process_id: 5 });
        assert_eq!(consumed, bytes.len() - 2);
    }

    #[test]
    fn short_read_when_header_incomplete() {
        assert!(matches!(HostSignal::decode(&[1, 0]), Err(HostSignalError::ShortRead)));
    }

    #[test]
    fn decode_from_reads_one_packet_off_a_stream() {
        let signal = HostSignal::EndTask { process_id: 4242, event_type: 0, ctrl_flags: 1 };
        let bytes = signal.encode();
        assert_eq!(bytes, [0x07, 0x10, 0x00, 0x00, 0x00, 0x92, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]);
        let mut cursor = std::io::Cursor::new(bytes);
        let decoded = HostSignal::decode_from(&mut cursor).unwrap();
        assert_eq!(decoded, signal);
    }

    #[test]
    fn decode_from_reports_short_read_on_clean_eof() {
        let mut cursor = std::io::Cursor::new(Vec::<u8>::new());
        assert!(matches!(HostSignal::decode_from(&mut cursor), Err(HostSignalError::ShortRead)));
    }

    #[test]
    fn decode_from_reports_short_read_on_truncated_payload() {
        let mut bytes = HostSignal::NotifyApp { process_id: 5 }.encode();
        bytes.truncate(bytes.len() - 1);
        let mut cursor = std::io::Cursor::new(bytes);
        assert!(matches!(HostSignal::decode_from(&mut cursor), Err(HostSignalError::ShortRead)));
    }
}
