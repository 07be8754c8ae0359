// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! VT key-event encoder: maps a `(key-down, virtual-key, unicode, modifier-mask)`
//! tuple to the byte sequence a VT-speaking terminal expects on its input side
//! (spec.md §4.1 item 1, §8 literal test cases, SPEC_FULL.md §4.3/4.6 supplement).
//!
//! Reuses [`crossterm::event::KeyCode`]/[`crossterm::event::KeyModifiers`] as the
//! key-event vocabulary rather than inventing a parallel enum.

use crossterm::event::{KeyCode, KeyModifiers};

fn csi(final_byte: u8) -> Vec<u8> { vec![0x1b, b'[', final_byte] }

fn csi_tilde(param: u8) -> Vec<u8> { vec![0x1b, b'[', param, b'~'] }

fn ss3(final_byte: u8) -> Vec<u8> { vec![0x1b, b'O', final_byte] }

/// Encodes a single key event. Key-up events (`key_down == false`) always encode to
/// an empty sequence (spec.md §8 boundary case).
pub fn encode_key_event(key_down: bool, code: KeyCode, modifiers: KeyModifiers) -> Vec<u8> {
    if !key_down {
        return Vec::new();
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char(c) = code {
            let upper = c.to_ascii_uppercase();
            return if upper.is_ascii_uppercase() {
                vec![upper as u8 - b'A' + 1]
            } else {
                // No stable VT mapping for Ctrl+<non-letter>.
                Vec::new()
            };
        }
    }

    match code {
        KeyCode::Up => csi(b'A'),
        KeyCode::Down => csi(b'B'),
        KeyCode::Right => csi(b'C'),
        KeyCode::Left => csi(b'D'),
        KeyCode::Home => csi(b'H'),
        KeyCode::End => csi(b'F'),
        KeyCode::PageUp => csi_tilde(b'5'),
        KeyCode::PageDown => csi_tilde(b'6'),
        KeyCode::Delete => csi_tilde(b'3'),
        KeyCode::Insert => csi_tilde(b'2'),
        KeyCode::F(1) => ss3(b'P'),
        KeyCode::F(2) => ss3(b'Q'),
        KeyCode::F(3) => ss3(b'R'),
        KeyCode::F(4) => ss3(b'S'),
        KeyCode::Enter => vec![b'\r'],
        KeyCode::Tab => vec![b'\t'],
        KeyCode::Backspace => vec![0x7f],
        KeyCode::Esc => vec![0x1b],
        KeyCode::Char(c) => {
            let mut buf = [0u8; 4];
            let utf8 = c.encode_utf8(&mut buf).as_bytes();
            if modifiers.contains(KeyModifiers::ALT) {
                let mut out = Vec::with_capacity(utf8.len() + 1);
                out.push(0x1b);
                out.extend_from_slice(utf8);
                out
            } else {
                utf8.to_vec()
            }
        }
        // Non-character key with no stable VT mapping: dropped.
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_c_and_ctrl_d() {
        assert_eq!(encode_key_event(true, KeyCode::Char('c'), KeyModifiers::CONTROL), vec![0x03]);
        assert_eq!(encode_key_event(true, KeyCode::Char('d'), KeyModifiers::CONTROL), vec![0x04]);
    }

    #[test]
    fn vk_up_encodes_to_esc_bracket_a() {
        assert_eq!(encode_key_event(true, KeyCode::Up, KeyModifiers::NONE), vec![0x1b, 0x5b, 0x41]);
    }

    #[test]
    fn backspace_is_del() {
        assert_eq!(encode_key_event(true, KeyCode::Backspace, KeyModifiers::NONE), vec![0x7f]);
    }

    #[test]
    fn alt_prefixes_esc() {
        assert_eq!(
            encode_key_event(true, KeyCode::Char('x'), KeyModifiers::ALT),
            vec![0x1b, b'x']
        );
    }

    #[test]
    fn key_up_is_always_empty() {
        assert!(encode_key_event(false, KeyCode::Up, KeyModifiers::NONE).is_empty());
        assert!(encode_key_event(false, KeyCode::Char('a'), KeyModifiers::NONE).is_empty());
    }

    #[test]
    fn function_keys() {
        assert_eq!(encode_key_event(true, KeyCode::F(1), KeyModifiers::NONE), vec![0x1b, b'O', b'P']);
        assert_eq!(encode_key_event(true, KeyCode::F(4), KeyModifiers::NONE), vec![0x1b, b'O', b'S']);
    }

    #[test]
    fn navigation_cluster() {
        assert_eq!(encode_key_event(true, KeyCode::Home, KeyModifiers::NONE), vec![0x1b, b'[', b'H']);
        assert_eq!(encode_key_event(true, KeyCode::End, KeyModifiers::NONE), vec![0x1b, b'[', b'F']);
        assert_eq!(encode_key_event(true, KeyCode::PageUp, KeyModifiers::NONE), vec![0x1b, b'[', b'5', b'~']);
        assert_eq!(encode_key_event(true, KeyCode::Delete, KeyModifiers::NONE), vec![0x1b, b'[', b'3', b'~']);
    }

    #[test]
    fn plain_char_is_just_utf8() {
        assert_eq!(encode_key_event(true, KeyCode::Char('é'), KeyModifiers::NONE), "é".as_bytes().to_vec());
    }

    #[test]
    fn non_character_key_with_no_mapping_drops() {
        assert!(encode_key_event(true, KeyCode::CapsLock, KeyModifiers::NONE).is_empty());
    }
}
