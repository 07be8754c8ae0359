// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`ScreenBuffer`]: the authoritative 2D cell grid plus VT-level state (spec.md
//! §3-4.1). Single-writer by construction — the dispatch thread is the only
//! mutator (spec.md §9); readers (the snapshot publisher) only ever see a
//! consistent state because mutation and publication both happen inline on that
//! thread.

use crate::core::condrv::error::DomainError;

use super::{BufferSize, CharInfo, Position, Rect, SavedCursorState, ScreenBufferSettings};

/// The legacy 16-color console palette (CGA-style RGB triples), used to initialize
/// a freshly created buffer's `color_table`.
pub const LEGACY_16_COLOR_TABLE: [u32; 16] = [
    0x00_00_00, 0x00_00_80, 0x00_80_00, 0x00_80_80, 0x80_00_00, 0x80_00_80, 0x80_80_00,
    0xC0_C0_C0, 0x80_80_80, 0x00_00_FF, 0x00_FF_00, 0x00_FF_FF, 0xFF_00_00, 0xFF_00_FF,
    0xFF_FF_00, 0xFF_FF_FF,
];

/// Snapshot of `main`-side state taken when switching into the alternate screen
/// buffer, restored atomically on switch-back (spec.md §4.1 "Alternate buffer").
#[derive(Debug, Clone)]
struct AlternateBackup {
    cells: Vec<super::Cell>,
    cursor: Position,
    text_attributes: u16,
    color_table: [u32; 16],
    saved_cursor: Option<SavedCursorState>,
    vt_vertical_margins: Option<(u16, u16)>,
    vt_delayed_wrap_position: Option<Position>,
    vt_origin_mode_enabled: bool,
}

/// The authoritative per-session cell grid (spec.md §3 `ScreenBuffer`).
#[derive(Debug, Clone)]
pub struct ScreenBuffer {
    pub buffer_size: BufferSize,
    pub cursor: Position,
    pub window_rect: Rect,
    pub max_window_size: BufferSize,
    pub text_attributes: u16,
    pub default_text_attributes: u16,
    pub cursor_size: u8,
    pub cursor_visible: bool,
    pub color_table: [u32; 16],
    pub saved_cursor: Option<SavedCursorState>,
    pub vt_vertical_margins: Option<(u16, u16)>,
    pub vt_delayed_wrap_position: Option<Position>,
    pub vt_autowrap_enabled: bool,
    pub vt_origin_mode_enabled: bool,
    pub vt_insert_mode_enabled: bool,
    alternate_backup: Option<Box<AlternateBackup>>,
    pub revision: u64,
    cells: Vec<super::Cell>,
}

impl ScreenBuffer {
    /// Allocates cells filled with `(space, text_attributes)`; clamps window and
    /// cursor to valid ranges; initializes the palette to the legacy 16-color
    /// console table.
    pub fn create(settings: ScreenBufferSettings) -> Result<Self, DomainError> {
        let area = settings.buffer_size.area();
        let cells = vec![super::Cell::blank(settings.text_attributes); area];
        let window_w = settings.max_window_size.width.min(settings.buffer_size.width.max(1));
        let window_h = settings.max_window_size.height.min(settings.buffer_size.height.max(1));
        let window_rect = if settings.buffer_size.is_empty() {
            Rect::new(0, 0, 0, 0)
        } else {
            Rect::new(0, 0, window_w.saturating_sub(1), window_h.saturating_sub(1))
        };
        Ok(Self {
            buffer_size: settings.buffer_size,
            cursor: Position::ORIGIN,
            window_rect,
            max_window_size: settings.max_window_size,
            text_attributes: settings.text_attributes,
            default_text_attributes: settings.text_attributes,
            cursor_size: 25,
            cursor_visible: true,
            color_table: LEGACY_16_COLOR_TABLE,
            saved_cursor: None,
            vt_vertical_margins: None,
            vt_delayed_wrap_position: None,
            vt_autowrap_enabled: true,
            vt_origin_mode_enabled: false,
            vt_insert_mode_enabled: false,
            alternate_backup: None,
            revision: 0,
            cells,
        })
    }

    pub fn is_alternate_active(&self) -> bool { self.alternate_backup.is_some() }

    fn bump_revision(&mut self) { self.revision += 1; }

    fn flat_index(&self, pos: Position) -> Option<usize> {
        if pos.x < self.buffer_size.width && pos.y < self.buffer_size.height {
            Some(pos.y as usize * self.buffer_size.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Writes a single cell. Returns `false` (no-op) if `(x, y)` is out of range.
    pub fn write_cell(&mut self, x: u16, y: u16, ch: u16, attr: u16) -> bool {
        match self.flat_index(Position::new(x, y)) {
            Some(idx) => {
                self.cells[idx] = super::Cell { code_unit: ch, attributes: attr };
                self.bump_revision();
                true
            }
            None => false,
        }
    }

    /// Reads a single cell without mutating the buffer.
    pub fn read_cell(&self, x: u16, y: u16) -> Option<super::Cell> {
        self.flat_index(Position::new(x, y)).map(|idx| self.cells[idx])
    }

    /// Shifts the row right by one starting at `x`, dropping the last cell, then
    /// writes `(ch, attr)` at `(x, y)`. Reduces to [`Self::write_cell`] when the
    /// buffer is only one cell wide.
    pub fn insert_cell(&mut self, x: u16, y: u16, ch: u16, attr: u16) -> bool {
        if self.buffer_size.width <= 1 {
            return self.write_cell(x, y, ch, attr);
        }
        if x >= self.buffer_size.width || y >= self.buffer_size.height {
            return false;
        }
        let row_start = y as usize * self.buffer_size.width as usize;
        let row_end = row_start + self.buffer_size.width as usize;
        let x = x as usize;
        for i in (x + 1..self.buffer_size.width as usize).rev() {
            self.cells[row_start + i] = self.cells[row_start + i - 1];
        }
        let _ = row_end;
        self.cells[row_start + x] = super::Cell { code_unit: ch, attributes: attr };
        self.bump_revision();
        true
    }

    fn flat_start(&self, pos: Position) -> Option<usize> { self.flat_index(pos) }

    /// Fills `count` cells' characters starting at `pos`, continuing across row
    /// boundaries, stopping at the end of the buffer. Returns the count actually
    /// written.
    pub fn fill_output_characters(&mut self, pos: Position, ch: u16, count: u32) -> u32 {
        self.fill_run(pos, count, |cell| cell.code_unit = ch)
    }

    /// Symmetric to [`Self::fill_output_characters`] for attributes only.
    pub fn fill_output_attributes(&mut self, pos: Position, attr: u16, count: u32) -> u32 {
        self.fill_run(pos, count, |cell| cell.attributes = attr)
    }

    fn fill_run(&mut self, pos: Position, count: u32, mut apply: impl FnMut(&mut super::Cell)) -> u32 {
        let Some(start) = self.flat_start(pos) else { return 0 };
        let total = self.cells.len();
        let n = (count as usize).min(total.saturating_sub(start));
        for cell in &mut self.cells[start..start + n] {
            apply(cell);
        }
        if n > 0 {
            self.bump_revision();
        }
        n as u32
    }

    /// Writes `chars` starting at `pos`, continuing across row boundaries, bounded
    /// by the buffer. Returns the count actually written.
    pub fn write_output_characters(&mut self, pos: Position, chars: &[u16]) -> u32 {
        self.write_run(pos, chars.len(), |cells| {
            for (cell, &ch) in cells.iter_mut().zip(chars) {
                cell.code_unit = ch;
            }
        })
    }

    /// Symmetric to [`Self::write_output_characters`] for attributes.
    pub fn write_output_attributes(&mut self, pos: Position, attrs: &[u16]) -> u32 {
        self.write_run(pos, attrs.len(), |cells| {
            for (cell, &a) in cells.iter_mut().zip(attrs) {
                cell.attributes = a;
            }
        })
    }

    /// Writes ASCII bytes (widened to UTF-16 code units) starting at `pos`.
    pub fn write_output_ascii(&mut self, pos: Position, bytes: &[u8]) -> u32 {
        self.write_run(pos, bytes.len(), |cells| {
            for (cell, &b) in cells.iter_mut().zip(bytes) {
                cell.code_unit = b as u16;
            }
        })
    }

    fn write_run(&mut self, pos: Position, len: usize, apply: impl FnOnce(&mut [super::Cell])) -> u32 {
        let Some(start) = self.flat_start(pos) else { return 0 };
        let total = self.cells.len();
        let n = len.min(total.saturating_sub(start));
        apply(&mut self.cells[start..start + n]);
        if n > 0 {
            self.bump_revision();
        }
        n as u32
    }

    /// Reads `count` characters starting at `pos`, no mutation.
    pub fn read_output_characters(&self, pos: Position, count: u32) -> Vec<u16> {
        self.read_run(pos, count as usize, |c| c.code_unit)
    }

    /// Reads `count` attributes starting at `pos`, no mutation.
    pub fn read_output_attributes(&self, pos: Position, count: u32) -> Vec<u16> {
        self.read_run(pos, count as usize, |c| c.attributes)
    }

    /// Reads `count` characters narrowed to ASCII; code points above `0xFF` become
    /// `'?'`.
    pub fn read_output_ascii(&self, pos: Position, count: u32) -> Vec<u8> {
        self.read_run(pos, count as usize, |c| {
            if c.code_unit > 0xFF { b'?' } else { c.code_unit as u8 }
        })
    }

    fn read_run<T>(&self, pos: Position, len: usize, map: impl Fn(&super::Cell) -> T) -> Vec<T> {
        let Some(start) = self.flat_start(pos) else { return Vec::new() };
        let n = len.min(self.cells.len().saturating_sub(start));
        self.cells[start..start + n].iter().map(map).collect()
    }

    /// Bulk rectangular write. `region` must be in range and `records` must be
    /// large enough to cover it; any violation is a no-op returning `0`.
    pub fn write_output_char_info_rect(
        &mut self,
        region: Rect,
        records: &[CharInfo],
        unicode: bool,
    ) -> usize {
        if !region.fits_within(self.buffer_size) {
            return 0;
        }
        let area = region.width() as usize * region.height() as usize;
        if records.len() < area {
            return 0;
        }
        let mut written = 0usize;
        for (i, pos) in region.positions().enumerate() {
            let rec = records[i];
            let code_unit = if unicode {
                rec.char_value
            } else if rec.char_value > 0xFF {
                b'?' as u16
            } else {
                rec.char_value
            };
            if let Some(idx) = self.flat_index(pos) {
                self.cells[idx] = super::Cell { code_unit, attributes: rec.attributes };
                written += 1;
            }
        }
        if written > 0 {
            self.bump_revision();
        }
        written
    }

    /// Bulk rectangular read, symmetric to [`Self::write_output_char_info_rect`].
    pub fn read_output_char_info_rect(&self, region: Rect, unicode: bool) -> Vec<CharInfo> {
        if !region.fits_within(self.buffer_size) {
            return Vec::new();
        }
        region
            .positions()
            .map(|pos| {
                let cell = self.read_cell(pos.x, pos.y).unwrap_or_default();
                let char_value = if unicode || cell.code_unit <= 0xFF {
                    cell.code_unit
                } else {
                    b'?' as u16
                };
                CharInfo { char_value, attributes: cell.attributes }
            })
            .collect()
    }

    /// Copy-then-fill scroll (spec.md §4.1 `scroll_screen_buffer`). An inverted
    /// `scroll_rect` is a no-op success.
    pub fn scroll_screen_buffer(
        &mut self,
        scroll_rect: Rect,
        clip_rect: Rect,
        dst_origin: Position,
        fill_ch: u16,
        fill_attr: u16,
    ) {
        if scroll_rect.is_empty() {
            return;
        }
        // Snapshot the scroll rect before any mutation.
        let saved: Vec<(Position, super::Cell)> = scroll_rect
            .positions()
            .filter_map(|pos| self.read_cell(pos.x, pos.y).map(|c| (pos, c)))
            .collect();

        // Fill every cell inside scroll_rect AND clip_rect.
        let mut touched = false;
        for pos in scroll_rect.positions() {
            if clip_rect.contains(pos) {
                if let Some(idx) = self.flat_index(pos) {
                    self.cells[idx] = super::Cell { code_unit: fill_ch, attributes: fill_attr };
                    touched = true;
                }
            }
        }

        let top_left = scroll_rect.top_left();
        let dx = dst_origin.x as i32 - top_left.x as i32;
        let dy = dst_origin.y as i32 - top_left.y as i32;
        for (pos, cell) in saved {
            let nx = pos.x as i32 + dx;
            let ny = pos.y as i32 + dy;
            if nx < 0 || ny < 0 {
                continue;
            }
            let dest = Position::new(nx as u16, ny as u16);
            if dest.x < self.buffer_size.width
                && dest.y < self.buffer_size.height
                && clip_rect.contains(dest)
            {
                if let Some(idx) = self.flat_index(dest) {
                    self.cells[idx] = cell;
                    touched = true;
                }
            }
        }
        if touched {
            self.bump_revision();
        }
    }

    /// Reallocates preserving the top-left `min(old, new)` sub-rectangle; clamps
    /// cursor and window; drops VT margins that fall outside the new height;
    /// clears any delayed-wrap position. Rejects a zero dimension coming from a
    /// non-zero buffer, leaving the buffer intact (spec.md §8 boundary case).
    pub fn set_screen_buffer_size(&mut self, new: BufferSize) -> Result<(), DomainError> {
        if new.is_empty() && !self.buffer_size.is_empty() {
            return Err(DomainError::InvalidParameter { reason: "resize to a zero dimension" });
        }
        self.cells = Self::resize_cells(&self.cells, self.buffer_size, new, self.text_attributes);
        if let Some(backup) = &mut self.alternate_backup {
            backup.cells = Self::resize_cells(&backup.cells, self.buffer_size, new, self.text_attributes);
        }
        self.buffer_size = new;
        self.cursor = Self::clamp_position(self.cursor, new);
        self.window_rect = Self::clamp_rect_to_buffer(self.window_rect, new);
        if let Some((_, bottom)) = self.vt_vertical_margins {
            if bottom >= new.height {
                self.vt_vertical_margins = None;
            }
        }
        self.vt_delayed_wrap_position = None;
        Ok(())
    }

    fn resize_cells(
        old_cells: &[super::Cell],
        old: BufferSize,
        new: BufferSize,
        fill_attr: u16,
    ) -> Vec<super::Cell> {
        let mut new_cells = vec![super::Cell::blank(fill_attr); new.area()];
        let copy_w = old.width.min(new.width) as usize;
        let copy_h = old.height.min(new.height) as usize;
        for y in 0..copy_h {
            let old_start = y * old.width as usize;
            let new_start = y * new.width as usize;
            new_cells[new_start..new_start + copy_w]
                .copy_from_slice(&old_cells[old_start..old_start + copy_w]);
        }
        new_cells
    }

    fn clamp_position(pos: Position, size: BufferSize) -> Position {
        if size.is_empty() {
            return Position::ORIGIN;
        }
        Position::new(pos.x.min(size.width - 1), pos.y.min(size.height - 1))
    }

    fn clamp_rect_to_buffer(rect: Rect, size: BufferSize) -> Rect {
        if size.is_empty() {
            return Rect::new(0, 0, 0, 0);
        }
        let right = rect.right.min(size.width - 1);
        let bottom = rect.bottom.min(size.height - 1);
        let left = rect.left.min(right);
        let top = rect.top.min(bottom);
        Rect::new(left, top, right, bottom)
    }

    /// Sets the visible window rectangle, clamped to stay inside the buffer.
    pub fn set_window_rect(&mut self, rect: Rect) {
        self.window_rect = Self::clamp_rect_to_buffer(rect, self.buffer_size);
    }

    /// Resizes the window keeping its top-left corner fixed.
    pub fn set_window_size(&mut self, size: BufferSize) {
        if self.buffer_size.is_empty() {
            return;
        }
        let right = self.window_rect.left + size.width.max(1).saturating_sub(1);
        let bottom = self.window_rect.top + size.height.max(1).saturating_sub(1);
        self.set_window_rect(Rect::new(self.window_rect.left, self.window_rect.top, right, bottom));
    }

    /// Minimally translates the window so the cursor is inside it.
    pub fn snap_window_to_cursor(&mut self) {
        let w = self.window_rect.width();
        let h = self.window_rect.height();
        if w == 0 || h == 0 {
            return;
        }
        let mut left = self.window_rect.left;
        let mut top = self.window_rect.top;
        if self.cursor.x < left {
            left = self.cursor.x;
        } else if self.cursor.x >= left + w {
            left = self.cursor.x + 1 - w;
        }
        if self.cursor.y < top {
            top = self.cursor.y;
        } else if self.cursor.y >= top + h {
            top = self.cursor.y + 1 - h;
        }
        self.set_window_rect(Rect::new(left, top, left + w - 1, top + h - 1));
    }

    pub fn set_cursor_position(&mut self, pos: Position) {
        self.cursor = Self::clamp_position(pos, self.buffer_size);
    }

    pub fn set_cursor_info(&mut self, size: u8, visible: bool) {
        self.cursor_size = size;
        self.cursor_visible = visible;
    }

    pub fn set_text_attributes(&mut self, attr: u16) { self.text_attributes = attr; }

    /// Clamps `position` into the buffer before storing. `delayed_eol_wrap` is
    /// stored only if no clamping occurred.
    pub fn save_cursor_state(
        &mut self,
        position: Position,
        attributes: u16,
        delayed_eol_wrap: bool,
        origin_mode: bool,
    ) {
        let clamped = Self::clamp_position(position, self.buffer_size);
        let was_clamped = clamped.x != position.x || clamped.y != position.y;
        self.saved_cursor = Some(SavedCursorState {
            position: clamped,
            attributes,
            delayed_eol_wrap: !was_clamped && delayed_eol_wrap,
            origin_mode,
        });
    }

    /// Returns the stored saved-cursor values, clamping the position once more.
    pub fn restore_cursor_state(&self) -> Option<SavedCursorState> {
        self.saved_cursor.map(|mut s| {
            s.position = Self::clamp_position(s.position, self.buffer_size);
            s
        })
    }

    /// Enables or disables the alternate screen buffer. Enabling while already
    /// alternate is a no-op success; disabling while already main is a no-op
    /// success.
    pub fn set_vt_using_alternate_screen_buffer(&mut self, enable: bool, fill_ch: u16, fill_attr: u16) {
        match (enable, self.alternate_backup.take()) {
            (true, Some(existing)) => {
                // Already alternate: no-op, put the backup back untouched.
                self.alternate_backup = Some(existing);
            }
            (true, None) => {
                let backup = AlternateBackup {
                    cells: self.cells.clone(),
                    cursor: self.cursor,
                    text_attributes: self.text_attributes,
                    color_table: self.color_table,
                    saved_cursor: self.saved_cursor,
                    vt_vertical_margins: self.vt_vertical_margins,
                    vt_delayed_wrap_position: self.vt_delayed_wrap_position,
                    vt_origin_mode_enabled: self.vt_origin_mode_enabled,
                };
                self.cells = vec![super::Cell { code_unit: fill_ch, attributes: fill_attr }; self.buffer_size.area()];
                self.cursor = Position::ORIGIN;
                self.vt_vertical_margins = None;
                self.vt_delayed_wrap_position = None;
                self.vt_origin_mode_enabled = false;
                self.alternate_backup = Some(Box::new(backup));
                self.bump_revision();
            }
            (false, Some(backup)) => {
                self.cells = backup.cells;
                self.cursor = backup.cursor;
                self.text_attributes = backup.text_attributes;
                self.color_table = backup.color_table;
                self.saved_cursor = backup.saved_cursor;
                self.vt_vertical_margins = backup.vt_vertical_margins;
                self.vt_delayed_wrap_position = backup.vt_delayed_wrap_position;
                self.vt_origin_mode_enabled = backup.vt_origin_mode_enabled;
                self.bump_revision();
            }
            (false, None) => {
                // Already main: no-op.
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(w: u16, h: u16) -> ScreenBuffer {
        ScreenBuffer::create(ScreenBufferSettings {
            buffer_size: BufferSize { width: w, height: h },
            text_attributes: 0x07,
            max_window_size: BufferSize { width: w, height: h },
        })
        .unwrap()
    }

    #[test]
    fn ascii_write_then_read_round_trips() {
        let mut b = buf(80, 25);
        let hello: Vec<u16> = "hello".encode_utf16().collect();
        let written = b.write_output_characters(Position::ORIGIN, &hello);
        assert_eq!(written, 5);
        let read = b.read_output_characters(Position::ORIGIN, 2000);
        assert_eq!(&read[..5], hello.as_slice());
        assert!(read[5..].iter().all(|&c| c == b' ' as u16));
        assert_eq!(read.len(), 2000usize.min(80 * 25));
    }

    #[test]
    fn resize_preserves_overlap_and_clamps_cursor() {
        let mut b = buf(10, 5);
        b.write_cell(9, 4, b'Z' as u16, 0x07);
        b.set_cursor_position(Position::new(9, 4));
        b.set_screen_buffer_size(BufferSize { width: 5, height: 3 }).unwrap();
        assert_eq!(b.buffer_size, BufferSize { width: 5, height: 3 });
        assert_eq!(b.cursor, Position::new(4, 2));
        // The corner cell at (9,4) fell outside the new 5x3 buffer and is gone.
        assert_eq!(b.read_cell(4, 2).unwrap().code_unit, b' ' as u16);
    }

    #[test]
    fn resize_to_zero_from_nonzero_fails_and_keeps_state() {
        let mut b = buf(10, 5);
        let before = b.buffer_size;
        let result = b.set_screen_buffer_size(BufferSize { width: 0, height: 5 });
        assert!(result.is_err());
        assert_eq!(b.buffer_size, before);
    }

    #[test]
    fn scroll_copies_then_fills_and_drops_outside_clip() {
        let mut b = buf(80, 25);
        for x in 0..10u16 {
            b.write_cell(x, 0, b'A' as u16, 0x11);
        }
        b.scroll_screen_buffer(
            Rect::new(0, 0, 9, 0),
            Rect::new(0, 0, 79, 24),
            Position::new(0, 1),
            b' ' as u16,
            0x07,
        );
        for x in 0..10u16 {
            assert_eq!(b.read_cell(x, 1).unwrap().code_unit, b'A' as u16);
            let row0 = b.read_cell(x, 0).unwrap();
            assert_eq!(row0.code_unit, b' ' as u16);
            assert_eq!(row0.attributes, 0x07);
        }
    }

    #[test]
    fn scroll_with_inverted_rect_is_noop() {
        let mut b = buf(10, 10);
        b.write_cell(0, 0, b'X' as u16, 0x07);
        b.scroll_screen_buffer(Rect::new(5, 5, 1, 1), Rect::new(0, 0, 9, 9), Position::ORIGIN, b' ' as u16, 0);
        assert_eq!(b.read_cell(0, 0).unwrap().code_unit, b'X' as u16);
    }

    #[test]
    fn alternate_buffer_round_trips_state() {
        let mut b = buf(10, 5);
        b.write_cell(0, 0, b'M' as u16, 0x07);
        b.set_cursor_position(Position::new(3, 2));
        b.set_text_attributes(0x1E);
        b.vt_vertical_margins = Some((1, 3));

        b.set_vt_using_alternate_screen_buffer(true, b' ' as u16, 0x07);
        assert!(b.is_alternate_active());
        assert_eq!(b.cursor, Position::ORIGIN);
        assert_eq!(b.vt_vertical_margins, None);

        b.write_cell(0, 0, b'A' as u16, 0x07);
        b.set_vt_using_alternate_screen_buffer(false, b' ' as u16, 0x07);
        assert!(!b.is_alternate_active());
        assert_eq!(b.read_cell(0, 0).unwrap().code_unit, b'M' as u16);
        assert_eq!(b.cursor, Position::new(3, 2));
        assert_eq!(b.text_attributes, 0x1E);
        assert_eq!(b.vt_vertical_margins, Some((1, 3)));
    }

    #[test]
    fn repeated_enable_is_noop() {
        let mut b = buf(10, 5);
        b.set_vt_using_alternate_screen_buffer(true, b' ' as u16, 0x07);
        b.write_cell(1, 1, b'X' as u16, 0x07);
        b.set_vt_using_alternate_screen_buffer(true, b' ' as u16, 0x07);
        assert_eq!(b.read_cell(1, 1).unwrap().code_unit, b'X' as u16);
    }

    #[test]
    fn insert_cell_shifts_row_right() {
        let mut b = buf(5, 1);
        for (i, c) in "abcde".chars().enumerate() {
            b.write_cell(i as u16, 0, c as u16, 0x07);
        }
        b.insert_cell(1, 0, b'Z' as u16, 0x07);
        let row = b.read_output_characters(Position::ORIGIN, 5);
        let s: String = row.iter().map(|&c| c as u8 as char).collect();
        assert_eq!(s, "aZbcd");
    }

    #[test]
    fn empty_buffer_rejects_cell_ops() {
        let mut b = buf(0, 0);
        assert!(!b.write_cell(0, 0, b'a' as u16, 0));
        assert_eq!(b.read_output_characters(Position::ORIGIN, 10).len(), 0);
    }
}
