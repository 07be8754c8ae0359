// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`SnapshotPublisher`]: publishes an immutable copy of the visible window onto
//! `published_screen` after every dispatch-thread mutation (spec.md §5
//! "`published_screen` is an atomic slot holding an immutable snapshot; readers
//! hold a reference-counted handle"). Runs inline on the dispatch thread — no
//! extra thread (spec.md §5 item 5). After a new snapshot is actually captured,
//! sends a lightweight wake to the attached renderer (spec.md §4.7, §9: "the
//! core's contract is only 'produce a new immutable snapshot and call `wake()`
//! on a provided capability'").

use std::sync::{Arc, RwLock};

use crate::core::condrv::screen_buffer::{BufferSize, Cell, Rect, ScreenBuffer};

/// Notifies an external renderer that a new snapshot is available. The core
/// doesn't know or care how the wake is delivered (an eventfd, a condvar, a
/// cross-thread channel send); it only calls `wake()`.
pub trait RendererWake: Send + Sync {
    fn wake(&self);
}

/// An immutable copy of the currently visible window, taken at a single
/// `revision`. Cheap to clone (it's an `Arc` handle); readers never block the
/// dispatch thread.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportSnapshot {
    pub revision: u64,
    pub window: Rect,
    pub buffer_size: BufferSize,
    pub cursor: crate::core::condrv::screen_buffer::Position,
    pub cursor_visible: bool,
    /// Row-major cells covering `window`, `window.width() * window.height()` long.
    pub cells: Vec<Cell>,
}

impl ViewportSnapshot {
    fn capture(buffer: &ScreenBuffer) -> Self {
        let window = buffer.window_rect;
        let mut cells = Vec::with_capacity(window.width() as usize * window.height() as usize);
        for y in window.top..=window.bottom {
            for x in window.left..=window.right {
                cells.push(buffer.read_cell(x, y).unwrap_or_default());
            }
        }
        Self {
            revision: buffer.revision,
            window,
            buffer_size: buffer.buffer_size,
            cursor: buffer.cursor,
            cursor_visible: buffer.cursor_visible,
            cells,
        }
    }
}

/// Holds the latest published [`ViewportSnapshot`] behind an `Arc<RwLock<_>>`.
/// Writes (`publish`) happen only on the dispatch thread, after a batch of
/// mutations; reads never take the screen buffer's own borrow.
#[derive(Clone, Default)]
pub struct SnapshotPublisher {
    slot: Arc<RwLock<Option<Arc<ViewportSnapshot>>>>,
    wake: Option<Arc<dyn RendererWake>>,
}

impl SnapshotPublisher {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Attaches a renderer wake capability, invoked after every snapshot this
    /// publisher actually captures.
    #[must_use]
    pub fn with_wake(mut self, wake: Arc<dyn RendererWake>) -> Self {
        self.wake = Some(wake);
        self
    }

    /// Takes a fresh snapshot of `buffer`'s visible window and publishes it,
    /// replacing whatever was there before, then wakes the attached renderer.
    /// Skips the capture (and the wake) entirely if the buffer's revision
    /// hasn't advanced since the last publish.
    pub fn publish(&self, buffer: &ScreenBuffer) {
        if let Some(current) = self.latest() {
            if current.revision == buffer.revision {
                return;
            }
        }
        let snapshot = Arc::new(ViewportSnapshot::capture(buffer));
        let mut guard = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(snapshot);
        drop(guard);
        if let Some(wake) = &self.wake {
            wake.wake();
        }
    }

    /// Returns the most recently published snapshot, if any has been published yet.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<ViewportSnapshot>> {
        self.slot.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::core::condrv::screen_buffer::ScreenBufferSettings;

    #[derive(Default)]
    struct CountingWake(AtomicUsize);

    impl RendererWake for CountingWake {
        fn wake(&self) { self.0.fetch_add(1, Ordering::SeqCst); }
    }

    fn buffer() -> ScreenBuffer {
        ScreenBuffer::create(ScreenBufferSettings {
            buffer_size: BufferSize { width: 4, height: 2 },
            text_attributes: 0x07,
            max_window_size: BufferSize { width: 4, height: 2 },
        })
        .unwrap()
    }

    #[test]
    fn publish_then_latest_reflects_window_size() {
        let buf = buffer();
        let publisher = SnapshotPublisher::new();
        assert!(publisher.latest().is_none());

        publisher.publish(&buf);
        let snapshot = publisher.latest().unwrap();
        assert_eq!(snapshot.cells.len(), 4 * 2);
        assert_eq!(snapshot.revision, buf.revision);
    }

    #[test]
    fn publish_skips_capture_when_revision_unchanged() {
        let buf = buffer();
        let publisher = SnapshotPublisher::new();
        publisher.publish(&buf);
        let first = publisher.latest().unwrap();
        publisher.publish(&buf);
        let second = publisher.latest().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn publish_after_mutation_advances_revision() {
        let mut buf = buffer();
        let publisher = SnapshotPublisher::new();
        publisher.publish(&buf);
        let before = publisher.latest().unwrap();

        buf.write_cell(0, 0, 'x' as u16, 0x07);
        publisher.publish(&buf);
        let after = publisher.latest().unwrap();
        assert!(after.revision > before.revision);
    }

    #[test]
    fn publish_wakes_renderer_only_when_a_new_snapshot_is_captured() {
        let mut buf = buffer();
        let wake = Arc::new(CountingWake::default());
        let publisher = SnapshotPublisher::new().with_wake(wake.clone());

        publisher.publish(&buf);
        assert_eq!(wake.0.load(Ordering::SeqCst), 1);

        publisher.publish(&buf);
        assert_eq!(wake.0.load(Ordering::SeqCst), 1, "unchanged revision must not wake the renderer");

        buf.write_cell(0, 0, 'x' as u16, 0x07);
        publisher.publish(&buf);
        assert_eq!(wake.0.load(Ordering::SeqCst), 2);
    }
}
