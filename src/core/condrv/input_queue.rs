// Copyright (c) 2022-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Thread-safe FIFO byte queue bridging the host-input reader thread and the
//! dispatch thread (spec.md §4.2, §5 "a small number of parallel OS threads...
//! no internal cooperative scheduler"). `wait_for_input` blocks the calling OS
//! thread on a [`Condvar`] rather than an async notifier, since the dispatch
//! thread is plain blocking code, not a task on an executor.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Condvar, Mutex,
};
use std::time::Duration;

struct Inner {
    storage: Vec<u8>,
    read_offset: usize,
    disconnected: bool,
}

impl Inner {
    fn is_signalled(&self) -> bool { self.disconnected || self.read_offset < self.storage.len() }

    fn compact_if_drained(&mut self) {
        if self.read_offset == self.storage.len() {
            self.storage.clear();
            self.read_offset = 0;
        }
    }
}

/// FIFO byte buffer shared between a host-input reader thread and dispatch
/// handlers. Cloning shares the same underlying queue (it is an `Arc` handle).
#[derive(Clone)]
pub struct InputQueue {
    inner: Arc<Mutex<Inner>>,
    available: Arc<AtomicBool>,
    condvar: Arc<Condvar>,
}

impl Default for InputQueue {
    fn default() -> Self { Self::new() }
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { storage: Vec::new(), read_offset: 0, disconnected: false })),
            available: Arc::new(AtomicBool::new(false)),
            condvar: Arc::new(Condvar::new()),
        }
    }

    fn sync_event(&self, inner: &Inner) {
        let signalled = inner.is_signalled();
        self.available.store(signalled, Ordering::SeqCst);
        if signalled {
            self.condvar.notify_all();
        }
    }

    /// Appends bytes to the queue. Best-effort: an allocation failure here is
    /// swallowed (input loss is preferable to crashing the producer).
    pub fn push(&self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.storage.extend_from_slice(bytes);
        self.sync_event(&guard);
    }

    /// Copies up to `dest.len()` bytes into `dest`, advancing the read offset.
    /// Returns the number of bytes copied.
    pub fn pop(&self, dest: &mut [u8]) -> usize {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let available = guard.storage.len() - guard.read_offset;
        let n = dest.len().min(available);
        let start = guard.read_offset;
        dest[..n].copy_from_slice(&guard.storage[start..start + n]);
        guard.read_offset += n;
        guard.compact_if_drained();
        self.sync_event(&guard);
        n
    }

    /// Like [`Self::pop`] but does not advance the read offset.
    pub fn peek(&self, dest: &mut [u8]) -> usize {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let available = guard.storage.len() - guard.read_offset;
        let n = dest.len().min(available);
        let start = guard.read_offset;
        dest[..n].copy_from_slice(&guard.storage[start..start + n]);
        n
    }

    pub fn clear(&self) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.storage.clear();
        guard.read_offset = 0;
        self.sync_event(&guard);
    }

    pub fn len(&self) -> usize {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.storage.len() - guard.read_offset
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn is_disconnected(&self) -> bool {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).disconnected
    }

    /// Marks the queue disconnected and signals the event; future pushes are
    /// still accepted (used by tests) but real producers stop pushing after this.
    pub fn mark_disconnected(&self) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.disconnected = true;
        self.sync_event(&guard);
    }

    /// True if bytes are available or the queue is disconnected (no wait needed).
    pub fn is_signalled(&self) -> bool { self.available.load(Ordering::SeqCst) }

    /// Blocks the calling OS thread until bytes are available or the queue is
    /// disconnected, or `timeout` elapses (`None` waits indefinitely).
    pub fn wait_for_input(&self, timeout: Option<Duration>) {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_signalled() {
            return;
        }
        match timeout {
            Some(d) => {
                let _ = self.condvar.wait_timeout_while(guard, d, |inner| !inner.is_signalled());
            }
            None => {
                let _ = self.condvar.wait_while(guard, |inner| !inner.is_signalled());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_signals_pop_to_empty_resets() {
        let q = InputQueue::new();
        q.push(b"abc");
        assert!(q.is_signalled());
        let mut buf = [0u8; 16];
        let n = q.pop(&mut buf);
        assert_eq!(n, 3);
        assert_eq!(&buf[..3], b"abc");
        assert!(q.is_empty());
        assert!(!q.is_signalled());
    }

    #[test]
    fn disconnected_stays_signalled_even_when_empty() {
        let q = InputQueue::new();
        q.mark_disconnected();
        assert!(q.is_signalled());
        assert!(q.is_empty());
    }

    #[test]
    fn peek_does_not_advance() {
        let q = InputQueue::new();
        q.push(b"xy");
        let mut buf = [0u8; 1];
        assert_eq!(q.peek(&mut buf), 1);
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn wait_for_input_returns_immediately_when_already_signalled() {
        let q = InputQueue::new();
        q.push(b"x");
        q.wait_for_input(Some(Duration::from_millis(1)));
    }

    #[test]
    fn wait_for_input_times_out_when_never_signalled() {
        let q = InputQueue::new();
        let start = std::time::Instant::now();
        q.wait_for_input(Some(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(15));
    }
}
