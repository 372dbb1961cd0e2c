//! Buffer storage shared between a batch binding and its sampler
//!
//! The live buffer, the queue of flushed snapshots and the closed flag live
//! in a single slot behind a mutex. The engine and the sampler both reach the
//! slot through cloned [`BufferHandle`]s, so ownership and lifetime of the
//! mutable state are visible in the types rather than hidden in captured
//! closures. All access happens inside `poll_next` turns of one binding, so
//! the lock is bookkeeping for the shared slot, not a synchronization point.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared buffer state of one binding.
///
/// Mutated only through [`BufferHandle`] operations and the engine's own
/// lifecycle transitions.
pub(crate) struct BufferCore<T> {
    /// Live buffer, appended in arrival order
    items: Vec<T>,
    /// Snapshots flushed but not yet emitted downstream, in flush order
    flushed: VecDeque<Vec<T>>,
    /// Set once the binding closes; late handle calls become no-ops
    closed: bool,
}

impl<T> BufferCore<T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            flushed: VecDeque::new(),
            closed: false,
        }
    }

    pub(crate) fn append(&mut self, item: T) {
        if self.closed {
            return;
        }
        self.items.push(item);
    }

    /// Snapshots the entire live buffer and resets it to empty.
    pub(crate) fn flush_all(&mut self) {
        if self.closed {
            return;
        }
        let snapshot = std::mem::take(&mut self.items);
        self.flushed.push_back(snapshot);
    }

    /// Snapshots the remaining live buffer at natural completion.
    ///
    /// Unlike [`flush_all`](Self::flush_all) an empty buffer produces no
    /// snapshot: at most one final emission, and only when there is content.
    pub(crate) fn flush_remaining(&mut self) {
        if self.closed || self.items.is_empty() {
            return;
        }
        self.flush_all();
    }

    pub(crate) fn pop_flushed(&mut self) -> Option<Vec<T>> {
        self.flushed.pop_front()
    }

    /// Marks the binding closed and drops all buffered state.
    pub(crate) fn close(&mut self) {
        self.closed = true;
        self.items = Vec::new();
        self.flushed.clear();
    }
}

impl<T: Clone> BufferCore<T> {
    /// Snapshots the live buffer, then retains the tail starting at
    /// `retain_from`.
    ///
    /// Retention applies only when `0 < retain_from < len`; every other value
    /// is a full reset. The retained tail is a copy, so the emitted snapshot
    /// never aliases the live buffer.
    pub(crate) fn flush_from(&mut self, retain_from: usize) {
        if self.closed {
            return;
        }
        if retain_from > 0 && retain_from < self.items.len() {
            let retained = self.items[retain_from..].to_vec();
            let snapshot = std::mem::replace(&mut self.items, retained);
            self.flushed.push_back(snapshot);
        } else {
            self.flush_all();
        }
    }
}

/// Handle to the buffer of one batch binding.
///
/// This is the surface a [`Sampler`](crate::Sampler) is given: exactly the
/// two buffer-mutation operations of the contract. Samplers must not keep any
/// other access path to the buffer.
pub struct BufferHandle<T> {
    core: Arc<Mutex<BufferCore<T>>>,
}

impl<T> Clone for BufferHandle<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T> BufferHandle<T> {
    pub(crate) fn new() -> Self {
        Self {
            core: Arc::new(Mutex::new(BufferCore::new())),
        }
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, BufferCore<T>> {
        self.core.lock().unwrap()
    }

    /// Closes the shared state without panicking on a poisoned lock, for use
    /// from `Drop`.
    pub(crate) fn close(&self) {
        if let Ok(mut core) = self.core.lock() {
            core.close();
        }
    }

    /// Appends `item` to the tail of the live buffer. Produces no emission.
    ///
    /// No-op once the binding is closed.
    pub fn append(&self, item: T) {
        self.state().append(item);
    }

    /// Emits a snapshot of the live buffer and resets it to empty.
    ///
    /// The snapshot is handed downstream in flush order; an empty buffer
    /// yields an empty snapshot. No-op once the binding is closed.
    pub fn flush(&self) {
        self.state().flush_all();
    }
}

impl<T: Clone> BufferHandle<T> {
    /// Emits a snapshot of the live buffer, then retains the tail starting
    /// at `retain_from` as the next window's head.
    ///
    /// Retention occurs only when `0 < retain_from < len`; `0` and any index
    /// at or past the end behave as a full reset, like [`flush`](Self::flush).
    /// This is the sliding-window primitive: consecutive snapshots overlap in
    /// the retained items.
    pub fn flush_retaining(&self, retain_from: usize) {
        self.state().flush_from(retain_from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_then_flush_resets_buffer() {
        let handle = BufferHandle::new();
        handle.append(1);
        handle.append(2);
        handle.flush();
        handle.append(3);
        handle.flush();

        assert_eq!(handle.state().pop_flushed(), Some(vec![1, 2]));
        assert_eq!(handle.state().pop_flushed(), Some(vec![3]));
        assert_eq!(handle.state().pop_flushed(), None);
    }

    #[test]
    fn flush_of_empty_buffer_yields_empty_snapshot() {
        let handle = BufferHandle::<i32>::new();
        handle.flush();
        assert_eq!(handle.state().pop_flushed(), Some(vec![]));
    }

    #[test]
    fn retention_keeps_tail_for_next_window() {
        let handle = BufferHandle::new();
        for i in 1..=3 {
            handle.append(i);
        }
        handle.flush_retaining(1);
        handle.append(4);
        handle.flush_retaining(1);

        assert_eq!(handle.state().pop_flushed(), Some(vec![1, 2, 3]));
        assert_eq!(handle.state().pop_flushed(), Some(vec![2, 3, 4]));
    }

    #[test]
    fn retention_outside_open_interval_is_full_reset() {
        let handle = BufferHandle::new();
        handle.append(1);
        handle.append(2);
        handle.flush_retaining(0);
        assert_eq!(handle.state().pop_flushed(), Some(vec![1, 2]));

        handle.append(3);
        handle.append(4);
        handle.flush_retaining(2);
        assert_eq!(handle.state().pop_flushed(), Some(vec![3, 4]));

        handle.append(5);
        handle.flush_retaining(7);
        assert_eq!(handle.state().pop_flushed(), Some(vec![5]));

        // All three flushes fully reset the live buffer
        handle.flush();
        assert_eq!(handle.state().pop_flushed(), Some(vec![]));
    }

    #[test]
    fn snapshot_does_not_alias_live_buffer() {
        let handle = BufferHandle::new();
        handle.append(1);
        handle.append(2);
        handle.append(3);
        handle.flush_retaining(1);

        // Mutations after the flush must not show up in the snapshot
        handle.append(9);
        let snapshot = handle.state().pop_flushed().unwrap();
        assert_eq!(snapshot, vec![1, 2, 3]);
    }

    #[test]
    fn closed_handle_ignores_mutations() {
        let handle = BufferHandle::new();
        handle.append(1);
        handle.close();

        handle.append(2);
        handle.flush();
        handle.flush_retaining(1);

        assert_eq!(handle.state().pop_flushed(), None);
    }

    #[test]
    fn flush_remaining_skips_empty_buffer() {
        let handle = BufferHandle::<i32>::new();
        handle.state().flush_remaining();
        assert_eq!(handle.state().pop_flushed(), None);

        handle.append(7);
        handle.state().flush_remaining();
        assert_eq!(handle.state().pop_flushed(), Some(vec![7]));
    }
}
