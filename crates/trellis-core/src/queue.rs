//! Deferred update queue with per-turn FIFO semantics.
//!
//! The engine runs on a single UI thread. Work that must not run in the
//! middle of the current event (deferred repaints, cross-component value
//! propagation) is posted here and executed when the host drains the queue
//! at the end of the turn.
//!
//! Ordering guarantees:
//!
//! - callbacks run FIFO relative to other callbacks posted in the same
//!   turn;
//! - a callback posted *while the queue is draining* runs in the next
//!   turn, never the current one, so a value change triggered from inside
//!   a deferred callback is applied only after the triggering callback has
//!   finished;
//! - there is no cancellation of in-flight work; [`UpdateQueue::cancel`]
//!   only removes entries that have not started.
//!
//! # Example
//!
//! ```
//! use trellis_core::UpdateQueue;
//!
//! let queue = UpdateQueue::new();
//! queue.post(|| println!("runs at end of turn"));
//! assert_eq!(queue.drain_turn(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// A unique identifier for a posted update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Global counter for generating unique task IDs.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

type BoxedUpdate = Box<dyn FnOnce() + Send + 'static>;

struct QueuedUpdate {
    id: TaskId,
    run: BoxedUpdate,
}

/// A cloneable handle to a shared FIFO of deferred updates.
///
/// Cloning the handle shares the same queue; the table view and its
/// collaborators each hold a clone.
#[derive(Clone)]
pub struct UpdateQueue {
    inner: Arc<Mutex<VecDeque<QueuedUpdate>>>,
}

impl UpdateQueue {
    /// Create a new, empty queue.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Post a callback to run at the end of the current turn.
    ///
    /// Returns a [`TaskId`] that can be used to cancel the callback before
    /// it runs.
    pub fn post<F>(&self, update: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = next_task_id();
        self.inner.lock().push_back(QueuedUpdate {
            id,
            run: Box::new(update),
        });
        tracing::trace!(target: crate::logging::targets::QUEUE, id = id.as_u64(), "posted update");
        id
    }

    /// Cancel a pending callback.
    ///
    /// Returns `true` if the callback was still queued and was removed.
    pub fn cancel(&self, id: TaskId) -> bool {
        let mut queue = self.inner.lock();
        if let Some(pos) = queue.iter().position(|u| u.id == id) {
            queue.remove(pos);
            true
        } else {
            false
        }
    }

    /// Check whether any callbacks are pending.
    pub fn has_pending(&self) -> bool {
        !self.inner.lock().is_empty()
    }

    /// Get the number of pending callbacks.
    pub fn pending_count(&self) -> usize {
        self.inner.lock().len()
    }

    /// Run every callback that was pending when the turn ended.
    ///
    /// Callbacks posted by the callbacks themselves stay queued for the
    /// next turn. Returns the number of callbacks executed.
    pub fn drain_turn(&self) -> usize {
        // Swap the queue out so same-turn posts land in a fresh queue.
        let batch: Vec<QueuedUpdate> = {
            let mut queue = self.inner.lock();
            queue.drain(..).collect()
        };

        let count = batch.len();
        if count > 0 {
            tracing::debug!(target: crate::logging::targets::QUEUE, count, "draining turn");
        }
        for update in batch {
            (update.run)();
        }
        count
    }
}

impl Default for UpdateQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UpdateQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateQueue")
            .field("pending", &self.pending_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_post_and_drain() {
        let queue = UpdateQueue::new();
        let ran = Arc::new(AtomicUsize::new(0));

        let ran_clone = ran.clone();
        queue.post(move || {
            ran_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(queue.has_pending());
        assert_eq!(queue.drain_turn(), 1);
        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert!(!queue.has_pending());
    }

    #[test]
    fn test_fifo_order() {
        let queue = UpdateQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for i in 0..4 {
            let log = log.clone();
            queue.post(move || log.lock().push(i));
        }

        queue.drain_turn();
        assert_eq!(*log.lock(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_post_during_drain_runs_next_turn() {
        let queue = UpdateQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let queue_clone = queue.clone();
        let log_clone = log.clone();
        queue.post(move || {
            log_clone.lock().push("first");
            let log_inner = log_clone.clone();
            queue_clone.post(move || log_inner.lock().push("second"));
        });

        assert_eq!(queue.drain_turn(), 1);
        assert_eq!(*log.lock(), vec!["first"]);

        assert_eq!(queue.drain_turn(), 1);
        assert_eq!(*log.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_cancel_pending() {
        let queue = UpdateQueue::new();
        let ran = Arc::new(AtomicUsize::new(0));

        let ran_clone = ran.clone();
        let id = queue.post(move || {
            ran_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert_eq!(queue.drain_turn(), 0);
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_drain_empty_is_noop() {
        let queue = UpdateQueue::new();
        assert_eq!(queue.drain_turn(), 0);
    }

    #[test]
    fn test_cloned_handles_share_queue() {
        let queue = UpdateQueue::new();
        let other = queue.clone();

        other.post(|| {});
        assert_eq!(queue.pending_count(), 1);
        assert_eq!(queue.drain_turn(), 1);
        assert_eq!(other.pending_count(), 0);
    }
}
