//! Signal/slot system for Trellis.
//!
//! This module provides a type-safe signal mechanism for notifying
//! collaborators about state changes. Signals are emitted by the table
//! engine when its state changes, and connected slots (callbacks) are
//! invoked in response.
//!
//! Delivery is always direct: slots run synchronously on the thread that
//! calls [`Signal::emit`], which in this engine is the single UI thread.
//! Work that must run after the current event turn goes through
//! [`crate::UpdateQueue`] instead.
//!
//! # Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let status = Signal::<String>::new();
//!
//! let conn_id = status.connect(|msg| {
//!     println!("status: {msg}");
//! });
//!
//! status.emit("cannot hide the last visible column".to_string());
//! status.disconnect(conn_id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via
    /// [`Signal::disconnect`]. The ID remains valid until the connection is
    /// explicitly disconnected or the signal is dropped.
    pub struct ConnectionId;
}

/// A type-safe signal with any number of connected slots.
///
/// # Type Parameter
///
/// - `Args`: the argument type passed to connected slots. Use `()` for
///   signals with no arguments, or a tuple like `(usize, usize)` for
///   multiple arguments.
///
/// Slots are invoked in connection order. Emitting from inside a slot of
/// the same signal deadlocks; defer such work through the update queue.
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Arc<dyn Fn(&Args) + Send + Sync>>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a [`ConnectionId`] that can be used to disconnect the slot
    /// later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing. Useful during batch
    /// updates to prevent cascading notifications.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// Slots registered or removed by a slot during emission take effect
    /// from the next emission.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: crate::logging::targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        // Snapshot the slots so a slot may connect/disconnect without
        // holding the lock across user code.
        let slots: Vec<_> = self.connections.lock().values().cloned().collect();
        tracing::trace!(
            target: crate::logging::targets::SIGNAL,
            connection_count = slots.len(),
            "emitting signal"
        );
        for slot in slots {
            slot(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .field("blocked", &self.is_blocked())
            .finish()
    }
}

/// RAII guard that disconnects a signal connection when dropped.
///
/// Created via [`ConnectionGuard::new`]. Holding the guard keeps the
/// connection alive; dropping it disconnects.
pub struct ConnectionGuard<'a, Args> {
    signal: &'a Signal<Args>,
    id: Option<ConnectionId>,
}

impl<'a, Args> ConnectionGuard<'a, Args> {
    /// Wrap an existing connection in a guard.
    pub fn new(signal: &'a Signal<Args>, id: ConnectionId) -> Self {
        Self {
            signal,
            id: Some(id),
        }
    }

    /// Release the guard without disconnecting, returning the raw ID.
    pub fn release(mut self) -> ConnectionId {
        self.id.take().expect("guard already released")
    }
}

impl<Args> Drop for ConnectionGuard<'_, Args> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.signal.disconnect(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_connect_and_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(AtomicUsize::new(0));

        let received_clone = received.clone();
        signal.connect(move |value| {
            received_clone.store(*value as usize, Ordering::SeqCst);
        });

        signal.emit(42);
        assert_eq!(received.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn test_disconnect() {
        let signal = Signal::<()>::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        let id = signal.connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        signal.emit(());
        assert!(signal.disconnect(id));
        signal.emit(());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        // Second disconnect is a no-op.
        assert!(!signal.disconnect(id));
    }

    #[test]
    fn test_multiple_slots_run_in_order() {
        let signal = Signal::<()>::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let log = log.clone();
            signal.connect(move |_| log.lock().push(i));
        }

        signal.emit(());
        assert_eq!(*log.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn test_blocked_signal_skips_emit() {
        let signal = Signal::<()>::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        signal.connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        signal.set_blocked(true);
        assert!(signal.is_blocked());
        signal.emit(());
        assert_eq!(count.load(Ordering::SeqCst), 0);

        signal.set_blocked(false);
        signal.emit(());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_connection_guard_disconnects_on_drop() {
        let signal = Signal::<()>::new();
        let id = signal.connect(|_| {});
        assert_eq!(signal.connection_count(), 1);

        {
            let _guard = ConnectionGuard::new(&signal, id);
        }
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_connection_guard_release_keeps_connection() {
        let signal = Signal::<()>::new();
        let id = signal.connect(|_| {});

        let guard = ConnectionGuard::new(&signal, id);
        let raw = guard.release();
        assert_eq!(signal.connection_count(), 1);
        assert!(signal.disconnect(raw));
    }
}
