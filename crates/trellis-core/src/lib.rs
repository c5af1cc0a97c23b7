//! Core systems for Trellis.
//!
//! This crate provides the toolkit-independent foundations of the Trellis
//! table engine:
//!
//! - **Signal/Slot System**: type-safe change notification
//! - **Property System**: reactive value cells with change detection
//! - **Update Queue**: FIFO deferred callbacks with per-turn semantics
//! - **Logging**: `tracing` target constants for per-subsystem filtering
//!
//! Everything here assumes the single-UI-thread cooperative model: slots
//! run synchronously on the emitting thread, and "run later" means "after
//! the current event turn", expressed through [`UpdateQueue`].
//!
//! # Signal Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let cell_changed = Signal::<(usize, usize)>::new();
//!
//! let conn_id = cell_changed.connect(|(col, row)| {
//!     println!("cell changed: ({col}, {row})");
//! });
//!
//! cell_changed.emit((3, 7));
//! cell_changed.disconnect(conn_id);
//! ```
//!
//! # Property Example
//!
//! ```
//! use trellis_core::{Property, Signal};
//!
//! struct Zoom {
//!     factor: Property<f32>,
//!     factor_changed: Signal<f32>,
//! }
//!
//! impl Zoom {
//!     fn set_factor(&self, factor: f32) {
//!         if self.factor.set(factor) {
//!             self.factor_changed.emit(factor);
//!         }
//!     }
//! }
//! ```

pub mod logging;
pub mod property;
pub mod queue;
pub mod signal;

pub use property::{Property, ReadOnlyProperty};
pub use queue::{TaskId, UpdateQueue};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
