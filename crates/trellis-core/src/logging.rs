//! Logging facilities for Trellis.
//!
//! Trellis uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! The constants in [`targets`] let hosts filter logs per subsystem, e.g.
//! `RUST_LOG=trellis::redraw=trace`.

/// Target names for log filtering.
pub mod targets {
    /// Core foundations target.
    pub const CORE: &str = "trellis_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "trellis_core::signal";
    /// Update queue target.
    pub const QUEUE: &str = "trellis_core::queue";
    /// Axis geometry target.
    pub const AXIS: &str = "trellis::axis";
    /// Redraw scheduler target.
    pub const REDRAW: &str = "trellis::redraw";
    /// Selection model target.
    pub const SELECTION: &str = "trellis::selection";
    /// Undoable command target.
    pub const COMMAND: &str = "trellis::command";
    /// View coordination target.
    pub const VIEW: &str = "trellis::view";
}
