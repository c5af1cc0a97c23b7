//! Error types for Trellis.
//!
//! Only rejected-argument conditions surface as errors. Refused structural
//! mutations (hiding the last visible column) are routine user actions and
//! are reported through return values and the status-message signal
//! instead; invariant violations inside the engine are programming defects
//! guarded by debug assertions, not recoverable errors.

use std::fmt;

/// The main error type for Trellis operations.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// A zoom factor outside `0.0..` (or non-finite) was rejected.
    InvalidZoom {
        /// The rejected factor.
        factor: f32,
    },
    /// An editor is already open on the given cell.
    ///
    /// At most one cell editor may be open at any time; close the current
    /// one before opening another.
    EditorAlreadyOpen {
        /// View column of the open editor.
        column: usize,
        /// View row of the open editor.
        row: usize,
    },
    /// An editor open was requested on a cell outside the grid.
    CellOutOfBounds {
        /// Requested view column.
        column: usize,
        /// Requested view row.
        row: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidZoom { factor } => {
                write!(f, "Invalid zoom factor {factor}: must be finite and >= 0")
            }
            Self::EditorAlreadyOpen { column, row } => {
                write!(f, "An editor is already open on cell ({column}, {row})")
            }
            Self::CellOutOfBounds { column, row } => {
                write!(f, "Cell ({column}, {row}) is outside the grid")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// A specialized Result type for Trellis operations.
pub type Result<T> = std::result::Result<T, GridError>;
