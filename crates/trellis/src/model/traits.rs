//! The data-model contract between the grid and its contents.
//!
//! A [`TableModel`] is a flat two-dimensional collaborator addressed by
//! DATA indices; the axis permutations live entirely view-side. Models
//! report mutations through one `changed` signal carrying a
//! [`ModelEvent`], and the view translates each event into the narrowest
//! redraw it can justify.

use trellis_core::Signal;

/// An opaque cell value handed to painters and editors.
///
/// The engine attaches no meaning to the variants and never formats
/// them; painting must not assume values are well-formed for their
/// column.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// No value.
    #[default]
    Empty,
    /// Free-form text.
    Text(String),
    /// A whole number.
    Integer(i64),
    /// A floating-point number.
    Real(f64),
    /// A boolean flag.
    Flag(bool),
}

impl CellValue {
    /// Returns whether this is [`CellValue::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// A change notification emitted by a model.
///
/// Indices are DATA indices. Count changes describe the new count; the
/// view reconciles its axes and selection from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    /// Everything may have changed; repaint from scratch.
    Reset,
    /// A single cell changed.
    CellChanged(usize, usize),
    /// Every cell in one column changed.
    ColumnChanged(usize),
    /// Every cell in one row changed.
    RowChanged(usize),
    /// The number of rows changed.
    RowCountChanged(usize),
    /// The number of columns changed.
    ColumnCountChanged(usize),
}

/// Signals exposed by every model.
pub struct ModelSignals {
    /// Emitted after any model mutation.
    pub changed: Signal<ModelEvent>,
}

impl ModelSignals {
    /// Creates the signal set.
    pub fn new() -> Self {
        Self {
            changed: Signal::new(),
        }
    }
}

impl Default for ModelSignals {
    fn default() -> Self {
        Self::new()
    }
}

/// The data source behind a grid.
///
/// Implementations own the cell storage and emit [`ModelEvent`]s through
/// [`signals`](TableModel::signals) after each mutation. All methods take
/// DATA indices.
pub trait TableModel {
    /// Number of data rows.
    fn row_count(&self) -> usize;

    /// Number of data columns.
    fn column_count(&self) -> usize;

    /// The value of one cell. Out-of-range queries return
    /// [`CellValue::Empty`].
    fn value(&self, data_col: usize, data_row: usize) -> CellValue;

    /// Validates a prospective value without storing it.
    ///
    /// Returns a human-readable rejection message, or `None` when the
    /// value is acceptable.
    fn test_value(&self, data_col: usize, data_row: usize, value: &CellValue) -> Option<String> {
        let _ = (data_col, data_row, value);
        None
    }

    /// The model's change signals.
    fn signals(&self) -> &ModelSignals;
}
