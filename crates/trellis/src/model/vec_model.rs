//! A simple in-memory table model.

use parking_lot::RwLock;
use trellis_core::logging::targets;

use super::traits::{CellValue, ModelEvent, ModelSignals, TableModel};

/// A [`TableModel`] backed by a dense `Vec` of rows.
///
/// Intended for demos and tests; every mutation emits the corresponding
/// [`ModelEvent`] on the shared `changed` signal.
pub struct VecTableModel {
    rows: RwLock<Vec<Vec<CellValue>>>,
    column_count: RwLock<usize>,
    signals: ModelSignals,
}

impl VecTableModel {
    /// Creates an empty model of the given dimensions.
    pub fn new(column_count: usize, row_count: usize) -> Self {
        Self {
            rows: RwLock::new(vec![vec![CellValue::Empty; column_count]; row_count]),
            column_count: RwLock::new(column_count),
            signals: ModelSignals::new(),
        }
    }

    /// Creates a model from prebuilt rows. Ragged rows are padded with
    /// [`CellValue::Empty`] to the widest row.
    pub fn from_rows(mut rows: Vec<Vec<CellValue>>) -> Self {
        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(column_count, CellValue::Empty);
        }
        Self {
            rows: RwLock::new(rows),
            column_count: RwLock::new(column_count),
            signals: ModelSignals::new(),
        }
    }

    /// Stores a value and emits `CellChanged`. Out-of-range writes are
    /// ignored.
    pub fn set_value(&self, data_col: usize, data_row: usize, value: CellValue) {
        {
            let mut rows = self.rows.write();
            let Some(cell) = rows.get_mut(data_row).and_then(|r| r.get_mut(data_col)) else {
                tracing::debug!(
                    target: targets::CORE,
                    data_col,
                    data_row,
                    "ignoring out-of-range cell write"
                );
                return;
            };
            if *cell == value {
                return;
            }
            *cell = value;
        }
        self.signals
            .changed
            .emit(ModelEvent::CellChanged(data_col, data_row));
    }

    /// Resizes to a new row count and emits `RowCountChanged`.
    pub fn set_row_count(&self, row_count: usize) {
        {
            let mut rows = self.rows.write();
            if rows.len() == row_count {
                return;
            }
            let cols = *self.column_count.read();
            rows.resize_with(row_count, || vec![CellValue::Empty; cols]);
        }
        self.signals
            .changed
            .emit(ModelEvent::RowCountChanged(row_count));
    }

    /// Resizes to a new column count and emits `ColumnCountChanged`.
    pub fn set_column_count(&self, column_count: usize) {
        {
            let mut cols = self.column_count.write();
            if *cols == column_count {
                return;
            }
            *cols = column_count;
            for row in self.rows.write().iter_mut() {
                row.resize(column_count, CellValue::Empty);
            }
        }
        self.signals
            .changed
            .emit(ModelEvent::ColumnCountChanged(column_count));
    }

    /// Replaces all contents and emits `Reset`.
    pub fn reset(&self, rows: Vec<Vec<CellValue>>) {
        {
            let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
            let mut stored = self.rows.write();
            *stored = rows;
            for row in stored.iter_mut() {
                row.resize(column_count, CellValue::Empty);
            }
            *self.column_count.write() = column_count;
        }
        self.signals.changed.emit(ModelEvent::Reset);
    }
}

impl TableModel for VecTableModel {
    fn row_count(&self) -> usize {
        self.rows.read().len()
    }

    fn column_count(&self) -> usize {
        *self.column_count.read()
    }

    fn value(&self, data_col: usize, data_row: usize) -> CellValue {
        self.rows
            .read()
            .get(data_row)
            .and_then(|r| r.get(data_col))
            .cloned()
            .unwrap_or_default()
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_set_value_emits_cell_changed() {
        let model = VecTableModel::new(3, 3);
        let events = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let seen = events.clone();
        model.signals().changed.connect(move |event| {
            seen.lock().push(*event);
        });

        model.set_value(1, 2, CellValue::Integer(42));
        assert_eq!(model.value(1, 2), CellValue::Integer(42));
        assert_eq!(events.lock().as_slice(), &[ModelEvent::CellChanged(1, 2)]);
    }

    #[test]
    fn test_set_value_same_value_is_silent() {
        let model = VecTableModel::new(2, 2);
        model.set_value(0, 0, CellValue::Flag(true));

        let emissions = Arc::new(AtomicUsize::new(0));
        let count = emissions.clone();
        model.signals().changed.connect(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        });

        model.set_value(0, 0, CellValue::Flag(true));
        assert_eq!(emissions.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_out_of_range_reads_are_empty() {
        let model = VecTableModel::new(2, 2);
        assert_eq!(model.value(5, 0), CellValue::Empty);
        assert_eq!(model.value(0, 5), CellValue::Empty);
    }

    #[test]
    fn test_row_count_change() {
        let model = VecTableModel::new(2, 2);
        model.set_value(1, 1, CellValue::Text("kept".into()));
        model.set_row_count(4);
        assert_eq!(model.row_count(), 4);
        assert_eq!(model.value(1, 1), CellValue::Text("kept".into()));
        assert_eq!(model.value(0, 3), CellValue::Empty);
    }

    #[test]
    fn test_from_rows_pads_ragged() {
        let model = VecTableModel::from_rows(vec![
            vec![CellValue::Integer(1)],
            vec![CellValue::Integer(2), CellValue::Integer(3)],
        ]);
        assert_eq!(model.column_count(), 2);
        assert_eq!(model.value(1, 0), CellValue::Empty);
    }
}
