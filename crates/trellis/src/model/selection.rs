//! Selection state for the grid.
//!
//! Selection is a list of inclusive rectangles in VIEW positions, so a
//! selection survives data edits and follows entries through reorder.
//! Areas may overlap freely; membership queries answer over the union and
//! nothing deduplicates.
//!
//! Rectangle components range over `0..=count`: the value `count` is the
//! after-the-last marker, meaning the area extends through the last
//! position on that axis even if the count later grows.

use std::collections::BTreeSet;

use trellis_core::Signal;
use trellis_core::logging::targets;

/// An inclusive rectangle of selected view positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionArea {
    /// First selected column.
    pub start_col: usize,
    /// First selected row.
    pub start_row: usize,
    /// Last selected column (inclusive; `col_count` means through the
    /// last column).
    pub end_col: usize,
    /// Last selected row (inclusive; `row_count` means through the last
    /// row).
    pub end_row: usize,
}

impl SelectionArea {
    /// Creates an area from two arbitrary corners, normalizing so start
    /// components are `<=` end components.
    pub fn from_corners(c0: usize, r0: usize, c1: usize, r1: usize) -> Self {
        Self {
            start_col: c0.min(c1),
            start_row: r0.min(r1),
            end_col: c0.max(c1),
            end_row: r0.max(r1),
        }
    }

    /// A single-cell area.
    pub fn cell(col: usize, row: usize) -> Self {
        Self::from_corners(col, row, col, row)
    }

    /// Returns whether the column is inside the area's column span.
    pub fn contains_column(&self, col: usize) -> bool {
        col >= self.start_col && col <= self.end_col
    }

    /// Returns whether the row is inside the area's row span.
    pub fn contains_row(&self, row: usize) -> bool {
        row >= self.start_row && row <= self.end_row
    }

    /// Returns whether the cell is inside the area.
    pub fn contains_cell(&self, col: usize, row: usize) -> bool {
        self.contains_column(col) && self.contains_row(row)
    }

    /// Returns whether the area covers every row of a grid with
    /// `row_count` rows.
    pub fn spans_all_rows(&self, row_count: usize) -> bool {
        self.start_row == 0 && self.end_row + 1 >= row_count
    }

    /// Returns whether the area covers every column of a grid with
    /// `col_count` columns.
    pub fn spans_all_columns(&self, col_count: usize) -> bool {
        self.start_col == 0 && self.end_col + 1 >= col_count
    }
}

/// The answer to "which columns (or rows) are selected".
///
/// `All` replaces the classic null sentinel for "everything selected";
/// callers branch on it instead of testing magic values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selected {
    /// Every position is selected.
    All,
    /// No position is selected.
    None,
    /// Exactly these positions are selected.
    Some(BTreeSet<usize>),
}

impl Selected {
    /// Returns whether nothing is selected.
    pub fn is_none(&self) -> bool {
        matches!(self, Selected::None)
    }
}

/// Selection state: overlapping areas plus the focus/select cell pair.
///
/// `focus_cell` is the anchor the user started from; `select_cell` is the
/// other corner and moves during shift-click and drag. Both are view
/// positions.
pub struct SelectionModel {
    areas: Vec<SelectionArea>,
    focus_cell: (usize, usize),
    select_cell: (usize, usize),
    /// Emitted after any change to the area list.
    pub selection_changed: Signal<()>,
    /// Emitted when the focus cell moves, with its new view position.
    pub focus_changed: Signal<(usize, usize)>,
}

impl SelectionModel {
    /// Creates an empty selection focused on the origin cell.
    pub fn new() -> Self {
        Self {
            areas: Vec::new(),
            focus_cell: (0, 0),
            select_cell: (0, 0),
            selection_changed: Signal::new(),
            focus_changed: Signal::new(),
        }
    }

    /// The current areas, in insertion order.
    pub fn areas(&self) -> &[SelectionArea] {
        &self.areas
    }

    /// Returns whether no area is selected.
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// The anchor cell, in view positions.
    pub fn focus_cell(&self) -> (usize, usize) {
        self.focus_cell
    }

    /// The moving corner of the in-progress area, in view positions.
    pub fn select_cell(&self) -> (usize, usize) {
        self.select_cell
    }

    /// Removes every area.
    pub fn clear(&mut self) {
        if self.areas.is_empty() {
            return;
        }
        self.areas.clear();
        self.selection_changed.emit(());
    }

    /// Appends a normalized area built from two corners.
    pub fn select_range(&mut self, c0: usize, r0: usize, c1: usize, r1: usize) {
        self.areas.push(SelectionArea::from_corners(c0, r0, c1, r1));
        self.selection_changed.emit(());
    }

    /// Replaces the selection with one area spanning the full body.
    pub fn select_all(&mut self, col_count: usize, row_count: usize) {
        // After-the-last markers keep the area full if counts grow.
        self.areas = vec![SelectionArea {
            start_col: 0,
            start_row: 0,
            end_col: col_count,
            end_row: row_count,
        }];
        tracing::debug!(target: targets::SELECTION, col_count, row_count, "select all");
        self.selection_changed.emit(());
    }

    // =========================================================================
    // Click Protocol
    // =========================================================================

    /// A press on a cell. Moves focus and select there and starts a new
    /// single-cell area; unless `append` (ctrl held), the existing areas
    /// are cleared first.
    pub fn click(&mut self, col: usize, row: usize, append: bool) {
        if !append {
            self.areas.clear();
        }
        self.set_focus(col, row);
        self.select_cell = (col, row);
        self.areas.push(SelectionArea::cell(col, row));
        self.selection_changed.emit(());
    }

    /// A shift-click or drag update. Moves only `select_cell` and
    /// replaces the in-progress (last) area with the rectangle between
    /// the focus anchor and the new corner.
    pub fn extend_to(&mut self, col: usize, row: usize) {
        if self.select_cell == (col, row) && !self.areas.is_empty() {
            return;
        }
        self.select_cell = (col, row);
        let area = SelectionArea::from_corners(
            self.focus_cell.0,
            self.focus_cell.1,
            col,
            row,
        );
        match self.areas.last_mut() {
            Some(last) => *last = area,
            None => self.areas.push(area),
        }
        self.selection_changed.emit(());
    }

    /// Moves the focus anchor without touching the areas.
    pub fn set_focus(&mut self, col: usize, row: usize) {
        if self.focus_cell == (col, row) {
            return;
        }
        self.focus_cell = (col, row);
        self.focus_changed.emit((col, row));
    }

    // =========================================================================
    // Membership Queries
    // =========================================================================

    /// Returns whether any area's column span covers the column.
    pub fn is_column_selected(&self, col: usize) -> bool {
        self.areas.iter().any(|a| a.contains_column(col))
    }

    /// Returns whether any area's row span covers the row.
    pub fn is_row_selected(&self, row: usize) -> bool {
        self.areas.iter().any(|a| a.contains_row(row))
    }

    /// Returns whether any area covers the cell.
    pub fn is_cell_selected(&self, col: usize, row: usize) -> bool {
        self.areas.iter().any(|a| a.contains_cell(col, row))
    }

    /// Columns eligible for a bulk resize.
    ///
    /// A column is in the set only if some area covering it also spans
    /// every row, so a partial-height block never drives a whole-column
    /// resize.
    pub fn resizable_columns(&self, col_count: usize, row_count: usize) -> BTreeSet<usize> {
        let mut set = BTreeSet::new();
        for area in &self.areas {
            if !area.spans_all_rows(row_count) {
                continue;
            }
            for col in area.start_col..=area.end_col.min(col_count.saturating_sub(1)) {
                set.insert(col);
            }
        }
        set
    }

    /// Rows eligible for a bulk resize. Mirror of
    /// [`resizable_columns`](Self::resizable_columns).
    pub fn resizable_rows(&self, col_count: usize, row_count: usize) -> BTreeSet<usize> {
        let mut set = BTreeSet::new();
        for area in &self.areas {
            if !area.spans_all_columns(col_count) {
                continue;
            }
            for row in area.start_row..=area.end_row.min(row_count.saturating_sub(1)) {
                set.insert(row);
            }
        }
        set
    }

    /// The union of the selected column spans.
    ///
    /// Returns [`Selected::All`] when the union covers every column,
    /// [`Selected::None`] when there is no selection.
    pub fn selected_columns(&self, col_count: usize) -> Selected {
        if self.areas.is_empty() {
            return Selected::None;
        }
        let mut set = BTreeSet::new();
        for area in &self.areas {
            for col in area.start_col..=area.end_col.min(col_count.saturating_sub(1)) {
                set.insert(col);
            }
        }
        if set.len() == col_count {
            Selected::All
        } else {
            Selected::Some(set)
        }
    }

    /// The union of the selected row spans. Mirror of
    /// [`selected_columns`](Self::selected_columns).
    pub fn selected_rows(&self, row_count: usize) -> Selected {
        if self.areas.is_empty() {
            return Selected::None;
        }
        let mut set = BTreeSet::new();
        for area in &self.areas {
            for row in area.start_row..=area.end_row.min(row_count.saturating_sub(1)) {
                set.insert(row);
            }
        }
        if set.len() == row_count {
            Selected::All
        } else {
            Selected::Some(set)
        }
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Reconciles the selection after an axis count change.
    ///
    /// Areas starting past the new extent are dropped; end components are
    /// clipped to the after-the-last marker. The focus pair is clamped to
    /// the last position.
    pub fn clamp_to(&mut self, col_count: usize, row_count: usize) {
        let before = self.areas.len();
        self.areas
            .retain(|a| a.start_col < col_count && a.start_row < row_count);
        let mut changed = self.areas.len() != before;
        for area in &mut self.areas {
            if area.end_col > col_count {
                area.end_col = col_count;
                changed = true;
            }
            if area.end_row > row_count {
                area.end_row = row_count;
                changed = true;
            }
        }

        let clamp = |cell: (usize, usize)| {
            (
                cell.0.min(col_count.saturating_sub(1)),
                cell.1.min(row_count.saturating_sub(1)),
            )
        };
        let focus = clamp(self.focus_cell);
        self.select_cell = clamp(self.select_cell);
        if focus != self.focus_cell {
            self.focus_cell = focus;
            self.focus_changed.emit(focus);
        }
        if changed {
            tracing::debug!(
                target: targets::SELECTION,
                col_count,
                row_count,
                dropped = before - self.areas.len(),
                "clamped selection to new extents"
            );
            self.selection_changed.emit(());
        }
    }
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::new()
    }
}
