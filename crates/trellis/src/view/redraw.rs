//! Incremental redraw scheduling.
//!
//! Paint requests accumulate in a [`RedrawScheduler`] during an event
//! turn; the view posts one deferred paint callback on the first request
//! and executes the coalesced [`PaintPlan`] at end of turn. Requests are
//! in VIEW positions and infallible; a request subsumed by a stronger
//! pending one is a no-op.
//!
//! Weight accounting keeps pathological batches cheap: each pending cell
//! costs 1, each column or row slice a configured amount, and once the
//! cumulative weight passes the threshold the whole batch degrades to a
//! single full repaint.

use std::collections::BTreeSet;

use trellis_core::logging::targets;

/// Tuned cost constants for redraw degradation.
///
/// The defaults are tuning values, not a contract; hosts with very cheap
/// or very expensive cells can adjust them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedrawBudget {
    /// Weight of one pending column slice.
    pub column_cost: u32,
    /// Weight of one pending row slice.
    pub row_cost: u32,
    /// Cumulative weight beyond which the batch becomes a full repaint.
    pub full_threshold: u32,
}

impl Default for RedrawBudget {
    fn default() -> Self {
        Self {
            column_cost: 20,
            row_cost: 20,
            full_threshold: 400,
        }
    }
}

impl RedrawBudget {
    /// Sets the column slice cost.
    pub fn with_column_cost(mut self, cost: u32) -> Self {
        self.column_cost = cost;
        self
    }

    /// Sets the row slice cost.
    pub fn with_row_cost(mut self, cost: u32) -> Self {
        self.row_cost = cost;
        self
    }

    /// Sets the degradation threshold.
    pub fn with_full_threshold(mut self, threshold: u32) -> Self {
        self.full_threshold = threshold;
        self
    }
}

/// Scheduler state: either nothing is pending or one paint callback is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawState {
    /// No paint pending.
    Idle,
    /// Requests accumulated; one paint callback is due this turn.
    PaintPending,
}

/// The coalesced result of one scheduling cycle.
///
/// When `full` is set the per-position lists are empty; otherwise cells
/// covered by a pending column or row have already been removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaintPlan {
    /// Repaint the whole viewport.
    pub full: bool,
    /// Individual dirty cells `(column, row)`.
    pub cells: Vec<(usize, usize)>,
    /// Dirty column slices.
    pub columns: Vec<usize>,
    /// Dirty row slices.
    pub rows: Vec<usize>,
    /// Repaint the selection/focus overlay.
    pub overlay: bool,
}

impl PaintPlan {
    /// Returns whether the plan paints nothing at all.
    pub fn is_empty(&self) -> bool {
        !self.full && !self.overlay && self.cells.is_empty() && self.columns.is_empty() && self.rows.is_empty()
    }
}

/// Accumulates and coalesces redraw requests between paint passes.
pub struct RedrawScheduler {
    state: RedrawState,
    budget: RedrawBudget,
    full: bool,
    overlay: bool,
    cells: BTreeSet<(usize, usize)>,
    columns: BTreeSet<usize>,
    rows: BTreeSet<usize>,
    weight: u32,
}

impl RedrawScheduler {
    /// Creates an idle scheduler with the given budget.
    pub fn new(budget: RedrawBudget) -> Self {
        Self {
            state: RedrawState::Idle,
            budget,
            full: false,
            overlay: false,
            cells: BTreeSet::new(),
            columns: BTreeSet::new(),
            rows: BTreeSet::new(),
            weight: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> RedrawState {
        self.state
    }

    /// Returns whether a paint callback is due.
    pub fn is_pending(&self) -> bool {
        self.state == RedrawState::PaintPending
    }

    /// Requests a full repaint. Returns `true` if this was the first
    /// request of the cycle (the caller should post the paint callback).
    pub fn request_full(&mut self) -> bool {
        let first = self.arm();
        if !self.full {
            tracing::trace!(target: targets::REDRAW, "full repaint requested");
            self.full = true;
            self.cells.clear();
            self.columns.clear();
            self.rows.clear();
        }
        first
    }

    /// Requests a repaint of one cell, in view positions.
    pub fn request_cell(&mut self, col: usize, row: usize) -> bool {
        let first = self.arm();
        if self.full || self.columns.contains(&col) || self.rows.contains(&row) {
            return first;
        }
        if self.cells.insert((col, row)) {
            self.add_weight(1);
        }
        first
    }

    /// Requests a repaint of one column slice.
    pub fn request_column(&mut self, col: usize) -> bool {
        let first = self.arm();
        if self.full {
            return first;
        }
        if self.columns.insert(col) {
            self.add_weight(self.budget.column_cost);
        }
        first
    }

    /// Requests a repaint of one row slice.
    pub fn request_row(&mut self, row: usize) -> bool {
        let first = self.arm();
        if self.full {
            return first;
        }
        if self.rows.insert(row) {
            self.add_weight(self.budget.row_cost);
        }
        first
    }

    /// Requests a repaint of the selection/focus overlay only.
    pub fn request_overlay(&mut self) -> bool {
        let first = self.arm();
        self.overlay = true;
        first
    }

    /// Drains all pending state and returns the coalesced plan.
    ///
    /// Always transitions back to [`RedrawState::Idle`], even when the
    /// caller will discard the plan (view not visible).
    pub fn take_plan(&mut self) -> PaintPlan {
        self.state = RedrawState::Idle;
        self.weight = 0;

        let full = std::mem::take(&mut self.full);
        let overlay = std::mem::take(&mut self.overlay);
        let cells = std::mem::take(&mut self.cells);
        let columns = std::mem::take(&mut self.columns);
        let rows = std::mem::take(&mut self.rows);

        if full {
            return PaintPlan {
                full: true,
                overlay: true,
                ..PaintPlan::default()
            };
        }

        let any_region = !cells.is_empty() || !columns.is_empty() || !rows.is_empty();
        PaintPlan {
            full: false,
            cells: cells
                .into_iter()
                .filter(|(c, r)| !columns.contains(c) && !rows.contains(r))
                .collect(),
            columns: columns.into_iter().collect(),
            rows: rows.into_iter().collect(),
            overlay: overlay || any_region,
        }
    }

    fn arm(&mut self) -> bool {
        if self.state == RedrawState::Idle {
            self.state = RedrawState::PaintPending;
            true
        } else {
            false
        }
    }

    fn add_weight(&mut self, weight: u32) {
        self.weight = self.weight.saturating_add(weight);
        if self.weight > self.budget.full_threshold && !self.full {
            tracing::debug!(
                target: targets::REDRAW,
                weight = self.weight,
                threshold = self.budget.full_threshold,
                "redraw batch degraded to full repaint"
            );
            self.full = true;
            self.cells.clear();
            self.columns.clear();
            self.rows.clear();
        }
    }
}

impl Default for RedrawScheduler {
    fn default() -> Self {
        Self::new(RedrawBudget::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_request_arms_once() {
        let mut sched = RedrawScheduler::default();
        assert!(sched.request_cell(1, 1));
        assert!(!sched.request_cell(2, 2));
        assert!(!sched.request_full());
        assert!(sched.is_pending());
    }

    #[test]
    fn test_full_subsumes_everything_after() {
        let mut sched = RedrawScheduler::default();
        sched.request_full();
        sched.request_cell(1, 1);
        sched.request_column(3);
        sched.request_row(4);

        let plan = sched.take_plan();
        assert!(plan.full);
        assert!(plan.overlay);
        assert!(plan.cells.is_empty());
        assert!(plan.columns.is_empty());
        assert!(plan.rows.is_empty());
        assert_eq!(sched.state(), RedrawState::Idle);
    }

    #[test]
    fn test_column_subsumes_cells_in_it() {
        let mut sched = RedrawScheduler::default();
        // The cell arrives first; the later column request still covers it.
        sched.request_cell(2, 7);
        sched.request_cell(5, 1);
        sched.request_column(2);

        let plan = sched.take_plan();
        assert!(!plan.full);
        assert_eq!(plan.cells, vec![(5, 1)]);
        assert_eq!(plan.columns, vec![2]);
    }

    #[test]
    fn test_cell_inside_pending_row_ignored() {
        let mut sched = RedrawScheduler::default();
        sched.request_row(3);
        sched.request_cell(9, 3);

        let plan = sched.take_plan();
        assert!(plan.cells.is_empty());
        assert_eq!(plan.rows, vec![3]);
    }

    #[test]
    fn test_weight_degrades_to_full() {
        let budget = RedrawBudget::default().with_full_threshold(50);
        let mut sched = RedrawScheduler::new(budget);
        sched.request_column(0);
        sched.request_column(1);
        assert!(!sched.take_plan().full);

        sched.request_column(0);
        sched.request_column(1);
        sched.request_column(2);
        assert!(sched.take_plan().full);
    }

    #[test]
    fn test_duplicate_requests_add_no_weight() {
        let budget = RedrawBudget::default().with_full_threshold(25);
        let mut sched = RedrawScheduler::new(budget);
        for _ in 0..10 {
            sched.request_column(7);
        }
        let plan = sched.take_plan();
        assert!(!plan.full);
        assert_eq!(plan.columns, vec![7]);
    }

    #[test]
    fn test_overlay_implied_by_region_work() {
        let mut sched = RedrawScheduler::default();
        sched.request_cell(0, 0);
        assert!(sched.take_plan().overlay);

        sched.request_overlay();
        let plan = sched.take_plan();
        assert!(plan.overlay);
        assert!(plan.cells.is_empty());
    }

    #[test]
    fn test_take_plan_resets_unconditionally() {
        let mut sched = RedrawScheduler::default();
        sched.request_full();
        // Simulates the view going invisible: the plan is discarded but
        // the scheduler still returns to idle.
        let _ = sched.take_plan();
        assert!(!sched.is_pending());
        assert!(sched.take_plan().is_empty());
    }

    #[test]
    fn test_full_then_cell_single_full_plan() {
        let mut sched = RedrawScheduler::default();
        sched.request_full();
        sched.request_cell(4, 4);

        let plan = sched.take_plan();
        assert!(plan.full);
        assert!(plan.cells.is_empty());
        // Nothing pending afterwards.
        assert!(sched.take_plan().is_empty());
    }
}
