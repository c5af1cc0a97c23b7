//! The grid coordinator.
//!
//! [`GridView`] owns both axes, the selection model, the redraw
//! scheduler, the update-queue handle, and the single optional editor
//! session, and turns model events, pointer input, and keyboard
//! navigation into minimal redraw requests. The host drives it from its
//! event loop: forward model signals to
//! [`handle_model_event`](GridView::handle_model_event), forward input,
//! and call [`end_turn`](GridView::end_turn) with a painter once per
//! event turn; at most one paint pass happens per turn.

use std::sync::Arc;

use trellis_core::logging::targets;
use trellis_core::{Property, Signal, UpdateQueue};

use crate::error::{GridError, Result};
use crate::geometry::{PixelPoint, PixelRect};
use crate::model::{ModelEvent, SelectionModel, TableModel};
use crate::view::axis::{Orientation, ViewAxis, ViewPos};
use crate::view::painter::{CellPaint, CellPainter, OverlayPaint};
use crate::view::position::PositionMapper;
use crate::view::redraw::{PaintPlan, RedrawBudget, RedrawScheduler};

/// Keyboard modifier state for the selection protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Shift held: extend the in-progress area.
    pub shift: bool,
    /// Ctrl held: append instead of replacing.
    pub ctrl: bool,
}

/// Arrow-key navigation directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    /// Previous visible column.
    Left,
    /// Next visible column.
    Right,
    /// Previous visible row.
    Up,
    /// Next visible row.
    Down,
}

const DEFAULT_COLUMN_WIDTH: u32 = 80;
const DEFAULT_ROW_HEIGHT: u32 = 20;
const DEFAULT_HEADER_SIZE: u32 = 20;

/// Coordinates axes, selection, scheduling, and painting for one grid.
pub struct GridView {
    model: Arc<dyn TableModel>,
    columns: ViewAxis,
    rows: ViewAxis,
    selection: SelectionModel,
    scheduler: RedrawScheduler,
    queue: UpdateQueue,
    zoom: Arc<Property<f32>>,
    scroll_x: Property<i32>,
    scroll_y: Property<i32>,
    viewport_width: i32,
    viewport_height: i32,
    visible: bool,
    dragging: bool,
    editor: Option<(usize, usize)>,
    /// Transient user-facing notices (refused hides and the like).
    pub status_message: Signal<String>,
}

impl GridView {
    /// Creates a view over a model, with default section sizes and an
    /// empty selection.
    pub fn new(model: Arc<dyn TableModel>) -> Self {
        Self::with_budget(model, RedrawBudget::default())
    }

    /// Creates a view with a custom redraw budget.
    pub fn with_budget(model: Arc<dyn TableModel>, budget: RedrawBudget) -> Self {
        let zoom = Arc::new(Property::new(1.0f32));
        let columns = ViewAxis::new(
            Orientation::Columns,
            model.column_count(),
            DEFAULT_COLUMN_WIDTH,
            DEFAULT_HEADER_SIZE,
            zoom.clone(),
        );
        let rows = ViewAxis::new(
            Orientation::Rows,
            model.row_count(),
            DEFAULT_ROW_HEIGHT,
            DEFAULT_HEADER_SIZE,
            zoom.clone(),
        );
        Self {
            model,
            columns,
            rows,
            selection: SelectionModel::new(),
            scheduler: RedrawScheduler::new(budget),
            queue: UpdateQueue::new(),
            zoom,
            scroll_x: Property::new(0),
            scroll_y: Property::new(0),
            viewport_width: 0,
            viewport_height: 0,
            visible: true,
            dragging: false,
            editor: None,
            status_message: Signal::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The data model.
    pub fn model(&self) -> &Arc<dyn TableModel> {
        &self.model
    }

    /// The column axis.
    pub fn columns(&self) -> &ViewAxis {
        &self.columns
    }

    /// The row axis.
    pub fn rows(&self) -> &ViewAxis {
        &self.rows
    }

    /// One axis by orientation.
    pub fn axis(&self, orientation: Orientation) -> &ViewAxis {
        match orientation {
            Orientation::Columns => &self.columns,
            Orientation::Rows => &self.rows,
        }
    }

    /// Mutable access to one axis. Callers that mutate must follow up
    /// with [`axis_mutated`](Self::axis_mutated).
    pub fn axis_mut(&mut self, orientation: Orientation) -> &mut ViewAxis {
        match orientation {
            Orientation::Columns => &mut self.columns,
            Orientation::Rows => &mut self.rows,
        }
    }

    /// The selection model.
    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    /// Mutable selection access for hosts implementing extra gestures.
    pub fn selection_mut(&mut self) -> &mut SelectionModel {
        &mut self.selection
    }

    /// A cloneable handle to the deferred-update queue.
    pub fn queue(&self) -> UpdateQueue {
        self.queue.clone()
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f32 {
        self.zoom.get()
    }

    /// Current scroll offsets `(x, y)`.
    pub fn scroll(&self) -> (i32, i32) {
        (self.scroll_x.get(), self.scroll_y.get())
    }

    /// Current viewport size `(width, height)`.
    pub fn viewport_size(&self) -> (i32, i32) {
        (self.viewport_width, self.viewport_height)
    }

    /// Whether the view currently paints.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The open editor's view cell, if any.
    pub fn editor(&self) -> Option<(usize, usize)> {
        self.editor
    }

    /// A mapper over both axes at the current scroll offsets.
    pub fn mapper(&self) -> PositionMapper<'_> {
        PositionMapper::new(
            &self.columns,
            &self.rows,
            self.scroll_x.get(),
            self.scroll_y.get(),
        )
    }

    // =========================================================================
    // Geometry And Visibility
    // =========================================================================

    /// Resizes the viewport, reclamping scroll.
    pub fn set_viewport_size(&mut self, width: i32, height: i32) {
        if (width, height) == (self.viewport_width, self.viewport_height) {
            return;
        }
        self.viewport_width = width.max(0);
        self.viewport_height = height.max(0);
        self.clamp_scroll();
        self.scheduler.request_full();
    }

    /// Shows or hides the view. Pending plans are still drained while
    /// hidden; they are just not painted.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if visible {
            self.scheduler.request_full();
        }
    }

    /// Sets the zoom factor shared by both axes.
    ///
    /// Rejects non-finite or non-positive factors.
    pub fn set_zoom(&mut self, factor: f32) -> Result<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(GridError::InvalidZoom { factor });
        }
        if self.zoom.set(factor) {
            tracing::debug!(target: targets::VIEW, factor, "zoom changed");
            self.clamp_scroll();
            self.scheduler.request_full();
        }
        Ok(())
    }

    /// Scrolls to an absolute offset, clamped to the content extent.
    pub fn set_scroll(&mut self, x: i32, y: i32) {
        let x = x.clamp(0, self.max_scroll_x());
        let y = y.clamp(0, self.max_scroll_y());
        let moved = self.scroll_x.set(x) | self.scroll_y.set(y);
        if moved {
            self.scheduler.request_full();
        }
    }

    /// Scrolls the minimum distance that brings a cell fully into view.
    pub fn scroll_to(&mut self, col: usize, row: usize) {
        let x = Self::scroll_for_visibility(
            &self.columns,
            self.scroll_x.get(),
            self.viewport_width,
            col,
        );
        let y = Self::scroll_for_visibility(
            &self.rows,
            self.scroll_y.get(),
            self.viewport_height,
            row,
        );
        self.set_scroll(x, y);
    }

    fn scroll_for_visibility(axis: &ViewAxis, scroll: i32, extent: i32, pos: usize) -> i32 {
        let header = axis.scaled_header();
        let start = axis.start_pixel(ViewPos::Body(pos), scroll);
        let size = axis.index_pixels(ViewPos::Body(pos));
        if start < header {
            scroll + start - header
        } else if extent > header && start + size > extent {
            scroll + start + size - extent
        } else {
            scroll
        }
    }

    fn max_scroll_x(&self) -> i32 {
        (self.columns.total_pixels() - self.viewport_width).max(0)
    }

    fn max_scroll_y(&self) -> i32 {
        (self.rows.total_pixels() - self.viewport_height).max(0)
    }

    fn clamp_scroll(&mut self) {
        let x = self.scroll_x.get().clamp(0, self.max_scroll_x());
        let y = self.scroll_y.get().clamp(0, self.max_scroll_y());
        self.scroll_x.set(x);
        self.scroll_y.set(y);
    }

    // =========================================================================
    // Change Intake
    // =========================================================================

    /// Translates a model event into the narrowest redraw it justifies,
    /// reconciling axis counts and selection on structural changes.
    pub fn handle_model_event(&mut self, event: ModelEvent) {
        match event {
            ModelEvent::Reset => {
                self.columns.set_count(self.model.column_count());
                self.rows.set_count(self.model.row_count());
                self.reconcile_counts();
                self.scheduler.request_full();
            }
            ModelEvent::CellChanged(data_col, data_row) => {
                if data_col < self.columns.count() && data_row < self.rows.count() {
                    let col = self.columns.view_position(data_col);
                    let row = self.rows.view_position(data_row);
                    self.scheduler.request_cell(col, row);
                }
            }
            ModelEvent::ColumnChanged(data_col) => {
                if data_col < self.columns.count() {
                    let col = self.columns.view_position(data_col);
                    self.scheduler.request_column(col);
                }
            }
            ModelEvent::RowChanged(data_row) => {
                if data_row < self.rows.count() {
                    let row = self.rows.view_position(data_row);
                    self.scheduler.request_row(row);
                }
            }
            ModelEvent::RowCountChanged(count) => {
                self.rows.set_count(count);
                self.reconcile_counts();
                self.scheduler.request_full();
            }
            ModelEvent::ColumnCountChanged(count) => {
                self.columns.set_count(count);
                self.reconcile_counts();
                self.scheduler.request_full();
            }
        }
    }

    /// Notifies the view that an axis was structurally mutated (resize,
    /// hide, reorder). Everything downstream of the axis is stale.
    pub fn axis_mutated(&mut self, orientation: Orientation) {
        tracing::trace!(target: targets::VIEW, ?orientation, "axis mutated");
        self.reconcile_counts();
        self.clamp_scroll();
        self.scheduler.request_full();
    }

    fn reconcile_counts(&mut self) {
        self.selection
            .clamp_to(self.columns.count(), self.rows.count());
        if let Some((col, row)) = self.editor
            && (col >= self.columns.count() || row >= self.rows.count())
        {
            self.editor = None;
        }
    }

    /// Hides sections on one axis, reporting refusals through
    /// [`status_message`](Self::status_message).
    pub fn hide_sections(&mut self, orientation: Orientation, data_indices: &[usize]) -> bool {
        if self.axis_mut(orientation).hide(data_indices) {
            self.axis_mutated(orientation);
            true
        } else {
            let what = match orientation {
                Orientation::Columns => "column",
                Orientation::Rows => "row",
            };
            self.status_message
                .emit(format!("At least one {what} must stay visible"));
            false
        }
    }

    /// Shows sections on one axis.
    pub fn show_sections(&mut self, orientation: Orientation, data_indices: &[usize]) -> bool {
        if self.axis_mut(orientation).show(data_indices) {
            self.axis_mutated(orientation);
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Selection Protocol
    // =========================================================================

    /// A pointer press. Body cells follow the click protocol; header
    /// presses select the whole column or row, and the corner selects
    /// everything.
    pub fn handle_mouse_press(&mut self, point: PixelPoint, modifiers: Modifiers) {
        let (col_pos, row_pos) = {
            let mapper = self.mapper();
            (mapper.column_at(point.x), mapper.row_at(point.y))
        };
        match (col_pos, row_pos) {
            (ViewPos::Body(col), ViewPos::Body(row)) => {
                if modifiers.shift {
                    self.selection.extend_to(col, row);
                } else {
                    self.selection.click(col, row, modifiers.ctrl);
                }
                self.dragging = true;
            }
            (ViewPos::Body(col), ViewPos::Header) => {
                if !modifiers.ctrl {
                    self.selection.clear();
                }
                // After-the-last marker spans the full row extent.
                self.selection.select_range(col, 0, col, self.rows.count());
                self.selection.set_focus(col, 0);
            }
            (ViewPos::Header, ViewPos::Body(row)) => {
                if !modifiers.ctrl {
                    self.selection.clear();
                }
                self.selection
                    .select_range(0, row, self.columns.count(), row);
                self.selection.set_focus(0, row);
            }
            (ViewPos::Header, ViewPos::Header) => {
                self.selection
                    .select_all(self.columns.count(), self.rows.count());
            }
            _ => return,
        }
        self.scheduler.request_overlay();
    }

    /// A pointer move with the button held: drag selection.
    pub fn handle_mouse_move(&mut self, point: PixelPoint) {
        if !self.dragging {
            return;
        }
        let (col, row) = {
            let mapper = self.mapper();
            (
                self.clamp_to_body(&self.columns, mapper.column_at(point.x)),
                self.clamp_to_body(&self.rows, mapper.row_at(point.y)),
            )
        };
        let (Some(col), Some(row)) = (col, row) else {
            return;
        };
        if (col, row) != self.selection.select_cell() {
            self.selection.extend_to(col, row);
            self.scheduler.request_overlay();
        }
    }

    /// Ends a drag.
    pub fn handle_mouse_release(&mut self) {
        self.dragging = false;
    }

    /// Arrow-key navigation with visible-position saturation. With
    /// `extend`, moves the selection corner instead of the focus.
    pub fn navigate(&mut self, direction: NavDirection, extend: bool) {
        let (col, row) = if extend {
            self.selection.select_cell()
        } else {
            self.selection.focus_cell()
        };
        let target = match direction {
            NavDirection::Left => (self.columns.previous_visible(ViewPos::Body(col)), ViewPos::Body(row)),
            NavDirection::Right => (self.columns.next_visible(ViewPos::Body(col)), ViewPos::Body(row)),
            NavDirection::Up => (ViewPos::Body(col), self.rows.previous_visible(ViewPos::Body(row))),
            NavDirection::Down => (ViewPos::Body(col), self.rows.next_visible(ViewPos::Body(row))),
        };
        let (ViewPos::Body(col), ViewPos::Body(row)) = target else {
            return;
        };
        if extend {
            self.selection.extend_to(col, row);
        } else {
            self.selection.click(col, row, false);
        }
        self.scroll_to(col, row);
        self.scheduler.request_overlay();
    }

    fn clamp_to_body(&self, axis: &ViewAxis, pos: ViewPos) -> Option<usize> {
        match pos {
            ViewPos::Body(p) => Some(p),
            ViewPos::Header => axis.first_visible(),
            ViewPos::After => axis.last_visible(),
            ViewPos::Invalid => None,
        }
    }

    // =========================================================================
    // Editor Session
    // =========================================================================

    /// Opens the single editor session on a view cell.
    pub fn open_editor(&mut self, col: usize, row: usize) -> Result<()> {
        if let Some((open_col, open_row)) = self.editor {
            return Err(GridError::EditorAlreadyOpen {
                column: open_col,
                row: open_row,
            });
        }
        if col >= self.columns.count() || row >= self.rows.count() {
            return Err(GridError::CellOutOfBounds { column: col, row });
        }
        self.editor = Some((col, row));
        self.scroll_to(col, row);
        self.scheduler.request_cell(col, row);
        Ok(())
    }

    /// Closes the editor session. Closing with none open is a no-op.
    pub fn close_editor(&mut self) {
        if let Some((col, row)) = self.editor.take() {
            self.scheduler.request_cell(col, row);
        }
    }

    // =========================================================================
    // Turn Boundary
    // =========================================================================

    /// Ends the current event turn: drains the update queue, then
    /// performs at most one paint pass over the coalesced plan.
    ///
    /// Returns whether anything was painted. When the view is not
    /// visible the plan is taken and discarded, so the scheduler still
    /// resets.
    pub fn end_turn(&mut self, painter: &mut dyn CellPainter) -> bool {
        let ran = self.queue.drain_turn();
        if ran > 0 {
            tracing::trace!(target: targets::QUEUE, ran, "drained update queue");
        }
        if !self.scheduler.is_pending() {
            return false;
        }
        let plan = self.scheduler.take_plan();
        if !self.visible || plan.is_empty() {
            return false;
        }
        self.paint(&plan, painter);
        true
    }

    // =========================================================================
    // Paint Pass
    // =========================================================================

    fn paint(&self, plan: &PaintPlan, painter: &mut dyn CellPainter) {
        let viewport = PixelRect::new(0, 0, self.viewport_width, self.viewport_height);
        let col_range = self.visible_range(&self.columns, self.scroll_x.get(), self.viewport_width);
        let row_range = self.visible_range(&self.rows, self.scroll_y.get(), self.viewport_height);
        tracing::trace!(
            target: targets::REDRAW,
            full = plan.full,
            cells = plan.cells.len(),
            columns = plan.columns.len(),
            rows = plan.rows.len(),
            "paint pass"
        );

        if plan.full {
            painter.fill_background(viewport);
            if let (Some((c0, c1)), Some((r0, r1))) = (col_range, row_range) {
                for row in r0..=r1 {
                    for col in c0..=c1 {
                        self.paint_cell(col, row, &viewport, painter);
                    }
                }
            }
            if let Some((c0, c1)) = col_range {
                for col in c0..=c1 {
                    self.paint_header(Orientation::Columns, col, painter);
                }
            }
            if let Some((r0, r1)) = row_range {
                for row in r0..=r1 {
                    self.paint_header(Orientation::Rows, row, painter);
                }
            }
        } else {
            for &(col, row) in &plan.cells {
                self.paint_cell(col, row, &viewport, painter);
            }
            for &col in &plan.columns {
                if let Some((r0, r1)) = row_range {
                    for row in r0..=r1 {
                        self.paint_cell(col, row, &viewport, painter);
                    }
                }
                self.paint_header(Orientation::Columns, col, painter);
            }
            for &row in &plan.rows {
                if let Some((c0, c1)) = col_range {
                    for col in c0..=c1 {
                        self.paint_cell(col, row, &viewport, painter);
                    }
                }
                self.paint_header(Orientation::Rows, row, painter);
            }
        }

        if plan.overlay || plan.full {
            painter.paint_overlay(&self.overlay_paint(&viewport));
        }
    }

    fn visible_range(&self, axis: &ViewAxis, scroll: i32, extent: i32) -> Option<(usize, usize)> {
        if axis.count() == 0 || extent <= axis.scaled_header() {
            return None;
        }
        let first = match axis.index_at(axis.scaled_header(), scroll) {
            ViewPos::Body(p) => p,
            ViewPos::Header => 0,
            ViewPos::After | ViewPos::Invalid => return None,
        };
        let last = match axis.index_at(extent - 1, scroll) {
            ViewPos::Body(p) => p,
            ViewPos::After => axis.last_visible()?,
            ViewPos::Header | ViewPos::Invalid => return None,
        };
        Some((first, last))
    }

    fn paint_cell(&self, col: usize, row: usize, viewport: &PixelRect, painter: &mut dyn CellPainter) {
        if col >= self.columns.count() || row >= self.rows.count() {
            return;
        }
        let Some(rect) = self.mapper().cell_rect(col, row) else {
            return;
        };
        if !rect.intersects(viewport) {
            return;
        }
        let data_col = self.columns.data_index(col);
        let data_row = self.rows.data_index(row);
        painter.paint_cell(&CellPaint {
            view_col: col,
            view_row: row,
            data_col,
            data_row,
            rect,
            value: self.model.value(data_col, data_row),
            selected: self.selection.is_cell_selected(col, row),
        });
    }

    fn paint_header(&self, orientation: Orientation, pos: usize, painter: &mut dyn CellPainter) {
        let axis = self.axis(orientation);
        if pos >= axis.count() {
            return;
        }
        let size = axis.index_pixels(ViewPos::Body(pos));
        if size == 0 {
            return;
        }
        let scroll = match orientation {
            Orientation::Columns => self.scroll_x.get(),
            Orientation::Rows => self.scroll_y.get(),
        };
        let start = axis.start_pixel(ViewPos::Body(pos), scroll);
        let rect = match orientation {
            Orientation::Columns => PixelRect::new(start, 0, size, self.rows.scaled_header()),
            Orientation::Rows => PixelRect::new(0, start, self.columns.scaled_header(), size),
        };
        if rect.is_empty() {
            return;
        }
        painter.paint_header(orientation, pos, axis.data_index(pos), rect);
    }

    fn overlay_paint(&self, viewport: &PixelRect) -> OverlayPaint {
        let mapper = self.mapper();
        let col_count = self.columns.count();
        let row_count = self.rows.count();
        let mut selection_rects = Vec::new();
        for area in self.selection.areas() {
            if col_count == 0 || row_count == 0 {
                break;
            }
            let end_col = area.end_col.min(col_count - 1);
            let end_row = area.end_row.min(row_count - 1);
            let x0 = mapper.column_start_x(ViewPos::Body(area.start_col.min(end_col)));
            let y0 = mapper.row_start_y(ViewPos::Body(area.start_row.min(end_row)));
            let x1 = mapper.column_start_x(ViewPos::Body(end_col))
                + self.columns.index_pixels(ViewPos::Body(end_col));
            let y1 = mapper.row_start_y(ViewPos::Body(end_row))
                + self.rows.index_pixels(ViewPos::Body(end_row));
            let rect = PixelRect::new(x0, y0, x1 - x0, y1 - y0);
            if let Some(clipped) = rect.intersection(viewport) {
                selection_rects.push(clipped);
            }
        }
        let (focus_col, focus_row) = self.selection.focus_cell();
        let focus_rect = mapper
            .cell_rect(focus_col.min(col_count.saturating_sub(1)), focus_row.min(row_count.saturating_sub(1)))
            .and_then(|r| r.intersection(viewport));
        OverlayPaint {
            selection_rects,
            focus_rect,
        }
    }
}
