//! The drawing collaborator.
//!
//! The engine decides WHAT to paint; a [`CellPainter`] supplied by the
//! host decides HOW. The view invokes it once per dirty cell, header
//! section, or overlay pass, always with nonzero pixel rectangles already
//! clipped to the viewport. [`RecordingPainter`] captures the calls for
//! tests and demos.

use crate::geometry::PixelRect;
use crate::model::CellValue;
use crate::view::axis::Orientation;

/// Everything a painter needs to draw one body cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellPaint {
    /// View column of the cell.
    pub view_col: usize,
    /// View row of the cell.
    pub view_row: usize,
    /// Data column behind the view column.
    pub data_col: usize,
    /// Data row behind the view row.
    pub data_row: usize,
    /// On-screen rectangle, never empty.
    pub rect: PixelRect,
    /// The cell's value. May be any variant; painters must not assume
    /// well-formedness.
    pub value: CellValue,
    /// Whether the cell lies inside the selection.
    pub selected: bool,
}

/// Everything a painter needs to draw the selection overlay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlayPaint {
    /// On-screen rectangles of the selection areas, clipped to the
    /// viewport.
    pub selection_rects: Vec<PixelRect>,
    /// On-screen rectangle of the focus cell, if visible.
    pub focus_rect: Option<PixelRect>,
}

/// Host-supplied drawing backend.
///
/// Calls arrive in paint order: background, cells, headers, overlay
/// last. Cells with zero effective width or height are never handed
/// over.
pub trait CellPainter {
    /// Fills the viewport background before any cell is painted.
    fn fill_background(&mut self, viewport: PixelRect);

    /// Paints one body cell.
    fn paint_cell(&mut self, cell: &CellPaint);

    /// Paints one header section.
    fn paint_header(
        &mut self,
        orientation: Orientation,
        view_pos: usize,
        data_index: usize,
        rect: PixelRect,
    );

    /// Paints the selection and focus overlay on top of everything.
    fn paint_overlay(&mut self, overlay: &OverlayPaint);
}

/// One recorded painter invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCall {
    /// `fill_background` with the viewport rect.
    Background(PixelRect),
    /// `paint_cell`.
    Cell(CellPaint),
    /// `paint_header`.
    Header(Orientation, usize, usize, PixelRect),
    /// `paint_overlay`.
    Overlay(OverlayPaint),
}

/// A [`CellPainter`] that records every call it receives.
#[derive(Debug, Default)]
pub struct RecordingPainter {
    /// All calls, in arrival order.
    pub calls: Vec<PaintCall>,
}

impl RecordingPainter {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all recorded calls.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// The recorded cell paints, in order.
    pub fn cells(&self) -> Vec<&CellPaint> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                PaintCall::Cell(cell) => Some(cell),
                _ => None,
            })
            .collect()
    }

    /// Number of `fill_background` calls.
    pub fn background_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, PaintCall::Background(_)))
            .count()
    }

    /// Number of `paint_overlay` calls.
    pub fn overlay_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, PaintCall::Overlay(_)))
            .count()
    }
}

impl CellPainter for RecordingPainter {
    fn fill_background(&mut self, viewport: PixelRect) {
        self.calls.push(PaintCall::Background(viewport));
    }

    fn paint_cell(&mut self, cell: &CellPaint) {
        self.calls.push(PaintCall::Cell(cell.clone()));
    }

    fn paint_header(
        &mut self,
        orientation: Orientation,
        view_pos: usize,
        data_index: usize,
        rect: PixelRect,
    ) {
        self.calls
            .push(PaintCall::Header(orientation, view_pos, data_index, rect));
    }

    fn paint_overlay(&mut self, overlay: &OverlayPaint) {
        self.calls.push(PaintCall::Overlay(overlay.clone()));
    }
}
