//! Two-axis position/pixel composition.
//!
//! [`PositionMapper`] is a short-lived view over both axes plus the
//! current scroll offsets, built on demand for a paint pass or a hit
//! test. It owns nothing and caches nothing; every answer reflects the
//! axes at the moment of the call.

use crate::geometry::{PixelPoint, PixelRect};
use crate::view::axis::{ViewAxis, ViewPos};

/// Resolves cell rectangles and hit tests against both axes at once.
pub struct PositionMapper<'a> {
    columns: &'a ViewAxis,
    rows: &'a ViewAxis,
    scroll_x: i32,
    scroll_y: i32,
}

impl<'a> PositionMapper<'a> {
    /// Builds a mapper over the two axes and the current scroll offsets.
    pub fn new(columns: &'a ViewAxis, rows: &'a ViewAxis, scroll_x: i32, scroll_y: i32) -> Self {
        Self {
            columns,
            rows,
            scroll_x,
            scroll_y,
        }
    }

    /// X coordinate where a column position starts.
    pub fn column_start_x(&self, pos: ViewPos) -> i32 {
        self.columns.start_pixel(pos, self.scroll_x)
    }

    /// Y coordinate where a row position starts.
    pub fn row_start_y(&self, pos: ViewPos) -> i32 {
        self.rows.start_pixel(pos, self.scroll_y)
    }

    /// The column position containing an X coordinate.
    pub fn column_at(&self, x: i32) -> ViewPos {
        self.columns.index_at(x, self.scroll_x)
    }

    /// The row position containing a Y coordinate.
    pub fn row_at(&self, y: i32) -> ViewPos {
        self.rows.index_at(y, self.scroll_y)
    }

    /// The cell under a point, if it is over the body.
    pub fn cell_at(&self, point: PixelPoint) -> Option<(usize, usize)> {
        match (self.column_at(point.x), self.row_at(point.y)) {
            (ViewPos::Body(c), ViewPos::Body(r)) => Some((c, r)),
            _ => None,
        }
    }

    /// The on-screen rectangle of one body cell.
    ///
    /// `None` when either span is zero (hidden or zoom-collapsed); such
    /// cells are never painted.
    pub fn cell_rect(&self, col: usize, row: usize) -> Option<PixelRect> {
        let width = self.columns.index_pixels(ViewPos::Body(col));
        let height = self.rows.index_pixels(ViewPos::Body(row));
        if width == 0 || height == 0 {
            return None;
        }
        Some(PixelRect::new(
            self.column_start_x(ViewPos::Body(col)),
            self.row_start_y(ViewPos::Body(row)),
            width,
            height,
        ))
    }
}
