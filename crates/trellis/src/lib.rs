//! Trellis - a virtualized table engine.
//!
//! Trellis is the coordination core of a spreadsheet-like grid: it maps
//! data indices to on-screen pixel spans under resize, hide, reorder,
//! and zoom, schedules incremental repaints, tracks selection in view
//! positions, and expresses every structural change as an undoable
//! command. It owns no pixels and no event loop; the host supplies a
//! [`CellPainter`](view::CellPainter) and drives
//! [`GridView::end_turn`](view::GridView::end_turn) once per event turn.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use trellis::prelude::*;
//!
//! let model = Arc::new(VecTableModel::new(8, 100));
//! model.set_value(0, 0, CellValue::Text("hello".into()));
//!
//! let mut view = GridView::new(model.clone());
//! view.set_viewport_size(640, 480);
//!
//! // Forward model changes and paint at the end of the turn.
//! view.handle_model_event(ModelEvent::CellChanged(0, 0));
//! let mut painter = RecordingPainter::new();
//! view.end_turn(&mut painter);
//! ```

pub mod error;
pub mod geometry;
pub mod model;
pub mod prelude;
pub mod view;

pub use error::{GridError, Result};
pub use geometry::{PixelPoint, PixelRect};
pub use model::{CellValue, ModelEvent, SelectionModel, TableModel};
pub use view::{GridView, Orientation, ViewAxis, ViewPos};
