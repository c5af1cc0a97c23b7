//! The view side of the engine: axis geometry, redraw scheduling,
//! painting, commands, and the [`GridView`] that coordinates them.

pub mod axis;
pub mod commands;
pub mod grid_view;
pub mod painter;
pub mod position;
pub mod redraw;

pub use axis::{Orientation, ViewAxis, ViewPos};
pub use commands::{
    GridCommand, HideSectionsCommand, ReorderCommand, ResizeAllCommand, ResizeSectionsCommand,
    ShowSectionsCommand, UndoStack, ZoomCommand,
};
pub use grid_view::{GridView, Modifiers, NavDirection};
pub use painter::{CellPaint, CellPainter, OverlayPaint, PaintCall, RecordingPainter};
pub use position::PositionMapper;
pub use redraw::{PaintPlan, RedrawBudget, RedrawScheduler, RedrawState};
