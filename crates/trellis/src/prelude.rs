//! Prelude module for Trellis.
//!
//! Re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use trellis::prelude::*;
//! ```

// ============================================================================
// Core Reactive Primitives
// ============================================================================

pub use trellis_core::{Property, ReadOnlyProperty, Signal, UpdateQueue};

// ============================================================================
// Geometry
// ============================================================================

pub use crate::geometry::{PixelPoint, PixelRect};

// ============================================================================
// Data Model
// ============================================================================

pub use crate::model::{
    CellValue, ModelEvent, ModelSignals, Selected, SelectionArea, SelectionModel, TableModel,
    VecTableModel,
};

// ============================================================================
// View
// ============================================================================

pub use crate::view::{
    CellPaint, CellPainter, GridView, Modifiers, NavDirection, Orientation, OverlayPaint,
    PositionMapper, RecordingPainter, RedrawBudget, ViewAxis, ViewPos,
};

// ============================================================================
// Commands
// ============================================================================

pub use crate::view::{
    GridCommand, HideSectionsCommand, ReorderCommand, ResizeAllCommand, ResizeSectionsCommand,
    ShowSectionsCommand, UndoStack, ZoomCommand,
};

// ============================================================================
// Errors
// ============================================================================

pub use crate::error::{GridError, Result};
