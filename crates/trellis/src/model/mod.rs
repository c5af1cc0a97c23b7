//! Data-model traits and selection state.
//!
//! The engine never stores cell contents; it queries them through the
//! [`TableModel`] trait and learns about changes through the model's
//! single `changed` signal. Selection lives view-side in
//! [`SelectionModel`], expressed in view positions so it survives data
//! edits untouched.

pub mod selection;
pub mod traits;
pub mod vec_model;

pub use selection::{Selected, SelectionArea, SelectionModel};
pub use traits::{CellValue, ModelEvent, ModelSignals, TableModel};
pub use vec_model::VecTableModel;
