//! Undoable axis mutations.
//!
//! Every structural change to an axis (resize, hide, show, reorder,
//! zoom) is expressed as a [`GridCommand`] that captures its BEFORE
//! state at construction. Undo installs the captured snapshot verbatim;
//! nothing is recomputed, so undo restores the exact prior state even
//! when an inverse operation would be ambiguous.
//!
//! The [`UndoStack`] is a host-owned collaborator, not part of
//! [`GridView`], so `undo`/`redo` can hand the view to the command
//! mutably without aliasing.

use std::any::Any;
use std::collections::{BTreeSet, HashMap};

use trellis_core::logging::targets;

use crate::error::Result;
use crate::view::axis::Orientation;
use crate::view::grid_view::GridView;

/// An undoable operation against a [`GridView`].
pub trait GridCommand {
    /// Short human-readable label ("Resize columns", "Zoom").
    fn label(&self) -> &str;

    /// Applies the operation. Called once by the initiator and again on
    /// each redo.
    fn redo(&mut self, view: &mut GridView);

    /// Restores the captured before-state.
    fn undo(&mut self, view: &mut GridView);

    /// Downcast support for merging.
    fn as_any(&self) -> &dyn Any;

    /// Attempts to absorb a newer command into this one (continuous
    /// gestures). Returns whether the newer command was absorbed.
    fn try_merge(&mut self, _other: &dyn GridCommand) -> bool {
        false
    }
}

/// Applies one absolute size to a set of data indices.
pub struct ResizeSectionsCommand {
    orientation: Orientation,
    size: u32,
    /// Prior override of each index (`None` meant the default size).
    before: Vec<(usize, Option<u32>)>,
}

impl ResizeSectionsCommand {
    /// Captures the prior overrides of the given data indices.
    pub fn new(view: &GridView, orientation: Orientation, data_indices: &[usize], size: u32) -> Self {
        let axis = view.axis(orientation);
        Self {
            orientation,
            size,
            before: data_indices
                .iter()
                .map(|&d| (d, axis.index_size_override(d)))
                .collect(),
        }
    }
}

impl GridCommand for ResizeSectionsCommand {
    fn label(&self) -> &str {
        match self.orientation {
            Orientation::Columns => "Resize columns",
            Orientation::Rows => "Resize rows",
        }
    }

    fn redo(&mut self, view: &mut GridView) {
        let axis = view.axis_mut(self.orientation);
        for &(d, _) in &self.before {
            axis.set_index_size(d, self.size);
        }
        view.axis_mutated(self.orientation);
    }

    fn undo(&mut self, view: &mut GridView) {
        let axis = view.axis_mut(self.orientation);
        for &(d, prior) in &self.before {
            match prior {
                Some(size) => axis.set_index_size(d, size),
                None => axis.clear_index_size(d),
            }
        }
        view.axis_mutated(self.orientation);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Scales the default size and every override of one axis by a factor.
pub struct ResizeAllCommand {
    orientation: Orientation,
    factor: f32,
    before_default: u32,
    before_overrides: HashMap<usize, u32>,
}

impl ResizeAllCommand {
    /// Captures the axis's default size and full override map.
    pub fn new(view: &GridView, orientation: Orientation, factor: f32) -> Self {
        let axis = view.axis(orientation);
        Self {
            orientation,
            factor,
            before_default: axis.default_size(),
            before_overrides: axis.size_overrides().clone(),
        }
    }

    fn scaled(&self, size: u32) -> u32 {
        ((size as f32 * self.factor).round() as u32).max(1)
    }
}

impl GridCommand for ResizeAllCommand {
    fn label(&self) -> &str {
        match self.orientation {
            Orientation::Columns => "Resize all columns",
            Orientation::Rows => "Resize all rows",
        }
    }

    fn redo(&mut self, view: &mut GridView) {
        let default = self.scaled(self.before_default);
        let overrides: Vec<(usize, u32)> = self
            .before_overrides
            .iter()
            .map(|(&d, &size)| (d, self.scaled(size)))
            .collect();
        let axis = view.axis_mut(self.orientation);
        axis.set_default_size(default);
        for (d, size) in overrides {
            axis.set_index_size(d, size);
        }
        view.axis_mutated(self.orientation);
    }

    fn undo(&mut self, view: &mut GridView) {
        let axis = view.axis_mut(self.orientation);
        axis.set_default_size(self.before_default);
        // Redo never adds overrides, so restoring the captured map over
        // the same keys is a full restore.
        for (&d, &size) in &self.before_overrides {
            axis.set_index_size(d, size);
        }
        view.axis_mutated(self.orientation);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Hides a set of data indices.
pub struct HideSectionsCommand {
    orientation: Orientation,
    /// The subset that was actually visible before, so undo re-shows
    /// exactly what this command hid.
    toggled: Vec<usize>,
}

impl HideSectionsCommand {
    /// Captures the indices this command will hide.
    ///
    /// Returns `None` (refusal) when hiding them would leave the axis
    /// with nothing visible; the caller reports that through the view's
    /// status message.
    pub fn new(view: &GridView, orientation: Orientation, data_indices: &[usize]) -> Option<Self> {
        let axis = view.axis(orientation);
        let requested: BTreeSet<usize> = data_indices.iter().copied().collect();
        let toggled: Vec<usize> = requested
            .iter()
            .copied()
            .filter(|&d| d < axis.count() && !axis.is_hidden(d))
            .collect();
        if axis.count() > 0 && toggled.len() == axis.visible_count() {
            return None;
        }
        Some(Self {
            orientation,
            toggled,
        })
    }
}

impl GridCommand for HideSectionsCommand {
    fn label(&self) -> &str {
        match self.orientation {
            Orientation::Columns => "Hide columns",
            Orientation::Rows => "Hide rows",
        }
    }

    fn redo(&mut self, view: &mut GridView) {
        view.hide_sections(self.orientation, &self.toggled);
    }

    fn undo(&mut self, view: &mut GridView) {
        view.show_sections(self.orientation, &self.toggled);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Shows a set of data indices.
pub struct ShowSectionsCommand {
    orientation: Orientation,
    /// The subset that was actually hidden before.
    toggled: Vec<usize>,
}

impl ShowSectionsCommand {
    /// Captures the indices this command will show.
    pub fn new(view: &GridView, orientation: Orientation, data_indices: &[usize]) -> Self {
        let axis = view.axis(orientation);
        Self {
            orientation,
            toggled: data_indices
                .iter()
                .copied()
                .filter(|&d| axis.is_hidden(d))
                .collect(),
        }
    }
}

impl GridCommand for ShowSectionsCommand {
    fn label(&self) -> &str {
        match self.orientation {
            Orientation::Columns => "Show columns",
            Orientation::Rows => "Show rows",
        }
    }

    fn redo(&mut self, view: &mut GridView) {
        view.show_sections(self.orientation, &self.toggled);
    }

    fn undo(&mut self, view: &mut GridView) {
        view.hide_sections(self.orientation, &self.toggled);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Moves a set of view positions before an insertion point.
pub struct ReorderCommand {
    orientation: Orientation,
    moving: BTreeSet<usize>,
    insert_before: usize,
    /// The exact prior permutation; undo installs it verbatim.
    before_order: Vec<usize>,
}

impl ReorderCommand {
    /// Captures the axis's current order.
    pub fn new(
        view: &GridView,
        orientation: Orientation,
        moving: BTreeSet<usize>,
        insert_before: usize,
    ) -> Self {
        Self {
            orientation,
            moving,
            insert_before,
            before_order: view.axis(orientation).order().to_vec(),
        }
    }
}

impl GridCommand for ReorderCommand {
    fn label(&self) -> &str {
        match self.orientation {
            Orientation::Columns => "Move columns",
            Orientation::Rows => "Move rows",
        }
    }

    fn redo(&mut self, view: &mut GridView) {
        view.axis_mut(self.orientation)
            .reorder(&self.moving, self.insert_before);
        view.axis_mutated(self.orientation);
    }

    fn undo(&mut self, view: &mut GridView) {
        view.axis_mut(self.orientation)
            .set_order(self.before_order.clone());
        view.axis_mutated(self.orientation);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Changes the shared zoom factor.
///
/// Consecutive zoom commands merge, so a continuous zoom gesture undoes
/// in one step back to where the gesture started.
pub struct ZoomCommand {
    before: f32,
    after: f32,
}

impl ZoomCommand {
    /// Captures the current factor. Fails on non-finite or non-positive
    /// targets.
    pub fn new(view: &GridView, target: f32) -> Result<Self> {
        if !target.is_finite() || target <= 0.0 {
            return Err(crate::error::GridError::InvalidZoom { factor: target });
        }
        Ok(Self {
            before: view.zoom(),
            after: target,
        })
    }
}

impl GridCommand for ZoomCommand {
    fn label(&self) -> &str {
        "Zoom"
    }

    fn redo(&mut self, view: &mut GridView) {
        // Validated at construction.
        let _ = view.set_zoom(self.after);
    }

    fn undo(&mut self, view: &mut GridView) {
        let _ = view.set_zoom(self.before);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn try_merge(&mut self, other: &dyn GridCommand) -> bool {
        if let Some(zoom) = other.as_any().downcast_ref::<ZoomCommand>() {
            self.after = zoom.after;
            true
        } else {
            false
        }
    }
}

/// A linear undo history of [`GridCommand`]s.
///
/// The stack holds commands that have already been applied once by their
/// initiator; [`push`](UndoStack::push) records them (merging with the
/// top when possible) and truncates any redo tail.
pub struct UndoStack {
    commands: Vec<Box<dyn GridCommand>>,
    /// Number of commands currently applied.
    applied: usize,
    limit: usize,
}

impl UndoStack {
    /// Creates an empty stack with the default depth limit.
    pub fn new() -> Self {
        Self::with_limit(100)
    }

    /// Creates an empty stack keeping at most `limit` commands.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            commands: Vec::new(),
            applied: 0,
            limit: limit.max(1),
        }
    }

    /// Records an already-applied command.
    pub fn push(&mut self, command: Box<dyn GridCommand>) {
        self.commands.truncate(self.applied);
        if let Some(top) = self.commands.last_mut()
            && top.try_merge(&*command)
        {
            tracing::trace!(target: targets::COMMAND, label = top.label(), "merged command");
            return;
        }
        tracing::debug!(target: targets::COMMAND, label = command.label(), "pushed command");
        self.commands.push(command);
        if self.commands.len() > self.limit {
            self.commands.remove(0);
        }
        self.applied = self.commands.len();
    }

    /// Undoes the newest applied command. Returns whether anything was
    /// undone.
    pub fn undo(&mut self, view: &mut GridView) -> bool {
        if self.applied == 0 {
            return false;
        }
        self.applied -= 1;
        let command = &mut self.commands[self.applied];
        tracing::debug!(target: targets::COMMAND, label = command.label(), "undo");
        command.undo(view);
        true
    }

    /// Reapplies the newest undone command. Returns whether anything was
    /// redone.
    pub fn redo(&mut self, view: &mut GridView) -> bool {
        if self.applied == self.commands.len() {
            return false;
        }
        let command = &mut self.commands[self.applied];
        tracing::debug!(target: targets::COMMAND, label = command.label(), "redo");
        command.redo(view);
        self.applied += 1;
        true
    }

    /// Returns whether an undo is available.
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    /// Returns whether a redo is available.
    pub fn can_redo(&self) -> bool {
        self.applied < self.commands.len()
    }

    /// Label of the command the next undo would revert.
    pub fn undo_label(&self) -> Option<&str> {
        self.applied
            .checked_sub(1)
            .map(|i| self.commands[i].label())
    }

    /// Label of the command the next redo would reapply.
    pub fn redo_label(&self) -> Option<&str> {
        self.commands.get(self.applied).map(|c| c.label())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
