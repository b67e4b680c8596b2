//! Edit operations and the per-command builders around them.

use crate::core::id::{MarkerId, TrackedSelectionId};
use crate::core::marker::Stickiness;
use crate::core::model::TextModel;
use crate::core::position::{Position, Range};
use crate::core::selection::{Selection, SelectionDirection};

/// Which cursor (`major`) and which of its operations (`minor`) produced an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationIdentifier {
    pub major: usize,
    pub minor: usize,
}

/// One atomic text mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOperation {
    pub identifier: Option<OperationIdentifier>,
    pub range: Range,
    /// Replacement text; `None` deletes the range
    pub text: Option<String>,
    /// Markers sitting exactly at the range move past the inserted text
    pub force_move_markers: bool,
    pub is_auto_whitespace_edit: bool,
}

impl EditOperation {
    /// Replace `range` with `text`
    pub fn replace(range: Range, text: impl Into<String>) -> Self {
        Self {
            identifier: None,
            range,
            text: Some(text.into()),
            force_move_markers: false,
            is_auto_whitespace_edit: false,
        }
    }

    /// Insert `text` at `position`
    pub fn insert(position: Position, text: impl Into<String>) -> Self {
        Self::replace(Range::collapsed(position), text)
    }

    /// Delete `range`
    pub fn delete(range: Range) -> Self {
        Self {
            identifier: None,
            range,
            text: None,
            force_move_markers: false,
            is_auto_whitespace_edit: false,
        }
    }

    pub fn with_force_move_markers(mut self, force: bool) -> Self {
        self.force_move_markers = force;
        self
    }

    /// Replacement text, empty for deletions
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Neither removes nor inserts anything
    pub fn is_no_op(&self) -> bool {
        self.range.is_empty() && self.text().is_empty()
    }
}

/// Undo record for one applied operation: `range` now holds the new text,
/// `text` is what it replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InverseEdit {
    pub identifier: Option<OperationIdentifier>,
    pub range: Range,
    pub text: String,
}

impl InverseEdit {
    pub fn to_operation(&self) -> EditOperation {
        EditOperation {
            identifier: self.identifier,
            ..EditOperation::replace(self.range, self.text.clone())
        }
    }
}

/// A selection a command asked to follow through the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingTrackedSelection {
    pub(crate) selection: Selection,
    pub(crate) stickiness: Stickiness,
}

// =============================================================================
// EDIT OPERATION BUILDER
// =============================================================================

/// Collects the operations of one command, tagging each with the command's
/// major id and its own minor id
pub struct EditOperationBuilder<'a> {
    model: &'a dyn TextModel,
    major: usize,
    auto_whitespace: bool,
    tracked_base: usize,
    operations: Vec<EditOperation>,
    tracked: Vec<PendingTrackedSelection>,
}

impl<'a> EditOperationBuilder<'a> {
    pub(crate) fn new(model: &'a dyn TextModel, major: usize, auto_whitespace: bool, tracked_base: usize) -> Self {
        Self {
            model,
            major,
            auto_whitespace,
            tracked_base,
            operations: Vec::new(),
            tracked: Vec::new(),
        }
    }

    /// Replace `range` with `text`
    pub fn add_edit_operation(&mut self, range: Range, text: &str) {
        self.push(EditOperation::replace(range, text));
    }

    /// Replace `range` with `text`, pushing markers at the edges past it
    pub fn add_forced_edit_operation(&mut self, range: Range, text: &str) {
        self.push(EditOperation::replace(range, text).with_force_move_markers(true));
    }

    fn push(&mut self, mut operation: EditOperation) {
        if operation.is_no_op() {
            return;
        }
        operation.identifier = Some(OperationIdentifier {
            major: self.major,
            minor: self.operations.len(),
        });
        operation.is_auto_whitespace_edit = self.auto_whitespace;
        self.operations.push(operation);
    }

    /// Track `selection` through the batch.
    ///
    /// An empty selection sticks to the text before it when
    /// `track_previous_on_empty` is `Some(true)` and follows text typed at it
    /// when `Some(false)`. With `None` it sticks to the text before it only at
    /// the end of its line.
    pub fn track_selection(
        &mut self,
        selection: Selection,
        track_previous_on_empty: Option<bool>,
    ) -> TrackedSelectionId {
        let stickiness = if !selection.is_empty() {
            Stickiness::NeverGrowsAtEdges
        } else {
            let track_previous = track_previous_on_empty.unwrap_or_else(|| {
                let position = selection.position();
                position.column >= self.model.line_max_column(position.line)
            });
            if track_previous {
                Stickiness::GrowsBefore
            } else {
                Stickiness::GrowsAfter
            }
        };
        self.tracked.push(PendingTrackedSelection {
            selection,
            stickiness,
        });
        TrackedSelectionId(self.tracked_base + self.tracked.len() - 1)
    }

    pub(crate) fn into_parts(self) -> (Vec<EditOperation>, Vec<PendingTrackedSelection>) {
        (self.operations, self.tracked)
    }
}

// =============================================================================
// CURSOR STATE COMPUTER DATA
// =============================================================================

/// Data handed to a command when it computes its resulting selection
pub struct CursorStateComputerData<'a> {
    model: &'a dyn TextModel,
    inverse_edits: &'a [InverseEdit],
    tracked: &'a [(MarkerId, SelectionDirection)],
}

impl<'a> CursorStateComputerData<'a> {
    pub(crate) fn new(
        model: &'a dyn TextModel,
        inverse_edits: &'a [InverseEdit],
        tracked: &'a [(MarkerId, SelectionDirection)],
    ) -> Self {
        Self {
            model,
            inverse_edits,
            tracked,
        }
    }

    /// Inverse edits of this command, ordered by minor
    pub fn inverse_edit_operations(&self) -> &[InverseEdit] {
        self.inverse_edits
    }

    /// Where a selection registered with `track_selection` ended up
    pub fn tracked_selection(&self, id: TrackedSelectionId) -> Option<Selection> {
        let (marker, direction) = self.tracked.get(id.0)?;
        let range = self.model.resolve_tracked_range(*marker)?;
        Some(Selection::from_range(range, *direction))
    }

    pub fn model(&self) -> &dyn TextModel {
        self.model
    }
}
