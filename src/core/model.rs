//! The text model contract the cursor engine edits through.
//!
//! The controller never holds references into a model between calls: every
//! intent receives `&mut dyn TextModel`, and buffer-owned tracked ranges are
//! addressed by opaque [`MarkerId`]s.

use crate::core::edit_operation::{EditOperation, InverseEdit};
use crate::core::error::EditError;
use crate::core::id::MarkerId;
use crate::core::marker::Stickiness;
use crate::core::position::{Position, Range};
use crate::core::selection::Selection;

/// Callback that turns the inverse edits of an applied batch into the
/// selections the cursors should end up with
pub type CursorStateComputer<'c> =
    dyn FnMut(&dyn TextModel, &[InverseEdit]) -> Option<Vec<Selection>> + 'c;

/// Notification queued by a model whenever its content changes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentChangedEvent {
    /// Version of the model after the change
    pub version_id: u64,
    /// The whole content was replaced
    pub is_flush: bool,
    pub is_undoing: bool,
    pub is_redoing: bool,
    /// Selections the change explicitly asks the cursors to take (undo/redo)
    pub resulting_selection: Option<Vec<Selection>>,
}

/// A versioned, line-addressed text buffer
pub trait TextModel {
    /// Number of lines; an empty buffer has one line
    fn line_count(&self) -> usize;

    /// Content of a 1-based line without its terminator
    fn line_content(&self, line: usize) -> String;

    /// Last valid column of a line (its char length plus one)
    fn line_max_column(&self, line: usize) -> usize;

    /// Text covered by a range, line terminators included
    fn value_in_range(&self, range: Range) -> String;

    /// Clamp a position into the buffer
    fn validate_position(&self, position: Position) -> Position {
        let line = position.line.clamp(1, self.line_count().max(1));
        let column = position.column.clamp(1, self.line_max_column(line));
        Position::new(line, column)
    }

    /// Clamp both ends of a range into the buffer
    fn validate_range(&self, range: Range) -> Range {
        Range::from_positions(
            self.validate_position(range.start()),
            self.validate_position(range.end()),
        )
    }

    /// Clamp both ends of a selection, keeping its direction
    fn validate_selection(&self, selection: Selection) -> Selection {
        Selection::from_positions(
            self.validate_position(selection.anchor),
            self.validate_position(selection.active),
        )
    }

    /// Monotonic counter bumped on every content change
    fn version_id(&self) -> u64;

    /// Close the current undo stack element
    fn push_stack_element(&mut self);

    /// Apply `edits` as one atomic mutation and one undo step.
    ///
    /// `cursor_state_computer` receives the inverse edits in the order of
    /// `edits`; its result becomes the selections remembered for redo.
    fn push_edit_operations(
        &mut self,
        selections_before: &[Selection],
        edits: Vec<EditOperation>,
        cursor_state_computer: &mut CursorStateComputer<'_>,
    ) -> Result<Option<Vec<Selection>>, EditError>;

    /// Start tracking a range
    fn track_range(&mut self, range: Range, stickiness: Stickiness) -> MarkerId;

    /// Current range of a tracked marker, `None` once released
    fn resolve_tracked_range(&self, id: MarkerId) -> Option<Range>;

    /// Stop tracking a range. Releasing twice is a no-op.
    fn release_tracked_range(&mut self, id: MarkerId);

    /// Drain queued content-change notifications
    fn take_content_changes(&mut self) -> Vec<ContentChangedEvent>;
}
