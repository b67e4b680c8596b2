use crate::core::command::EditCommand;
use crate::core::commands::ensure_in_bounds;
use crate::core::edit_operation::{CursorStateComputerData, EditOperationBuilder};
use crate::core::error::CommandError;
use crate::core::id::TrackedSelectionId;
use crate::core::model::TextModel;
use crate::core::position::{Position, Range};
use crate::core::selection::Selection;

/// Range covered by the command's first applied edit
fn first_inverse_range(helper: &CursorStateComputerData<'_>) -> Option<Range> {
    helper.inverse_edit_operations().first().map(|e| e.range)
}

/// Replace a range; the cursor ends up after the new text
#[derive(Debug, Clone)]
pub struct ReplaceCommand {
    range: Range,
    text: String,
    inserts_auto_whitespace: bool,
}

impl ReplaceCommand {
    pub fn new(range: Range, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
            inserts_auto_whitespace: false,
        }
    }

    pub fn with_auto_whitespace(mut self, inserts_auto_whitespace: bool) -> Self {
        self.inserts_auto_whitespace = inserts_auto_whitespace;
        self
    }
}

impl EditCommand for ReplaceCommand {
    fn get_edit_operations(
        &mut self,
        model: &dyn TextModel,
        builder: &mut EditOperationBuilder<'_>,
    ) -> Result<(), CommandError> {
        ensure_in_bounds(model, self.range)?;
        builder.add_edit_operation(self.range, &self.text);
        Ok(())
    }

    fn compute_cursor_state(
        &mut self,
        _model: &dyn TextModel,
        helper: &CursorStateComputerData<'_>,
    ) -> Selection {
        let end = first_inverse_range(helper).map_or(self.range.end(), |r| r.end());
        Selection::point(end)
    }

    fn inserts_auto_whitespace(&self) -> bool {
        self.inserts_auto_whitespace
    }
}

/// Replace a range; the cursor ends up offset from the end of the new text
#[derive(Debug, Clone)]
pub struct ReplaceCommandWithOffsetCursorState {
    range: Range,
    text: String,
    line_delta: isize,
    column_delta: isize,
    inserts_auto_whitespace: bool,
}

impl ReplaceCommandWithOffsetCursorState {
    pub fn new(range: Range, text: impl Into<String>, line_delta: isize, column_delta: isize) -> Self {
        Self {
            range,
            text: text.into(),
            line_delta,
            column_delta,
            inserts_auto_whitespace: false,
        }
    }

    pub fn with_auto_whitespace(mut self, inserts_auto_whitespace: bool) -> Self {
        self.inserts_auto_whitespace = inserts_auto_whitespace;
        self
    }
}

impl EditCommand for ReplaceCommandWithOffsetCursorState {
    fn get_edit_operations(
        &mut self,
        model: &dyn TextModel,
        builder: &mut EditOperationBuilder<'_>,
    ) -> Result<(), CommandError> {
        ensure_in_bounds(model, self.range)?;
        builder.add_edit_operation(self.range, &self.text);
        Ok(())
    }

    fn compute_cursor_state(
        &mut self,
        model: &dyn TextModel,
        helper: &CursorStateComputerData<'_>,
    ) -> Selection {
        let end = first_inverse_range(helper).map_or(self.range.end(), |r| r.end());
        let target: Position = end.delta(self.line_delta, self.column_delta);
        Selection::point(model.validate_position(target))
    }

    fn inserts_auto_whitespace(&self) -> bool {
        self.inserts_auto_whitespace
    }
}

/// Replace a range while keeping an unrelated selection where it was
#[derive(Debug, Clone)]
pub struct ReplaceCommandThatPreservesSelection {
    range: Range,
    text: String,
    initial_selection: Selection,
    force_move_markers: bool,
    selection_id: Option<TrackedSelectionId>,
}

impl ReplaceCommandThatPreservesSelection {
    pub fn new(range: Range, text: impl Into<String>, initial_selection: Selection) -> Self {
        Self {
            range,
            text: text.into(),
            initial_selection,
            force_move_markers: false,
            selection_id: None,
        }
    }

    pub fn with_force_move_markers(mut self, force: bool) -> Self {
        self.force_move_markers = force;
        self
    }
}

impl EditCommand for ReplaceCommandThatPreservesSelection {
    fn get_edit_operations(
        &mut self,
        model: &dyn TextModel,
        builder: &mut EditOperationBuilder<'_>,
    ) -> Result<(), CommandError> {
        ensure_in_bounds(model, self.range)?;
        if self.force_move_markers {
            builder.add_forced_edit_operation(self.range, &self.text);
        } else {
            builder.add_edit_operation(self.range, &self.text);
        }
        self.selection_id = Some(builder.track_selection(self.initial_selection, None));
        Ok(())
    }

    fn compute_cursor_state(
        &mut self,
        _model: &dyn TextModel,
        helper: &CursorStateComputerData<'_>,
    ) -> Selection {
        self.selection_id
            .and_then(|id| helper.tracked_selection(id))
            .unwrap_or(self.initial_selection)
    }
}
