//! Command Pattern for cursor edits
//!
//! Each cursor taking part in an intent proposes at most one `EditCommand`.
//! The executor gathers the operations of all commands, resolves conflicts
//! between cursors, applies the survivors as one batch and finally asks each
//! surviving command where its cursor should end up.
//!
//! - **Produce**: `get_edit_operations` emits operations and tracked selections
//! - **Recompute**: `compute_cursor_state` reads the inverse edits of the batch
//! - **Auto-close**: `auto_closed_ranges` reports auto-inserted close characters

use crate::core::auto_closed::AutoClosedRanges;
use crate::core::edit_operation::{CursorStateComputerData, EditOperationBuilder};
use crate::core::error::CommandError;
use crate::core::model::TextModel;
use crate::core::selection::Selection;

/// A cursor's proposed change to the buffer
pub trait EditCommand {
    /// Emit this command's edit operations into `builder`
    ///
    /// # Errors
    /// A failure only discards this command's operations; the rest of the
    /// batch goes ahead.
    fn get_edit_operations(
        &mut self,
        model: &dyn TextModel,
        builder: &mut EditOperationBuilder<'_>,
    ) -> Result<(), CommandError>;

    /// Selection of this command's cursor after the batch was applied
    fn compute_cursor_state(
        &mut self,
        model: &dyn TextModel,
        helper: &CursorStateComputerData<'_>,
    ) -> Selection;

    /// Operations of this command only add or remove indentation
    fn inserts_auto_whitespace(&self) -> bool {
        false
    }

    /// Close characters inserted automatically, in post-edit coordinates.
    /// Only meaningful after `compute_cursor_state` ran.
    fn auto_closed_ranges(&self) -> Option<AutoClosedRanges> {
        None
    }
}
