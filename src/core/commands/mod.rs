//! Edit commands proposed by cursors
//!
//! - **replace**: replace a range and place the cursor relative to the new text
//! - **surround**: wrap a selection in an open/close pair, keeping it selected
//! - **auto_closing**: type an opening character together with its auto-inserted close
//!
//! All commands implement the [`EditCommand`](crate::core::command::EditCommand) trait.

use crate::core::error::CommandError;
use crate::core::model::TextModel;
use crate::core::position::Range;

/// Auto-closing typing
pub mod auto_closing;
/// Replace-range commands
pub mod replace;
/// Surround selection
pub mod surround;

pub use auto_closing::TypeWithAutoClosingCommand;
pub use replace::{
    ReplaceCommand, ReplaceCommandThatPreservesSelection, ReplaceCommandWithOffsetCursorState,
};
pub use surround::SurroundSelectionCommand;

/// Reject ranges reaching outside the buffer
fn ensure_in_bounds(model: &dyn TextModel, range: Range) -> Result<(), CommandError> {
    if model.validate_range(range) == range {
        Ok(())
    } else {
        Err(CommandError::OutOfBounds(range))
    }
}
