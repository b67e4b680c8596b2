//! Error types for the editing engine.
use thiserror::Error;

use crate::core::position::Range;

/// Failure raised by a single command while producing its edit operations.
///
/// These never abort a batch: the executor drops the failing command's
/// operations and keeps going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Range {0} is outside the buffer")]
    OutOfBounds(Range),

    #[error("Command failed: {0}")]
    Failed(String),
}

/// Failure of an edit-producing intent as a whole.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Edit operations overlap at {0}")]
    OverlappingEdits(Range),

    #[error("Invalid range: {0}")]
    InvalidRange(Range),

    #[error("Command for cursor {major} failed: {source}")]
    Command {
        major: usize,
        #[source]
        source: CommandError,
    },
}

/// Report an error that is swallowed at a transaction boundary
pub fn on_unexpected_error(err: &dyn std::error::Error) {
    tracing::error!(error = %err, "unexpected error while editing");
}
