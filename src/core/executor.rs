//! Command Executor
//!
//! Runs one command per cursor as a single atomic buffer mutation:
//!
//! 1. every command emits its operations, tagged `(major = cursor, minor)`;
//! 2. overlapping operations from different cursors are resolved by dropping
//!    the whole cursor with the higher index;
//! 3. the survivors are applied in one batch (one undo step);
//! 4. each surviving command computes its cursor's new selection from the
//!    inverse edits of its own operations.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::command::EditCommand;
use crate::core::edit_operation::{CursorStateComputerData, EditOperation, EditOperationBuilder, InverseEdit};
use crate::core::error::{EditError, on_unexpected_error};
use crate::core::model::TextModel;
use crate::core::position::Range;
use crate::core::selection::Selection;

fn major_of(operation: &EditOperation) -> usize {
    operation.identifier.map_or(0, |id| id.major)
}

/// Cursors whose operations must be dropped so the rest no longer overlap.
///
/// Operations are scanned sorted by range end, descending. When an
/// operation's start lies before the end of the one after it, the cursor with
/// the higher index loses all of its operations and the scan resumes just
/// before the removal point.
fn loser_cursors(operations: &[EditOperation]) -> BTreeSet<usize> {
    let mut scan: Vec<(usize, Range)> = operations.iter().map(|op| (major_of(op), op.range)).collect();
    scan.sort_by(|a, b| Range::compare_using_ends(&b.1, &a.1));

    let mut losers = BTreeSet::new();
    let mut i = 1;
    while i < scan.len() {
        let (previous_major, previous_range) = scan[i - 1];
        let (current_major, current_range) = scan[i];
        if previous_range.start() < current_range.end() {
            let loser = previous_major.max(current_major);
            losers.insert(loser);
            let removed_before = scan[..i].iter().filter(|(major, _)| *major == loser).count();
            scan.retain(|(major, _)| *major != loser);
            i -= removed_before;
            i = i.saturating_sub(1);
        }
        i += 1;
    }
    losers
}

/// Apply one command per cursor as a single batch.
///
/// Returns the resulting selections with losing cursors removed, or `None`
/// when nothing was applied (no operations, or cursor 0 lost a conflict).
///
/// # Errors
/// Returns the buffer's [`EditError`] when it rejects the batch. Failures of
/// individual commands are reported and do not fail the batch.
pub fn execute_commands(
    model: &mut dyn TextModel,
    selections_before: &[Selection],
    commands: &mut [Option<Box<dyn EditCommand>>],
) -> Result<Option<Vec<Selection>>, EditError> {
    let mut operations = Vec::new();
    let mut pending_tracked = Vec::new();
    for (major, command) in commands.iter_mut().enumerate() {
        let Some(command) = command.as_mut() else {
            continue;
        };
        let mut builder = EditOperationBuilder::new(
            &*model,
            major,
            command.inserts_auto_whitespace(),
            pending_tracked.len(),
        );
        match command.get_edit_operations(&*model, &mut builder) {
            Ok(()) => {
                let (ops, tracked) = builder.into_parts();
                operations.extend(ops);
                pending_tracked.extend(tracked);
            }
            Err(source) => on_unexpected_error(&EditError::Command { major, source }),
        }
    }

    if operations.is_empty() {
        return Ok(None);
    }

    let losers = loser_cursors(&operations);
    if losers.contains(&0) {
        tracing::warn!(?losers, "ignoring commands: the first cursor lost an edit conflict");
        return Ok(None);
    }
    operations.retain(|op| !losers.contains(&major_of(op)));
    tracing::debug!(
        operations = operations.len(),
        losers = losers.len(),
        "applying command batch"
    );

    let tracked: Vec<_> = pending_tracked
        .iter()
        .map(|pending| {
            (
                model.track_range(pending.selection.range(), pending.stickiness),
                pending.selection.direction(),
            )
        })
        .collect();

    let mut compute = |model: &dyn TextModel, inverse: &[InverseEdit]| -> Option<Vec<Selection>> {
        let mut grouped: BTreeMap<usize, Vec<InverseEdit>> = BTreeMap::new();
        for edit in inverse {
            if let Some(id) = edit.identifier {
                grouped.entry(id.major).or_default().push(edit.clone());
            }
        }
        for group in grouped.values_mut() {
            group.sort_by_key(|e| e.identifier.map(|id| id.minor));
        }

        let mut selections = Vec::with_capacity(selections_before.len());
        for (major, before) in selections_before.iter().enumerate() {
            if losers.contains(&major) {
                continue;
            }
            let command = commands.get_mut(major).and_then(|c| c.as_mut());
            match (grouped.get(&major), command) {
                (Some(edits), Some(command)) => {
                    let helper = CursorStateComputerData::new(model, edits, &tracked);
                    selections.push(command.compute_cursor_state(model, &helper));
                }
                _ => selections.push(*before),
            }
        }
        Some(selections)
    };

    let result = model.push_edit_operations(selections_before, operations, &mut compute);
    for (marker, _) in &tracked {
        model.release_tracked_range(*marker);
    }

    let selections = result?.unwrap_or_else(|| {
        selections_before
            .iter()
            .enumerate()
            .filter(|(major, _)| !losers.contains(major))
            .map(|(_, s)| *s)
            .collect()
    });
    Ok(Some(selections))
}
