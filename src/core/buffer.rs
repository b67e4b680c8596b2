//! Buffer: Pure data structure holding text content and metadata
//! No cursor, scrolling, or viewport state (those belong to the cursors controller)
//!
//! Text lives in a ropey Rope. Positions are 1-based (line, column) pairs with
//! columns counted in chars; internally everything is converted to char offsets.

use ropey::Rope;
use std::collections::VecDeque;
use std::fmt;

use crate::core::edit_operation::{EditOperation, InverseEdit};
use crate::core::error::EditError;
use crate::core::id::MarkerId;
use crate::core::marker::{Stickiness, TrackedRanges};
use crate::core::model::{ContentChangedEvent, CursorStateComputer, TextModel};
use crate::core::position::{Position, Range};
use crate::core::selection::Selection;
use crate::core::undo_group::UndoGroup;
use crate::core::utf8::char_len;

/// Maximum undo stack depth to prevent OOM from unbounded undo history
const MAX_UNDO_DEPTH: usize = 10_000;

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

/// Buffer: text, version, undo history and tracked ranges
#[derive(Debug)]
pub struct Buffer {
    /// Text content stored in a Rope (O(log n) operations)
    rope: Rope,
    /// Dirty flag (true if buffer changed since creation or the last flush)
    pub modified: bool,
    /// Version counter for tracking buffer changes
    version: u64,
    /// Undo stack (VecDeque for O(1) pop_front when capping depth)
    undo_stack: VecDeque<UndoGroup>,
    /// Redo stack
    redo_stack: VecDeque<UndoGroup>,
    /// New batches join the top undo group until a stack element is pushed
    group_open: bool,
    markers: TrackedRanges,
    pending_changes: Vec<ContentChangedEvent>,
}

impl Buffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self::from_string("")
    }

    /// Create a buffer from a string
    pub fn from_string(content: impl AsRef<str>) -> Self {
        Self {
            rope: Rope::from_str(content.as_ref()),
            modified: false,
            version: 1,
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            group_open: false,
            markers: TrackedRanges::new(),
            pending_changes: Vec::new(),
        }
    }

    // ==================== Content Access ====================

    /// Get total length in chars
    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of live tracked ranges
    pub fn tracked_range_count(&self) -> usize {
        self.markers.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Length of a 0-based line in chars, terminator excluded
    fn line_len(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(line_idx);
        let mut len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && line.char(len - 1) == '\r' {
                len -= 1;
            }
        } else if len > 0 && is_line_break(line.char(len - 1)) {
            len -= 1;
        }
        len
    }

    /// Char offset of a position, clamped into the buffer
    fn position_to_offset(&self, position: Position) -> usize {
        let line_idx = (position.line - 1).min(self.rope.len_lines().saturating_sub(1));
        self.rope.line_to_char(line_idx) + (position.column - 1).min(self.line_len(line_idx))
    }

    fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_chars());
        let line_idx = self.rope.char_to_line(offset);
        Position::new(line_idx + 1, offset - self.rope.line_to_char(line_idx) + 1)
    }

    fn check_range(&self, range: Range) -> Result<(), EditError> {
        let in_bounds = |p: Position| p.line <= self.line_count() && p.column <= self.line_max_column(p.line);
        if in_bounds(range.start()) && in_bounds(range.end()) {
            Ok(())
        } else {
            Err(EditError::InvalidRange(range))
        }
    }

    // ==================== Editing Operations ====================

    /// Apply a batch of non-overlapping edits and return their inverses in
    /// input order. Nothing is mutated when validation fails.
    fn apply_edits(&mut self, edits: &[EditOperation]) -> Result<Vec<InverseEdit>, EditError> {
        struct Resolved {
            index: usize,
            start: usize,
            end: usize,
            inserted: usize,
        }

        let mut resolved = Vec::with_capacity(edits.len());
        for (index, edit) in edits.iter().enumerate() {
            self.check_range(edit.range)?;
            resolved.push(Resolved {
                index,
                start: self.position_to_offset(edit.range.start()),
                end: self.position_to_offset(edit.range.end()),
                inserted: char_len(edit.text()),
            });
        }
        resolved.sort_by_key(|r| (r.start, r.index));
        for pair in resolved.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(EditError::OverlappingEdits(edits[pair[1].index].range));
            }
        }

        // Post-edit offsets of the inserted text, computed before mutating
        let mut removed_text = vec![String::new(); edits.len()];
        let mut new_offsets = vec![(0, 0); edits.len()];
        let mut added = 0;
        let mut removed = 0;
        for r in &resolved {
            removed_text[r.index] = self.rope.slice(r.start..r.end).to_string();
            let new_start = r.start + added - removed;
            new_offsets[r.index] = (new_start, new_start + r.inserted);
            added += r.inserted;
            removed += r.end - r.start;
        }

        // Back to front so earlier offsets stay valid
        for r in resolved.iter().rev() {
            let edit = &edits[r.index];
            if r.end > r.start {
                self.rope.remove(r.start..r.end);
            }
            if !edit.text().is_empty() {
                self.rope.insert(r.start, edit.text());
            }
            self.markers
                .accept_edit(r.start, r.end, r.inserted, edit.force_move_markers);
        }
        self.modified = true;

        Ok(edits
            .iter()
            .zip(removed_text)
            .zip(new_offsets)
            .map(|((edit, text), (start, end))| InverseEdit {
                identifier: edit.identifier,
                range: Range::from_positions(self.offset_to_position(start), self.offset_to_position(end)),
                text,
            })
            .collect())
    }

    /// Replace the whole content. Clears undo history and collapses markers.
    pub fn set_value(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.version += 1;
        self.modified = true;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.group_open = false;
        self.markers.collapse_all();
        self.pending_changes.push(ContentChangedEvent {
            version_id: self.version,
            is_flush: true,
            ..Default::default()
        });
    }

    // ==================== Undo/Redo ====================

    /// Apply the batches of a group back to front, returning their inverses
    /// in application order
    fn replay(&mut self, batches: &[Vec<InverseEdit>]) -> Result<Vec<Vec<InverseEdit>>, EditError> {
        let mut replayed = Vec::with_capacity(batches.len());
        for batch in batches.iter().rev() {
            let operations: Vec<EditOperation> = batch.iter().map(InverseEdit::to_operation).collect();
            replayed.push(self.apply_edits(&operations)?);
        }
        Ok(replayed)
    }

    /// Undo the last group. The queued change event carries the selections
    /// from before the group.
    pub fn undo(&mut self) -> bool {
        let Some(group) = self.undo_stack.pop_back() else {
            return false;
        };
        self.group_open = false;
        match self.replay(&group.batches) {
            Ok(batches) => {
                self.version += 1;
                self.pending_changes.push(ContentChangedEvent {
                    version_id: self.version,
                    is_undoing: true,
                    resulting_selection: Some(group.selections_before.clone()),
                    ..Default::default()
                });
                self.redo_stack.push_back(UndoGroup { batches, ..group });
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "undo failed");
                false
            }
        }
    }

    /// Redo the last undone group
    pub fn redo(&mut self) -> bool {
        let Some(group) = self.redo_stack.pop_back() else {
            return false;
        };
        self.group_open = false;
        match self.replay(&group.batches) {
            Ok(batches) => {
                self.version += 1;
                self.pending_changes.push(ContentChangedEvent {
                    version_id: self.version,
                    is_redoing: true,
                    resulting_selection: group.selections_after.clone(),
                    ..Default::default()
                });
                self.undo_stack.push_back(UndoGroup { batches, ..group });
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "redo failed");
                false
            }
        }
    }

    /// Record an applied batch in the open undo group, or start a new one
    fn push_undo(
        &mut self,
        selections_before: &[Selection],
        batch: Vec<InverseEdit>,
        selections_after: Option<Vec<Selection>>,
    ) {
        self.redo_stack.clear();
        if self.group_open {
            if let Some(group) = self.undo_stack.back_mut() {
                group.add_batch(batch, selections_after);
                return;
            }
        }
        let mut group = UndoGroup::new(selections_before.to_vec());
        group.add_batch(batch, selections_after);
        if self.undo_stack.len() >= MAX_UNDO_DEPTH {
            self.undo_stack.pop_front(); // O(1) discard oldest
        }
        self.undo_stack.push_back(group);
        self.group_open = true;
    }
}

impl TextModel for Buffer {
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_content(&self, line: usize) -> String {
        let line_idx = line.saturating_sub(1);
        if line_idx >= self.rope.len_lines() {
            return String::new();
        }
        self.rope
            .line(line_idx)
            .slice(..self.line_len(line_idx))
            .to_string()
    }

    fn line_max_column(&self, line: usize) -> usize {
        self.line_len(line.saturating_sub(1)) + 1
    }

    fn value_in_range(&self, range: Range) -> String {
        let start = self.position_to_offset(range.start());
        let end = self.position_to_offset(range.end());
        self.rope.slice(start..end).to_string()
    }

    fn version_id(&self) -> u64 {
        self.version
    }

    fn push_stack_element(&mut self) {
        self.group_open = false;
    }

    fn push_edit_operations(
        &mut self,
        selections_before: &[Selection],
        edits: Vec<EditOperation>,
        cursor_state_computer: &mut CursorStateComputer<'_>,
    ) -> Result<Option<Vec<Selection>>, EditError> {
        if edits.is_empty() {
            return Ok(cursor_state_computer(&*self, &[]));
        }
        let inverse = self.apply_edits(&edits)?;
        self.version += 1;
        let selections_after = cursor_state_computer(&*self, &inverse);
        self.push_undo(selections_before, inverse, selections_after.clone());
        self.pending_changes.push(ContentChangedEvent {
            version_id: self.version,
            ..Default::default()
        });
        Ok(selections_after)
    }

    fn track_range(&mut self, range: Range, stickiness: Stickiness) -> MarkerId {
        let start = self.position_to_offset(range.start());
        let end = self.position_to_offset(range.end());
        self.markers.insert(start, end, stickiness)
    }

    fn resolve_tracked_range(&self, id: MarkerId) -> Option<Range> {
        let (start, end) = self.markers.get(id)?;
        Some(Range::from_positions(
            self.offset_to_position(start),
            self.offset_to_position(end),
        ))
    }

    fn release_tracked_range(&mut self, id: MarkerId) {
        self.markers.remove(id);
    }

    fn take_content_changes(&mut self) -> Vec<ContentChangedEvent> {
        std::mem::take(&mut self.pending_changes)
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}
