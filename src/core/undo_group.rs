//! Undo stack elements
//!
//! One group is one undo step. It holds the inverse edits of every batch
//! pushed while the group was open, plus the selections to restore on either
//! side of it.

use crate::core::edit_operation::InverseEdit;
use crate::core::selection::Selection;

/// A group of batches that are undone/redone together
#[derive(Debug, Clone, Default)]
pub struct UndoGroup {
    /// Inverse edits per batch, in the order the batches were applied
    pub(crate) batches: Vec<Vec<InverseEdit>>,
    /// Selections before the first batch of the group
    pub selections_before: Vec<Selection>,
    /// Selections after the last batch, when the batch computed them
    pub selections_after: Option<Vec<Selection>>,
}

impl UndoGroup {
    /// Create a new empty undo group
    pub fn new(selections_before: Vec<Selection>) -> Self {
        Self {
            batches: Vec::new(),
            selections_before,
            selections_after: None,
        }
    }

    /// Append the inverse of one applied batch
    pub fn add_batch(&mut self, batch: Vec<InverseEdit>, selections_after: Option<Vec<Selection>>) {
        self.batches.push(batch);
        self.selections_after = selections_after;
    }

    /// Check if this group is empty
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Get the number of batches in this group
    pub fn len(&self) -> usize {
        self.batches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::position::{Position, Range};

    #[test]
    fn test_undo_group_creation() {
        let group = UndoGroup::new(vec![Selection::point(Position::new(1, 1))]);
        assert!(group.is_empty());
        assert_eq!(group.len(), 0);
        assert!(group.selections_after.is_none());
    }

    #[test]
    fn test_add_batch_keeps_last_selections() {
        let mut group = UndoGroup::new(Vec::new());
        let inverse = InverseEdit {
            identifier: None,
            range: Range::new(1, 1, 1, 2),
            text: String::new(),
        };
        group.add_batch(vec![inverse.clone()], Some(vec![Selection::new(1, 2, 1, 2)]));
        group.add_batch(vec![inverse], Some(vec![Selection::new(1, 3, 1, 3)]));
        assert_eq!(group.len(), 2);
        assert_eq!(group.selections_after, Some(vec![Selection::new(1, 3, 1, 3)]));
    }
}
