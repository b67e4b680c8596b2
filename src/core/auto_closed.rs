//! Auto-closed bracket bookkeeping.
//!
//! When a closing character is inserted automatically, it is remembered
//! together with the range it encloses, so that typing the same character
//! later overtypes it instead of inserting a second one. The bookkeeping is
//! dropped as soon as the cursors leave the enclosing range.

use crate::core::id::MarkerId;
use crate::core::marker::Stickiness;
use crate::core::model::TextModel;
use crate::core::position::Range;

/// Ranges reported by a command that auto-closed a pair
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AutoClosedRanges {
    /// One range per pair, covering open char to close char
    pub enclosing: Vec<Range>,
    /// One range per pair, covering only the close char
    pub close_characters: Vec<Range>,
}

impl AutoClosedRanges {
    pub fn is_empty(&self) -> bool {
        self.enclosing.is_empty() && self.close_characters.is_empty()
    }
}

/// One auto-close event, possibly spanning several cursors
#[derive(Debug)]
pub struct AutoClosedAction {
    close_markers: Vec<MarkerId>,
    enclosing_markers: Vec<MarkerId>,
}

impl AutoClosedAction {
    pub fn new(model: &mut dyn TextModel, ranges: &AutoClosedRanges) -> Self {
        let mut track = |ranges: &[Range]| -> Vec<MarkerId> {
            ranges
                .iter()
                .map(|r| model.track_range(*r, Stickiness::NeverGrowsAtEdges))
                .collect()
        };
        let close_markers = track(&ranges.close_characters);
        let enclosing_markers = track(&ranges.enclosing);
        Self {
            close_markers,
            enclosing_markers,
        }
    }

    /// Current ranges of the auto-closed characters
    pub fn close_character_ranges(&self, model: &dyn TextModel) -> Vec<Range> {
        self.close_markers
            .iter()
            .filter_map(|m| model.resolve_tracked_range(*m))
            .collect()
    }

    /// Still valid while every selection lies strictly inside its own
    /// single-line enclosing range
    pub fn is_valid(&self, model: &dyn TextModel, selections: &[Range]) -> bool {
        let mut enclosing = Vec::with_capacity(self.enclosing_markers.len());
        for marker in &self.enclosing_markers {
            match model.resolve_tracked_range(*marker) {
                Some(range) if !range.is_multi_line() => enclosing.push(range),
                _ => return false,
            }
        }
        enclosing.sort_by(Range::compare_using_starts);

        let mut selections = selections.to_vec();
        selections.sort_by(Range::compare_using_starts);

        selections.iter().enumerate().all(|(i, selection)| {
            enclosing
                .get(i)
                .is_some_and(|range| range.strict_contains_range(selection))
        })
    }

    pub fn dispose(self, model: &mut dyn TextModel) {
        for marker in self.close_markers.into_iter().chain(self.enclosing_markers) {
            model.release_tracked_range(marker);
        }
    }
}

/// Live auto-closed actions of a cursors controller
#[derive(Debug, Default)]
pub struct AutoClosedTracker {
    actions: Vec<AutoClosedAction>,
}

impl AutoClosedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn push(&mut self, action: AutoClosedAction) {
        self.actions.push(action);
    }

    /// Dispose every action the given selections no longer validate
    pub fn prune(&mut self, model: &mut dyn TextModel, selections: &[Range]) {
        let (valid, invalid): (Vec<_>, Vec<_>) = std::mem::take(&mut self.actions)
            .into_iter()
            .partition(|action| action.is_valid(&*model, selections));
        if !invalid.is_empty() {
            tracing::trace!(count = invalid.len(), "disposing auto-closed actions");
        }
        for action in invalid {
            action.dispose(model);
        }
        self.actions = valid;
    }

    /// Ranges of every live auto-closed character
    pub fn close_character_ranges(&self, model: &dyn TextModel) -> Vec<Range> {
        self.actions
            .iter()
            .flat_map(|a| a.close_character_ranges(model))
            .collect()
    }

    pub fn dispose(&mut self, model: &mut dyn TextModel) {
        for action in self.actions.drain(..) {
            action.dispose(model);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::Buffer;
    use crate::core::edit_operation::EditOperation;
    use crate::core::position::Position;

    fn paren_action(buf: &mut Buffer) -> AutoClosedAction {
        AutoClosedAction::new(
            buf,
            &AutoClosedRanges {
                enclosing: vec![Range::new(1, 1, 1, 3)],
                close_characters: vec![Range::new(1, 2, 1, 3)],
            },
        )
    }

    #[test]
    fn test_valid_inside_enclosing_range() {
        let mut buf = Buffer::from_string("()");
        let action = paren_action(&mut buf);
        assert!(action.is_valid(&buf, &[Range::new(1, 2, 1, 2)]));
        assert!(!action.is_valid(&buf, &[Range::new(1, 3, 1, 3)]));
        assert!(!action.is_valid(&buf, &[Range::new(1, 1, 1, 1)]));
        // More selections than enclosing ranges
        assert!(!action.is_valid(&buf, &[Range::new(1, 2, 1, 2), Range::new(1, 2, 1, 2)]));
    }

    #[test]
    fn test_invalid_once_multi_line() {
        let mut buf = Buffer::from_string("()");
        let action = paren_action(&mut buf);
        buf.push_edit_operations(
            &[],
            vec![EditOperation::insert(Position::new(1, 2), "\n")],
            &mut |_, _| None,
        )
        .unwrap();
        assert!(!action.is_valid(&buf, &[Range::new(2, 1, 2, 1)]));
    }

    #[test]
    fn test_tracker_prunes_and_releases_markers() {
        let mut buf = Buffer::from_string("()");
        let mut tracker = AutoClosedTracker::new();
        tracker.push(paren_action(&mut buf));
        assert_eq!(buf.tracked_range_count(), 2);
        assert_eq!(tracker.close_character_ranges(&buf), vec![Range::new(1, 2, 1, 3)]);

        tracker.prune(&mut buf, &[Range::new(1, 2, 1, 2)]);
        assert_eq!(tracker.len(), 1);

        tracker.prune(&mut buf, &[Range::new(1, 3, 1, 3)]);
        assert!(tracker.is_empty());
        assert_eq!(buf.tracked_range_count(), 0);
    }
}
