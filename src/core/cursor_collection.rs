//! Cursor Collection
//!
//! All cursors of an editing session, kept sorted by selection start once
//! normalized. One cursor is the primary; the primary and last-added cursors
//! are followed through sorting and merging by their creation ordinal.

use crate::core::coordinates::CoordinatesConverter;
use crate::core::cursor_state::{CursorState, PartialCursorState};
use crate::core::id::MarkerId;
use crate::core::marker::Stickiness;
use crate::core::model::TextModel;
use crate::core::position::{Position, Range};
use crate::core::selection::Selection;

/// Upper bound on the number of simultaneous cursors
pub const MAX_CURSOR_COUNT: usize = 10_000;

#[derive(Debug, Clone)]
struct Cursor {
    state: CursorState,
    /// Buffer marker shadowing the model selection while tracking is on
    marker: Option<MarkerId>,
    /// Creation order; higher means added later
    ordinal: u64,
}

fn shadow_stickiness(selection: &Selection) -> Stickiness {
    if selection.is_empty() {
        Stickiness::GrowsAfter
    } else {
        Stickiness::AlwaysGrows
    }
}

#[derive(Debug)]
pub struct CursorCollection {
    cursors: Vec<Cursor>,
    primary_ordinal: u64,
    last_added_ordinal: u64,
    next_ordinal: u64,
    merge_overlapping: bool,
    tracking: bool,
}

impl CursorCollection {
    /// A single cursor at (1, 1), tracked by a buffer marker
    pub fn new(model: &mut dyn TextModel, merge_overlapping: bool) -> Self {
        let mut collection = Self {
            cursors: vec![Cursor {
                state: CursorState::default(),
                marker: None,
                ordinal: 0,
            }],
            primary_ordinal: 0,
            last_added_ordinal: 0,
            next_ordinal: 1,
            merge_overlapping,
            tracking: false,
        };
        collection.start_tracking_selections(model);
        collection
    }

    pub fn set_merge_overlapping(&mut self, merge_overlapping: bool) {
        self.merge_overlapping = merge_overlapping;
    }

    // ==================== Accessors ====================

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    fn index_of(&self, ordinal: u64) -> usize {
        self.cursors
            .iter()
            .position(|c| c.ordinal == ordinal)
            .unwrap_or(0)
    }

    pub fn primary_index(&self) -> usize {
        self.index_of(self.primary_ordinal)
    }

    pub fn last_added_cursor_index(&self) -> usize {
        self.index_of(self.last_added_ordinal)
    }

    pub fn primary_cursor(&self) -> CursorState {
        self.cursors
            .get(self.primary_index())
            .map(|c| c.state)
            .unwrap_or_default()
    }

    pub fn states(&self) -> Vec<CursorState> {
        self.cursors.iter().map(|c| c.state).collect()
    }

    pub fn selections(&self) -> Vec<Selection> {
        self.cursors.iter().map(|c| c.state.model_selection).collect()
    }

    pub fn view_selections(&self) -> Vec<Selection> {
        self.cursors.iter().map(|c| c.state.view_selection).collect()
    }

    pub fn view_positions(&self) -> Vec<Position> {
        self.cursors
            .iter()
            .map(|c| c.state.view_selection.position())
            .collect()
    }

    pub fn top_most_view_position(&self) -> Position {
        self.view_positions().into_iter().min().unwrap_or_default()
    }

    pub fn bottom_most_view_position(&self) -> Position {
        self.view_positions().into_iter().max().unwrap_or_default()
    }

    // ==================== Marker Tracking ====================

    pub fn start_tracking_selections(&mut self, model: &mut dyn TextModel) {
        self.tracking = true;
        for cursor in &mut self.cursors {
            if cursor.marker.is_none() {
                let selection = cursor.state.model_selection;
                cursor.marker = Some(model.track_range(selection.range(), shadow_stickiness(&selection)));
            }
        }
    }

    pub fn stop_tracking_selections(&mut self, model: &mut dyn TextModel) {
        self.tracking = false;
        for cursor in &mut self.cursors {
            if let Some(marker) = cursor.marker.take() {
                model.release_tracked_range(marker);
            }
        }
    }

    /// Selections rebuilt from the shadow markers, keeping each cursor's
    /// direction. Cursors without a live marker report their current selection.
    pub fn read_selection_from_markers(&self, model: &dyn TextModel) -> Vec<Selection> {
        self.cursors
            .iter()
            .map(|c| {
                c.marker
                    .and_then(|m| model.resolve_tracked_range(m))
                    .map(|range| Selection::from_range(range, c.state.model_selection.direction()))
                    .unwrap_or(c.state.model_selection)
            })
            .collect()
    }

    fn set_cursor_state(&mut self, index: usize, model: &mut dyn TextModel, state: CursorState) {
        let tracking = self.tracking;
        let Some(cursor) = self.cursors.get_mut(index) else {
            return;
        };
        let range_changed = cursor.state.model_selection.range() != state.model_selection.range()
            || cursor.state.model_selection.is_empty() != state.model_selection.is_empty();
        cursor.state = state;
        if tracking && (range_changed || cursor.marker.is_none()) {
            if let Some(marker) = cursor.marker.take() {
                model.release_tracked_range(marker);
            }
            let selection = state.model_selection;
            cursor.marker = Some(model.track_range(selection.range(), shadow_stickiness(&selection)));
        }
    }

    // ==================== State Changes ====================

    /// Replace every cursor. Returns true when the input exceeded
    /// [`MAX_CURSOR_COUNT`] and was truncated. An empty input is ignored.
    pub fn set_states(
        &mut self,
        model: &mut dyn TextModel,
        converter: &dyn CoordinatesConverter,
        states: &[PartialCursorState],
    ) -> bool {
        if states.is_empty() {
            return false;
        }
        let reached_max = states.len() > MAX_CURSOR_COUNT;
        let states = &states[..states.len().min(MAX_CURSOR_COUNT)];

        let tracking = self.tracking;
        self.stop_tracking_selections(model);
        let base = self.next_ordinal;
        self.cursors = states
            .iter()
            .enumerate()
            .map(|(i, partial)| Cursor {
                state: partial.resolve(&*model, converter),
                marker: None,
                ordinal: base + i as u64,
            })
            .collect();
        self.next_ordinal = base + states.len() as u64;
        self.primary_ordinal = base;
        self.last_added_ordinal = self.next_ordinal - 1;
        if tracking {
            self.start_tracking_selections(model);
        }
        reached_max
    }

    /// Move every cursor to the matching selection, keeping cursor identities
    /// (and so the primary) when the counts agree. Falls back to
    /// [`CursorCollection::set_states`] otherwise.
    pub fn set_selections(
        &mut self,
        model: &mut dyn TextModel,
        converter: &dyn CoordinatesConverter,
        selections: &[Selection],
    ) -> bool {
        if selections.len() != self.cursors.len() {
            return self.set_states(model, converter, &CursorState::from_model_selections(selections));
        }
        for (index, selection) in selections.iter().enumerate() {
            let state = CursorState::from_model_selection(*selection).resolve(&*model, converter);
            self.set_cursor_state(index, model, state);
        }
        false
    }

    /// Re-clamp every cursor against the current buffer
    pub fn ensure_valid_state(&mut self, model: &mut dyn TextModel, converter: &dyn CoordinatesConverter) {
        for index in 0..self.cursors.len() {
            let current = self.cursors[index].state;
            let model_selection = model.validate_selection(current.model_selection);
            if model_selection != current.model_selection {
                let state = CursorState {
                    model_selection,
                    view_selection: converter.model_to_view_selection(model_selection),
                };
                self.set_cursor_state(index, model, state);
            }
        }
    }

    /// Re-derive every display selection from its buffer selection
    pub fn refresh_view_states(&mut self, converter: &dyn CoordinatesConverter) {
        for cursor in &mut self.cursors {
            cursor.state.view_selection = converter.model_to_view_selection(cursor.state.model_selection);
        }
    }

    /// Keep only the primary cursor
    pub fn kill_secondary_cursors(&mut self, model: &mut dyn TextModel) {
        let primary = self.primary_index();
        let mut index = 0;
        self.cursors.retain_mut(|cursor| {
            let keep = index == primary;
            index += 1;
            if !keep {
                if let Some(marker) = cursor.marker.take() {
                    model.release_tracked_range(marker);
                }
            }
            keep
        });
        self.last_added_ordinal = self.primary_ordinal;
    }

    /// Sort by selection start and merge overlapping cursors. Idempotent.
    ///
    /// Two selections merge when the next one starts before the current one
    /// ends, or touches it when either is empty. The merged selection takes
    /// the direction of the cursor added later.
    pub fn normalize(&mut self, model: &mut dyn TextModel, converter: &dyn CoordinatesConverter) {
        self.cursors.sort_by(|a, b| {
            Range::compare_using_starts(&a.state.model_selection.range(), &b.state.model_selection.range())
        });
        if !self.merge_overlapping {
            return;
        }

        let mut index = 0;
        while index + 1 < self.cursors.len() {
            let current = &self.cursors[index];
            let next = &self.cursors[index + 1];
            let current_range = current.state.model_selection.range();
            let next_range = next.state.model_selection.range();

            let should_merge = if current_range.is_empty() || next_range.is_empty() {
                next_range.start() <= current_range.end()
            } else {
                next_range.start() < current_range.end()
            };
            if !should_merge {
                index += 1;
                continue;
            }

            let winner = if next.ordinal > current.ordinal { next } else { current };
            let merged_range = current_range.plus_range(&next_range);
            let model_selection = Selection::from_range(merged_range, winner.state.model_selection.direction());

            // The survivor keeps the primary role if either cursor held it
            let (keep, drop) = if next.ordinal == self.primary_ordinal {
                (index + 1, index)
            } else if current.ordinal == self.primary_ordinal {
                (index, index + 1)
            } else if next.ordinal > current.ordinal {
                (index + 1, index)
            } else {
                (index, index + 1)
            };
            tracing::trace!(
                kept = keep,
                dropped = drop,
                range = %merged_range,
                "merging overlapping cursors"
            );

            if self.cursors[drop].ordinal == self.last_added_ordinal {
                self.last_added_ordinal = self.cursors[keep].ordinal;
            }
            let state = CursorState {
                model_selection,
                view_selection: converter.model_to_view_selection(model_selection),
            };
            self.set_cursor_state(keep, model, state);
            let dropped = self.cursors.remove(drop);
            if let Some(marker) = dropped.marker {
                model.release_tracked_range(marker);
            }
        }
    }

    /// Release every marker owned by the collection
    pub fn dispose(&mut self, model: &mut dyn TextModel) {
        self.stop_tracking_selections(model);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::Buffer;
    use crate::core::coordinates::IdentityConverter;
    use crate::core::edit_operation::EditOperation;

    fn collection_with(buf: &mut Buffer, selections: &[Selection]) -> CursorCollection {
        let mut collection = CursorCollection::new(buf, true);
        collection.set_states(buf, &IdentityConverter, &CursorState::from_model_selections(selections));
        collection
    }

    #[test]
    fn test_new_collection_has_one_cursor() {
        let mut buf = Buffer::from_string("abc");
        let collection = CursorCollection::new(&mut buf, true);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.selections(), vec![Selection::new(1, 1, 1, 1)]);
        assert_eq!(buf.tracked_range_count(), 1);
    }

    #[test]
    fn test_top_and_bottom_view_positions() {
        let mut buf = Buffer::from_string("abc\ndef\nghi");
        let collection = collection_with(
            &mut buf,
            &[Selection::new(2, 2, 2, 2), Selection::new(3, 3, 3, 1), Selection::new(1, 2, 1, 2)],
        );
        assert_eq!(collection.top_most_view_position(), Position::new(1, 2));
        assert_eq!(collection.bottom_most_view_position(), Position::new(3, 1));
    }

    #[test]
    fn test_normalize_sorts_and_tracks_primary() {
        let mut buf = Buffer::from_string("abcdefghij");
        let mut collection = collection_with(
            &mut buf,
            &[Selection::new(1, 8, 1, 8), Selection::new(1, 2, 1, 2), Selection::new(1, 5, 1, 5)],
        );
        collection.normalize(&mut buf, &IdentityConverter);
        assert_eq!(
            collection.selections(),
            vec![Selection::new(1, 2, 1, 2), Selection::new(1, 5, 1, 5), Selection::new(1, 8, 1, 8)]
        );
        assert_eq!(collection.primary_index(), 2);
        assert_eq!(collection.last_added_cursor_index(), 1);
    }

    #[test]
    fn test_normalize_merges_with_later_direction() {
        let mut buf = Buffer::from_string("abcdefghij");
        let mut collection = collection_with(
            &mut buf,
            &[Selection::new(1, 1, 1, 5), Selection::new(1, 8, 1, 3)],
        );
        collection.normalize(&mut buf, &IdentityConverter);
        assert_eq!(collection.selections(), vec![Selection::new(1, 8, 1, 1)]);
        assert_eq!(collection.primary_index(), 0);
        assert_eq!(buf.tracked_range_count(), 1);
    }

    #[test]
    fn test_touching_selections() {
        let mut buf = Buffer::from_string("abcdefghij");
        let mut collection = collection_with(
            &mut buf,
            &[Selection::new(1, 1, 1, 3), Selection::new(1, 3, 1, 5)],
        );
        collection.normalize(&mut buf, &IdentityConverter);
        assert_eq!(collection.len(), 2);

        let mut collection = collection_with(
            &mut buf,
            &[Selection::new(1, 1, 1, 3), Selection::new(1, 3, 1, 3)],
        );
        collection.normalize(&mut buf, &IdentityConverter);
        assert_eq!(collection.selections(), vec![Selection::new(1, 1, 1, 3)]);
    }

    #[test]
    fn test_merge_disabled_keeps_duplicates() {
        let mut buf = Buffer::from_string("abc");
        let mut collection = collection_with(
            &mut buf,
            &[Selection::new(1, 2, 1, 2), Selection::new(1, 2, 1, 2)],
        );
        collection.set_merge_overlapping(false);
        collection.normalize(&mut buf, &IdentityConverter);
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_set_states_caps_cursor_count() {
        let mut buf = Buffer::from_string("x");
        let mut collection = CursorCollection::new(&mut buf, true);
        let states = vec![CursorState::from_model_selection(Selection::new(1, 1, 1, 1)); MAX_CURSOR_COUNT + 5];
        assert!(collection.set_states(&mut buf, &IdentityConverter, &states));
        assert_eq!(collection.len(), MAX_CURSOR_COUNT);
        assert!(!collection.set_states(&mut buf, &IdentityConverter, &states[..3]));
        assert_eq!(buf.tracked_range_count(), 3);
    }

    #[test]
    fn test_markers_recover_selections_after_edit() {
        let mut buf = Buffer::from_string("hello\nworld");
        let collection = collection_with(&mut buf, &[Selection::new(2, 5, 2, 2)]);
        buf.push_edit_operations(
            &[],
            vec![EditOperation::insert(Position::new(1, 1), "> ")],
            &mut |_, _| None,
        )
        .unwrap();
        buf.push_edit_operations(
            &[],
            vec![EditOperation::insert(Position::new(2, 1), "__")],
            &mut |_, _| None,
        )
        .unwrap();
        assert_eq!(collection.read_selection_from_markers(&buf), vec![Selection::new(2, 7, 2, 4)]);
    }

    #[test]
    fn test_kill_secondary_cursors_keeps_primary() {
        let mut buf = Buffer::from_string("abcdef");
        let mut collection = collection_with(
            &mut buf,
            &[Selection::new(1, 5, 1, 5), Selection::new(1, 2, 1, 2)],
        );
        collection.normalize(&mut buf, &IdentityConverter);
        collection.kill_secondary_cursors(&mut buf);
        assert_eq!(collection.selections(), vec![Selection::new(1, 5, 1, 5)]);
        assert_eq!(buf.tracked_range_count(), 1);
        collection.dispose(&mut buf);
        assert_eq!(buf.tracked_range_count(), 0);
    }

    #[test]
    fn test_ensure_valid_state_clamps() {
        let mut buf = Buffer::from_string("abcdef");
        let mut collection = collection_with(&mut buf, &[Selection::new(1, 7, 1, 7)]);
        buf.set_value("ab");
        collection.ensure_valid_state(&mut buf, &IdentityConverter);
        assert_eq!(collection.selections(), vec![Selection::new(1, 3, 1, 3)]);
    }
}
