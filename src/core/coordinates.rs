//! Buffer-space to display-space coordinate conversion.
//!
//! Folding, wrapping and injected text make display positions differ from
//! buffer positions. Hosts supply a converter; [`IdentityConverter`] is used
//! when the two spaces coincide.

use crate::core::position::{Position, Range};
use crate::core::selection::Selection;

/// Maps positions between the buffer and the display
pub trait CoordinatesConverter {
    fn model_to_view_position(&self, position: Position) -> Position;

    fn view_to_model_position(&self, position: Position) -> Position;

    fn model_to_view_range(&self, range: Range) -> Range {
        Range::from_positions(
            self.model_to_view_position(range.start()),
            self.model_to_view_position(range.end()),
        )
    }

    fn model_to_view_selection(&self, selection: Selection) -> Selection {
        Selection::from_positions(
            self.model_to_view_position(selection.anchor),
            self.model_to_view_position(selection.active),
        )
    }

    fn view_to_model_selection(&self, selection: Selection) -> Selection {
        Selection::from_positions(
            self.view_to_model_position(selection.anchor),
            self.view_to_model_position(selection.active),
        )
    }
}

/// Display space equals buffer space
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl CoordinatesConverter for IdentityConverter {
    fn model_to_view_position(&self, position: Position) -> Position {
        position
    }

    fn view_to_model_position(&self, position: Position) -> Position {
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hides the first `n` lines of the buffer
    struct HiddenPrefix(usize);

    impl CoordinatesConverter for HiddenPrefix {
        fn model_to_view_position(&self, position: Position) -> Position {
            Position::new(position.line.saturating_sub(self.0), position.column)
        }

        fn view_to_model_position(&self, position: Position) -> Position {
            Position::new(position.line + self.0, position.column)
        }
    }

    #[test]
    fn test_identity_round_trip() {
        let sel = Selection::new(3, 4, 1, 2);
        assert_eq!(IdentityConverter.model_to_view_selection(sel), sel);
        assert_eq!(IdentityConverter.view_to_model_selection(sel), sel);
    }

    #[test]
    fn test_selection_helpers_keep_direction() {
        let converter = HiddenPrefix(2);
        let sel = Selection::new(5, 4, 3, 1);
        let view = converter.model_to_view_selection(sel);
        assert_eq!(view, Selection::new(3, 4, 1, 1));
        assert_eq!(converter.view_to_model_selection(view), sel);
        assert_eq!(
            converter.model_to_view_range(Range::new(3, 1, 4, 2)),
            Range::new(1, 1, 2, 2)
        );
    }
}
