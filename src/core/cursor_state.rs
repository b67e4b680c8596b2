//! Cursor State
//!
//! A cursor lives in two coordinate spaces at once: the buffer (model) space
//! edits are expressed in, and the display (view) space the host renders.

use crate::core::coordinates::CoordinatesConverter;
use crate::core::model::TextModel;
use crate::core::position::Position;
use crate::core::selection::Selection;

/// One cursor's buffer-space and display-space selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorState {
    pub model_selection: Selection,
    pub view_selection: Selection,
}

impl CursorState {
    /// Partial state known only in buffer space
    pub fn from_model_selection(selection: Selection) -> PartialCursorState {
        PartialCursorState {
            model_selection: Some(selection),
            view_selection: None,
        }
    }

    /// Partial state known only in display space
    pub fn from_view_selection(selection: Selection) -> PartialCursorState {
        PartialCursorState {
            model_selection: None,
            view_selection: Some(selection),
        }
    }

    pub fn from_model_selections(selections: &[Selection]) -> Vec<PartialCursorState> {
        selections
            .iter()
            .copied()
            .map(CursorState::from_model_selection)
            .collect()
    }

    /// Caret in buffer space
    pub fn position(&self) -> Position {
        self.model_selection.position()
    }
}

/// A cursor state where either space may be missing; the missing half is
/// derived through the coordinates converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartialCursorState {
    pub model_selection: Option<Selection>,
    pub view_selection: Option<Selection>,
}

impl PartialCursorState {
    /// Complete the state against `model`, clamping out-of-range input
    pub fn resolve(&self, model: &dyn TextModel, converter: &dyn CoordinatesConverter) -> CursorState {
        match (self.model_selection, self.view_selection) {
            (Some(model_selection), Some(view_selection)) => CursorState {
                model_selection: model.validate_selection(model_selection),
                view_selection,
            },
            (Some(model_selection), None) => {
                let model_selection = model.validate_selection(model_selection);
                CursorState {
                    model_selection,
                    view_selection: converter.model_to_view_selection(model_selection),
                }
            }
            (None, Some(view_selection)) => CursorState {
                model_selection: model.validate_selection(converter.view_to_model_selection(view_selection)),
                view_selection,
            },
            (None, None) => CursorState::default(),
        }
    }
}

impl From<Selection> for PartialCursorState {
    fn from(selection: Selection) -> Self {
        CursorState::from_model_selection(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::Buffer;
    use crate::core::coordinates::IdentityConverter;

    #[test]
    fn test_resolve_clamps_model_selection() {
        let buf = Buffer::from_string("abc\nde");
        let state = CursorState::from_model_selection(Selection::new(1, 2, 5, 9))
            .resolve(&buf, &IdentityConverter);
        assert_eq!(state.model_selection, Selection::new(1, 2, 2, 3));
        assert_eq!(state.view_selection, state.model_selection);
    }

    #[test]
    fn test_resolve_from_view() {
        let buf = Buffer::from_string("abc");
        let state = CursorState::from_view_selection(Selection::new(1, 3, 1, 1))
            .resolve(&buf, &IdentityConverter);
        assert_eq!(state.model_selection, Selection::new(1, 3, 1, 1));
        assert_eq!(state.position(), Position::new(1, 1));
    }

    #[test]
    fn test_resolve_empty_defaults_to_origin() {
        let buf = Buffer::new();
        let state = PartialCursorState::default().resolve(&buf, &IdentityConverter);
        assert_eq!(state, CursorState::default());
    }
}
