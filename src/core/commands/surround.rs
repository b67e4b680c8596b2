use crate::core::command::EditCommand;
use crate::core::commands::ensure_in_bounds;
use crate::core::edit_operation::{CursorStateComputerData, EditOperationBuilder};
use crate::core::error::CommandError;
use crate::core::model::TextModel;
use crate::core::position::Range;
use crate::core::selection::Selection;

/// Wrap a selection in an open/close pair; the original text stays selected
#[derive(Debug, Clone)]
pub struct SurroundSelectionCommand {
    range: Range,
    char_before: String,
    char_after: String,
}

impl SurroundSelectionCommand {
    pub fn new(range: Range, char_before: impl Into<String>, char_after: impl Into<String>) -> Self {
        Self {
            range,
            char_before: char_before.into(),
            char_after: char_after.into(),
        }
    }
}

impl EditCommand for SurroundSelectionCommand {
    fn get_edit_operations(
        &mut self,
        model: &dyn TextModel,
        builder: &mut EditOperationBuilder<'_>,
    ) -> Result<(), CommandError> {
        ensure_in_bounds(model, self.range)?;
        builder.add_edit_operation(Range::collapsed(self.range.start()), &self.char_before);
        builder.add_edit_operation(Range::collapsed(self.range.end()), &self.char_after);
        Ok(())
    }

    fn compute_cursor_state(
        &mut self,
        _model: &dyn TextModel,
        helper: &CursorStateComputerData<'_>,
    ) -> Selection {
        match helper.inverse_edit_operations() {
            [open, close, ..] => Selection::from_positions(open.range.end(), close.range.start()),
            _ => Selection::from(self.range),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::Buffer;
    use crate::core::executor::execute_commands;

    #[test]
    fn test_surround_keeps_text_selected() {
        let mut buf = Buffer::from_string("let x = a + b;");
        let before = [Selection::new(1, 9, 1, 14)];
        let mut commands: Vec<Option<Box<dyn EditCommand>>> =
            vec![Some(Box::new(SurroundSelectionCommand::new(before[0].range(), "(", ")")))];
        let result = execute_commands(&mut buf, &before, &mut commands).unwrap();
        assert_eq!(buf.to_string(), "let x = (a + b);");
        assert_eq!(result, Some(vec![Selection::new(1, 10, 1, 15)]));
    }
}
