use crate::core::auto_closed::AutoClosedRanges;
use crate::core::command::EditCommand;
use crate::core::commands::ensure_in_bounds;
use crate::core::edit_operation::{CursorStateComputerData, EditOperationBuilder};
use crate::core::error::CommandError;
use crate::core::model::TextModel;
use crate::core::position::{Position, Range};
use crate::core::selection::Selection;
use crate::core::utf8::char_len;

/// Type an opening character together with its closing counterpart.
///
/// The cursor lands between the two. After the batch the command knows where
/// the close character and the enclosing pair ended up, so the controller can
/// remember them for overtyping.
#[derive(Debug, Clone)]
pub struct TypeWithAutoClosingCommand {
    range: Range,
    open_character: String,
    close_character: String,
    insert_open_character: bool,
    enclosing_range: Option<Range>,
    close_character_range: Option<Range>,
}

impl TypeWithAutoClosingCommand {
    /// `insert_open_character` is false when the open character is already in
    /// the buffer (e.g. it was just composed) and only the close is missing
    pub fn new(
        range: Range,
        open_character: impl Into<String>,
        insert_open_character: bool,
        close_character: impl Into<String>,
    ) -> Self {
        Self {
            range,
            open_character: open_character.into(),
            close_character: close_character.into(),
            insert_open_character,
            enclosing_range: None,
            close_character_range: None,
        }
    }

    fn inserted_text(&self) -> String {
        if self.insert_open_character {
            format!("{}{}", self.open_character, self.close_character)
        } else {
            self.close_character.clone()
        }
    }
}

impl EditCommand for TypeWithAutoClosingCommand {
    fn get_edit_operations(
        &mut self,
        model: &dyn TextModel,
        builder: &mut EditOperationBuilder<'_>,
    ) -> Result<(), CommandError> {
        ensure_in_bounds(model, self.range)?;
        builder.add_edit_operation(self.range, &self.inserted_text());
        Ok(())
    }

    fn compute_cursor_state(
        &mut self,
        model: &dyn TextModel,
        helper: &CursorStateComputerData<'_>,
    ) -> Selection {
        let Some(inserted) = helper.inverse_edit_operations().first().map(|e| e.range) else {
            return Selection::from(self.range);
        };
        let end = inserted.end();
        let close_len = char_len(&self.close_character);
        let open_len = char_len(&self.open_character);

        let close_start = Position::new(end.line, end.column.saturating_sub(close_len));
        self.close_character_range = Some(Range::from_positions(close_start, end));
        self.enclosing_range = Some(Range::from_positions(
            Position::new(end.line, end.column.saturating_sub(open_len + close_len)),
            end,
        ));
        Selection::point(model.validate_position(close_start))
    }

    fn auto_closed_ranges(&self) -> Option<AutoClosedRanges> {
        Some(AutoClosedRanges {
            enclosing: vec![self.enclosing_range?],
            close_characters: vec![self.close_character_range?],
        })
    }
}
