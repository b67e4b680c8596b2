//! Edit-intent algorithms
//!
//! Turn one user intent (a keystroke, a paste, a cut, an IME update) into one
//! command per cursor. Nothing here mutates the buffer: the result is handed
//! to the command executor by the cursors controller.

use crate::config::{AutoClosingOvertype, AutoClosingStrategy, CursorConfig, MultiCursorPaste};
use crate::core::command::EditCommand;
use crate::core::commands::{
    ReplaceCommand, ReplaceCommandThatPreservesSelection, ReplaceCommandWithOffsetCursorState,
    SurroundSelectionCommand, TypeWithAutoClosingCommand,
};
use crate::core::model::TextModel;
use crate::core::position::{Position, Range};
use crate::core::selection::Selection;
use crate::core::utf8::{char_at, char_slice, leading_whitespace, split_lines};

// =============================================================================
// EDIT OPERATION TYPES
// =============================================================================

/// Kind of the last executed edit, used to place undo stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditOperationType {
    #[default]
    Other,
    DeletingLeft,
    DeletingRight,
    TypingOther,
    TypingFirstSpace,
    TypingConsecutiveSpace,
}

impl EditOperationType {
    pub fn is_typing(self) -> bool {
        matches!(
            self,
            EditOperationType::TypingOther
                | EditOperationType::TypingFirstSpace
                | EditOperationType::TypingConsecutiveSpace
        )
    }

    /// Spaces form their own category so a word and the space after it
    /// undo separately
    fn category(self) -> EditOperationType {
        match self {
            EditOperationType::TypingConsecutiveSpace => EditOperationType::TypingFirstSpace,
            other => other,
        }
    }
}

/// Whether an undo stop belongs between two consecutive edits
pub fn should_push_stack_element_between(previous: EditOperationType, current: EditOperationType) -> bool {
    if previous.is_typing() && !current.is_typing() {
        return true;
    }
    if previous == EditOperationType::TypingFirstSpace {
        // The word after a space joins the space
        return false;
    }
    previous.category() != current.category()
}

/// Kind of typing `text` after an edit of kind `previous`
fn typing_kind(previous: EditOperationType, text: &str) -> EditOperationType {
    if text != " " {
        return EditOperationType::TypingOther;
    }
    match previous {
        EditOperationType::TypingFirstSpace | EditOperationType::TypingConsecutiveSpace => {
            EditOperationType::TypingConsecutiveSpace
        }
        _ => EditOperationType::TypingFirstSpace,
    }
}

// =============================================================================
// RESULT AND CONTEXT
// =============================================================================

/// Commands for one intent plus the undo stops around them
pub struct EditOperationResult {
    pub kind: EditOperationType,
    /// One entry per cursor; `None` leaves that cursor untouched
    pub commands: Vec<Option<Box<dyn EditCommand>>>,
    pub push_stack_element_before: bool,
    pub push_stack_element_after: bool,
}

impl EditOperationResult {
    pub fn new(
        kind: EditOperationType,
        commands: Vec<Option<Box<dyn EditCommand>>>,
        push_stack_element_before: bool,
        push_stack_element_after: bool,
    ) -> Self {
        Self {
            kind,
            commands,
            push_stack_element_before,
            push_stack_element_after,
        }
    }
}

impl std::fmt::Debug for EditOperationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditOperationResult")
            .field("kind", &self.kind)
            .field("commands", &self.commands.len())
            .field("push_stack_element_before", &self.push_stack_element_before)
            .field("push_stack_element_after", &self.push_stack_element_after)
            .finish()
    }
}

/// Everything an intent algorithm may look at
#[derive(Clone, Copy)]
pub struct EditContext<'a> {
    pub config: &'a CursorConfig,
    pub model: &'a dyn TextModel,
    /// Current buffer selections, one per cursor
    pub selections: &'a [Selection],
    /// Ranges of live auto-closed characters
    pub auto_closed_characters: &'a [Range],
    pub prev_edit_operation_type: EditOperationType,
    pub is_doing_composition: bool,
}

impl EditContext<'_> {
    fn char_after(&self, position: Position) -> Option<char> {
        char_at(&self.model.line_content(position.line), position.column - 1)
    }

    fn char_before(&self, position: Position) -> Option<char> {
        if position.column < 2 {
            return None;
        }
        char_at(&self.model.line_content(position.line), position.column - 2)
    }
}

fn boxed<C: EditCommand + 'static>(command: C) -> Option<Box<dyn EditCommand>> {
    Some(Box::new(command))
}

// =============================================================================
// INTENTS
// =============================================================================

/// The edit-intent algorithms the cursors controller drives
pub trait EditIntents {
    /// A single keystroke from the keyboard, with bracket and Enter handling
    fn type_with_interceptors(&self, ctx: &EditContext<'_>, ch: &str) -> Option<EditOperationResult>;

    /// Plain insertion of `text` at every cursor
    fn type_without_interceptors(&self, ctx: &EditContext<'_>, text: &str) -> Option<EditOperationResult>;

    /// An IME update replacing characters around each cursor
    fn composition_type(
        &self,
        ctx: &EditContext<'_>,
        text: &str,
        replace_prev_char_count: usize,
        replace_next_char_count: usize,
        position_delta: isize,
    ) -> Option<EditOperationResult>;

    /// Bracket handling once an IME composition finished
    fn composition_end_with_interceptors(
        &self,
        ctx: &EditContext<'_>,
        selections_when_started: Option<&[Selection]>,
    ) -> Option<EditOperationResult>;

    fn paste(
        &self,
        ctx: &EditContext<'_>,
        text: &str,
        paste_on_new_line: bool,
        multicursor_text: &[String],
    ) -> Option<EditOperationResult>;

    fn cut(&self, ctx: &EditContext<'_>) -> Option<EditOperationResult>;
}

/// Default edit-intent algorithms
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeOperations;

impl TypeOperations {
    fn enter(&self, ctx: &EditContext<'_>) -> EditOperationResult {
        let commands = ctx
            .selections
            .iter()
            .map(|selection| {
                let range = selection.range();
                let indentation = if ctx.config.auto_indent {
                    let line = ctx.model.line_content(range.start().line);
                    leading_whitespace(char_slice(&line, 0, range.start().column - 1)).to_string()
                } else {
                    String::new()
                };
                boxed(ReplaceCommand::new(range, format!("\n{indentation}")).with_auto_whitespace(true))
            })
            .collect();
        EditOperationResult::new(EditOperationType::TypingOther, commands, true, false)
    }

    fn is_auto_closing_overtype(&self, ctx: &EditContext<'_>, ch: &str) -> bool {
        let overtype = ctx.config.auto_closing_overtype;
        if overtype == AutoClosingOvertype::Never || !ctx.config.is_close_character(ch) {
            return false;
        }
        ctx.selections.iter().all(|selection| {
            if !selection.is_empty() {
                return false;
            }
            let position = selection.position();
            let next_matches = ctx
                .char_after(position)
                .is_some_and(|c| ch.chars().eq(std::iter::once(c)));
            if !next_matches {
                return false;
            }
            overtype == AutoClosingOvertype::Always
                || ctx
                    .auto_closed_characters
                    .iter()
                    .any(|r| r.start() == position)
        })
    }

    /// Close character to insert when typing `ch`, if every cursor allows it
    fn auto_close_pair<'c>(&self, ctx: &EditContext<'c>, ch: &str) -> Option<&'c str> {
        let strategy = ctx.config.auto_closing_brackets;
        if strategy == AutoClosingStrategy::Never {
            return None;
        }
        let close = ctx.config.close_for(ch)?;
        let allowed = ctx.selections.iter().all(|selection| {
            if !selection.is_empty() {
                return false;
            }
            let position = selection.position();
            // Quotes typed right after a word are apostrophes, not pairs
            if ch == close && ctx.char_before(position).is_some_and(char::is_alphanumeric) {
                return false;
            }
            match ctx.char_after(position) {
                None => true,
                Some(c) if c.is_whitespace() => true,
                Some(c) => match strategy {
                    AutoClosingStrategy::Always => true,
                    AutoClosingStrategy::LanguageDefined => ctx.config.auto_close_before.contains(c),
                    AutoClosingStrategy::BeforeWhitespace | AutoClosingStrategy::Never => false,
                },
            }
        });
        allowed.then_some(close)
    }

    fn is_surround_selection(&self, ctx: &EditContext<'_>, ch: &str) -> bool {
        ctx.config.auto_surround
            && ctx.config.close_for(ch).is_some()
            && !ctx.selections.is_empty()
            && ctx.selections.iter().all(|s| !s.is_empty())
    }

    /// Lines to hand out one per cursor, when the paste should be spread
    fn distributed_paste_lines(
        &self,
        ctx: &EditContext<'_>,
        text: &str,
        paste_on_new_line: bool,
        multicursor_text: &[String],
    ) -> Option<Vec<String>> {
        let cursor_count = ctx.selections.len();
        if paste_on_new_line || cursor_count == 1 {
            return None;
        }
        if multicursor_text.len() == cursor_count {
            return Some(multicursor_text.to_vec());
        }
        if ctx.config.multi_cursor_paste == MultiCursorPaste::Spread {
            let trimmed = text.strip_suffix('\n').unwrap_or(text);
            let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
            let lines = split_lines(trimmed);
            if lines.len() == cursor_count {
                return Some(lines.into_iter().map(str::to_string).collect());
            }
        }
        None
    }
}

impl EditIntents for TypeOperations {
    fn type_with_interceptors(&self, ctx: &EditContext<'_>, ch: &str) -> Option<EditOperationResult> {
        if !ctx.is_doing_composition {
            if ch == "\n" {
                return Some(self.enter(ctx));
            }
            if self.is_auto_closing_overtype(ctx, ch) {
                let commands = ctx
                    .selections
                    .iter()
                    .map(|selection| {
                        let position = selection.position();
                        boxed(ReplaceCommand::new(
                            Range::from_positions(position, position.delta(0, 1)),
                            ch,
                        ))
                    })
                    .collect();
                return Some(EditOperationResult::new(
                    EditOperationType::TypingOther,
                    commands,
                    should_push_stack_element_between(ctx.prev_edit_operation_type, EditOperationType::TypingOther),
                    false,
                ));
            }
            if let Some(close) = self.auto_close_pair(ctx, ch) {
                let commands = ctx
                    .selections
                    .iter()
                    .map(|selection| boxed(TypeWithAutoClosingCommand::new(selection.range(), ch, true, close)))
                    .collect();
                return Some(EditOperationResult::new(EditOperationType::TypingOther, commands, true, false));
            }
            if self.is_surround_selection(ctx, ch) {
                let close = ctx.config.close_for(ch).unwrap_or(ch);
                let commands = ctx
                    .selections
                    .iter()
                    .map(|selection| boxed(SurroundSelectionCommand::new(selection.range(), ch, close)))
                    .collect();
                return Some(EditOperationResult::new(EditOperationType::Other, commands, true, true));
            }
        }
        self.type_without_interceptors(ctx, ch)
    }

    fn type_without_interceptors(&self, ctx: &EditContext<'_>, text: &str) -> Option<EditOperationResult> {
        let kind = typing_kind(ctx.prev_edit_operation_type, text);
        let commands = ctx
            .selections
            .iter()
            .map(|selection| boxed(ReplaceCommand::new(selection.range(), text)))
            .collect();
        Some(EditOperationResult::new(
            kind,
            commands,
            should_push_stack_element_between(ctx.prev_edit_operation_type, kind),
            false,
        ))
    }

    fn composition_type(
        &self,
        ctx: &EditContext<'_>,
        text: &str,
        replace_prev_char_count: usize,
        replace_next_char_count: usize,
        position_delta: isize,
    ) -> Option<EditOperationResult> {
        let commands = ctx
            .selections
            .iter()
            .map(|selection| {
                if !selection.is_empty() {
                    return None;
                }
                let position = selection.position();
                let start_column = position.column.saturating_sub(replace_prev_char_count).max(1);
                let end_column =
                    (position.column + replace_next_char_count).min(ctx.model.line_max_column(position.line));
                let range = Range::new(position.line, start_column, position.line, end_column);
                if ctx.model.value_in_range(range) == text && position_delta == 0 {
                    return None;
                }
                boxed(ReplaceCommandWithOffsetCursorState::new(range, text, 0, position_delta))
            })
            .collect();
        Some(EditOperationResult::new(
            EditOperationType::TypingOther,
            commands,
            should_push_stack_element_between(ctx.prev_edit_operation_type, EditOperationType::TypingOther),
            false,
        ))
    }

    fn composition_end_with_interceptors(
        &self,
        ctx: &EditContext<'_>,
        selections_when_started: Option<&[Selection]>,
    ) -> Option<EditOperationResult> {
        let started = selections_when_started?;
        if started == ctx.selections || started.len() != ctx.selections.len() {
            return None;
        }

        // The composition must have left the same single char before every cursor
        let mut composed: Option<char> = None;
        for (before, after) in started.iter().zip(ctx.selections) {
            if !after.is_empty() || before.start().line != after.position().line {
                return None;
            }
            if after.position().column <= before.start().column {
                return None;
            }
            let ch = ctx.char_before(after.position())?;
            match composed {
                Some(previous) if previous != ch => return None,
                _ => composed = Some(ch),
            }
        }
        let ch = composed?.to_string();

        if self.is_auto_closing_overtype(ctx, &ch) {
            // The composed close char duplicates an auto-closed one: drop the latter
            let commands = ctx
                .selections
                .iter()
                .map(|selection| {
                    let position = selection.position();
                    boxed(ReplaceCommand::new(
                        Range::from_positions(position, position.delta(0, 1)),
                        "",
                    ))
                })
                .collect();
            return Some(EditOperationResult::new(EditOperationType::TypingOther, commands, true, false));
        }

        let close = self.auto_close_pair(ctx, &ch)?;
        let commands = ctx
            .selections
            .iter()
            .map(|selection| boxed(TypeWithAutoClosingCommand::new(selection.range(), ch.as_str(), false, close)))
            .collect();
        Some(EditOperationResult::new(EditOperationType::TypingOther, commands, true, false))
    }

    fn paste(
        &self,
        ctx: &EditContext<'_>,
        text: &str,
        paste_on_new_line: bool,
        multicursor_text: &[String],
    ) -> Option<EditOperationResult> {
        if let Some(lines) = self.distributed_paste_lines(ctx, text, paste_on_new_line, multicursor_text) {
            let commands = ctx
                .selections
                .iter()
                .zip(lines)
                .map(|(selection, line)| boxed(ReplaceCommand::new(selection.range(), line)))
                .collect();
            return Some(EditOperationResult::new(EditOperationType::Other, commands, true, true));
        }

        let whole_line = paste_on_new_line && text.ends_with('\n') && text.find('\n') == Some(text.len() - 1);
        let commands = ctx
            .selections
            .iter()
            .map(|selection| {
                if whole_line && selection.is_empty() {
                    let line_start = Range::collapsed(Position::new(selection.position().line, 1));
                    boxed(
                        ReplaceCommandThatPreservesSelection::new(line_start, text, *selection)
                            .with_force_move_markers(true),
                    )
                } else {
                    boxed(ReplaceCommand::new(selection.range(), text))
                }
            })
            .collect();
        Some(EditOperationResult::new(EditOperationType::Other, commands, true, true))
    }

    fn cut(&self, ctx: &EditContext<'_>) -> Option<EditOperationResult> {
        let commands = ctx
            .selections
            .iter()
            .map(|selection| {
                if !selection.is_empty() {
                    return boxed(ReplaceCommand::new(selection.range(), ""));
                }
                if !ctx.config.empty_selection_clipboard {
                    return None;
                }
                let line = selection.position().line;
                let model = ctx.model;
                let range = if line < model.line_count() {
                    Range::new(line, 1, line + 1, 1)
                } else if line > 1 {
                    Range::new(line - 1, model.line_max_column(line - 1), line, model.line_max_column(line))
                } else {
                    Range::new(line, 1, line, model.line_max_column(line))
                };
                if range.is_empty() {
                    None
                } else {
                    boxed(ReplaceCommand::new(range, ""))
                }
            })
            .collect();
        Some(EditOperationResult::new(EditOperationType::Other, commands, true, true))
    }
}
