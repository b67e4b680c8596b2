//! Cursors Controller
//!
//! The stateful front of the engine. Every user intent runs inside one
//! transactional envelope:
//!
//! 1. read-only buffers turn the intent into a silent no-op;
//! 2. the cursor state and buffer version are snapshotted;
//! 3. marker tracking is suspended and the controller is marked as handling,
//!    so the buffer's own change notifications only update the known version;
//! 4. the edit runs; errors are reported, never propagated;
//! 5. tracking resumes, stale auto-closed actions are pruned, and if the state
//!    changed the host is told and asked to reveal the primary cursor.
//!
//! The controller never keeps a reference to the buffer: each call receives
//! the model and an [`EventsCollector`] for its notifications.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::CursorConfig;
use crate::core::auto_closed::{AutoClosedAction, AutoClosedRanges, AutoClosedTracker};
use crate::core::command::EditCommand;
use crate::core::coordinates::{CoordinatesConverter, IdentityConverter};
use crate::core::cursor_collection::{CursorCollection, MAX_CURSOR_COUNT};
use crate::core::cursor_state::{CursorState, PartialCursorState};
use crate::core::edit_operation::EditOperation;
use crate::core::error::{EditError, on_unexpected_error};
use crate::core::events::{
    CursorChangeReason, CursorEvent, CursorStateChangedEvent, EventsCollector, RevealRangeRequest, ScrollType,
    VerticalRevealType,
};
use crate::core::executor::execute_commands;
use crate::core::model::{ContentChangedEvent, CursorStateComputer, TextModel};
use crate::core::position::{Position, Range};
use crate::core::selection::Selection;
use crate::core::type_operations::{
    EditContext, EditIntents, EditOperationResult, EditOperationType, TypeOperations,
};
use crate::core::utf8::{GraphemeIterator, char_len};

/// Source of intents coming from the keyboard; enables typing interceptors
pub const KEYBOARD_SOURCE: &str = "keyboard";

/// Source of edits inserted by a snippet; enables auto-close detection
pub const SNIPPET_SOURCE: &str = "snippet";

/// Close characters a snippet edit may end with
static TRAILING_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([)\]}>'"`])([^)\]}>'"`]*)$"#).expect("trailing close pattern is valid")
});

/// What the controller is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerPhase {
    #[default]
    Idle,
    /// An intent is being applied
    Handling,
    /// An IME composition is open
    Composing,
}

/// Persisted form of one cursor.
///
/// Missing fields are tolerated on restore: the position defaults to (1, 1)
/// and the selection start to the position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedCursorState {
    pub in_selection_mode: bool,
    pub selection_start: Option<Position>,
    pub position: Option<Position>,
}

impl SavedCursorState {
    fn to_selection(&self) -> Selection {
        let position = self.position.unwrap_or_else(|| Position::new(1, 1));
        let selection_start = self.selection_start.unwrap_or(position);
        Selection::from_positions(selection_start, position)
    }
}

/// Snapshot used to decide whether an intent changed anything
#[derive(Debug, Clone, PartialEq, Eq)]
struct CursorModelState {
    model_version_id: u64,
    cursor_states: Vec<CursorState>,
}

pub struct CursorsController {
    config: CursorConfig,
    converter: Box<dyn CoordinatesConverter>,
    intents: Box<dyn EditIntents>,
    cursors: CursorCollection,
    auto_closed: AutoClosedTracker,
    handling: bool,
    composing: bool,
    selections_when_composition_started: Option<Vec<Selection>>,
    prev_edit_operation_type: EditOperationType,
    known_model_version_id: u64,
}

impl CursorsController {
    /// One cursor at (1, 1) over `model`
    pub fn new(model: &mut dyn TextModel, config: CursorConfig) -> Self {
        let cursors = CursorCollection::new(model, config.multi_cursor_merge_overlapping);
        Self {
            config,
            converter: Box::new(IdentityConverter),
            intents: Box::new(TypeOperations),
            cursors,
            auto_closed: AutoClosedTracker::new(),
            handling: false,
            composing: false,
            selections_when_composition_started: None,
            prev_edit_operation_type: EditOperationType::Other,
            known_model_version_id: model.version_id(),
        }
    }

    /// Replace the edit-intent algorithms
    pub fn with_intents(mut self, intents: Box<dyn EditIntents>) -> Self {
        self.intents = intents;
        self
    }

    /// Release every marker owned by the controller
    pub fn dispose(&mut self, model: &mut dyn TextModel) {
        self.cursors.dispose(model);
        self.auto_closed.dispose(model);
    }

    // ==================== Accessors ====================

    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    pub fn phase(&self) -> ControllerPhase {
        if self.handling {
            ControllerPhase::Handling
        } else if self.composing {
            ControllerPhase::Composing
        } else {
            ControllerPhase::Idle
        }
    }

    pub fn cursor_count(&self) -> usize {
        self.cursors.len()
    }

    pub fn cursor_states(&self) -> Vec<CursorState> {
        self.cursors.states()
    }

    pub fn primary_cursor_state(&self) -> CursorState {
        self.cursors.primary_cursor()
    }

    pub fn primary_selection(&self) -> Selection {
        self.cursors.primary_cursor().model_selection
    }

    pub fn primary_index(&self) -> usize {
        self.cursors.primary_index()
    }

    pub fn last_added_cursor_index(&self) -> usize {
        self.cursors.last_added_cursor_index()
    }

    pub fn selections(&self) -> Vec<Selection> {
        self.cursors.selections()
    }

    pub fn view_selections(&self) -> Vec<Selection> {
        self.cursors.view_selections()
    }

    /// Ranges of every live auto-closed character
    pub fn auto_closed_characters(&self, model: &dyn TextModel) -> Vec<Range> {
        self.auto_closed.close_character_ranges(model)
    }

    pub fn prev_edit_operation_type(&self) -> EditOperationType {
        self.prev_edit_operation_type
    }

    pub fn set_prev_edit_operation_type(&mut self, kind: EditOperationType) {
        self.prev_edit_operation_type = kind;
    }

    pub fn known_model_version_id(&self) -> u64 {
        self.known_model_version_id
    }

    pub fn update_configuration(&mut self, config: CursorConfig) {
        self.cursors
            .set_merge_overlapping(config.multi_cursor_merge_overlapping);
        self.config = config;
    }

    pub fn set_coordinates_converter(&mut self, converter: Box<dyn CoordinatesConverter>) {
        self.converter = converter;
        self.cursors.refresh_view_states(&*self.converter);
    }

    // ==================== State ====================

    fn snapshot(&self, model: &dyn TextModel) -> CursorModelState {
        CursorModelState {
            model_version_id: model.version_id(),
            cursor_states: self.cursors.states(),
        }
    }

    fn prune_auto_closed(&mut self, model: &mut dyn TextModel) {
        if self.auto_closed.is_empty() {
            return;
        }
        let selections: Vec<Range> = self.cursors.selections().iter().map(Selection::range).collect();
        self.auto_closed.prune(model, &selections);
    }

    /// Replace every cursor. Returns true when anything observable changed.
    ///
    /// More than [`MAX_CURSOR_COUNT`] states are truncated and the change
    /// event reports the overflow.
    pub fn set_states(
        &mut self,
        model: &mut dyn TextModel,
        events: &mut EventsCollector,
        source: Option<&str>,
        reason: CursorChangeReason,
        states: &[PartialCursorState],
    ) -> bool {
        let old = self.snapshot(&*model);
        let reached_max_cursor_count = self.cursors.set_states(model, &*self.converter, states);
        if reached_max_cursor_count {
            tracing::warn!(requested = states.len(), max = MAX_CURSOR_COUNT, "cursor count capped");
        }
        self.cursors.normalize(model, &*self.converter);
        self.prune_auto_closed(model);
        self.emit_state_changed_if_necessary(&*model, events, source, reason, Some(old), reached_max_cursor_count)
    }

    pub fn set_selections(
        &mut self,
        model: &mut dyn TextModel,
        events: &mut EventsCollector,
        source: Option<&str>,
        selections: &[Selection],
        reason: CursorChangeReason,
    ) -> bool {
        self.set_states(
            model,
            events,
            source,
            reason,
            &CursorState::from_model_selections(selections),
        )
    }

    /// Like [`CursorsController::set_selections`], but keeps each cursor's
    /// identity (and the primary) when the count is unchanged
    fn update_selections(
        &mut self,
        model: &mut dyn TextModel,
        events: &mut EventsCollector,
        source: Option<&str>,
        reason: CursorChangeReason,
        selections: &[Selection],
    ) -> bool {
        let old = self.snapshot(&*model);
        let reached_max_cursor_count = self.cursors.set_selections(model, &*self.converter, selections);
        self.cursors.normalize(model, &*self.converter);
        self.prune_auto_closed(model);
        self.emit_state_changed_if_necessary(&*model, events, source, reason, Some(old), reached_max_cursor_count)
    }

    fn emit_state_changed_if_necessary(
        &self,
        model: &dyn TextModel,
        events: &mut EventsCollector,
        source: Option<&str>,
        reason: CursorChangeReason,
        old: Option<CursorModelState>,
        reached_max_cursor_count: bool,
    ) -> bool {
        let new = self.snapshot(model);
        if old.as_ref() == Some(&new) {
            return false;
        }

        let selections = self.cursors.selections();
        events.emit(CursorEvent::ViewCursorStateChanged {
            view_selections: self.cursors.view_selections(),
            model_selections: selections.clone(),
        });

        let old_selections: Option<Vec<Selection>> = old
            .as_ref()
            .map(|o| o.cursor_states.iter().map(|s| s.model_selection).collect());
        let selections_changed = old_selections.as_ref() != Some(&selections);
        if selections_changed || reached_max_cursor_count {
            events.emit(CursorEvent::CursorStateChanged(CursorStateChangedEvent {
                old_selections,
                selections,
                old_model_version_id: old.as_ref().map_or(0, |o| o.model_version_id),
                model_version_id: new.model_version_id,
                source: source.unwrap_or(KEYBOARD_SOURCE).to_string(),
                reason,
                reached_max_cursor_count,
            }));
        }
        true
    }

    /// Ask the host to scroll the cursors into sight. Several cursors reveal
    /// the span from the first to the last display selection.
    pub fn reveal_primary(
        &self,
        events: &mut EventsCollector,
        source: Option<&str>,
        reveal_horizontal: bool,
        scroll_type: ScrollType,
    ) {
        let view_selections = self.cursors.view_selections();
        let range = if view_selections.len() > 1 {
            view_selections
                .iter()
                .map(Selection::range)
                .reduce(|a, b| a.plus_range(&b))
                .unwrap_or_default()
        } else {
            Range::collapsed(self.cursors.primary_cursor().view_selection.position())
        };
        events.emit(CursorEvent::RevealRange(RevealRangeRequest {
            source: source.unwrap_or(KEYBOARD_SOURCE).to_string(),
            range,
            vertical_type: VerticalRevealType::Simple,
            reveal_horizontal,
            scroll_type,
        }));
    }

    // ==================== Persistence ====================

    pub fn save_state(&self) -> Vec<SavedCursorState> {
        self.cursors
            .selections()
            .iter()
            .map(|selection| SavedCursorState {
                in_selection_mode: !selection.is_empty(),
                selection_start: Some(selection.anchor),
                position: Some(selection.active),
            })
            .collect()
    }

    pub fn restore_state(
        &mut self,
        model: &mut dyn TextModel,
        events: &mut EventsCollector,
        states: &[SavedCursorState],
    ) {
        let selections: Vec<Selection> = states.iter().map(SavedCursorState::to_selection).collect();
        self.set_selections(model, events, Some("restoreState"), &selections, CursorChangeReason::NotSet);
        self.reveal_primary(events, Some("restoreState"), true, ScrollType::Immediate);
    }

    // ==================== Model Notifications ====================

    /// Handle every content change the buffer queued since the last call
    pub fn sync_with_model(&mut self, model: &mut dyn TextModel, events: &mut EventsCollector) {
        for change in model.take_content_changes() {
            self.on_model_content_changed(model, events, &change);
        }
    }

    pub fn on_model_content_changed(
        &mut self,
        model: &mut dyn TextModel,
        events: &mut EventsCollector,
        change: &ContentChangedEvent,
    ) {
        self.known_model_version_id = change.version_id;
        if self.handling {
            return;
        }
        self.prev_edit_operation_type = EditOperationType::Other;

        if change.is_flush {
            tracing::debug!(version = change.version_id, "content flushed, resetting cursors");
            self.cursors.dispose(model);
            self.cursors = CursorCollection::new(model, self.config.multi_cursor_merge_overlapping);
            self.prune_auto_closed(model);
            self.emit_state_changed_if_necessary(
                &*model,
                events,
                Some("model"),
                CursorChangeReason::ContentFlush,
                None,
                false,
            );
            return;
        }

        match change.resulting_selection.as_deref() {
            Some(selections) if !selections.is_empty() => {
                let reason = if change.is_undoing {
                    CursorChangeReason::Undo
                } else if change.is_redoing {
                    CursorChangeReason::Redo
                } else {
                    CursorChangeReason::RecoverFromMarkers
                };
                if self.update_selections(model, events, Some("modelChange"), reason, selections) {
                    self.reveal_primary(events, Some("modelChange"), false, ScrollType::Smooth);
                }
            }
            _ => {
                let selections = self.cursors.read_selection_from_markers(&*model);
                self.update_selections(
                    model,
                    events,
                    Some("modelChange"),
                    CursorChangeReason::RecoverFromMarkers,
                    &selections,
                );
            }
        }
    }

    /// Re-derive display selections after wrapping or folding changed
    pub fn on_line_mapping_changed(&mut self, model: &mut dyn TextModel, events: &mut EventsCollector) {
        if self.known_model_version_id != model.version_id() {
            // Content changes are still pending; they will refresh the view
            return;
        }
        let selections = self.cursors.selections();
        self.update_selections(
            model,
            events,
            Some("viewModel"),
            CursorChangeReason::NotSet,
            &selections,
        );
    }

    // ==================== Transactions ====================

    fn report_unexpected_error(events: &mut EventsCollector, err: &EditError) {
        on_unexpected_error(err);
        events.emit(CursorEvent::UnexpectedError(err.to_string()));
    }

    fn execute_edit<F>(
        &mut self,
        model: &mut dyn TextModel,
        events: &mut EventsCollector,
        source: Option<&str>,
        reason: CursorChangeReason,
        callback: F,
    ) where
        F: FnOnce(&mut Self, &mut dyn TextModel) -> Result<(), EditError>,
    {
        if self.config.read_only {
            return;
        }

        let old = self.snapshot(&*model);
        self.cursors.stop_tracking_selections(model);
        self.handling = true;

        self.cursors.ensure_valid_state(model, &*self.converter);
        if let Err(err) = callback(&mut *self, &mut *model) {
            Self::report_unexpected_error(events, &err);
        }
        for change in model.take_content_changes() {
            self.on_model_content_changed(model, events, &change);
        }

        self.handling = false;
        self.cursors.start_tracking_selections(model);
        self.prune_auto_closed(model);
        if self.emit_state_changed_if_necessary(&*model, events, source, reason, Some(old), false) {
            self.reveal_primary(events, source, true, ScrollType::Smooth);
        }
    }

    /// Run the intent algorithm `f` against the current cursors
    fn compute_intent<F>(&self, model: &dyn TextModel, f: F) -> Option<EditOperationResult>
    where
        F: FnOnce(&dyn EditIntents, &EditContext<'_>) -> Option<EditOperationResult>,
    {
        let selections = self.cursors.selections();
        let auto_closed_characters = self.auto_closed.close_character_ranges(model);
        let ctx = EditContext {
            config: &self.config,
            model,
            selections: &selections,
            auto_closed_characters: &auto_closed_characters,
            prev_edit_operation_type: self.prev_edit_operation_type,
            is_doing_composition: self.composing,
        };
        f(&*self.intents, &ctx)
    }

    fn execute_edit_operation(
        &mut self,
        model: &mut dyn TextModel,
        result: Option<EditOperationResult>,
    ) -> Result<(), EditError> {
        let Some(mut result) = result else {
            return Ok(());
        };

        if result.push_stack_element_before {
            model.push_stack_element();
        }

        let selections_before = self.cursors.selections();
        if let Some(selections) = execute_commands(model, &selections_before, &mut result.commands)? {
            self.cursors.set_selections(model, &*self.converter, &selections);
            self.cursors.normalize(model, &*self.converter);
        }

        let mut auto_closed = AutoClosedRanges::default();
        for command in result.commands.iter().flatten() {
            if let Some(ranges) = command.auto_closed_ranges() {
                auto_closed.enclosing.extend(ranges.enclosing);
                auto_closed.close_characters.extend(ranges.close_characters);
            }
        }
        if !auto_closed.is_empty() {
            self.auto_closed.push(AutoClosedAction::new(model, &auto_closed));
        }

        self.prev_edit_operation_type = result.kind;
        if result.push_stack_element_after {
            model.push_stack_element();
        }
        Ok(())
    }

    // ==================== Intents ====================

    /// Type `text` at every cursor. Keyboard input is fed one grapheme at a
    /// time through the bracket and Enter interceptors.
    pub fn type_text(&mut self, model: &mut dyn TextModel, events: &mut EventsCollector, text: &str, source: &str) {
        self.execute_edit(model, events, Some(source), CursorChangeReason::NotSet, |this, model| {
            if source == KEYBOARD_SOURCE {
                for grapheme in GraphemeIterator::new(text) {
                    let result =
                        this.compute_intent(&*model, |intents, ctx| intents.type_with_interceptors(ctx, grapheme));
                    this.execute_edit_operation(model, result)?;
                }
            } else {
                let result = this.compute_intent(&*model, |intents, ctx| intents.type_without_interceptors(ctx, text));
                this.execute_edit_operation(model, result)?;
            }
            Ok(())
        });
    }

    pub fn start_composition(&mut self) {
        self.composing = true;
        self.selections_when_composition_started = Some(self.cursors.selections());
    }

    pub fn end_composition(&mut self, model: &mut dyn TextModel, events: &mut EventsCollector, source: &str) {
        self.composing = false;
        let started = self.selections_when_composition_started.take();
        self.execute_edit(model, events, Some(source), CursorChangeReason::NotSet, |this, model| {
            if source != KEYBOARD_SOURCE {
                return Ok(());
            }
            let result = this.compute_intent(&*model, |intents, ctx| {
                intents.composition_end_with_interceptors(ctx, started.as_deref())
            });
            this.execute_edit_operation(model, result)
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn composition_type(
        &mut self,
        model: &mut dyn TextModel,
        events: &mut EventsCollector,
        text: &str,
        replace_prev_char_count: usize,
        replace_next_char_count: usize,
        position_delta: isize,
        source: &str,
    ) {
        if text.is_empty() && replace_prev_char_count == 0 && replace_next_char_count == 0 {
            // Only the caret moves
            if position_delta != 0 {
                let selections: Vec<Selection> = self
                    .cursors
                    .selections()
                    .iter()
                    .map(|s| Selection::point(s.position().delta(0, position_delta)))
                    .collect();
                self.set_selections(model, events, Some(source), &selections, CursorChangeReason::NotSet);
            }
            return;
        }
        self.execute_edit(model, events, Some(source), CursorChangeReason::NotSet, |this, model| {
            let result = this.compute_intent(&*model, |intents, ctx| {
                intents.composition_type(
                    ctx,
                    text,
                    replace_prev_char_count,
                    replace_next_char_count,
                    position_delta,
                )
            });
            this.execute_edit_operation(model, result)
        });
    }

    pub fn paste(
        &mut self,
        model: &mut dyn TextModel,
        events: &mut EventsCollector,
        text: &str,
        paste_on_new_line: bool,
        multicursor_text: &[String],
        source: &str,
    ) {
        self.execute_edit(model, events, Some(source), CursorChangeReason::Paste, |this, model| {
            let result = this.compute_intent(&*model, |intents, ctx| {
                intents.paste(ctx, text, paste_on_new_line, multicursor_text)
            });
            this.execute_edit_operation(model, result)
        });
    }

    pub fn cut(&mut self, model: &mut dyn TextModel, events: &mut EventsCollector, source: &str) {
        self.execute_edit(model, events, Some(source), CursorChangeReason::NotSet, |this, model| {
            let result = this.compute_intent(&*model, |intents, ctx| intents.cut(ctx));
            this.execute_edit_operation(model, result)
        });
    }

    /// Run one command against the primary cursor only
    pub fn execute_command(
        &mut self,
        model: &mut dyn TextModel,
        events: &mut EventsCollector,
        command: Box<dyn EditCommand>,
        source: &str,
    ) {
        self.execute_edit(model, events, Some(source), CursorChangeReason::NotSet, |this, model| {
            this.cursors.kill_secondary_cursors(model);
            this.execute_edit_operation(
                model,
                Some(EditOperationResult::new(
                    EditOperationType::Other,
                    vec![Some(command)],
                    false,
                    false,
                )),
            )
        });
    }

    /// Run one command per cursor, in cursor order
    pub fn execute_commands(
        &mut self,
        model: &mut dyn TextModel,
        events: &mut EventsCollector,
        commands: Vec<Option<Box<dyn EditCommand>>>,
        source: &str,
    ) {
        self.execute_edit(model, events, Some(source), CursorChangeReason::NotSet, |this, model| {
            this.execute_edit_operation(
                model,
                Some(EditOperationResult::new(EditOperationType::Other, commands, false, false)),
            )
        });
    }

    /// Push raw edits, then place the cursors where `cursor_state_computer`
    /// says. When it returns `None` the cursors follow their markers.
    ///
    /// Snippet edits ending in a close character whose open character appears
    /// earlier in the same line are remembered as auto-closed.
    pub fn execute_edits(
        &mut self,
        model: &mut dyn TextModel,
        events: &mut EventsCollector,
        source: &str,
        edits: Vec<EditOperation>,
        cursor_state_computer: &mut CursorStateComputer<'_>,
    ) {
        if self.config.read_only {
            return;
        }
        let auto_closing_pairs = if source == SNIPPET_SOURCE {
            self.find_auto_closing_pairs(&edits)
        } else {
            None
        };

        let mut auto_closed = AutoClosedRanges::default();
        let selections_before = self.cursors.selections();
        let result = model.push_edit_operations(&selections_before, edits, &mut |model, undo_edits| {
            if let Some(pairs) = &auto_closing_pairs {
                for (undo_edit, (open_index, close_index)) in undo_edits.iter().zip(pairs) {
                    let line = undo_edit.range.start().line;
                    let base = undo_edit.range.start().column - 1;
                    auto_closed
                        .close_characters
                        .push(Range::new(line, base + close_index + 1, line, base + close_index + 2));
                    auto_closed
                        .enclosing
                        .push(Range::new(line, base + open_index + 1, line, base + close_index + 2));
                }
            }
            cursor_state_computer(model, undo_edits)
        });

        match result {
            Ok(Some(selections)) => {
                // The computer already knows where the cursors belong
                for change in model.take_content_changes() {
                    self.known_model_version_id = change.version_id;
                }
                self.set_selections(model, events, Some(source), &selections, CursorChangeReason::NotSet);
            }
            Ok(None) => self.sync_with_model(model, events),
            Err(err) => Self::report_unexpected_error(events, &err),
        }

        if !auto_closed.is_empty() {
            self.auto_closed.push(AutoClosedAction::new(model, &auto_closed));
        }
    }

    /// For every edit, the char indices of an auto-closable open/close pair
    /// at the end of its text. `None` unless every edit has one.
    fn find_auto_closing_pairs(&self, edits: &[EditOperation]) -> Option<Vec<(usize, usize)>> {
        let mut pairs = Vec::with_capacity(edits.len());
        for edit in edits {
            let text = edit.text.as_deref()?;
            if text.is_empty() || text.contains('\n') {
                return None;
            }
            let captures = TRAILING_CLOSE.captures(text)?;
            let close = captures.get(1)?.as_str();
            let tail = captures.get(2)?.as_str();

            let mut candidates = self.config.auto_closing_pairs.iter().filter(|p| p.close == close);
            let (Some(pair), None) = (candidates.next(), candidates.next()) else {
                return None;
            };
            let open = pair.open.chars().next()?;

            let close_index = char_len(text) - char_len(tail) - 1;
            let open_index = text
                .chars()
                .take(close_index)
                .collect::<Vec<_>>()
                .iter()
                .rposition(|c| *c == open)?;
            pairs.push((open_index, close_index));
        }
        Some(pairs)
    }
}
