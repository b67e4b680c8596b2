//! Multi-cursor Engine Tests
//!
//! End-to-end behaviour of the cursors controller driving a real buffer:
//! normalization, conflict resolution, undo grouping, auto-closing and
//! persistence of cursor state.

use erax_multicursor::config::{Config, CursorConfig};
use erax_multicursor::core::buffer::Buffer;
use erax_multicursor::core::command::EditCommand;
use erax_multicursor::core::commands::ReplaceCommand;
use erax_multicursor::core::controller::{CursorsController, KEYBOARD_SOURCE, SavedCursorState};
use erax_multicursor::core::cursor_collection::MAX_CURSOR_COUNT;
use erax_multicursor::core::edit_operation::{CursorStateComputerData, EditOperation, EditOperationBuilder};
use erax_multicursor::core::error::CommandError;
use erax_multicursor::core::events::{CursorChangeReason, CursorEvent, EventsCollector};
use erax_multicursor::core::model::TextModel;
use erax_multicursor::core::position::{Position, Range};
use erax_multicursor::core::selection::Selection;

fn setup(content: &str, selections: &[Selection]) -> (Buffer, CursorsController) {
    let mut buffer = Buffer::from_string(content);
    let mut controller = CursorsController::new(&mut buffer, CursorConfig::default());
    let mut events = EventsCollector::new();
    controller.set_selections(
        &mut buffer,
        &mut events,
        Some("test"),
        selections,
        CursorChangeReason::Explicit,
    );
    (buffer, controller)
}

fn last_reason(events: &EventsCollector) -> Option<CursorChangeReason> {
    events.cursor_state_changes().last().map(|c| c.reason)
}

/// Emits two operations that overlap each other
struct SelfOverlapping;

impl EditCommand for SelfOverlapping {
    fn get_edit_operations(
        &mut self,
        _model: &dyn TextModel,
        builder: &mut EditOperationBuilder<'_>,
    ) -> Result<(), CommandError> {
        builder.add_edit_operation(Range::new(1, 1, 1, 3), "x");
        builder.add_edit_operation(Range::new(1, 2, 1, 4), "y");
        Ok(())
    }

    fn compute_cursor_state(&mut self, _model: &dyn TextModel, _helper: &CursorStateComputerData<'_>) -> Selection {
        Selection::default()
    }
}

struct Failing;

impl EditCommand for Failing {
    fn get_edit_operations(
        &mut self,
        _model: &dyn TextModel,
        _builder: &mut EditOperationBuilder<'_>,
    ) -> Result<(), CommandError> {
        Err(CommandError::Failed("refusing to edit".to_string()))
    }

    fn compute_cursor_state(&mut self, _model: &dyn TextModel, _helper: &CursorStateComputerData<'_>) -> Selection {
        Selection::default()
    }
}

// =============================================================================
// NORMALIZATION
// =============================================================================

#[test]
fn normalize_sorts_merges_and_is_idempotent() {
    let (mut buffer, mut controller) = setup(
        "0123456789\nabcdefghij",
        &[
            Selection::new(2, 3, 2, 3),
            Selection::new(1, 2, 1, 6),
            Selection::new(1, 4, 1, 8),
            Selection::new(1, 9, 1, 9),
        ],
    );
    let selections = controller.selections();
    assert_eq!(
        selections,
        vec![
            Selection::new(1, 2, 1, 8),
            Selection::new(1, 9, 1, 9),
            Selection::new(2, 3, 2, 3),
        ]
    );
    assert!(selections.windows(2).all(|w| w[0].start() <= w[1].start()));

    // Feeding the normalized state back changes nothing
    let mut events = EventsCollector::new();
    let changed = controller.set_selections(
        &mut buffer,
        &mut events,
        Some("test"),
        &selections,
        CursorChangeReason::Explicit,
    );
    assert!(!changed);
    assert_eq!(controller.selections(), selections);
}

#[test]
fn equal_selections_merge_into_one_cursor() {
    let (_buffer, controller) = setup(
        "abc",
        &[Selection::new(1, 2, 1, 2), Selection::new(1, 2, 1, 2)],
    );
    assert_eq!(controller.cursor_count(), 1);
}

#[test]
fn cursor_count_is_capped() {
    let content = "\n".repeat(MAX_CURSOR_COUNT + 4);
    let mut buffer = Buffer::from_string(&content);
    let mut controller = CursorsController::new(&mut buffer, CursorConfig::default());
    let selections: Vec<Selection> = (1..=MAX_CURSOR_COUNT + 5).map(|line| Selection::new(line, 1, line, 1)).collect();

    let mut events = EventsCollector::new();
    controller.set_selections(&mut buffer, &mut events, Some("test"), &selections, CursorChangeReason::Explicit);
    assert_eq!(controller.cursor_count(), MAX_CURSOR_COUNT);
    let change = events.cursor_state_changes().last().unwrap();
    assert!(change.reached_max_cursor_count);
    assert_eq!(change.selections.len(), MAX_CURSOR_COUNT);
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

#[test]
fn disjoint_edits_are_all_applied() {
    let (mut buffer, mut controller) = setup(
        "one\ntwo\nthree",
        &[
            Selection::new(1, 4, 1, 4),
            Selection::new(2, 4, 2, 4),
            Selection::new(3, 6, 3, 6),
        ],
    );
    let mut events = EventsCollector::new();
    controller.type_text(&mut buffer, &mut events, ";", KEYBOARD_SOURCE);
    assert_eq!(buffer.to_string(), "one;\ntwo;\nthree;");
    assert_eq!(
        controller.selections(),
        vec![
            Selection::new(1, 5, 1, 5),
            Selection::new(2, 5, 2, 5),
            Selection::new(3, 7, 3, 7),
        ]
    );
}

#[test]
fn conflicting_later_cursor_loses() {
    let (mut buffer, mut controller) = setup("abcdefgh", &[Selection::new(1, 1, 1, 1), Selection::new(1, 6, 1, 6)]);
    let commands: Vec<Option<Box<dyn EditCommand>>> = vec![
        Some(Box::new(ReplaceCommand::new(Range::new(1, 1, 1, 5), "X"))),
        Some(Box::new(ReplaceCommand::new(Range::new(1, 3, 1, 7), "Y"))),
    ];
    let mut events = EventsCollector::new();
    controller.execute_commands(&mut buffer, &mut events, commands, "test");
    assert_eq!(buffer.to_string(), "Xefgh");
    assert_eq!(controller.selections(), vec![Selection::new(1, 2, 1, 2)]);
}

#[test]
fn first_cursor_losing_aborts_everything() {
    let (mut buffer, mut controller) = setup("abcdef", &[Selection::new(1, 1, 1, 1), Selection::new(1, 6, 1, 6)]);
    let commands: Vec<Option<Box<dyn EditCommand>>> = vec![
        Some(Box::new(SelfOverlapping)),
        Some(Box::new(ReplaceCommand::new(Range::new(1, 6, 1, 6), "!"))),
    ];
    let mut events = EventsCollector::new();
    controller.execute_commands(&mut buffer, &mut events, commands, "test");
    assert_eq!(buffer.to_string(), "abcdef");
    assert_eq!(buffer.version_id(), 1);
    assert!(events.is_empty());
}

#[test]
fn failing_command_does_not_block_others() {
    let (mut buffer, mut controller) = setup("ab\ncd", &[Selection::new(1, 3, 1, 3), Selection::new(2, 3, 2, 3)]);
    let commands: Vec<Option<Box<dyn EditCommand>>> = vec![
        Some(Box::new(ReplaceCommand::new(Range::new(1, 3, 1, 3), "!"))),
        Some(Box::new(Failing)),
    ];
    let mut events = EventsCollector::new();
    controller.execute_commands(&mut buffer, &mut events, commands, "test");
    assert_eq!(buffer.to_string(), "ab!\ncd");
    assert_eq!(
        controller.selections(),
        vec![Selection::new(1, 4, 1, 4), Selection::new(2, 3, 2, 3)]
    );
}

#[test]
fn read_only_buffer_ignores_intents() {
    let mut config = Config::with_defaults();
    config.set("read_only", true);
    let mut buffer = Buffer::from_string("abc");
    let mut controller = CursorsController::new(&mut buffer, CursorConfig::from_config(&config));
    let mut events = EventsCollector::new();

    controller.type_text(&mut buffer, &mut events, "x", KEYBOARD_SOURCE);
    controller.paste(&mut buffer, &mut events, "y", false, &[], KEYBOARD_SOURCE);
    controller.cut(&mut buffer, &mut events, KEYBOARD_SOURCE);
    controller.execute_edits(
        &mut buffer,
        &mut events,
        "api",
        vec![EditOperation::insert(Position::new(1, 1), "z")],
        &mut |_, _| None,
    );

    assert_eq!(buffer.to_string(), "abc");
    assert!(events.is_empty());
}

// =============================================================================
// UNDO / REDO
// =============================================================================

#[test]
fn multi_cursor_batch_undoes_in_one_step() {
    let (mut buffer, mut controller) = setup("a\nb", &[Selection::new(1, 2, 1, 2), Selection::new(2, 2, 2, 2)]);
    let mut events = EventsCollector::new();
    controller.type_text(&mut buffer, &mut events, "xyz", KEYBOARD_SOURCE);
    assert_eq!(buffer.to_string(), "axyz\nbxyz");

    let mut events = EventsCollector::new();
    assert!(buffer.undo());
    controller.sync_with_model(&mut buffer, &mut events);
    assert_eq!(buffer.to_string(), "a\nb");
    assert_eq!(
        controller.selections(),
        vec![Selection::new(1, 2, 1, 2), Selection::new(2, 2, 2, 2)]
    );
    assert_eq!(last_reason(&events), Some(CursorChangeReason::Undo));

    let mut events = EventsCollector::new();
    assert!(buffer.redo());
    controller.sync_with_model(&mut buffer, &mut events);
    assert_eq!(buffer.to_string(), "axyz\nbxyz");
    assert_eq!(
        controller.selections(),
        vec![Selection::new(1, 5, 1, 5), Selection::new(2, 5, 2, 5)]
    );
    assert_eq!(last_reason(&events), Some(CursorChangeReason::Redo));
}

#[test]
fn space_after_word_starts_new_undo_step() {
    let (mut buffer, mut controller) = setup("", &[Selection::new(1, 1, 1, 1)]);
    let mut events = EventsCollector::new();
    controller.type_text(&mut buffer, &mut events, "ab cd", KEYBOARD_SOURCE);
    assert_eq!(buffer.to_string(), "ab cd");

    assert!(buffer.undo());
    controller.sync_with_model(&mut buffer, &mut events);
    assert_eq!(buffer.to_string(), "ab");
    assert!(buffer.undo());
    controller.sync_with_model(&mut buffer, &mut events);
    assert_eq!(buffer.to_string(), "");
    assert!(!buffer.can_undo());
}

// =============================================================================
// MODEL NOTIFICATIONS
// =============================================================================

#[test]
fn flush_resets_to_single_cursor() {
    let (mut buffer, mut controller) = setup("abc\ndef", &[Selection::new(1, 2, 1, 2), Selection::new(2, 3, 2, 3)]);
    buffer.set_value("fresh content");
    let mut events = EventsCollector::new();
    controller.sync_with_model(&mut buffer, &mut events);

    assert_eq!(controller.selections(), vec![Selection::new(1, 1, 1, 1)]);
    let change = events.cursor_state_changes().last().unwrap();
    assert_eq!(change.reason, CursorChangeReason::ContentFlush);
    assert_eq!(change.old_selections, None);
    assert_eq!(change.old_model_version_id, 0);
}

#[test]
fn outside_edit_recovers_cursors_from_markers() {
    let (mut buffer, mut controller) = setup("hello", &[Selection::new(1, 6, 1, 6)]);
    buffer
        .push_edit_operations(
            &[],
            vec![EditOperation::insert(Position::new(1, 1), ">> ")],
            &mut |_, _| None,
        )
        .unwrap();
    let mut events = EventsCollector::new();
    controller.sync_with_model(&mut buffer, &mut events);
    assert_eq!(controller.selections(), vec![Selection::new(1, 9, 1, 9)]);
    assert_eq!(last_reason(&events), Some(CursorChangeReason::RecoverFromMarkers));
    assert_eq!(controller.known_model_version_id(), buffer.version_id());
}

// =============================================================================
// AUTO-CLOSING
// =============================================================================

#[test]
fn typing_open_bracket_auto_closes_and_close_overtypes() {
    let (mut buffer, mut controller) = setup("", &[Selection::new(1, 1, 1, 1)]);
    let mut events = EventsCollector::new();

    controller.type_text(&mut buffer, &mut events, "(", KEYBOARD_SOURCE);
    assert_eq!(buffer.to_string(), "()");
    assert_eq!(controller.selections(), vec![Selection::new(1, 2, 1, 2)]);
    assert_eq!(controller.auto_closed_characters(&buffer), vec![Range::new(1, 2, 1, 3)]);

    controller.type_text(&mut buffer, &mut events, "x)", KEYBOARD_SOURCE);
    assert_eq!(buffer.to_string(), "(x)");
    assert_eq!(controller.selections(), vec![Selection::new(1, 4, 1, 4)]);
    assert!(controller.auto_closed_characters(&buffer).is_empty());
}

#[test]
fn leaving_the_pair_forgets_the_auto_closed_character() {
    let (mut buffer, mut controller) = setup("", &[Selection::new(1, 1, 1, 1)]);
    let mut events = EventsCollector::new();
    controller.type_text(&mut buffer, &mut events, "[", KEYBOARD_SOURCE);
    assert_eq!(buffer.to_string(), "[]");

    controller.set_selections(
        &mut buffer,
        &mut events,
        Some("test"),
        &[Selection::new(1, 1, 1, 1)],
        CursorChangeReason::Explicit,
    );
    assert!(controller.auto_closed_characters(&buffer).is_empty());

    controller.set_selections(
        &mut buffer,
        &mut events,
        Some("test"),
        &[Selection::new(1, 2, 1, 2)],
        CursorChangeReason::Explicit,
    );
    controller.type_text(&mut buffer, &mut events, "]", KEYBOARD_SOURCE);
    assert_eq!(buffer.to_string(), "[]]");
}

#[test]
fn non_keyboard_source_skips_interceptors() {
    let (mut buffer, mut controller) = setup("", &[Selection::new(1, 1, 1, 1)]);
    let mut events = EventsCollector::new();
    controller.type_text(&mut buffer, &mut events, "(", "api");
    assert_eq!(buffer.to_string(), "(");
}

// =============================================================================
// CLIPBOARD
// =============================================================================

#[test]
fn paste_spreads_lines_across_cursors() {
    let (mut buffer, mut controller) = setup(
        "a\nb\nc",
        &[
            Selection::new(1, 2, 1, 2),
            Selection::new(2, 2, 2, 2),
            Selection::new(3, 2, 3, 2),
        ],
    );
    let mut events = EventsCollector::new();
    controller.paste(&mut buffer, &mut events, "1\n2\n3", false, &[], KEYBOARD_SOURCE);
    assert_eq!(buffer.to_string(), "a1\nb2\nc3");
    assert_eq!(last_reason(&events), Some(CursorChangeReason::Paste));

    let texts = vec!["x".to_string(), "y".to_string(), "z".to_string()];
    controller.paste(&mut buffer, &mut events, "ignored", false, &texts, KEYBOARD_SOURCE);
    assert_eq!(buffer.to_string(), "a1x\nb2y\nc3z");
}

#[test]
fn cut_with_empty_selection_removes_line() {
    let (mut buffer, mut controller) = setup("keep\ndrop\nkeep", &[Selection::new(2, 3, 2, 3)]);
    let mut events = EventsCollector::new();
    controller.cut(&mut buffer, &mut events, KEYBOARD_SOURCE);
    assert_eq!(buffer.to_string(), "keep\nkeep");
    assert_eq!(controller.selections(), vec![Selection::new(2, 1, 2, 1)]);
}

// =============================================================================
// PERSISTENCE
// =============================================================================

#[test]
fn saved_state_round_trips_through_json() {
    let (mut buffer, mut controller) = setup(
        "first line\nsecond line",
        &[Selection::new(1, 7, 1, 2), Selection::new(2, 3, 2, 3)],
    );
    let saved = controller.save_state();
    let json = serde_json::to_string(&saved).unwrap();

    let mut events = EventsCollector::new();
    controller.set_selections(
        &mut buffer,
        &mut events,
        Some("test"),
        &[Selection::new(1, 1, 1, 1)],
        CursorChangeReason::Explicit,
    );

    let restored: Vec<SavedCursorState> = serde_json::from_str(&json).unwrap();
    let mut events = EventsCollector::new();
    controller.restore_state(&mut buffer, &mut events, &restored);
    assert_eq!(
        controller.selections(),
        vec![Selection::new(1, 7, 1, 2), Selection::new(2, 3, 2, 3)]
    );
    assert!(
        events
            .events()
            .iter()
            .any(|e| matches!(e, CursorEvent::RevealRange(r) if r.source == "restoreState"))
    );
}

#[test]
fn restore_tolerates_missing_fields() {
    let (mut buffer, mut controller) = setup("abc\ndef", &[Selection::new(2, 2, 2, 2)]);
    let restored: Vec<SavedCursorState> =
        serde_json::from_str(r#"[{"position": {"line": 2, "column": 3}}, {}]"#).unwrap();
    let mut events = EventsCollector::new();
    controller.restore_state(&mut buffer, &mut events, &restored);
    assert_eq!(
        controller.selections(),
        vec![Selection::new(1, 1, 1, 1), Selection::new(2, 3, 2, 3)]
    );
}
