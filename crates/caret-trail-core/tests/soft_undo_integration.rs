// Integration tests for soft undo/redo on a live editing surface.
//
// Every restore goes through `EditorSurface::write_snapshot`, which emits a
// real `SelectionChanged` back into the controller, so these tests cover the
// re-entrant notification path as well as the history semantics.

use std::rc::Rc;

use caret_trail_core::{
    ControllerState, EditorSurface, HistoryConfig, ObservableSurface, Position, SelectionRange,
    SoftUndo, SoftUndoCommand, StateSnapshot,
};

fn pos(line: usize, col: usize) -> Position {
    Position::new(line, col)
}

fn caret(line: usize, col: usize) -> StateSnapshot {
    StateSnapshot::single(SelectionRange::caret(pos(line, col)))
}

const TEXT: &str = "line zero\nline one\nline two\nline three\nline four\n";

/// Surface with a document open and the caret at `(1, 1)`.
fn setup() -> (Rc<EditorSurface>, SoftUndo<EditorSurface>) {
    let surface = Rc::new(EditorSurface::new());
    surface.open_document("notes.txt", TEXT);
    let soft_undo = SoftUndo::attach(&surface, &HistoryConfig::default(), true);
    surface.move_caret(pos(1, 1)).unwrap();
    soft_undo.controller().on_content_changed();
    (surface, soft_undo)
}

fn current(surface: &EditorSurface) -> StateSnapshot {
    StateSnapshot::new(surface.selections())
}

// ── Scenarios ─────────────────────────────────────────────────────────

#[test]
fn test_undo_restores_previous_caret_and_redo_returns() {
    let (surface, soft_undo) = setup();
    surface.move_caret(pos(2, 1)).unwrap();

    soft_undo.perform_undo();
    assert_eq!(current(&surface), caret(1, 1));
    assert_eq!(surface.last_reveal(), Some(SelectionRange::caret(pos(1, 1))));

    soft_undo.perform_redo();
    assert_eq!(current(&surface), caret(2, 1));
    assert_eq!(soft_undo.controller().state(), ControllerState::Idle);
}

#[test]
fn test_moving_after_undo_discards_redo_branch() {
    let (surface, soft_undo) = setup();
    surface.move_caret(pos(2, 1)).unwrap();
    soft_undo.perform_undo();

    surface.move_caret(pos(3, 1)).unwrap();
    soft_undo.perform_redo();
    assert_eq!(current(&surface), caret(3, 1));

    soft_undo.perform_undo();
    assert_eq!(current(&surface), caret(1, 1));
    soft_undo.perform_undo();
    assert_eq!(current(&surface), caret(1, 1));
}

#[test]
fn test_restores_are_not_recorded() {
    let (surface, soft_undo) = setup();
    for line in 2..5 {
        surface.move_caret(pos(line, 0)).unwrap();
    }
    let len = soft_undo.controller().history_len();
    assert_eq!(len, 4);

    // Walk all the way back and forward again
    for _ in 0..3 {
        soft_undo.perform_undo();
    }
    assert_eq!(current(&surface), caret(1, 1));
    for _ in 0..3 {
        soft_undo.perform_redo();
    }
    assert_eq!(current(&surface), caret(4, 0));
    assert_eq!(soft_undo.controller().history_len(), len);
    assert!(!soft_undo.controller().can_redo());
}

#[test]
fn test_sixty_moves_allow_forty_nine_undos() {
    let surface = Rc::new(EditorSurface::new());
    let text: String = (0..80).map(|i| format!("row {i}\n")).collect();
    surface.open_document("rows.txt", &text);
    let soft_undo = SoftUndo::attach(&surface, &HistoryConfig::default(), true);

    for line in 1..=60 {
        surface.move_caret(pos(line, 0)).unwrap();
    }
    assert_eq!(soft_undo.controller().history_len(), 50);

    let mut undone = 0;
    while soft_undo.controller().can_undo() {
        soft_undo.perform_undo();
        undone += 1;
    }
    assert_eq!(undone, 49);
    assert_eq!(current(&surface), caret(11, 0));
}

#[test]
fn test_typing_invalidates_history() {
    let (surface, soft_undo) = setup();
    surface.move_caret(pos(2, 0)).unwrap();
    surface.move_caret(pos(3, 0)).unwrap();
    soft_undo.perform_undo();

    surface.insert_text("x").unwrap();
    let after_edit = current(&surface);
    assert_eq!(after_edit, caret(2, 1));

    soft_undo.perform_undo();
    soft_undo.perform_redo();
    assert_eq!(current(&surface), after_edit);
    assert!(!soft_undo.controller().can_undo());
    assert!(!soft_undo.controller().can_redo());
    assert_eq!(soft_undo.controller().history_len(), 1);
}

#[test]
fn test_opening_another_document_resets_history() {
    let (surface, soft_undo) = setup();
    surface.move_caret(pos(4, 2)).unwrap();

    surface.open_document("other.txt", "fresh");
    assert_eq!(soft_undo.controller().history_len(), 1);
    soft_undo.perform_undo();
    assert_eq!(current(&surface), caret(0, 0));
}

#[test]
fn test_closed_surface_has_nothing_to_restore() {
    let (surface, soft_undo) = setup();
    surface.move_caret(pos(2, 0)).unwrap();
    surface.close_document();

    soft_undo.perform_undo();
    soft_undo.perform_redo();
    assert!(surface.selections().is_empty());
    assert_eq!(
        soft_undo.controller().history_entries(),
        vec![StateSnapshot::empty()]
    );
}

#[test]
fn test_multi_cursor_state_round_trips() {
    let (surface, soft_undo) = setup();
    let multi = vec![
        SelectionRange::new(pos(0, 0), pos(0, 4)),
        SelectionRange::caret(pos(2, 5)),
        SelectionRange::new(pos(4, 9), pos(3, 1)),
    ];
    surface.set_selections(multi.clone()).unwrap();
    surface.move_caret(pos(0, 0)).unwrap();

    soft_undo.perform_undo();
    assert_eq!(surface.selections(), multi);
    assert_eq!(surface.last_reveal(), Some(multi[0]));
}

#[test]
fn test_repeated_identical_moves_are_one_entry() {
    let (surface, soft_undo) = setup();
    surface.move_caret(pos(2, 2)).unwrap();
    surface.move_caret(pos(2, 2)).unwrap();
    surface.move_caret(pos(2, 2)).unwrap();
    assert_eq!(soft_undo.controller().history_len(), 2);
}

#[test]
fn test_identical_moves_recorded_when_duplicates_kept() {
    let surface = Rc::new(EditorSurface::new());
    surface.open_document("a.txt", TEXT);
    let config = HistoryConfig {
        skip_duplicates: false,
        ..HistoryConfig::default()
    };
    let soft_undo = SoftUndo::attach(&surface, &config, true);
    surface.move_caret(pos(2, 2)).unwrap();
    surface.move_caret(pos(2, 2)).unwrap();
    assert_eq!(soft_undo.controller().history_len(), 3);

    soft_undo.perform_undo();
    assert_eq!(current(&surface), caret(2, 2));
    assert_eq!(soft_undo.controller().history_len(), 3);
}

#[test]
fn test_reveal_disabled() {
    let surface = Rc::new(EditorSurface::new());
    surface.open_document("a.txt", TEXT);
    let soft_undo = SoftUndo::attach(&surface, &HistoryConfig::default(), false);
    surface.move_caret(pos(3, 0)).unwrap();
    soft_undo.perform_undo();
    assert_eq!(current(&surface), caret(0, 0));
    assert_eq!(surface.last_reveal(), None);
}

#[test]
fn test_execute_dispatches_commands() {
    let (surface, soft_undo) = setup();
    surface.move_caret(pos(3, 3)).unwrap();

    soft_undo.execute("caretTrail.undo".parse::<SoftUndoCommand>().unwrap());
    assert_eq!(current(&surface), caret(1, 1));
    soft_undo.execute(SoftUndoCommand::Redo);
    assert_eq!(current(&surface), caret(3, 3));
}

// ── Registration lifecycle ────────────────────────────────────────────

#[test]
fn test_dropping_soft_undo_unsubscribes() {
    let surface = Rc::new(EditorSurface::new());
    surface.open_document("a.txt", TEXT);
    let soft_undo = SoftUndo::attach(&surface, &HistoryConfig::default(), true);
    assert_eq!(surface.events().listener_count(), 1);

    drop(soft_undo);
    assert_eq!(surface.events().listener_count(), 0);
    surface.move_caret(pos(1, 0)).unwrap();
}

#[test]
fn test_two_surfaces_keep_separate_histories() {
    let left = Rc::new(EditorSurface::new());
    let right = Rc::new(EditorSurface::new());
    left.open_document("left.txt", TEXT);
    right.open_document("right.txt", TEXT);
    let left_undo = SoftUndo::attach(&left, &HistoryConfig::default(), true);
    let right_undo = SoftUndo::attach(&right, &HistoryConfig::default(), true);

    left.move_caret(pos(1, 0)).unwrap();
    left.move_caret(pos(2, 0)).unwrap();
    right.move_caret(pos(4, 0)).unwrap();

    assert_eq!(left_undo.controller().history_len(), 3);
    assert_eq!(right_undo.controller().history_len(), 2);

    right_undo.perform_undo();
    assert_eq!(current(&right), caret(0, 0));
    assert_eq!(current(&left), caret(2, 0));
}
