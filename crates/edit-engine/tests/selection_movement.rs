use edit_engine::{CaretMotion, Document, SelectionManager};

const MOTIONS: [CaretMotion; 10] = [
    CaretMotion::Left,
    CaretMotion::Right,
    CaretMotion::Up,
    CaretMotion::Down,
    CaretMotion::LineStart,
    CaretMotion::LineEnd,
    CaretMotion::WordLeft,
    CaretMotion::WordRight,
    CaretMotion::DocumentStart,
    CaretMotion::DocumentEnd,
];

#[test]
fn test_every_motion_stays_in_bounds_from_every_position() {
    let doc = Document::new("first line\n\n    indented\nlast");
    let len = doc.char_len();

    for start in 0..=len {
        for motion in MOTIONS {
            for extending in [false, true] {
                let mut manager = SelectionManager::new();
                manager.set_selection(&doc, start, start);
                manager.move_caret(&doc, motion, extending);
                let selection = manager.selection();
                assert!(
                    selection.anchor <= len && selection.head <= len,
                    "{motion:?} from {start} escaped bounds: {selection:?}"
                );
                if extending {
                    assert_eq!(selection.anchor, start);
                }
            }
        }
    }
}

#[test]
fn test_empty_document_motions_are_safe() {
    let doc = Document::empty();
    let mut manager = SelectionManager::new();
    for motion in MOTIONS {
        manager.move_caret(&doc, motion, false);
        assert_eq!(manager.selection().head, 0);
    }
}

#[test]
fn test_double_click_word_selection() {
    let doc = Document::new("let total_sum = a+b;");
    let mut manager = SelectionManager::new();

    // Anywhere inside "total_sum" selects the maximal word run.
    for offset in 4..13 {
        manager.select_word(&doc, offset);
        let range = manager.selection().range();
        assert_eq!(doc.text_in(range).unwrap(), "total_sum");
    }

    // A non-word character selects exactly itself.
    manager.select_word(&doc, 14);
    assert_eq!(doc.text_in(manager.selection().range()).unwrap(), "=");
}

#[test]
fn test_line_selection_lengths() {
    let doc = Document::new("alpha\nbeta\ngamma");
    let mut manager = SelectionManager::new();

    // Non-last lines include the trailing newline.
    manager.select_line(&doc, 0);
    let text = doc.text_in(manager.selection().range()).unwrap();
    assert_eq!(text, "alpha\n");
    assert_eq!(text.chars().count(), 6);

    // The last line has no trailing newline to include.
    manager.select_line(&doc, 2);
    let text = doc.text_in(manager.selection().range()).unwrap();
    assert_eq!(text, "gamma");
    assert_eq!(text.chars().count(), 5);
}

#[test]
fn test_column_preserved_across_long_and_short_lines() {
    let doc = Document::new("a very long line here\nok\nanother very long line");
    let mut manager = SelectionManager::new();

    // Start at column 15 on line 0, go down twice.
    manager.set_selection(&doc, 15, 15);
    manager.move_caret(&doc, CaretMotion::Down, false);
    // Line 1 is 2 chars long; clamp to its end (offset 24).
    assert_eq!(manager.selection().head, 24);

    manager.move_caret(&doc, CaretMotion::Down, false);
    // Column restarts from the clamped head's column (2), not the original.
    assert_eq!(manager.selection().head, 27);
}

#[test]
fn test_select_all_then_shrink_reclamps() {
    let mut doc = Document::new("0123456789");
    let mut manager = SelectionManager::new();
    manager.select_all(&doc);
    assert_eq!(manager.selection().range().len(), 10);

    doc.delete(edit_engine::TextRange::new(4, 10)).unwrap();
    manager.clamp_to_document(&doc);
    assert_eq!(manager.selection().range().len(), 4);
}
