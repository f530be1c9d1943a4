//! Caret and selection state.
//!
//! A [`Selection`] is an anchor/head pair of absolute character offsets: the
//! anchor is the fixed end, the head is the end that moves during extension.
//! The [`SelectionManager`] owns one selection and implements the directional
//! movement model over a borrowed [`Document`] — the document is passed per
//! call rather than held as a back-reference, so the manager can never
//! observe a stale document.

use crate::document::Document;
use crate::range::TextRange;

/// A directional caret movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretMotion {
    /// One character left, clamped to the start of the document.
    Left,
    /// One character right, clamped to the end of the document.
    Right,
    /// One line up, preserving the column; clamps to offset 0 on the first
    /// line.
    Up,
    /// One line down, preserving the column; clamps to the document end on
    /// the last line.
    Down,
    /// The start of the current line.
    LineStart,
    /// The end of the current line, before its newline.
    LineEnd,
    /// The previous word boundary.
    WordLeft,
    /// The next word boundary.
    WordRight,
    /// Offset 0.
    DocumentStart,
    /// The document end.
    DocumentEnd,
}

/// An anchor/head selection in absolute character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// The fixed end.
    pub anchor: usize,
    /// The moving end.
    pub head: usize,
}

impl Selection {
    /// A collapsed selection (caret) at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    /// A selection from `anchor` to `head` (either order).
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Returns `true` if anchor and head coincide.
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// The covered range, `[min, max)`.
    pub fn range(&self) -> TextRange {
        TextRange::new(self.anchor.min(self.head), self.anchor.max(self.head))
    }
}

/// Returns `true` for letters, digits, and underscore.
pub fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

/// Owns the caret/selection state for one document.
pub struct SelectionManager {
    selection: Selection,
}

impl SelectionManager {
    /// Create a manager with an empty caret at offset 0.
    pub fn new() -> Self {
        Self {
            selection: Selection::caret(0),
        }
    }

    /// The current selection.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Set the selection from externally supplied offsets, re-clamping both
    /// ends to `[0, len]`.
    pub fn set_selection(&mut self, doc: &Document, anchor: usize, head: usize) {
        let len = doc.char_len();
        self.selection = Selection::new(anchor.min(len), head.min(len));
    }

    /// Re-clamp the selection after the document shrank below its bounds.
    pub fn clamp_to_document(&mut self, doc: &Document) {
        let len = doc.char_len();
        self.selection.anchor = self.selection.anchor.min(len);
        self.selection.head = self.selection.head.min(len);
    }

    /// Move the caret. When `extending`, the anchor stays put and only the
    /// head moves; otherwise both collapse to the new position.
    pub fn move_caret(&mut self, doc: &Document, motion: CaretMotion, extending: bool) {
        let head = self.selection.head.min(doc.char_len());
        let new_head = target_offset(doc, head, motion);
        if extending {
            self.selection.head = new_head;
        } else {
            self.selection = Selection::caret(new_head);
        }
    }

    /// Select the word at `offset`.
    ///
    /// A non-word character selects exactly that character; an offset at the
    /// document end produces an empty caret there; a word character expands
    /// to the maximal contiguous word run containing it.
    pub fn select_word(&mut self, doc: &Document, offset: usize) {
        let len = doc.char_len();
        let offset = offset.min(len);
        if offset == len {
            self.selection = Selection::caret(len);
            return;
        }

        let ch = doc.char_at(offset).unwrap_or(' ');
        if !is_word_char(ch) {
            self.selection = Selection::new(offset, offset + 1);
            return;
        }

        let mut start = offset;
        while start > 0 && doc.char_at(start - 1).is_some_and(is_word_char) {
            start -= 1;
        }
        let mut end = offset;
        while end < len && doc.char_at(end).is_some_and(is_word_char) {
            end += 1;
        }
        self.selection = Selection::new(start, end);
    }

    /// Select the full line `line`, including its trailing newline; the last
    /// line has none to include. Out-of-range lines leave the selection
    /// unchanged.
    pub fn select_line(&mut self, doc: &Document, line: usize) {
        if let Some(range) = doc.line_range(line) {
            self.selection = Selection::new(range.start, range.end);
        }
    }

    /// Select the entire document.
    pub fn select_all(&mut self, doc: &Document) {
        self.selection = Selection::new(0, doc.char_len());
    }
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Length of line `line` excluding its trailing newline.
fn line_content_len(doc: &Document, line: usize) -> usize {
    let Some(range) = doc.line_range(line) else {
        return 0;
    };
    if line + 1 < doc.line_count() {
        range.len().saturating_sub(1)
    } else {
        range.len()
    }
}

fn target_offset(doc: &Document, head: usize, motion: CaretMotion) -> usize {
    let len = doc.char_len();
    match motion {
        CaretMotion::Left => head.saturating_sub(1),
        CaretMotion::Right => (head + 1).min(len),
        CaretMotion::Up => {
            let line = doc.line_index(head);
            if line == 0 {
                return 0;
            }
            let column = head - doc.offset_of_line(line).unwrap_or(0);
            let target_start = doc.offset_of_line(line - 1).unwrap_or(0);
            target_start + column.min(line_content_len(doc, line - 1))
        }
        CaretMotion::Down => {
            let line = doc.line_index(head);
            if line + 1 >= doc.line_count() {
                return len;
            }
            let column = head - doc.offset_of_line(line).unwrap_or(0);
            let target_start = doc.offset_of_line(line + 1).unwrap_or(len);
            target_start + column.min(line_content_len(doc, line + 1))
        }
        CaretMotion::LineStart => doc.offset_of_line(doc.line_index(head)).unwrap_or(0),
        CaretMotion::LineEnd => {
            let line = doc.line_index(head);
            let start = doc.offset_of_line(line).unwrap_or(0);
            start + line_content_len(doc, line)
        }
        CaretMotion::WordLeft => {
            let mut pos = head;
            while pos > 0 && !doc.char_at(pos - 1).is_some_and(is_word_char) {
                pos -= 1;
            }
            while pos > 0 && doc.char_at(pos - 1).is_some_and(is_word_char) {
                pos -= 1;
            }
            pos
        }
        CaretMotion::WordRight => {
            let mut pos = head;
            while pos < len && !doc.char_at(pos).is_some_and(is_word_char) {
                pos += 1;
            }
            while pos < len && doc.char_at(pos).is_some_and(is_word_char) {
                pos += 1;
            }
            pos
        }
        CaretMotion::DocumentStart => 0,
        CaretMotion::DocumentEnd => len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::new("func test() {\n    let x = 42\n}")
    }

    #[test]
    fn test_left_right_clamp() {
        let doc = doc();
        let mut sel = SelectionManager::new();

        sel.move_caret(&doc, CaretMotion::Left, false);
        assert_eq!(sel.selection(), Selection::caret(0));

        sel.set_selection(&doc, doc.char_len(), doc.char_len());
        sel.move_caret(&doc, CaretMotion::Right, false);
        assert_eq!(sel.selection(), Selection::caret(doc.char_len()));
    }

    #[test]
    fn test_up_down_preserve_column() {
        let doc = doc();
        let mut sel = SelectionManager::new();

        // Column 8 on line 0 ("func tes|t() {").
        sel.set_selection(&doc, 8, 8);
        sel.move_caret(&doc, CaretMotion::Down, false);
        // Line 1 starts at 14; column 8 lands inside "    let x".
        assert_eq!(sel.selection(), Selection::caret(22));

        sel.move_caret(&doc, CaretMotion::Up, false);
        assert_eq!(sel.selection(), Selection::caret(8));
    }

    #[test]
    fn test_up_down_clamp_to_shorter_line() {
        let doc = Document::new("a long first line\nab\nanother long line");
        let mut sel = SelectionManager::new();

        sel.set_selection(&doc, 10, 10);
        sel.move_caret(&doc, CaretMotion::Down, false);
        // Line 1 has 2 characters; the column clamps to its end.
        assert_eq!(sel.selection(), Selection::caret(20));
    }

    #[test]
    fn test_up_down_document_boundaries() {
        let doc = doc();
        let mut sel = SelectionManager::new();

        sel.set_selection(&doc, 5, 5);
        sel.move_caret(&doc, CaretMotion::Up, false);
        assert_eq!(sel.selection(), Selection::caret(0));

        sel.set_selection(&doc, doc.char_len() - 1, doc.char_len() - 1);
        sel.move_caret(&doc, CaretMotion::Down, false);
        assert_eq!(sel.selection(), Selection::caret(doc.char_len()));
    }

    #[test]
    fn test_line_start_end() {
        let doc = doc();
        let mut sel = SelectionManager::new();

        sel.set_selection(&doc, 20, 20);
        sel.move_caret(&doc, CaretMotion::LineStart, false);
        assert_eq!(sel.selection(), Selection::caret(14));

        sel.move_caret(&doc, CaretMotion::LineEnd, false);
        // Line 1 ends before its newline at offset 28.
        assert_eq!(sel.selection(), Selection::caret(28));
    }

    #[test]
    fn test_word_movement() {
        let doc = Document::new("foo  bar_baz !qux");
        let mut sel = SelectionManager::new();

        sel.move_caret(&doc, CaretMotion::WordRight, false);
        assert_eq!(sel.selection(), Selection::caret(3));
        sel.move_caret(&doc, CaretMotion::WordRight, false);
        assert_eq!(sel.selection(), Selection::caret(12));
        sel.move_caret(&doc, CaretMotion::WordRight, false);
        assert_eq!(sel.selection(), Selection::caret(17));

        sel.move_caret(&doc, CaretMotion::WordLeft, false);
        assert_eq!(sel.selection(), Selection::caret(14));
        sel.move_caret(&doc, CaretMotion::WordLeft, false);
        assert_eq!(sel.selection(), Selection::caret(5));
        sel.move_caret(&doc, CaretMotion::WordLeft, false);
        assert_eq!(sel.selection(), Selection::caret(0));
    }

    #[test]
    fn test_extending_preserves_anchor() {
        let doc = doc();
        let mut sel = SelectionManager::new();

        sel.set_selection(&doc, 5, 5);
        sel.move_caret(&doc, CaretMotion::WordRight, true);
        let selection = sel.selection();
        assert_eq!(selection.anchor, 5);
        assert!(selection.head > 5);
        assert!(!selection.is_collapsed());
    }

    #[test]
    fn test_select_word() {
        let doc = doc();
        let mut sel = SelectionManager::new();

        // Inside "test".
        sel.select_word(&doc, 6);
        assert_eq!(sel.selection(), Selection::new(5, 9));

        // On the "(" punctuation: exactly that character.
        sel.select_word(&doc, 9);
        assert_eq!(sel.selection(), Selection::new(9, 10));

        // At the exact document end: empty caret.
        sel.select_word(&doc, doc.char_len());
        assert_eq!(sel.selection(), Selection::caret(doc.char_len()));
    }

    #[test]
    fn test_select_line_includes_newline_except_last() {
        let doc = doc();
        let mut sel = SelectionManager::new();

        sel.select_line(&doc, 0);
        assert_eq!(sel.selection(), Selection::new(0, 14));
        assert_eq!(doc.text_in(sel.selection().range()).unwrap(), "func test() {\n");

        sel.select_line(&doc, 2);
        assert_eq!(sel.selection(), Selection::new(29, 30));
        assert_eq!(doc.text_in(sel.selection().range()).unwrap(), "}");
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut doc = Document::new("hello world");
        let mut sel = SelectionManager::new();
        sel.select_all(&doc);

        doc.delete(TextRange::new(5, 11)).unwrap();
        sel.clamp_to_document(&doc);
        assert_eq!(sel.selection(), Selection::new(0, 5));
    }
}
