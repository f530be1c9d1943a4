//! Undo/redo with time-windowed grouping.
//!
//! The [`UndoManager`] observes the same edit requests the document receives
//! and coalesces them into groups: edits arriving within the coalescing
//! window of the previous one join the open group, a longer pause closes it.
//! Grouping is driven purely by the injected [`TimeSource`], never by a
//! scheduler; hosts that want an explicit boundary call
//! [`UndoManager::end_group`].

use log::debug;

use crate::clock::{MonotonicClock, TimeSource};
use crate::document::{Document, EditError};
use crate::range::TextRange;

/// Maximum gap between two edits for them to share an undo group.
pub const COALESCING_WINDOW_MS: u64 = 300;

/// Maximum retained undo groups; the oldest are evicted beyond this.
pub const MAX_UNDO_GROUPS: usize = 1000;

/// One reversible mutation: `original` was replaced by `replacement` at
/// `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Character offset the edit was applied at.
    pub start: usize,
    /// The text that was removed (empty for a pure insertion).
    pub original: String,
    /// The text that was inserted (empty for a pure deletion).
    pub replacement: String,
    /// Registration time, in [`TimeSource`] milliseconds.
    pub at_millis: u64,
}

impl TextEdit {
    /// Length of the removed text in characters.
    pub fn original_len(&self) -> usize {
        self.original.chars().count()
    }

    /// Length of the inserted text in characters.
    pub fn replacement_len(&self) -> usize {
        self.replacement.chars().count()
    }

    /// The pre-edit range this edit replaced.
    pub fn range(&self) -> TextRange {
        TextRange::new(self.start, self.start + self.original_len())
    }
}

/// An ordered list of edits undone and redone as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditGroup {
    edits: Vec<TextEdit>,
}

impl EditGroup {
    /// The edits in application order.
    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }
}

/// Records edit deltas and replays them as grouped undo/redo steps.
pub struct UndoManager<C: TimeSource = MonotonicClock> {
    undo_stack: Vec<EditGroup>,
    redo_stack: Vec<EditGroup>,
    open_group: Vec<TextEdit>,
    last_edit_at: Option<u64>,
    clock: C,
}

impl UndoManager<MonotonicClock> {
    /// Create a manager driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for UndoManager<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: TimeSource> UndoManager<C> {
    /// Create a manager driven by `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            open_group: Vec::new(),
            last_edit_at: None,
            clock,
        }
    }

    /// Record one edit: `original` was replaced by `replacement` at `start`.
    ///
    /// Joins the open group when the gap since the previous registration is
    /// under [`COALESCING_WINDOW_MS`], otherwise closes it and starts a new
    /// one. Any registration clears the redo stack.
    pub fn register_edit(&mut self, start: usize, replacement: &str, original: &str) {
        let now = self.clock.now_millis();
        let coalesce = self
            .last_edit_at
            .is_some_and(|at| now.saturating_sub(at) < COALESCING_WINDOW_MS);
        if !coalesce {
            self.close_open_group();
        }

        self.open_group.push(TextEdit {
            start,
            original: original.to_string(),
            replacement: replacement.to_string(),
            at_millis: now,
        });
        self.last_edit_at = Some(now);
        self.redo_stack.clear();
    }

    /// Force a group boundary: the next registered edit starts a new group.
    pub fn end_group(&mut self) {
        self.close_open_group();
        self.last_edit_at = None;
    }

    /// Undo the most recent group, replaying its edits newest-first.
    ///
    /// Returns `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self, doc: &mut Document) -> Result<bool, EditError> {
        self.end_group();
        let Some(group) = self.undo_stack.pop() else {
            return Ok(false);
        };

        // Each replacement currently sits at [start, start + replacement_len);
        // substitute the original text back, newest edit first.
        for edit in group.edits.iter().rev() {
            let current = TextRange::new(edit.start, edit.start + edit.replacement_len());
            doc.replace(current, &edit.original)?;
        }

        self.redo_stack.push(group);
        Ok(true)
    }

    /// Redo the most recently undone group, replaying its edits in original
    /// order.
    ///
    /// Returns `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self, doc: &mut Document) -> Result<bool, EditError> {
        let Some(group) = self.redo_stack.pop() else {
            return Ok(false);
        };

        for edit in group.edits() {
            doc.replace(edit.range(), &edit.replacement)?;
        }

        self.undo_stack.push(group);
        Ok(true)
    }

    /// Returns `true` if an undo step is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || !self.open_group.is_empty()
    }

    /// Returns `true` if a redo step is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undoable groups, counting the open group.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len() + usize::from(!self.open_group.is_empty())
    }

    /// Number of redoable groups.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    fn close_open_group(&mut self) {
        if self.open_group.is_empty() {
            return;
        }
        let group = EditGroup {
            edits: std::mem::take(&mut self.open_group),
        };
        self.undo_stack.push(group);
        if self.undo_stack.len() > MAX_UNDO_GROUPS {
            debug!("undo stack full; evicting oldest group");
            self.undo_stack.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::clock::ManualClock;

    fn manager(clock: &Rc<ManualClock>) -> UndoManager<Rc<ManualClock>> {
        UndoManager::with_clock(Rc::clone(clock))
    }

    fn insert(doc: &mut Document, undo: &mut UndoManager<Rc<ManualClock>>, at: usize, text: &str) {
        doc.insert(at, text).unwrap();
        undo.register_edit(at, text, "");
    }

    #[test]
    fn test_rapid_edits_coalesce() {
        let clock = Rc::new(ManualClock::new());
        let mut undo = manager(&clock);
        let mut doc = Document::empty();

        for (i, ch) in ["a", "b", "c"].iter().enumerate() {
            clock.advance(50);
            insert(&mut doc, &mut undo, i, ch);
        }
        assert_eq!(doc.content(), "abc");
        assert_eq!(undo.undo_depth(), 1);

        assert!(undo.undo(&mut doc).unwrap());
        assert_eq!(doc.content(), "");
        assert!(!undo.can_undo());
        assert!(undo.can_redo());
    }

    #[test]
    fn test_quiet_gap_starts_new_group() {
        let clock = Rc::new(ManualClock::new());
        let mut undo = manager(&clock);
        let mut doc = Document::empty();

        insert(&mut doc, &mut undo, 0, "a");
        clock.advance(COALESCING_WINDOW_MS);
        insert(&mut doc, &mut undo, 1, "b");

        assert!(undo.undo(&mut doc).unwrap());
        assert_eq!(doc.content(), "a");
        assert!(undo.undo(&mut doc).unwrap());
        assert_eq!(doc.content(), "");
    }

    #[test]
    fn test_end_group_forces_boundary() {
        let clock = Rc::new(ManualClock::new());
        let mut undo = manager(&clock);
        let mut doc = Document::empty();

        insert(&mut doc, &mut undo, 0, "a");
        undo.end_group();
        clock.advance(10);
        insert(&mut doc, &mut undo, 1, "b");

        assert!(undo.undo(&mut doc).unwrap());
        assert_eq!(doc.content(), "a");
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let clock = Rc::new(ManualClock::new());
        let mut undo = manager(&clock);
        let mut doc = Document::empty();

        insert(&mut doc, &mut undo, 0, "a");
        undo.undo(&mut doc).unwrap();
        assert!(undo.can_redo());

        clock.advance(1000);
        insert(&mut doc, &mut undo, 0, "b");
        assert!(!undo.can_redo());
        assert!(!undo.redo(&mut doc).unwrap());
    }

    #[test]
    fn test_undo_replaces_at_current_position() {
        let clock = Rc::new(ManualClock::new());
        let mut undo = manager(&clock);
        let mut doc = Document::new("let x = 42");

        // Replace "42" with "100".
        doc.replace(TextRange::new(8, 10), "100").unwrap();
        undo.register_edit(8, "100", "42");
        assert_eq!(doc.content(), "let x = 100");

        assert!(undo.undo(&mut doc).unwrap());
        assert_eq!(doc.content(), "let x = 42");

        assert!(undo.redo(&mut doc).unwrap());
        assert_eq!(doc.content(), "let x = 100");
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let clock = Rc::new(ManualClock::new());
        let mut undo = manager(&clock);
        let mut doc = Document::new("text");

        assert!(!undo.undo(&mut doc).unwrap());
        assert!(!undo.redo(&mut doc).unwrap());
        assert_eq!(doc.content(), "text");
    }

    #[test]
    fn test_stack_bound_evicts_oldest() {
        let clock = Rc::new(ManualClock::new());
        let mut undo = manager(&clock);
        let mut doc = Document::empty();

        let total = MAX_UNDO_GROUPS + 5;
        for i in 0..total {
            clock.advance(COALESCING_WINDOW_MS);
            insert(&mut doc, &mut undo, i, "x");
        }
        undo.end_group();
        assert_eq!(undo.undo_depth(), MAX_UNDO_GROUPS);

        while undo.undo(&mut doc).unwrap() {}

        // The five evicted single-character groups are permanently beyond the
        // undo horizon.
        assert_eq!(doc.content(), "x".repeat(5));
    }
}
