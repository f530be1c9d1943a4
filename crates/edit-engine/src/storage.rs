//! Text storage layer.
//!
//! One contract, two implementations behind a closed tagged variant:
//!
//! - [`CompactBuffer`]: `String` content plus a materialized array of
//!   line-start character offsets. The right choice for small and medium
//!   documents.
//! - [`TreeBuffer`](crate::tree::TreeBuffer): a balanced tree over text
//!   chunks for very large documents.
//!
//! The variant is selected once at construction from the initial line count
//! and never switched mid-life. Out-of-bounds edits are reported as
//! [`EditError`]s; the version counter increments exactly once per successful
//! content-changing mutation.

use log::debug;

use crate::document::EditError;
use crate::range::TextRange;
use crate::tree::TreeBuffer;

/// Documents with at least this many lines get the tree buffer.
pub const LARGE_DOCUMENT_LINE_THRESHOLD: usize = 100_000;

/// Edits below this many characters maintain the compact line index
/// incrementally; larger edits trigger a full rebuild.
const INCREMENTAL_EDIT_LIMIT: usize = 1000;

fn byte_of_char(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

fn line_starts_of(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, ch) in text.chars().enumerate() {
        if ch == '\n' {
            starts.push(i + 1);
        }
    }
    starts
}

/// String-backed buffer with a materialized line-start index.
#[derive(Debug)]
pub struct CompactBuffer {
    content: String,
    char_len: usize,
    /// Line-start character offsets: `starts[0] == 0`, strictly increasing,
    /// one entry per line.
    line_starts: Vec<usize>,
}

impl CompactBuffer {
    /// Build a compact buffer from initial text.
    pub fn from_text(text: &str) -> Self {
        Self {
            content: text.to_string(),
            char_len: text.chars().count(),
            line_starts: line_starts_of(text),
        }
    }

    /// Total character count.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Total line count.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Insert `text` at character offset `offset` (pre-validated).
    pub fn insert(&mut self, offset: usize, text: &str) {
        let byte = byte_of_char(&self.content, offset);
        self.content.insert_str(byte, text);

        let inserted = text.chars().count();
        self.char_len += inserted;

        if inserted < INCREMENTAL_EDIT_LIMIT {
            let idx = self.line_starts.partition_point(|&s| s <= offset);
            for start in &mut self.line_starts[idx..] {
                *start += inserted;
            }
            let new_starts: Vec<usize> = text
                .chars()
                .enumerate()
                .filter(|(_, ch)| *ch == '\n')
                .map(|(p, _)| offset + p + 1)
                .collect();
            self.line_starts.splice(idx..idx, new_starts);
        } else {
            debug!("compact buffer: full line-index rebuild after {inserted}-char insert");
            self.line_starts = line_starts_of(&self.content);
        }
    }

    /// Delete the characters in `[start, end)` (pre-validated).
    pub fn delete(&mut self, start: usize, end: usize) {
        let byte_start = byte_of_char(&self.content, start);
        let byte_end = byte_of_char(&self.content, end);
        self.content.replace_range(byte_start..byte_end, "");

        let deleted = end - start;
        self.char_len -= deleted;

        if deleted < INCREMENTAL_EDIT_LIMIT {
            let lo = self.line_starts.partition_point(|&s| s <= start);
            let hi = self.line_starts.partition_point(|&s| s <= end);
            self.line_starts.drain(lo..hi);
            for line_start in &mut self.line_starts[lo..] {
                *line_start -= deleted;
            }
        } else {
            debug!("compact buffer: full line-index rebuild after {deleted}-char delete");
            self.line_starts = line_starts_of(&self.content);
        }
    }

    /// The full content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The characters in `[start, end)`, clamped to the buffer.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let start = start.min(self.char_len);
        let end = end.min(self.char_len);
        if start >= end {
            return String::new();
        }
        let byte_start = byte_of_char(&self.content, start);
        let byte_end = byte_of_char(&self.content, end);
        self.content[byte_start..byte_end].to_string()
    }

    /// The character at `offset`, if in bounds.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        if offset >= self.char_len {
            return None;
        }
        let byte = byte_of_char(&self.content, offset);
        self.content[byte..].chars().next()
    }

    /// The line index containing character offset `offset`.
    pub fn line_index(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&s| s <= offset) - 1
    }

    /// The character offset of the start of line `line` (pre-validated).
    pub fn offset_of_line(&self, line: usize) -> usize {
        self.line_starts[line]
    }
}

#[derive(Debug)]
enum StorageKind {
    Compact(CompactBuffer),
    Tree(TreeBuffer),
}

/// The text storage contract: a versioned buffer behind a closed variant.
///
/// Coordinates are absolute character offsets. All mutations validate bounds
/// and report [`EditError`] on misuse; failed mutations never bump the
/// version.
#[derive(Debug)]
pub struct TextStorage {
    kind: StorageKind,
    version: u64,
}

impl TextStorage {
    /// Build storage for `text`, choosing the variant by initial line count.
    pub fn new(text: &str) -> Self {
        Self::with_version(text, 0)
    }

    pub(crate) fn with_version(text: &str, version: u64) -> Self {
        let lines = text.bytes().filter(|&b| b == b'\n').count() + 1;
        let kind = if lines >= LARGE_DOCUMENT_LINE_THRESHOLD {
            debug!("text storage: tree variant selected ({lines} lines)");
            StorageKind::Tree(TreeBuffer::from_text(text))
        } else {
            StorageKind::Compact(CompactBuffer::from_text(text))
        };
        Self { kind, version }
    }

    /// Returns `true` if this storage uses the balanced-tree variant.
    pub fn is_tree(&self) -> bool {
        matches!(self.kind, StorageKind::Tree(_))
    }

    /// The current version. Increments once per successful mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Total character count.
    pub fn char_len(&self) -> usize {
        match &self.kind {
            StorageKind::Compact(buffer) => buffer.char_len(),
            StorageKind::Tree(buffer) => buffer.char_len(),
        }
    }

    /// Total line count.
    pub fn line_count(&self) -> usize {
        match &self.kind {
            StorageKind::Compact(buffer) => buffer.line_count(),
            StorageKind::Tree(buffer) => buffer.line_count(),
        }
    }

    /// The full content. O(n); used sparingly.
    pub fn content(&self) -> String {
        match &self.kind {
            StorageKind::Compact(buffer) => buffer.content().to_string(),
            StorageKind::Tree(buffer) => buffer.content(),
        }
    }

    /// The characters in `[start, end)`, clamped to the buffer.
    pub fn slice(&self, start: usize, end: usize) -> String {
        match &self.kind {
            StorageKind::Compact(buffer) => buffer.slice(start, end),
            StorageKind::Tree(buffer) => buffer.slice(start, end),
        }
    }

    /// The character at `offset`, if in bounds.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        match &self.kind {
            StorageKind::Compact(buffer) => buffer.char_at(offset),
            StorageKind::Tree(buffer) => buffer.char_at(offset),
        }
    }

    /// The line index containing character offset `offset`.
    ///
    /// Offsets past the end map to the last line.
    pub fn line_index(&self, offset: usize) -> usize {
        let offset = offset.min(self.char_len());
        match &self.kind {
            StorageKind::Compact(buffer) => buffer.line_index(offset),
            StorageKind::Tree(buffer) => buffer.line_index(offset),
        }
    }

    /// The character offset of the start of line `line`.
    pub fn offset_of_line(&self, line: usize) -> Option<usize> {
        if line >= self.line_count() {
            return None;
        }
        Some(match &self.kind {
            StorageKind::Compact(buffer) => buffer.offset_of_line(line),
            StorageKind::Tree(buffer) => buffer.offset_of_line(line),
        })
    }

    /// The full range of line `line`, including its trailing newline.
    ///
    /// The last line has no trailing newline to include.
    pub fn line_range(&self, line: usize) -> Option<TextRange> {
        let start = self.offset_of_line(line)?;
        let end = self
            .offset_of_line(line + 1)
            .unwrap_or_else(|| self.char_len());
        Some(TextRange::new(start, end))
    }

    /// Insert `text` at `offset`. Bumps the version when content changes.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), EditError> {
        let len = self.char_len();
        if offset > len {
            return Err(EditError::InvalidOffset { offset, len });
        }
        if text.is_empty() {
            return Ok(());
        }
        match &mut self.kind {
            StorageKind::Compact(buffer) => buffer.insert(offset, text),
            StorageKind::Tree(buffer) => buffer.insert(offset, text),
        }
        self.version += 1;
        Ok(())
    }

    /// Delete `range`. Bumps the version when content changes.
    pub fn delete(&mut self, range: TextRange) -> Result<(), EditError> {
        let len = self.char_len();
        if range.start > range.end || range.end > len {
            return Err(EditError::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        if range.is_empty() {
            return Ok(());
        }
        match &mut self.kind {
            StorageKind::Compact(buffer) => buffer.delete(range.start, range.end),
            StorageKind::Tree(buffer) => buffer.delete(range.start, range.end),
        }
        self.version += 1;
        Ok(())
    }

    /// Replace `range` with `text` as a single mutation (one version bump).
    pub fn replace(&mut self, range: TextRange, text: &str) -> Result<(), EditError> {
        let len = self.char_len();
        if range.start > range.end || range.end > len {
            return Err(EditError::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        if range.is_empty() && text.is_empty() {
            return Ok(());
        }
        match &mut self.kind {
            StorageKind::Compact(buffer) => {
                buffer.delete(range.start, range.end);
                buffer.insert(range.start, text);
            }
            StorageKind::Tree(buffer) => {
                buffer.delete(range.start, range.end);
                buffer.insert(range.start, text);
            }
        }
        self.version += 1;
        Ok(())
    }
}
