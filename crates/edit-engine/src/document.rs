//! Document: the exclusive owner of one text storage.
//!
//! A [`Document`] wraps a [`TextStorage`], exposes range-safe text access and
//! a monotonically increasing version counter, and never hands out the
//! storage itself. Persistence is reduced to a snapshot contract: a
//! `{content, version}` value that round-trips byte-identically through JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::range::TextRange;
use crate::storage::TextStorage;

/// Errors reported for out-of-bounds document access or mutation.
///
/// Invalid coordinates are always reported, never silently clamped or
/// dropped; a failed mutation leaves content and version untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// An offset outside `[0, len]`.
    #[error("invalid offset {offset} for document of length {len}")]
    InvalidOffset {
        /// The offending character offset.
        offset: usize,
        /// Document length at the time of the call.
        len: usize,
    },
    /// A range that is inverted or extends past the end of the document.
    #[error("invalid range {start}..{end} for document of length {len}")]
    InvalidRange {
        /// Range start offset.
        start: usize,
        /// Range end offset.
        end: usize,
        /// Document length at the time of the call.
        len: usize,
    },
}

/// Errors from the snapshot persistence boundary.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot could not be encoded.
    #[error("failed to encode document snapshot")]
    Encode(#[source] serde_json::Error),
    /// The input was not a well-formed snapshot.
    #[error("failed to decode document snapshot")]
    Decode(#[source] serde_json::Error),
}

/// A structured, serializable view of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// The full document content.
    pub content: String,
    /// The version counter at snapshot time.
    pub version: u64,
}

/// A versioned text document.
#[derive(Debug)]
pub struct Document {
    storage: TextStorage,
}

impl Document {
    /// Create a document from initial text.
    ///
    /// The buffer variant is chosen once from the initial line count (see
    /// [`LARGE_DOCUMENT_LINE_THRESHOLD`](crate::storage::LARGE_DOCUMENT_LINE_THRESHOLD))
    /// and never switched mid-life.
    pub fn new(text: &str) -> Self {
        Self {
            storage: TextStorage::new(text),
        }
    }

    /// Create an empty document.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Reconstruct a document from a snapshot, restoring its version.
    pub fn from_snapshot(snapshot: DocumentSnapshot) -> Self {
        Self {
            storage: TextStorage::with_version(&snapshot.content, snapshot.version),
        }
    }

    /// Decode a document from a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: DocumentSnapshot =
            serde_json::from_str(json).map_err(SnapshotError::Decode)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Capture a snapshot of the current content and version.
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            content: self.content(),
            version: self.version(),
        }
    }

    /// Encode the current snapshot as JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(&self.snapshot()).map_err(SnapshotError::Encode)
    }

    /// The full content. O(n); used sparingly.
    pub fn content(&self) -> String {
        self.storage.content()
    }

    /// Total character count.
    pub fn char_len(&self) -> usize {
        self.storage.char_len()
    }

    /// Total line count.
    pub fn line_count(&self) -> usize {
        self.storage.line_count()
    }

    /// The current version; strictly increases across successful mutations.
    pub fn version(&self) -> u64 {
        self.storage.version()
    }

    /// Returns `true` if the document uses the balanced-tree buffer.
    pub fn uses_tree_buffer(&self) -> bool {
        self.storage.is_tree()
    }

    /// The text in `range`.
    ///
    /// Inverted or out-of-bounds ranges are reported, not clamped.
    pub fn text_in(&self, range: TextRange) -> Result<String, EditError> {
        let len = self.char_len();
        if range.start > range.end || range.end > len {
            return Err(EditError::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(self.storage.slice(range.start, range.end))
    }

    /// The character at `offset`, if in bounds.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.storage.char_at(offset)
    }

    /// The line index containing `offset`; offsets past the end map to the
    /// last line.
    pub fn line_index(&self, offset: usize) -> usize {
        self.storage.line_index(offset)
    }

    /// The character offset of the start of line `line`.
    pub fn offset_of_line(&self, line: usize) -> Option<usize> {
        self.storage.offset_of_line(line)
    }

    /// The full range of line `line`, including its trailing newline; the
    /// last line has none to include.
    pub fn line_range(&self, line: usize) -> Option<TextRange> {
        self.storage.line_range(line)
    }

    /// Insert `text` at `offset`.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), EditError> {
        self.storage.insert(offset, text)
    }

    /// Delete the characters in `range`.
    pub fn delete(&mut self, range: TextRange) -> Result<(), EditError> {
        self.storage.delete(range)
    }

    /// Replace `range` with `text` as a single mutation (one version bump).
    pub fn replace(&mut self, range: TextRange, text: &str) -> Result<(), EditError> {
        self.storage.replace(range, text)
    }
}
