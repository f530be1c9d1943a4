//! Text search over a document.
//!
//! All inputs and outputs use character offsets. Plain queries are escaped
//! and compiled into a regex; regex queries are compiled as written. Match
//! ranges are half-open.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::document::Document;
use crate::range::TextRange;
use crate::selection::is_word_char;

/// Options that control how search is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// If `true`, performs a case-sensitive search.
    pub case_sensitive: bool,
    /// If `true`, matches only whole words (letters, digits, `_`).
    pub whole_word: bool,
    /// If `true`, treats the query as a regex pattern.
    pub regex: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
            regex: false,
        }
    }
}

/// Search errors.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The provided pattern failed to compile.
    #[error("invalid search pattern")]
    InvalidPattern(#[source] regex::Error),
}

/// Character/byte offset mapping for one search pass.
struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.char_count());
        self.char_to_byte
            .get(clamped)
            .copied()
            .unwrap_or(self.text_len)
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) => idx,
            Err(idx) => idx,
        }
    }

    fn char_at(&self, text: &str, char_offset: usize) -> Option<char> {
        if char_offset >= self.char_count() {
            return None;
        }
        let start = self.char_to_byte[char_offset];
        text[start..].chars().next()
    }
}

fn compile(query: &str, options: SearchOptions) -> Result<Regex, SearchError> {
    let pattern = if options.regex {
        query.to_string()
    } else {
        regex::escape(query)
    };

    RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .multi_line(true)
        .build()
        .map_err(SearchError::InvalidPattern)
}

fn is_whole_word(text: &str, index: &CharIndex, m: TextRange) -> bool {
    let before = if m.start == 0 {
        None
    } else {
        index.char_at(text, m.start - 1)
    };
    let after = index.char_at(text, m.end);
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Find the next occurrence of `query`, searching forward from `from`.
///
/// Returns `Ok(None)` for an empty query or no match.
pub fn find_next(
    doc: &Document,
    query: &str,
    options: SearchOptions,
    from: usize,
) -> Result<Option<TextRange>, SearchError> {
    if query.is_empty() {
        return Ok(None);
    }

    let re = compile(query, options)?;
    let text = doc.content();
    let index = CharIndex::new(&text);

    let mut start_char = from.min(index.char_count());
    loop {
        let start_byte = index.char_to_byte(start_char);
        let Some(m) = re.find_at(&text, start_byte) else {
            return Ok(None);
        };

        let candidate = TextRange::new(index.byte_to_char(m.start()), index.byte_to_char(m.end()));

        if candidate.is_empty() {
            if candidate.end >= index.char_count() {
                return Ok(None);
            }
            start_char = candidate.end + 1;
            continue;
        }
        if options.whole_word && !is_whole_word(&text, &index, candidate) {
            start_char = candidate.end;
            continue;
        }

        return Ok(Some(candidate));
    }
}

/// Find the previous occurrence of `query`, searching backward from `from`.
pub fn find_prev(
    doc: &Document,
    query: &str,
    options: SearchOptions,
    from: usize,
) -> Result<Option<TextRange>, SearchError> {
    if query.is_empty() {
        return Ok(None);
    }

    let re = compile(query, options)?;
    let text = doc.content();
    let index = CharIndex::new(&text);
    let limit_byte = index.char_to_byte(from.min(index.char_count()));

    let mut last = None;
    for m in re.find_iter(&text[..limit_byte]) {
        let candidate = TextRange::new(index.byte_to_char(m.start()), index.byte_to_char(m.end()));
        if candidate.is_empty() {
            continue;
        }
        if options.whole_word && !is_whole_word(&text, &index, candidate) {
            continue;
        }
        last = Some(candidate);
    }

    Ok(last)
}

/// Find all occurrences of `query` in the document.
pub fn find_all(
    doc: &Document,
    query: &str,
    options: SearchOptions,
) -> Result<Vec<TextRange>, SearchError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let re = compile(query, options)?;
    let text = doc.content();
    let index = CharIndex::new(&text);

    let mut matches = Vec::new();
    for m in re.find_iter(&text) {
        let candidate = TextRange::new(index.byte_to_char(m.start()), index.byte_to_char(m.end()));
        if candidate.is_empty() {
            continue;
        }
        if options.whole_word && !is_whole_word(&text, &index, candidate) {
            continue;
        }
        matches.push(candidate);
    }

    Ok(matches)
}
