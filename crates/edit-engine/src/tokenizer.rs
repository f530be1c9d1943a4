//! Incremental syntax tokenizer.
//!
//! A single left-to-right maximal-munch pass classifies every character of
//! the input into exactly one token: the token sequence partitions
//! `[0, len)` with no gaps and no overlaps, and empty input yields no
//! tokens.
//!
//! The incremental path reuses the cached token array from the previous
//! content: tokens safely before the edit are kept verbatim, and the scan
//! restarts at the kept boundary. The concatenation of kept prefix and
//! re-scanned suffix is identical to a full re-tokenization of the new
//! content — a correctness property the tests enforce, not an optimization
//! that may drift.

use log::trace;

use crate::range::TextRange;

/// Syntax classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A run of whitespace characters (including newlines).
    Whitespace,
    /// `//` to the end of the line.
    LineComment,
    /// `/*` to the matching `*/`; unterminated comments run to the end of
    /// the input.
    BlockComment,
    /// `"` to the next unescaped `"`; cut at the newline when unterminated.
    StringLiteral,
    /// A numeric literal: digits, one decimal point, one signed exponent,
    /// `_` separators.
    Number,
    /// A name that is neither a keyword nor a built-in type.
    Identifier,
    /// A name in the fixed keyword set.
    Keyword,
    /// A name in the fixed built-in type set.
    TypeIdentifier,
    /// A maximal run of operator characters.
    Operator,
    /// A single punctuation character.
    Punctuation,
    /// A one-character fallback for anything unclassified.
    Unknown,
}

/// One classified span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The covered half-open character range.
    pub range: TextRange,
    /// The classification.
    pub kind: TokenKind,
}

/// The change applied to the previous content, for the incremental path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChange {
    /// Character offset the edit started at.
    pub start: usize,
    /// Characters removed from the old content.
    pub removed: usize,
    /// Characters inserted into the new content.
    pub inserted: usize,
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "case", "catch", "class", "const", "continue", "default",
    "defer", "else", "enum", "extension", "false", "fn", "for", "func", "guard", "if", "impl",
    "import", "in", "init", "interface", "let", "loop", "match", "nil", "null", "private",
    "protocol", "pub", "public", "return", "self", "static", "struct", "super", "switch", "throw",
    "throws", "trait", "true", "try", "use", "var", "where", "while",
];

const BUILTIN_TYPES: &[&str] = &[
    "Any", "Array", "Bool", "Char", "Character", "Dictionary", "Double", "Float", "Int", "Int8",
    "Int16", "Int32", "Int64", "Map", "Never", "Optional", "Result", "Set", "String", "UInt",
    "Void",
];

/// The longest lookahead (in characters past a token's end) any maximal-munch
/// decision takes: a number peeking at `e`, a sign, and a digit. The
/// incremental path keeps only tokens whose decisions could not have seen
/// the changed region.
const MAX_LOOKAHEAD: usize = 3;

fn is_operator_char(ch: char) -> bool {
    matches!(
        ch,
        '+' | '-' | '*' | '/' | '%' | '=' | '<' | '>' | '!' | '&' | '|' | '^' | '~' | '?' | ':'
            | '.'
    )
}

fn is_punctuation(ch: char) -> bool {
    matches!(ch, '(' | ')' | '{' | '}' | '[' | ']' | ',' | ';')
}

fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

fn is_identifier_continue(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

/// Scan `chars`, emitting tokens offset by `base`.
fn scan(chars: &[char], base: usize) -> Vec<Token> {
    let n = chars.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < n {
        let start = i;
        let ch = chars[i];

        let kind = if ch.is_whitespace() {
            while i < n && chars[i].is_whitespace() {
                i += 1;
            }
            TokenKind::Whitespace
        } else if ch == '/' && i + 1 < n && chars[i + 1] == '/' {
            while i < n && chars[i] != '\n' {
                i += 1;
            }
            TokenKind::LineComment
        } else if ch == '/' && i + 1 < n && chars[i + 1] == '*' {
            i += 2;
            loop {
                if i >= n {
                    break;
                }
                if chars[i] == '*' && i + 1 < n && chars[i + 1] == '/' {
                    i += 2;
                    break;
                }
                i += 1;
            }
            TokenKind::BlockComment
        } else if ch == '"' {
            i += 1;
            while i < n {
                let c = chars[i];
                if c == '\n' {
                    // Unterminated: the token ends at the newline.
                    break;
                }
                if c == '\\' {
                    i += 1;
                    if i < n && chars[i] != '\n' {
                        i += 1;
                    }
                    continue;
                }
                i += 1;
                if c == '"' {
                    break;
                }
            }
            TokenKind::StringLiteral
        } else if ch.is_ascii_digit() {
            i += 1;
            let mut seen_dot = false;
            let mut seen_exp = false;
            while i < n {
                let c = chars[i];
                if c.is_ascii_digit() || c == '_' {
                    i += 1;
                } else if c == '.'
                    && !seen_dot
                    && !seen_exp
                    && i + 1 < n
                    && chars[i + 1].is_ascii_digit()
                {
                    seen_dot = true;
                    i += 2;
                } else if (c == 'e' || c == 'E') && !seen_exp {
                    if i + 1 < n && chars[i + 1].is_ascii_digit() {
                        seen_exp = true;
                        i += 2;
                    } else if i + 2 < n
                        && (chars[i + 1] == '+' || chars[i + 1] == '-')
                        && chars[i + 2].is_ascii_digit()
                    {
                        seen_exp = true;
                        i += 3;
                    } else {
                        break;
                    }
                } else {
                    break;
                }
            }
            TokenKind::Number
        } else if is_identifier_start(ch) {
            while i < n && is_identifier_continue(chars[i]) {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            if KEYWORDS.contains(&word.as_str()) {
                TokenKind::Keyword
            } else if BUILTIN_TYPES.contains(&word.as_str()) {
                TokenKind::TypeIdentifier
            } else {
                TokenKind::Identifier
            }
        } else if is_operator_char(ch) {
            while i < n && is_operator_char(chars[i]) {
                // A comment opener ends the operator run.
                if chars[i] == '/' && i + 1 < n && (chars[i + 1] == '/' || chars[i + 1] == '*') {
                    break;
                }
                i += 1;
            }
            if i == start {
                i += 1;
            }
            TokenKind::Operator
        } else if is_punctuation(ch) {
            i += 1;
            TokenKind::Punctuation
        } else {
            i += 1;
            TokenKind::Unknown
        };

        tokens.push(Token {
            range: TextRange::new(base + start, base + i),
            kind,
        });
    }

    tokens
}

/// Tokenize `text` from scratch.
pub fn tokenize(text: &str) -> Vec<Token> {
    let chars: Vec<char> = text.chars().collect();
    scan(&chars, 0)
}

/// A tokenizer holding the cached token array for one document's edit
/// stream.
///
/// One instance must be dedicated to one document; sharing the cache across
/// documents (or threads) invalidates the incremental path.
pub struct Tokenizer {
    cache: Vec<Token>,
}

impl Tokenizer {
    /// Create a tokenizer with an empty cache.
    pub fn new() -> Self {
        Self { cache: Vec::new() }
    }

    /// The cached tokens from the most recent scan.
    pub fn tokens(&self) -> &[Token] {
        &self.cache
    }

    /// Full scan of `text`, replacing the cache.
    pub fn tokenize_full(&mut self, text: &str) -> &[Token] {
        self.cache = tokenize(text);
        &self.cache
    }

    /// Re-tokenize after an edit.
    ///
    /// With change information and a prior cache, keeps the unaffected token
    /// prefix and re-scans from the kept boundary; otherwise falls back to a
    /// full scan. The result is always identical to
    /// [`tokenize`]`(text)`.
    pub fn update(&mut self, text: &str, change: Option<TextChange>) -> &[Token] {
        let Some(change) = change else {
            trace!("tokenizer: no change info, full scan");
            return self.tokenize_full(text);
        };
        if self.cache.is_empty() {
            return self.tokenize_full(text);
        }

        let edit_start = change.start;
        debug_assert_eq!(
            self.cache.last().map_or(0, |t| t.range.end) + change.inserted,
            text.chars().count() + change.removed,
            "change info inconsistent with cached content"
        );

        // First cached token ending past the edit start...
        let mut idx = self
            .cache
            .partition_point(|t| t.range.end <= edit_start);
        // ...then step back across the boundary: drop every token whose
        // maximal-munch decision could have looked into the changed region.
        while idx > 0 && self.cache[idx - 1].range.end + MAX_LOOKAHEAD > edit_start {
            idx -= 1;
        }

        self.cache.truncate(idx);
        let rescan_from = self.cache.last().map_or(0, |t| t.range.end);

        let rescan_byte = text
            .char_indices()
            .nth(rescan_from)
            .map(|(b, _)| b)
            .unwrap_or(text.len());
        let suffix: Vec<char> = text[rescan_byte..].chars().collect();
        self.cache.extend(scan(&suffix, rescan_from));

        &self.cache
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
