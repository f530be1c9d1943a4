//! Bracket matching.
//!
//! Given an offset, finds the partner of the bracket at that offset by
//! counting same-type nesting depth: forward for an opening bracket,
//! backward for a closing one. Non-bracket offsets produce no result.

use crate::document::Document;
use crate::range::TextRange;

/// The fixed bracket pairs the matcher understands.
pub const BRACKET_PAIRS: [(char, char); 3] = [('(', ')'), ('{', '}'), ('[', ']')];

/// The result of a bracket probe.
///
/// `open` always points at the probed bracket's side of the pair (for a
/// matched closing-bracket probe it is the found opener). An unmatched
/// bracket carries no partner: check [`BracketMatch::is_matched`] before
/// using [`BracketMatch::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketMatch {
    /// The opening side of the pair; for an unmatched probe, the probed
    /// bracket itself.
    pub open: TextRange,
    /// The closing side of the pair, when matched.
    pub close: Option<TextRange>,
}

impl BracketMatch {
    /// Returns `true` when a partner bracket was found.
    pub fn is_matched(&self) -> bool {
        self.close.is_some()
    }
}

fn pair_for(ch: char) -> Option<(char, char, bool)> {
    for (open, close) in BRACKET_PAIRS {
        if ch == open {
            return Some((open, close, true));
        }
        if ch == close {
            return Some((open, close, false));
        }
    }
    None
}

/// Find the partner of the bracket at `offset`, or `None` if the character
/// there is not a bracket.
pub fn find_match(doc: &Document, offset: usize) -> Option<BracketMatch> {
    let ch = doc.char_at(offset)?;
    let (open_ch, close_ch, is_open) = pair_for(ch)?;
    let len = doc.char_len();
    let probe = TextRange::new(offset, offset + 1);

    if is_open {
        let tail = doc.text_in(TextRange::new(offset + 1, len)).ok()?;
        let mut depth = 1usize;
        for (i, c) in tail.chars().enumerate() {
            if c == open_ch {
                depth += 1;
            } else if c == close_ch {
                depth -= 1;
                if depth == 0 {
                    let at = offset + 1 + i;
                    return Some(BracketMatch {
                        open: probe,
                        close: Some(TextRange::new(at, at + 1)),
                    });
                }
            }
        }
        Some(BracketMatch {
            open: probe,
            close: None,
        })
    } else {
        let head = doc.text_in(TextRange::new(0, offset)).ok()?;
        let mut depth = 1usize;
        for (back, c) in head.chars().rev().enumerate() {
            if c == close_ch {
                depth += 1;
            } else if c == open_ch {
                depth -= 1;
                if depth == 0 {
                    let at = offset - 1 - back;
                    return Some(BracketMatch {
                        open: TextRange::new(at, at + 1),
                        close: Some(probe),
                    });
                }
            }
        }
        Some(BracketMatch {
            open: probe,
            close: None,
        })
    }
}
