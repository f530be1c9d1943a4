//! Token-derived diagnostics.

use edit_engine::{Diagnostic, Severity, Token, TokenKind};

/// Returns `true` if a string-literal token ends with a closing, unescaped
/// quote.
fn is_properly_closed(literal: &[char]) -> bool {
    let n = literal.len();
    if n < 2 || literal[n - 1] != '"' {
        return false;
    }
    // The closing quote must not itself be escaped.
    let backslashes = literal[..n - 1]
        .iter()
        .rev()
        .take_while(|&&ch| ch == '\\')
        .count();
    backslashes % 2 == 0
}

/// Derive diagnostics from a token sequence.
///
/// This is a pure best-effort pass: worst-case input degrades to an empty
/// list, never an error. `text` must be the content the tokens were produced
/// from.
pub fn analyze(text: &str, tokens: &[Token]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut chars = text.chars();

    for token in tokens {
        let len = token.range.len();
        match token.kind {
            TokenKind::Unknown => {
                diagnostics.push(Diagnostic::new(
                    token.range,
                    Severity::Error,
                    "Unexpected character",
                ));
                advance(&mut chars, len);
            }
            TokenKind::LineComment | TokenKind::BlockComment => {
                let body: String = chars.by_ref().take(len).collect();
                if body.contains("TODO") {
                    diagnostics.push(Diagnostic::new(
                        token.range,
                        Severity::Info,
                        "TODO marker in comment",
                    ));
                }
                if body.contains("FIXME") {
                    diagnostics.push(Diagnostic::new(
                        token.range,
                        Severity::Warning,
                        "FIXME marker in comment",
                    ));
                }
            }
            TokenKind::StringLiteral => {
                let literal: Vec<char> = chars.by_ref().take(len).collect();
                if !is_properly_closed(&literal) {
                    diagnostics.push(Diagnostic::new(
                        token.range,
                        Severity::Error,
                        "Unterminated string literal",
                    ));
                }
            }
            _ => advance(&mut chars, len),
        }
    }

    // Severity rank first (errors lead), position second.
    diagnostics.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then(a.range.start.cmp(&b.range.start))
    });
    diagnostics
}

fn advance(chars: &mut std::str::Chars<'_>, len: usize) {
    if len > 0 {
        let _ = chars.nth(len - 1);
    }
}
