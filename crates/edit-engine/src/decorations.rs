//! Decoration overlay synthesis.
//!
//! The [`DecorationModel`] holds five independently updatable decoration
//! sources — syntax, diagnostics, selection, bracket highlights, and
//! fold-hidden text — and rebuilds one merged, queryable overlay list on
//! every update. The caller resolves visual conflicts by taking the
//! highest-priority decoration per character; ties are broken here by
//! sorting queries in descending priority.

use crate::brackets::BracketMatch;
use crate::diagnostics::Diagnostic;
use crate::range::TextRange;
use crate::selection::Selection;
use crate::tokenizer::{Token, TokenKind};

/// Priority of selection-background decorations.
pub const PRIORITY_SELECTION: i32 = -1;
/// Priority of syntax decorations.
pub const PRIORITY_SYNTAX: i32 = 0;
/// Priority of bracket-highlight decorations.
pub const PRIORITY_BRACKET: i32 = 5;
/// Priority of diagnostic underlines.
pub const PRIORITY_DIAGNOSTIC: i32 = 10;
/// Priority of fold-hidden text decorations.
pub const PRIORITY_HIDDEN: i32 = 100;

/// Underline rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnderlineStyle {
    /// A straight underline.
    Straight,
    /// A squiggly underline (diagnostics).
    Squiggly,
}

/// What a decoration represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationKind {
    /// Syntax coloring derived from a token.
    Syntax(TokenKind),
    /// An underline (diagnostics).
    Underline(UnderlineStyle),
    /// The selection background.
    SelectionBackground,
    /// A bracket-pair highlight.
    BracketHighlight,
    /// Text hidden by a collapsed fold region.
    HiddenText,
}

/// One overlay anchored to a character range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    /// The covered character range.
    pub range: TextRange,
    /// What this decoration represents.
    pub kind: DecorationKind,
    /// Overlap tie-breaker; higher wins at render time.
    pub priority: i32,
    /// Optional hover payload (diagnostic messages).
    pub tooltip: Option<String>,
    /// Bold trait (keywords).
    pub bold: bool,
    /// Italic trait (comments).
    pub italic: bool,
}

impl Decoration {
    /// Create a decoration with no tooltip and no traits.
    pub fn new(range: TextRange, kind: DecorationKind, priority: i32) -> Self {
        Self {
            range,
            kind,
            priority,
            tooltip: None,
            bold: false,
            italic: false,
        }
    }
}

/// Merges the decoration sources into one queryable overlay list.
#[derive(Default)]
pub struct DecorationModel {
    syntax: Vec<Decoration>,
    diagnostic: Vec<Decoration>,
    selection: Vec<Decoration>,
    bracket: Vec<Decoration>,
    hidden: Vec<Decoration>,
    merged: Vec<Decoration>,
}

impl DecorationModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the syntax decorations from a token sequence.
    ///
    /// Whitespace tokens produce no decoration; keywords carry the bold
    /// trait, comments the italic trait.
    pub fn update_tokens(&mut self, tokens: &[Token]) {
        self.syntax = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Whitespace)
            .map(|t| {
                let mut deco = Decoration::new(t.range, DecorationKind::Syntax(t.kind), PRIORITY_SYNTAX);
                deco.bold = t.kind == TokenKind::Keyword;
                deco.italic =
                    t.kind == TokenKind::LineComment || t.kind == TokenKind::BlockComment;
                deco
            })
            .collect();
        self.rebuild();
    }

    /// Replace the diagnostic underlines.
    pub fn update_diagnostics(&mut self, diagnostics: &[Diagnostic]) {
        self.diagnostic = diagnostics
            .iter()
            .map(|d| {
                let mut deco = Decoration::new(
                    d.range,
                    DecorationKind::Underline(UnderlineStyle::Squiggly),
                    PRIORITY_DIAGNOSTIC,
                );
                deco.tooltip = Some(d.message.clone());
                deco
            })
            .collect();
        self.rebuild();
    }

    /// Replace the selection background: one decoration for a non-collapsed
    /// selection, none otherwise.
    pub fn update_selection(&mut self, selection: &Selection) {
        self.selection.clear();
        if !selection.is_collapsed() {
            self.selection.push(Decoration::new(
                selection.range(),
                DecorationKind::SelectionBackground,
                PRIORITY_SELECTION,
            ));
        }
        self.rebuild();
    }

    /// Replace the bracket highlights from a match result: open side always,
    /// close side only when matched.
    pub fn update_bracket_match(&mut self, result: Option<&BracketMatch>) {
        self.bracket.clear();
        if let Some(result) = result {
            self.bracket.push(Decoration::new(
                result.open,
                DecorationKind::BracketHighlight,
                PRIORITY_BRACKET,
            ));
            if let Some(close) = result.close {
                self.bracket.push(Decoration::new(
                    close,
                    DecorationKind::BracketHighlight,
                    PRIORITY_BRACKET,
                ));
            }
        }
        self.rebuild();
    }

    /// Replace the fold-hidden decorations with an externally supplied list,
    /// merged verbatim.
    pub fn update_hidden(&mut self, decorations: Vec<Decoration>) {
        self.hidden = decorations;
        self.rebuild();
    }

    /// The full merged overlay list, sorted by range start.
    pub fn decorations(&self) -> &[Decoration] {
        &self.merged
    }

    /// Every decoration intersecting `range` (half-open overlap), sorted by
    /// descending priority.
    pub fn decorations_in(&self, range: TextRange) -> Vec<&Decoration> {
        let mut hits: Vec<&Decoration> = self
            .merged
            .iter()
            .filter(|d| d.range.intersects(range))
            .collect();
        hits.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.range.start.cmp(&b.range.start)));
        hits
    }

    fn rebuild(&mut self) {
        self.merged.clear();
        self.merged.extend(self.syntax.iter().cloned());
        self.merged.extend(self.diagnostic.iter().cloned());
        self.merged.extend(self.selection.iter().cloned());
        self.merged.extend(self.bracket.iter().cloned());
        self.merged.extend(self.hidden.iter().cloned());
        self.merged.sort_by_key(|d| (d.range.start, d.range.end));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::tokenizer;

    #[test]
    fn test_tokens_map_to_syntax_decorations() {
        let text = "let x = 1 // note";
        let tokens = tokenizer::tokenize(text);
        let mut model = DecorationModel::new();
        model.update_tokens(&tokens);

        // Whitespace produces nothing.
        let whitespace_count = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Whitespace)
            .count();
        assert_eq!(model.decorations().len(), tokens.len() - whitespace_count);

        let keyword = model
            .decorations()
            .iter()
            .find(|d| d.kind == DecorationKind::Syntax(TokenKind::Keyword))
            .unwrap();
        assert!(keyword.bold);
        assert!(!keyword.italic);

        let comment = model
            .decorations()
            .iter()
            .find(|d| d.kind == DecorationKind::Syntax(TokenKind::LineComment))
            .unwrap();
        assert!(comment.italic);
    }

    #[test]
    fn test_diagnostics_become_squiggly_underlines() {
        let mut model = DecorationModel::new();
        model.update_diagnostics(&[Diagnostic::new(
            TextRange::new(2, 5),
            Severity::Error,
            "Unterminated string literal",
        )]);

        let deco = &model.decorations()[0];
        assert_eq!(deco.kind, DecorationKind::Underline(UnderlineStyle::Squiggly));
        assert_eq!(deco.priority, PRIORITY_DIAGNOSTIC);
        assert_eq!(deco.tooltip.as_deref(), Some("Unterminated string literal"));
    }

    #[test]
    fn test_collapsed_selection_has_no_decoration() {
        let mut model = DecorationModel::new();
        model.update_selection(&Selection::caret(3));
        assert!(model.decorations().is_empty());

        model.update_selection(&Selection::new(3, 7));
        assert_eq!(model.decorations().len(), 1);
        assert_eq!(model.decorations()[0].priority, PRIORITY_SELECTION);
    }

    #[test]
    fn test_bracket_match_decorations() {
        let mut model = DecorationModel::new();

        model.update_bracket_match(Some(&BracketMatch {
            open: TextRange::new(0, 1),
            close: Some(TextRange::new(5, 6)),
        }));
        assert_eq!(model.decorations().len(), 2);

        model.update_bracket_match(Some(&BracketMatch {
            open: TextRange::new(0, 1),
            close: None,
        }));
        assert_eq!(model.decorations().len(), 1);

        model.update_bracket_match(None);
        assert!(model.decorations().is_empty());
    }

    #[test]
    fn test_query_sorts_by_descending_priority() {
        let mut model = DecorationModel::new();
        model.update_tokens(&tokenizer::tokenize("abc"));
        model.update_diagnostics(&[Diagnostic::new(
            TextRange::new(0, 3),
            Severity::Warning,
            "note",
        )]);
        model.update_selection(&Selection::new(0, 2));

        let hits = model.decorations_in(TextRange::new(0, 1));
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].priority, PRIORITY_DIAGNOSTIC);
        assert_eq!(hits[2].priority, PRIORITY_SELECTION);
    }

    #[test]
    fn test_query_uses_half_open_overlap() {
        let mut model = DecorationModel::new();
        model.update_diagnostics(&[Diagnostic::new(TextRange::new(5, 8), Severity::Info, "x")]);

        assert!(model.decorations_in(TextRange::new(0, 5)).is_empty());
        assert!(!model.decorations_in(TextRange::new(0, 6)).is_empty());
        assert!(model.decorations_in(TextRange::new(8, 10)).is_empty());
    }

    #[test]
    fn test_sources_update_independently() {
        let mut model = DecorationModel::new();
        model.update_tokens(&tokenizer::tokenize("x"));
        model.update_diagnostics(&[Diagnostic::new(TextRange::new(0, 1), Severity::Hint, "h")]);
        assert_eq!(model.decorations().len(), 2);

        // Replacing diagnostics leaves syntax in place.
        model.update_diagnostics(&[]);
        assert_eq!(model.decorations().len(), 1);
        assert!(matches!(model.decorations()[0].kind, DecorationKind::Syntax(_)));
    }
}
