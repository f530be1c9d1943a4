//! Fold-region discovery.
//!
//! Derives the foldable-region catalog from the token stream: brace-delimited
//! blocks and block comments that span more than one line. The host feeds
//! the result to [`FoldingModel::update`](edit_engine::FoldingModel::update).

use edit_engine::{Document, FoldKind, FoldRegion, TextRange, Token, TokenKind};

/// Scan `tokens` for foldable regions in `doc`.
///
/// Regions that start and end on the same line are not worth folding and are
/// skipped. Placeholders are stable per kind so re-derived catalogs stay
/// value-identical and preserve fold state.
pub fn scan_fold_regions(doc: &Document, tokens: &[Token]) -> Vec<FoldRegion> {
    let mut regions = Vec::new();
    let mut open_braces: Vec<usize> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::BlockComment => {
                let start_line = doc.line_index(token.range.start);
                let end_line = doc.line_index(token.range.end.saturating_sub(1));
                if end_line > start_line {
                    regions.push(FoldRegion::with_placeholder(
                        token.range,
                        start_line,
                        end_line,
                        FoldKind::Comment,
                        "/* ... */",
                    ));
                }
            }
            TokenKind::Punctuation => match doc.char_at(token.range.start) {
                Some('{') => open_braces.push(token.range.start),
                Some('}') => {
                    let Some(open) = open_braces.pop() else {
                        continue;
                    };
                    let close = token.range.start;
                    let start_line = doc.line_index(open);
                    let end_line = doc.line_index(close);
                    if end_line > start_line {
                        regions.push(FoldRegion::with_placeholder(
                            TextRange::new(open, close + 1),
                            start_line,
                            end_line,
                            FoldKind::Braces,
                            "{ ... }",
                        ));
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    regions.sort_by_key(|r| (r.start_line, r.end_line));
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use edit_engine::tokenize;

    fn regions_for(text: &str) -> Vec<FoldRegion> {
        let doc = Document::new(text);
        scan_fold_regions(&doc, &tokenize(text))
    }

    #[test]
    fn test_multi_line_brace_block() {
        let text = "func f() {\n    body()\n}";
        let regions = regions_for(text);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].kind, FoldKind::Braces);
        assert_eq!(regions[0].start_line, 0);
        assert_eq!(regions[0].end_line, 2);
        assert_eq!(regions[0].range, TextRange::new(9, 23));
    }

    #[test]
    fn test_single_line_blocks_are_skipped() {
        assert!(regions_for("let x = { 1 }").is_empty());
        assert!(regions_for("/* same line */").is_empty());
    }

    #[test]
    fn test_nested_blocks_sorted_outer_first() {
        let text = "a {\n  b {\n    c\n  }\n}";
        let regions = regions_for(text);
        assert_eq!(regions.len(), 2);
        assert_eq!((regions[0].start_line, regions[0].end_line), (0, 4));
        assert_eq!((regions[1].start_line, regions[1].end_line), (1, 3));
    }

    #[test]
    fn test_multi_line_block_comment() {
        let text = "/* one\n   two */\ncode()";
        let regions = regions_for(text);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].kind, FoldKind::Comment);
        assert_eq!((regions[0].start_line, regions[0].end_line), (0, 1));
    }

    #[test]
    fn test_unbalanced_close_is_ignored() {
        let regions = regions_for("}\n{\nx\n}");
        assert_eq!(regions.len(), 1);
        assert_eq!((regions[0].start_line, regions[0].end_line), (1, 3));
    }

    #[test]
    fn test_braces_inside_strings_do_not_fold() {
        // The '{' inside the string literal is part of the string token, not
        // punctuation.
        let regions = regions_for("let s = \"{\"\nlet t = 2");
        assert!(regions.is_empty());
    }
}
