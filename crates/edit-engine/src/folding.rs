//! Code-folding state.
//!
//! The [`FoldingModel`] tracks the catalog of foldable regions and the
//! folded subset. Fold state is keyed by full value identity: replacing the
//! catalog preserves the folded state only for regions that are
//! value-identical to a previous entry, and a region dropped from the
//! catalog loses its folded state even if an equivalent one reappears later
//! with different fields.

use crate::decorations::{Decoration, DecorationKind, PRIORITY_HIDDEN};
use crate::document::Document;
use crate::range::TextRange;

/// What produced a foldable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoldKind {
    /// A brace-delimited block.
    Braces,
    /// A multi-line comment.
    Comment,
}

/// A contiguous line range that can collapse to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FoldRegion {
    /// The covered character range.
    pub range: TextRange,
    /// First line of the region; stays visible when folded.
    pub start_line: usize,
    /// Last line of the region (inclusive); hidden when folded.
    pub end_line: usize,
    /// What produced this region.
    pub kind: FoldKind,
    /// Placeholder text shown when folded.
    pub placeholder: String,
}

impl FoldRegion {
    /// Create a region with the default placeholder.
    pub fn new(range: TextRange, start_line: usize, end_line: usize, kind: FoldKind) -> Self {
        Self {
            range,
            start_line,
            end_line,
            kind,
            placeholder: String::from("[...]"),
        }
    }

    /// Create a region with a custom placeholder.
    pub fn with_placeholder(
        range: TextRange,
        start_line: usize,
        end_line: usize,
        kind: FoldKind,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            range,
            start_line,
            end_line,
            kind,
            placeholder: placeholder.into(),
        }
    }
}

/// Tracks foldable regions and the folded subset; answers line-visibility
/// queries.
#[derive(Default)]
pub struct FoldingModel {
    foldable: Vec<FoldRegion>,
    folded: Vec<FoldRegion>,
}

impl FoldingModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog.
    ///
    /// The folded set is recomputed as the intersection with the new
    /// catalog: only value-identical survivors stay folded.
    pub fn update(&mut self, regions: Vec<FoldRegion>) {
        self.folded.retain(|r| regions.contains(r));
        self.foldable = regions;
    }

    /// The foldable catalog.
    pub fn foldable_regions(&self) -> &[FoldRegion] {
        &self.foldable
    }

    /// The folded subset.
    pub fn folded_regions(&self) -> &[FoldRegion] {
        &self.folded
    }

    /// Fold `region`. Returns `false` if it is not in the catalog.
    pub fn fold(&mut self, region: &FoldRegion) -> bool {
        if !self.foldable.contains(region) {
            return false;
        }
        if !self.folded.contains(region) {
            self.folded.push(region.clone());
        }
        true
    }

    /// Unfold `region`. Returns `false` if it was not folded.
    pub fn unfold(&mut self, region: &FoldRegion) -> bool {
        let before = self.folded.len();
        self.folded.retain(|r| r != region);
        self.folded.len() != before
    }

    /// Toggle the fold state of `region`. Returns `false` if it is not in
    /// the catalog.
    pub fn toggle_fold(&mut self, region: &FoldRegion) -> bool {
        if self.folded.contains(region) {
            self.unfold(region)
        } else {
            self.fold(region)
        }
    }

    /// Returns `true` if `line` is hidden by some folded region.
    ///
    /// The start line stays visible to host the fold affordance.
    pub fn is_line_hidden(&self, line: usize) -> bool {
        self.folded
            .iter()
            .any(|r| r.start_line < line && line <= r.end_line)
    }

    /// The first catalog entry starting at `line`.
    pub fn foldable_region_at(&self, line: usize) -> Option<&FoldRegion> {
        self.foldable.iter().find(|r| r.start_line == line)
    }

    /// Hidden-text decorations for the folded regions, ready to merge into
    /// the decoration model.
    ///
    /// Each decoration covers the region's hidden tail: everything after the
    /// (still visible) start line.
    pub fn hidden_decorations(&self, doc: &Document) -> Vec<Decoration> {
        self.folded
            .iter()
            .filter_map(|region| {
                let hidden_start = doc.offset_of_line(region.start_line + 1)?;
                let hidden_end = region.range.end.min(doc.char_len());
                if hidden_start >= hidden_end {
                    return None;
                }
                Some(Decoration::new(
                    TextRange::new(hidden_start, hidden_end),
                    DecorationKind::HiddenText,
                    PRIORITY_HIDDEN,
                ))
            })
            .collect()
    }
}
