#![warn(missing_docs)]
//! `edit-engine` - Headless Source-Code Text-Editing Engine
//!
//! # Overview
//!
//! `edit-engine` is the non-visual model of a code editor: it stores document
//! text, tracks edit history, classifies characters into syntax tokens,
//! derives visual overlays, and manages caret/selection and code-folding
//! state. It assumes a presentation layer (rendering, input capture, popups)
//! on top; that layer calls in through the query and mutation surface and is
//! responsible for everything drawn on screen.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Decorations / Folding / Diagnostics        │  ← Derived overlays
//! ├─────────────────────────────────────────────┤
//! │  Tokenizer (incremental)                    │  ← Syntax classification
//! ├─────────────────────────────────────────────┤
//! │  Selection / Undo / Search / Indent         │  ← Editing state
//! ├─────────────────────────────────────────────┤
//! │  Document (version, range-safe access)      │  ← Coordination
//! ├─────────────────────────────────────────────┤
//! │  TextStorage (compact / balanced tree)      │  ← Text storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use edit_engine::{CaretMotion, Document, SelectionManager, TextRange, Tokenizer};
//!
//! let mut doc = Document::new("func main() {\n    print(\"hi\")\n}");
//! let mut tokenizer = Tokenizer::new();
//! tokenizer.tokenize_full(&doc.content());
//!
//! let mut selection = SelectionManager::new();
//! selection.move_caret(&doc, CaretMotion::WordRight, false);
//! assert_eq!(selection.selection().head, 4);
//!
//! doc.replace(TextRange::new(0, 4), "fn").unwrap();
//! assert_eq!(doc.version(), 1);
//! ```
//!
//! # Coordinates and versions
//!
//! Every public offset is an absolute Unicode-scalar-value offset into the
//! current document; ranges are half-open. Each successful mutation bumps
//! the document version exactly once, and nothing here pushes updates: the
//! host re-queries tokens, decorations, and regions after mutating.
//!
//! # Concurrency model
//!
//! Single logical writer. None of these types lock internally; a tokenizer
//! instance is dedicated to one document's edit stream. The only work
//! designed to run off the keystroke path is analysis (see the
//! `edit-engine-analysis` crate), which is debounced and cancelable.

pub mod brackets;
pub mod clock;
pub mod decorations;
pub mod diagnostics;
pub mod document;
pub mod folding;
pub mod indent;
pub mod line_ending;
pub mod range;
pub mod search;
pub mod selection;
pub mod storage;
pub mod tokenizer;
pub mod tree;
pub mod undo;

pub use brackets::{BRACKET_PAIRS, BracketMatch, find_match};
pub use clock::{ManualClock, MonotonicClock, TimeSource};
pub use decorations::{
    Decoration, DecorationKind, DecorationModel, PRIORITY_BRACKET, PRIORITY_DIAGNOSTIC,
    PRIORITY_HIDDEN, PRIORITY_SELECTION, PRIORITY_SYNTAX, UnderlineStyle,
};
pub use diagnostics::{Diagnostic, Severity};
pub use document::{Document, DocumentSnapshot, EditError, SnapshotError};
pub use folding::{FoldKind, FoldRegion, FoldingModel};
pub use indent::IndentEngine;
pub use line_ending::LineEnding;
pub use range::TextRange;
pub use search::{SearchError, SearchOptions, find_all, find_next, find_prev};
pub use selection::{CaretMotion, Selection, SelectionManager};
pub use storage::{LARGE_DOCUMENT_LINE_THRESHOLD, TextStorage};
pub use tokenizer::{TextChange, Token, TokenKind, Tokenizer, tokenize};
pub use tree::TreeBuffer;
pub use undo::{COALESCING_WINDOW_MS, EditGroup, MAX_UNDO_GROUPS, TextEdit, UndoManager};
