//! Diagnostics data model.
//!
//! Diagnostics are derived editor state (typically produced by the analysis
//! crate) that the decoration model turns into underline overlays and that
//! hosts surface as problem lists or gutter markers.

use crate::range::TextRange;

/// Diagnostic severity, ordered by rank: `Hint < Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// A hint.
    Hint,
    /// An informational note.
    Info,
    /// A warning.
    Warning,
    /// An error.
    Error,
}

/// A single diagnostic for the current document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The covered character range.
    pub range: TextRange,
    /// Human-readable message.
    pub message: String,
    /// Severity rank.
    pub severity: Severity,
}

impl Diagnostic {
    /// Create a diagnostic.
    pub fn new(range: TextRange, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
            severity,
        }
    }
}
