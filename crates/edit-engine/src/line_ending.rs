//! Line ending handling at the persistence boundary.
//!
//! The engine stores text with LF (`'\n'`) newlines only. Content arriving
//! from a host that uses CRLF is normalized before it enters a document, and
//! the preferred ending can be re-applied on the way out.

/// The preferred newline sequence of a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
}

impl LineEnding {
    /// Detect the dominant line ending: any CRLF present means
    /// [`LineEnding::Crlf`], otherwise [`LineEnding::Lf`].
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::Crlf
        } else {
            Self::Lf
        }
    }

    /// Normalize `text` to LF newlines for in-engine storage.
    pub fn normalize(text: &str) -> String {
        text.replace("\r\n", "\n")
    }

    /// Convert LF-normalized text back to this line ending.
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Lf => text.to_string(),
            Self::Crlf => text.replace('\n', "\r\n"),
        }
    }
}
