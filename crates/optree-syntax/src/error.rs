use std::fmt;

use rowan::{TextRange, TextSize};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad classification of a failed parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Unrecognized character, malformed number or unknown macro.
    Lexical,
    /// Missing operand, wrong macro arity, unmatched grouping or trailing tokens.
    Syntax,
    /// Scan buffer could not be allocated, input too large, nesting too deep,
    /// or the context was already closed.
    Resource,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "lexical error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
            ErrorKind::Resource => write!(f, "resource error"),
        }
    }
}

/// The first error met while tokenizing or parsing; it aborts the parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {range:?}: {message}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    /// Byte range of the offending input.
    pub range: TextRange,
}

pub type ParseResult<T> = Result<T, ParseError>;

impl ParseError {
    pub fn lexical(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            kind: ErrorKind::Lexical,
            message: message.into(),
            range,
        }
    }

    pub fn syntax(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            message: message.into(),
            range,
        }
    }

    pub fn resource(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            kind: ErrorKind::Resource,
            message: message.into(),
            range,
        }
    }

    /// Byte offset where the error starts.
    pub fn offset(&self) -> usize {
        u32::from(self.range.start()) as usize
    }
}

/// Builds a [`TextRange`] from byte offsets.
pub(crate) fn range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}
