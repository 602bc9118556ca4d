use std::fmt;
use thiserror::Error;

/// Why a line could not be accepted while reading the header block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorReason {
    /// An indented line appeared before any field was opened.
    NoMatchForContinuation,
    /// The line has no `name:` prefix.
    CannotParseField,
}

impl fmt::Display for ParseErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorReason::NoMatchForContinuation => f.write_str("no match for continuation"),
            ParseErrorReason::CannotParseField => f.write_str("cannot parse field"),
        }
    }
}

#[derive(Error, Debug)]
pub enum MessageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    Parse {
        line: usize,
        reason: ParseErrorReason,
    },

    #[error("not found: {0}")]
    NotFound(String),
}

impl MessageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, MessageError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, MessageError>;
