//! Error types for spec parsing and plan construction.
//!
//! Every failure is fail-fast: the first error aborts compilation and carries
//! the 1-based source line (0 when the error is not tied to a line) plus the
//! offending fragment.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Malformed fragment inside an otherwise recognizable line.
    #[error("format error at line {line}: {reason}: {fragment:?}")]
    Format {
        line: usize,
        fragment: String,
        reason: String,
    },

    /// Line that does not fit the grammar, or a structural problem.
    #[error("parse error at line {line}: {reason}: {fragment:?}")]
    Parse {
        line: usize,
        fragment: String,
        reason: String,
    },

    /// A built-in grammar pattern failed to compile.
    #[error("invalid grammar pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A renderer could not serialize the plan.
    #[error("render failed: {0}")]
    Render(String),
}

impl Error {
    pub fn format(line: usize, fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            line,
            fragment: fragment.into(),
            reason: reason.into(),
        }
    }

    pub fn parse(line: usize, fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            fragment: fragment.into(),
            reason: reason.into(),
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Error::Format { line, .. } | Error::Parse { line, .. } => *line,
            Error::Pattern(_) | Error::Render(_) => 0,
        }
    }

    /// Attach a line number to an error raised without one.
    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            Error::Format {
                fragment, reason, ..
            } => Error::Format {
                line,
                fragment,
                reason,
            },
            Error::Parse {
                fragment, reason, ..
            } => Error::Parse {
                line,
                fragment,
                reason,
            },
            other => other,
        }
    }
}
