use crate::pos::{Pos2, Size2};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifeError {
    #[error("invalid rule format {rule:?}: {reason}")]
    InvalidRuleFormat { rule: String, reason: String },

    #[error("malformed pattern at line {line}: {reason}")]
    MalformedPattern { line: usize, reason: String },

    #[error("cell {pos} is outside of the {size} grid")]
    OutOfBounds { pos: Pos2, size: Size2 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LifeError {
    pub(crate) fn rule<R: Into<String>, S: Into<String>>(rule: R, reason: S) -> Self {
        Self::InvalidRuleFormat {
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn pattern<S: Into<String>>(line: usize, reason: S) -> Self {
        Self::MalformedPattern {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LifeError>;
