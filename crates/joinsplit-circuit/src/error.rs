//! error types for joinsplit circuit construction and witness generation

use thiserror::Error;

use crate::constraint::Variable;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// wrong-length bit array, address bits != depth, misaligned hash input
    #[error("shape mismatch in {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("public variable allocated after private variables")]
    PublicAfterPrivate,

    #[error("variable {0:?} has no assigned value")]
    Unassigned(Variable),

    #[error("variable {0:?} cannot be assigned")]
    ConstantWire(Variable),

    #[error("constraint {index} unsatisfied ({annotation})")]
    Unsatisfied { index: usize, annotation: String },

    #[error("invalid circuit parameters: {0}")]
    InvalidParams(String),

    #[error("value out of range: {0}")]
    ValueOutOfRange(String),

    #[error("hex decoding error: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl Error {
    pub(crate) fn shape(what: &'static str, expected: usize, actual: usize) -> Self {
        Error::ShapeMismatch {
            what,
            expected,
            actual,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
