//! Error types shared by every numeric component of the crate.

use thiserror::Error;

/// Errors raised by divergence, information-dynamics and detrending routines.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DynamicsError {
    /// Two vectors (or a segment and its operator) disagree in length
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// A probability vector could not be normalized
    #[error("normalization error: {0}")]
    Normalization(String),

    /// Invalid window, segment length, order or exponent
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Singular or ill-conditioned least-squares system
    #[error("numeric instability: {0}")]
    NumericInstability(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DynamicsError>;

impl DynamicsError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        DynamicsError::Configuration(msg.into())
    }
}
