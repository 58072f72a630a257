//! Error types for the bizpulse service.
//!
//! Degenerate numeric inputs never surface here: the calculator maps them to
//! fallback values. What remains are missing data, storage failures and
//! broken invariants, each carrying an HTTP status for the API layer.

use thiserror::Error;

/// Result type alias for bizpulse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the bizpulse service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ═══════════════════════════════════════════════════════════════════
    // Data Errors
    // ═══════════════════════════════════════════════════════════════════

    /// No financial summary has been recorded for the current period
    #[error("Financial data not found")]
    FinancialDataNotFound,

    /// Invalid input parameter
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Computation Errors
    // ═══════════════════════════════════════════════════════════════════

    /// A computed report broke one of its invariants
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    // ═══════════════════════════════════════════════════════════════════
    // Serialization Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ═══════════════════════════════════════════════════════════════════
    // Internal Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Internal error (should not happen in production)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Lock acquisition failed
    #[error("Failed to acquire lock")]
    Lock,

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Returns true if the caller can fix this by supplying data
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::FinancialDataNotFound | Error::InvalidParameter { .. }
        )
    }

    /// Returns true if this is a critical error requiring immediate attention
    pub fn is_critical(&self) -> bool {
        matches!(self, Error::InvariantViolation(_) | Error::Internal(_))
    }

    /// Returns the error code for external systems
    pub fn code(&self) -> u32 {
        match self {
            // Data errors: 1xxx
            Error::FinancialDataNotFound => 1001,
            Error::InvalidParameter { .. } => 1002,

            // Computation errors: 2xxx
            Error::InvariantViolation(_) => 2001,

            // Serialization errors: 7xxx
            Error::Serialization(_) => 7001,
            Error::Deserialization(_) => 7002,

            // Internal errors: 9xxx
            Error::Internal(_) => 9001,
            Error::Lock => 9002,
            Error::Storage(_) => 9003,
        }
    }

    /// HTTP status code this error is reported with
    pub fn status_code(&self) -> u16 {
        match self {
            Error::FinancialDataNotFound => 404,
            Error::InvalidParameter { .. } => 400,
            _ => 500,
        }
    }
}
