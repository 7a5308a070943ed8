//! Lending domain errors

use core_kernel::{MoneyError, PortError, TemporalError};
use thiserror::Error;

/// Errors that can occur in the lending domain
///
/// The projection engine itself never fails; these surface from loan term
/// construction, strict request validation and ledger access.
#[derive(Debug, Error)]
pub enum LendingError {
    /// Loan terms violate principal/rate/term invariants
    #[error("Invalid loan terms: {0}")]
    InvalidTerms(String),

    /// Unrecognized payment scheme name
    #[error("Unknown payment frequency: {0}")]
    UnknownFrequency(String),

    /// Unrecognized recurrence name for recurring receivables
    #[error("Unknown recurrence: {0}")]
    UnknownRecurrence(String),

    /// Loan not present in the ledger
    #[error("Loan not found: {0}")]
    LoanNotFound(String),

    /// Request rejected under strict validation
    #[error(transparent)]
    Validation(#[from] crate::request::ValidationError),

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    #[error("Calendar error: {0}")]
    Temporal(#[from] TemporalError),

    /// Failure in the payment ledger adapter
    #[error("Ledger error: {0}")]
    Ledger(#[from] PortError),
}

impl LendingError {
    pub fn invalid_terms(message: impl Into<String>) -> Self {
        LendingError::InvalidTerms(message.into())
    }
}
