//! Error types for a CRM update.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::routines::quadrature::QuadratureError;

/// Result type for the CRM computation.
pub type Result<T> = std::result::Result<T, CrmError>;

/// Errors that abort a CRM update.
///
/// None of these are recoverable for the current call, and no partial
/// [Recommendation](crate::crm::Recommendation) is produced when one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CrmError {
    /// Invalid model selector.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Missing, empty or out-of-range input data.
    #[error("input error: {0}")]
    Input(String),

    /// A working buffer could not be allocated.
    #[error("resource error: {0}")]
    Resource(String),

    /// The posterior integrals could not be computed reliably.
    #[error("numerical error: {0}")]
    Numerical(String),
}

impl CrmError {
    pub(crate) fn input(message: impl Into<String>) -> Self {
        CrmError::Input(message.into())
    }
}

impl From<TryReserveError> for CrmError {
    fn from(err: TryReserveError) -> Self {
        CrmError::Resource(format!("Failed to allocate memory: {}", err))
    }
}

impl From<QuadratureError> for CrmError {
    fn from(err: QuadratureError) -> Self {
        CrmError::Numerical(err.to_string())
    }
}
