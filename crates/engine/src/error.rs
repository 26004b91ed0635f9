//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidAmount`] thrown when an amount is negative, not finite or not a number.
//! - [`InvalidField`] thrown when a required text field is empty or a value is unknown.
//! - [`InvalidSelection`] thrown when a year/month selector cannot be parsed.
//! - [`Export`] thrown when CSV serialization fails.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidField`]: EngineError::InvalidField
//!  [`InvalidSelection`]: EngineError::InvalidSelection
//!  [`Export`]: EngineError::Export
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
    #[error("Export failed: {0}")]
    Export(String),
}

impl EngineError {
    pub(crate) fn empty(field: &'static str) -> Self {
        Self::InvalidField {
            field,
            reason: "must not be empty".to_string(),
        }
    }
}

impl From<csv::Error> for EngineError {
    fn from(value: csv::Error) -> Self {
        Self::Export(value.to_string())
    }
}
