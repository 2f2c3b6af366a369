//! Core error types for the Kontor engine.
//!
//! Hard failures (caller bugs such as an invoice without a currency or mixing
//! currencies in one sum) are reported through [`Error`]. Missing external data,
//! e.g. an unknown exchange rate, is never an error: those lookups return
//! `Option` and the caller decides how to surface them.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

use crate::allocations::AllocationError;
use crate::fx::FxError;
use crate::money::MoneyError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Money operation failed: {0}")]
    Money(#[from] MoneyError),

    #[error("Invalid invoice state: {0}")]
    InvalidInvoiceState(String),

    #[error("Invalid order state: {0}")]
    InvalidOrderState(String),

    #[error("Cost allocation failed: {0}")]
    Allocation(#[from] AllocationError),

    #[error("Fx error: {0}")]
    Fx(#[from] FxError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Business assessment failed: {0}")]
    Assessment(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("VAT rate {rate} of position {position} is outside [0, 1]")]
    VatRateOutOfRange {
        position: u32,
        rate: rust_decimal::Decimal,
    },

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] ChronoParseError),
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
