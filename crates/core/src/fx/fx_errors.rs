use thiserror::Error;

/// Errors raised while loading currency pairs into a rate table.
///
/// Lookups never produce these: an unknown pair or a date before the first
/// known rate is reported as `None`.
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),

    #[error("Rate provider failed: {0}")]
    ProviderError(String),
}
