use thiserror::Error;

/// Errors raised by [`Money`](super::Money) arithmetic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Incompatible currencies: {left} and {right}")]
    IncompatibleCurrency { left: String, right: String },

    #[error("Arithmetic overflow while computing {0}")]
    Overflow(String),
}
