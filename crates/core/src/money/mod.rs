//! Money/Decimal primitives - every monetary computation of the engine routes through here.

mod money_errors;
mod money_model;

pub use money_errors::MoneyError;
pub use money_model::{percentage, ratio, round_half_up, Money};
