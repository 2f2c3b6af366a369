use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::MoneyError;
use crate::constants::currency_scale;

/// Rounds with `strategy` and pads to exactly `scale` decimal places.
#[inline]
fn at_scale(value: Decimal, scale: u32, strategy: RoundingStrategy) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(scale, strategy);
    rounded.rescale(scale);
    rounded
}

/// Rounds half-up (away from zero on a tie) to `scale` decimal places.
#[inline]
pub fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    at_scale(value, scale, RoundingStrategy::MidpointAwayFromZero)
}

/// `numerator / denominator` rounded half-up to `scale`. A zero denominator
/// yields zero instead of failing.
pub fn ratio(numerator: Decimal, denominator: Decimal, scale: u32) -> Decimal {
    match numerator.checked_div(denominator) {
        Some(value) => round_half_up(value, scale),
        None => Decimal::ZERO,
    }
}

/// Percentage of `part` relative to `whole` (0-100), rounded half-up to `scale`.
/// A zero `whole` yields zero instead of failing.
pub fn percentage(part: Decimal, whole: Decimal, scale: u32) -> Decimal {
    match part.checked_mul(Decimal::ONE_HUNDRED) {
        Some(scaled) => ratio(scaled, whole, scale),
        None => Decimal::ZERO,
    }
}

/// A decimal amount in a specific currency.
///
/// [`Money::new`] and deserialization hold amounts at the scale of their
/// currency (2 places unless the currency has no or three minor digits).
/// [`Money::rounded`] keeps the scale it was given, e.g. for sub-cent unit
/// prices. `add` and `subtract` are exact; rounding happens where a computed
/// amount is produced (`new`, `multiply`, `round_to`).
///
/// Values are immutable: every operation returns a new `Money`. Arithmetic and
/// comparison across currencies fails with [`MoneyError::IncompatibleCurrency`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawMoney")]
pub struct Money {
    amount: Decimal,
    currency: String,
}

/// Wire shape of [`Money`]; stored amounts are normalised through [`Money::new`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMoney {
    amount: Decimal,
    currency: String,
}

impl From<RawMoney> for Money {
    fn from(raw: RawMoney) -> Self {
        Money::new(raw.amount, raw.currency)
    }
}

impl Money {
    /// Creates a value rounded half-up to the currency's scale.
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        let currency = currency.into();
        let amount = round_half_up(amount, currency_scale(&currency));
        Money { amount, currency }
    }

    /// Creates a value rounded to an explicit scale with an explicit strategy.
    pub fn rounded(
        amount: Decimal,
        currency: impl Into<String>,
        scale: u32,
        strategy: RoundingStrategy,
    ) -> Self {
        Money {
            amount: at_scale(amount, scale, strategy),
            currency: currency.into(),
        }
    }

    pub fn zero(currency: impl Into<String>) -> Self {
        Money::new(Decimal::ZERO, currency)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Decimal places used for this money's currency.
    pub fn scale(&self) -> u32 {
        currency_scale(&self.currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::IncompatibleCurrency {
                left: self.currency.clone(),
                right: other.currency.clone(),
            });
        }
        Ok(())
    }

    /// Exact sum; the result keeps the larger scale of the two operands.
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| MoneyError::Overflow(format!("{} + {}", self, other)))?;
        Ok(Money {
            amount,
            currency: self.currency.clone(),
        })
    }

    pub fn subtract(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(|| MoneyError::Overflow(format!("{} - {}", self, other)))?;
        Ok(Money {
            amount,
            currency: self.currency.clone(),
        })
    }

    /// Multiplies by `factor` at full precision, then rounds half-up to the currency scale.
    pub fn multiply(&self, factor: Decimal) -> Result<Money, MoneyError> {
        let amount = self
            .amount
            .checked_mul(factor)
            .ok_or_else(|| MoneyError::Overflow(format!("{} * {}", self, factor)))?;
        Ok(Money::new(amount, self.currency.clone()))
    }

    /// `percent` of this amount, e.g. `percent_of(2)` is two percent.
    pub fn percent_of(&self, percent: Decimal) -> Result<Money, MoneyError> {
        let factor = percent
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or_else(|| MoneyError::Overflow(format!("{} / 100", percent)))?;
        self.multiply(factor)
    }

    /// Share of this amount in `whole` as a percentage. Zero when `whole` is zero.
    pub fn percentage_of(&self, whole: &Money, scale: u32) -> Result<Decimal, MoneyError> {
        self.ensure_same_currency(whole)?;
        Ok(percentage(self.amount, whole.amount, scale))
    }

    pub fn negate(&self) -> Money {
        Money {
            amount: -self.amount,
            currency: self.currency.clone(),
        }
    }

    pub fn compare_to(&self, other: &Money) -> Result<Ordering, MoneyError> {
        self.ensure_same_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    /// Re-rounds to an explicit scale and strategy.
    pub fn round_to(&self, scale: u32, strategy: RoundingStrategy) -> Money {
        Money::rounded(self.amount, self.currency.clone(), scale, strategy)
    }

    /// Exact sum of `values`, all of which must be in `currency`. An empty input
    /// sums to zero.
    pub fn sum<'a, I>(currency: &str, values: I) -> Result<Money, MoneyError>
    where
        I: IntoIterator<Item = &'a Money>,
    {
        values
            .into_iter()
            .try_fold(Money::zero(currency), |acc, value| acc.add(value))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
