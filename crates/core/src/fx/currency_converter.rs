use crate::fx::fx_errors::FxError;
use crate::fx::fx_model::CurrencyPair;
use crate::fx::fx_traits::FxRateProviderTrait;
use crate::money::Money;
use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

/// A currency pair picked for a conversion, either as stored (`inverse == false`)
/// or read backwards (`inverse == true`, rates are `1 / rate`).
#[derive(Debug, Clone, Copy)]
pub struct ResolvedPair<'a> {
    pub pair: &'a CurrencyPair,
    pub inverse: bool,
}

impl ResolvedPair<'_> {
    /// Rate for converting in the requested direction on `date`.
    /// `None` when the date lies before every known entry, or when an inverse
    /// lookup hits a zero rate.
    pub fn rate_on(&self, date: NaiveDate) -> Option<Decimal> {
        let rate = self.pair.rate_on(date)?;
        if !self.inverse {
            return Some(rate);
        }
        if rate.is_zero() {
            warn!(
                "Zero rate for {} on {}, cannot invert",
                self.pair.key(),
                date
            );
            return None;
        }
        Decimal::ONE.checked_div(rate)
    }
}

/// Immutable snapshot of all known currency pairs.
///
/// The table is built once (from a list or a [`FxRateProviderTrait`]) and then only
/// read. Refreshing rates means building a new table; callers that share it
/// across threads wrap it in an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct CurrencyRateTable {
    /// Key: (From_Currency, To_Currency)
    pairs: HashMap<(String, String), CurrencyPair>,
}

impl CurrencyRateTable {
    /// Creates a table from a list of pairs.
    ///
    /// Pairs listed more than once are merged into a single rate list. Pairs
    /// from a currency to itself are skipped, they are never consulted.
    pub fn new(pairs: Vec<CurrencyPair>) -> Result<Self, FxError> {
        let mut table = CurrencyRateTable::default();
        for pair in pairs {
            table.insert(pair)?;
        }
        debug!("Currency rate table loaded with {} pairs", table.len());
        Ok(table)
    }

    /// Takes a fresh snapshot from a rate provider.
    pub fn from_provider(provider: &dyn FxRateProviderTrait) -> crate::Result<Self> {
        let pairs = provider.get_currency_pairs()?;
        Ok(Self::new(pairs)?)
    }

    fn insert(&mut self, pair: CurrencyPair) -> Result<(), FxError> {
        if pair.from_currency.trim().is_empty() || pair.to_currency.trim().is_empty() {
            return Err(FxError::InvalidCurrencyCode(format!(
                "blank currency code in pair '{}'",
                pair.key()
            )));
        }
        if pair.from_currency == pair.to_currency {
            debug!("Skipping same-currency pair {}", pair.key());
            return Ok(());
        }
        if let Some(entry) = pair.rates.iter().find(|entry| entry.rate <= Decimal::ZERO) {
            return Err(FxError::InvalidRate(format!(
                "{} has non-positive rate {} active from {}",
                pair.key(),
                entry.rate,
                entry.active_from
            )));
        }

        let key = (pair.from_currency.clone(), pair.to_currency.clone());
        match self.pairs.get_mut(&key) {
            Some(existing) => existing.rates.extend(pair.rates),
            None => {
                self.pairs.insert(key, pair);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Direct lookup of a stored pair.
    pub fn pair(&self, from_currency: &str, to_currency: &str) -> Option<&CurrencyPair> {
        self.pairs
            .get(&(from_currency.to_string(), to_currency.to_string()))
    }

    /// Finds the pair to use for converting `from_currency` into `to_currency`.
    ///
    /// A direct pair wins over the inverse pair when both exist. `None` means the
    /// conversion is unavailable; callers degrade to a warning.
    pub fn resolve(&self, from_currency: &str, to_currency: &str) -> Option<ResolvedPair<'_>> {
        if let Some(pair) = self.pair(from_currency, to_currency) {
            return Some(ResolvedPair {
                pair,
                inverse: false,
            });
        }
        self.pair(to_currency, from_currency)
            .map(|pair| ResolvedPair {
                pair,
                inverse: true,
            })
    }

    /// Rate for `from_currency -> to_currency` on `date`, resolving direct or inverse.
    pub fn rate_on(&self, from_currency: &str, to_currency: &str, date: NaiveDate) -> Option<Decimal> {
        if from_currency == to_currency {
            return Some(Decimal::ONE);
        }
        self.resolve(from_currency, to_currency)?.rate_on(date)
    }

    /// Converts `amount` into `to_currency` with the rate active on `date`.
    ///
    /// Same-currency conversions return the amount unchanged without touching the
    /// table. Returns `None` when no pair or no rate on that date is available.
    pub fn convert(
        &self,
        amount: &Money,
        to_currency: &str,
        date: NaiveDate,
        scale: u32,
        strategy: RoundingStrategy,
    ) -> Option<Money> {
        if amount.currency() == to_currency {
            return Some(amount.clone());
        }

        let Some(resolved) = self.resolve(amount.currency(), to_currency) else {
            warn!(
                "No currency pair for {} -> {}",
                amount.currency(),
                to_currency
            );
            return None;
        };
        let Some(rate) = resolved.rate_on(date) else {
            warn!(
                "No rate for {} -> {} active on {}",
                amount.currency(),
                to_currency,
                date
            );
            return None;
        };

        let converted = amount.amount().checked_mul(rate)?;
        Some(Money::rounded(converted, to_currency, scale, strategy))
    }

    /// [`convert`](Self::convert) with the target currency's scale and half-up rounding.
    pub fn convert_default(
        &self,
        amount: &Money,
        to_currency: &str,
        date: NaiveDate,
    ) -> Option<Money> {
        let scale = crate::constants::currency_scale(to_currency);
        self.convert(
            amount,
            to_currency,
            date,
            scale,
            RoundingStrategy::MidpointAwayFromZero,
        )
    }
}
