use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A rate that applies from `active_from` until the next entry of the same pair.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RateEntry {
    pub active_from: NaiveDate,
    /// Units of the pair's `to_currency` per one unit of its `from_currency`.
    pub rate: Decimal,
}

impl RateEntry {
    pub fn new(active_from: NaiveDate, rate: Decimal) -> Self {
        Self { active_from, rate }
    }
}

/// A directed currency pair with its effective-dated rate list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyPair {
    pub from_currency: String,
    pub to_currency: String,
    #[serde(default)]
    pub rates: Vec<RateEntry>,
}

impl CurrencyPair {
    pub fn new(from_currency: impl Into<String>, to_currency: impl Into<String>) -> Self {
        Self {
            from_currency: from_currency.into(),
            to_currency: to_currency.into(),
            rates: Vec::new(),
        }
    }

    /// Builder-style helper for adding a rate entry.
    pub fn with_rate(mut self, active_from: NaiveDate, rate: Decimal) -> Self {
        self.rates.push(RateEntry::new(active_from, rate));
        self
    }

    /// Returns the most recent rate active on `date`, i.e. the entry with the
    /// latest `active_from <= date`. When two entries share that date the one
    /// listed last wins.
    pub fn rate_on(&self, date: NaiveDate) -> Option<Decimal> {
        self.rates
            .iter()
            .filter(|entry| entry.active_from <= date)
            .max_by_key(|entry| entry.active_from)
            .map(|entry| entry.rate)
    }

    /// Pair key in `FROM/TO` form, used in diagnostics.
    pub fn key(&self) -> String {
        format!("{}/{}", self.from_currency, self.to_currency)
    }
}
