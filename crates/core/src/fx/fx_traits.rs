use super::fx_model::CurrencyPair;
use crate::errors::Result;

/// Source of currency pairs and their effective-dated rates.
///
/// Implemented by the host (database, remote feed, static file). The engine only
/// reads from it, once per [`CurrencyRateTable`](super::CurrencyRateTable) snapshot.
pub trait FxRateProviderTrait: Send + Sync {
    fn get_currency_pairs(&self) -> Result<Vec<CurrencyPair>>;
}
