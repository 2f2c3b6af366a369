//! FX (Foreign Exchange) module - currency pairs, the rate table snapshot and the
//! conversion resolver used for foreign-currency invoices.

pub mod currency_converter;
mod fx_errors;
mod fx_model;
mod fx_traits;

pub use currency_converter::{CurrencyRateTable, ResolvedPair};
pub use fx_errors::FxError;
pub use fx_model::{CurrencyPair, RateEntry};
pub use fx_traits::FxRateProviderTrait;
