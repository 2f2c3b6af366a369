//! Kontor Core - invoice and order computation engine.
//!
//! This crate contains the financial logic behind invoices and sales orders:
//! line-item and invoice totals, cost-allocation reconciliation, currency
//! conversion, dashboard statistics and business assessment reports.
//! It is persistence-agnostic; hosts pass in loaded entities and get computed
//! views back.

pub mod allocations;
pub mod assessment;
pub mod constants;
pub mod errors;
pub mod fx;
pub mod invoices;
pub mod money;
pub mod orders;
pub mod settings;
pub mod statistics;
pub mod utils;

// Re-export the types nearly every caller touches
pub use invoices::{Invoice, InvoiceTotals, LineItem};
pub use money::Money;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
