//! Invoices module - line-item calculation, invoice totals and the host-facing service.

pub mod invoice_aggregator;
mod invoices_model;
mod invoices_service;
pub mod line_item_calculator;

pub use invoice_aggregator::{convert_totals, recalculate};
pub use invoices_model::*;
pub use invoices_service::{InvoiceService, InvoiceServiceTrait};
pub use line_item_calculator::compute_line_item;
