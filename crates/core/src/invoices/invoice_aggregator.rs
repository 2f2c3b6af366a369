use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::errors::{Error, Result};
use crate::fx::CurrencyRateTable;
use crate::invoices::line_item_calculator::compute_line_item;
use crate::invoices::{ConvertedTotals, Invoice, InvoiceTotals, LineItemAmounts};
use crate::money::Money;
use crate::utils::time_utils::days_between;

fn ensure_computable(invoice: &Invoice) -> Result<()> {
    if invoice.currency.trim().is_empty() {
        return Err(Error::InvalidInvoiceState(format!(
            "invoice {} has no currency",
            invoice.label()
        )));
    }
    if invoice.positions.is_empty() {
        return Err(Error::InvalidInvoiceState(format!(
            "invoice {} has no positions",
            invoice.label()
        )));
    }
    Ok(())
}

/// Recomputes all derived values of `invoice` as of `today`.
///
/// Deleted positions are skipped. Missing optional fields (due date, payment,
/// discount) never fail; only an invoice without currency or without any
/// position is rejected with [`Error::InvalidInvoiceState`].
pub fn recalculate(invoice: &Invoice, today: NaiveDate) -> Result<InvoiceTotals> {
    ensure_computable(invoice)?;
    debug!(
        "Recalculating invoice {} ({} positions)",
        invoice.label(),
        invoice.positions.len()
    );

    let currency = invoice.currency.as_str();
    let positions: Vec<LineItemAmounts> = invoice
        .positions
        .iter()
        .filter(|item| !item.deleted)
        .map(compute_line_item)
        .collect::<Result<_>>()?;

    let net_sum = Money::sum(currency, positions.iter().map(|p| &p.net_sum))?;
    let vat_amount = Money::sum(currency, positions.iter().map(|p| &p.vat_amount))?;
    let gross_sum = Money::sum(currency, positions.iter().map(|p| &p.gross_sum))?;

    let due = invoice.due.resolve(invoice.invoice_date);
    let discount = invoice.discount.resolve(invoice.invoice_date);

    // Paid amount is compared unrounded; callers wanting a tolerance round it first.
    let paid_raw = invoice.paid_amount.unwrap_or(Decimal::ZERO);
    let paid_amount = Money::new(paid_raw, currency);
    let open_amount = gross_sum.subtract(&paid_amount)?;

    let is_paid = invoice
        .paid_amount
        .is_some_and(|paid| paid >= gross_sum.amount());
    let is_overdue = match due.date {
        Some(due_date) => gross_sum.amount() > paid_raw && today > due_date,
        None => false,
    };

    let (discount_amount, gross_after_discount) = match invoice.discount_percent {
        Some(percent) => {
            let amount = gross_sum.percent_of(percent)?;
            let remaining = gross_sum.subtract(&amount)?;
            (Some(amount), Some(remaining))
        }
        None => (None, None),
    };

    Ok(InvoiceTotals {
        currency: currency.to_string(),
        positions,
        net_sum,
        vat_amount,
        gross_sum,
        paid_amount,
        open_amount,
        due_date: due.date,
        payment_term_days: due.days,
        discount_date: discount.date,
        discount_term_days: discount.days,
        discount_amount,
        gross_after_discount,
        is_overdue,
        is_paid,
        days_to_pay: invoice
            .paid_date
            .map(|paid_date| days_between(invoice.invoice_date, paid_date)),
        days_until_due: due.date.map(|due_date| days_between(today, due_date)),
    })
}

/// Expresses `totals` in `target_currency` with the rate active on `date`.
///
/// Returns `None` when no pair or rate is available; the native totals stay
/// valid and callers surface this as a warning.
pub fn convert_totals(
    totals: &InvoiceTotals,
    table: &CurrencyRateTable,
    target_currency: &str,
    date: NaiveDate,
) -> Option<ConvertedTotals> {
    let Some(rate) = table.rate_on(&totals.currency, target_currency, date) else {
        warn!(
            "Totals in {} cannot be converted to {} on {}",
            totals.currency, target_currency, date
        );
        return None;
    };
    Some(ConvertedTotals {
        currency: target_currency.to_string(),
        rate,
        rate_date: date,
        net_sum: table.convert_default(&totals.net_sum, target_currency, date)?,
        vat_amount: table.convert_default(&totals.vat_amount, target_currency, date)?,
        gross_sum: table.convert_default(&totals.gross_sum, target_currency, date)?,
        open_amount: table.convert_default(&totals.open_amount, target_currency, date)?,
    })
}
