use rust_decimal::Decimal;

use crate::errors::{Error, Result};
use crate::invoices::compute_line_item;
use crate::money::Money;
use crate::orders::Order;

/// Net volume of the order's non-deleted positions. An order without positions
/// has a volume of zero.
pub fn order_net_sum(order: &Order) -> Result<Money> {
    if order.currency.trim().is_empty() {
        return Err(Error::InvalidOrderState(format!(
            "order {} has no currency",
            order.label()
        )));
    }
    let mut net_sum = Money::zero(order.currency.as_str());
    for item in order.positions.iter().filter(|p| !p.deleted) {
        net_sum = net_sum.add(&compute_line_item(item)?.net_sum)?;
    }
    Ok(net_sum)
}

/// Net amount of a commissioned order not invoiced yet, never below zero.
/// Orders that are not commissioned have nothing to invoice.
pub fn to_be_invoiced(order: &Order) -> Result<Money> {
    let net_sum = order_net_sum(order)?;
    if !order.status.is_commissioned() {
        return Ok(Money::zero(order.currency.as_str()));
    }
    let invoiced = Money::new(
        order.invoiced_net.unwrap_or(Decimal::ZERO),
        order.currency.as_str(),
    );
    let remaining = net_sum.subtract(&invoiced)?;
    if remaining.is_negative() {
        return Ok(Money::zero(order.currency.as_str()));
    }
    Ok(remaining)
}
