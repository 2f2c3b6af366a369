use crate::errors::Result;
use crate::invoices::{LineItem, LineItemAmounts};

/// Computes net, VAT and gross amounts of a single position.
///
/// - net = quantity x unit net, rounded half-up to the currency scale
///   (quantity is used as-is, fractional person-days included)
/// - VAT = net x VAT rate, rounded
/// - gross = net + VAT
///
/// VAT rates outside [0, 1] are not rejected here, see [`LineItem::validate`].
pub fn compute_line_item(item: &LineItem) -> Result<LineItemAmounts> {
    let net_sum = item.unit_net.multiply(item.quantity)?;
    let vat_amount = net_sum.multiply(item.vat_rate)?;
    let gross_sum = net_sum.add(&vat_amount)?;
    Ok(LineItemAmounts {
        position: item.position,
        net_sum,
        vat_amount,
        gross_sum,
    })
}
