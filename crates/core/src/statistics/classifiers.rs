use std::hash::Hash;

use chrono::NaiveDate;
use log::warn;

use crate::errors::Result;
use crate::fx::CurrencyRateTable;
use crate::invoices::{convert_totals, recalculate, Invoice, InvoiceStatus};
use crate::money::Money;
use crate::orders::{order_net_sum, to_be_invoiced, Order};
use crate::statistics::{InvoiceCategory, MetricAmounts, OrderCategory};

/// Items that can be folded into statistics buckets.
pub trait Aggregatable {
    fn is_deleted(&self) -> bool;
}

impl Aggregatable for Invoice {
    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl Aggregatable for Order {
    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// Maps one item to the buckets it counts toward, each with the amount the
/// bucket's metric accumulates. An item may land in zero or more buckets.
pub trait Classifier<T>: Sync {
    type Category: Eq + Hash + Clone + Send;

    /// Currency every bucket sum is kept in.
    fn currency(&self) -> &str;

    fn classify(&self, item: &T) -> Result<Vec<(Self::Category, Money)>>;
}

/// Dashboard view of invoices: every amount is shown in the system currency,
/// converted at the rate active on the invoice date.
#[derive(Debug, Clone, Copy)]
pub struct InvoiceDashboardClassifier<'a> {
    system_currency: &'a str,
    today: NaiveDate,
    table: &'a CurrencyRateTable,
}

impl<'a> InvoiceDashboardClassifier<'a> {
    pub fn new(system_currency: &'a str, today: NaiveDate, table: &'a CurrencyRateTable) -> Self {
        Self {
            system_currency,
            today,
            table,
        }
    }

    fn amounts(&self, invoice: &Invoice) -> Result<(Option<MetricAmounts>, bool, bool)> {
        let totals = recalculate(invoice, self.today)?;
        let amounts = if totals.currency == self.system_currency {
            Some(MetricAmounts::from(&totals))
        } else if invoice.capabilities.currency_conversion {
            convert_totals(&totals, self.table, self.system_currency, invoice.invoice_date)
                .map(|converted| MetricAmounts::from(&converted))
        } else {
            warn!(
                "Invoice {} in {} does not support currency conversion",
                invoice.label(),
                totals.currency
            );
            None
        };
        Ok((amounts, totals.is_paid, totals.is_overdue))
    }
}

impl Classifier<Invoice> for InvoiceDashboardClassifier<'_> {
    type Category = InvoiceCategory;

    fn currency(&self) -> &str {
        self.system_currency
    }

    fn classify(&self, invoice: &Invoice) -> Result<Vec<(InvoiceCategory, Money)>> {
        let (amounts, is_paid, is_overdue) = self.amounts(invoice)?;
        let Some(amounts) = amounts else {
            return Ok(vec![(
                InvoiceCategory::RateUnavailable,
                Money::zero(self.system_currency),
            )]);
        };

        let mut categories = Vec::with_capacity(3);
        match invoice.status {
            InvoiceStatus::Cancelled => categories.push(InvoiceCategory::Cancelled),
            InvoiceStatus::Draft => {
                categories.push(InvoiceCategory::All);
                categories.push(InvoiceCategory::Draft);
            }
            InvoiceStatus::Paid => {
                categories.push(InvoiceCategory::All);
                categories.push(InvoiceCategory::Paid);
            }
            InvoiceStatus::Issued => {
                categories.push(InvoiceCategory::All);
                if is_paid {
                    categories.push(InvoiceCategory::Paid);
                } else {
                    categories.push(InvoiceCategory::Open);
                    if is_overdue {
                        categories.push(InvoiceCategory::Overdue);
                    }
                }
            }
        }

        Ok(categories
            .into_iter()
            .map(|category| {
                let amount = category.metric().select(&amounts);
                (category, amount)
            })
            .collect())
    }
}

/// Sales pipeline view of orders: net volume per status plus the commissioned
/// volume still to be invoiced, in the system currency.
#[derive(Debug, Clone, Copy)]
pub struct OrderStatusClassifier<'a> {
    system_currency: &'a str,
    table: &'a CurrencyRateTable,
}

impl<'a> OrderStatusClassifier<'a> {
    pub fn new(system_currency: &'a str, table: &'a CurrencyRateTable) -> Self {
        Self {
            system_currency,
            table,
        }
    }
}

impl Classifier<Order> for OrderStatusClassifier<'_> {
    type Category = OrderCategory;

    fn currency(&self) -> &str {
        self.system_currency
    }

    fn classify(&self, order: &Order) -> Result<Vec<(OrderCategory, Money)>> {
        let net = order_net_sum(order)?;
        let open = to_be_invoiced(order)?;

        let converted = self
            .table
            .convert_default(&net, self.system_currency, order.order_date)
            .zip(
                self.table
                    .convert_default(&open, self.system_currency, order.order_date),
            );
        let Some((net, open)) = converted else {
            return Ok(vec![(
                OrderCategory::RateUnavailable,
                Money::zero(self.system_currency),
            )]);
        };

        let mut categories = vec![(OrderCategory::Status(order.status), net)];
        if order.status.is_commissioned() {
            categories.push((OrderCategory::ToBeInvoiced, open));
        }
        Ok(categories)
    }
}
