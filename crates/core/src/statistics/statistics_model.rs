use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::Result;
use crate::invoices::{ConvertedTotals, InvoiceTotals};
use crate::money::{ratio, Money};
use crate::orders::OrderStatus;

/// Which amount of an invoice a category accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatisticsMetric {
    Net,
    Gross,
    Open,
    /// Only counted, the sum stays zero
    CountOnly,
}

impl StatisticsMetric {
    /// Picks the metric's amount.
    pub fn select(&self, amounts: &MetricAmounts) -> Money {
        match self {
            StatisticsMetric::Net => amounts.net.clone(),
            StatisticsMetric::Gross => amounts.gross.clone(),
            StatisticsMetric::Open => amounts.open.clone(),
            StatisticsMetric::CountOnly => Money::zero(amounts.gross.currency()),
        }
    }
}

/// The amounts a metric can pick from, in one currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricAmounts {
    pub net: Money,
    pub gross: Money,
    pub open: Money,
}

impl From<&InvoiceTotals> for MetricAmounts {
    fn from(totals: &InvoiceTotals) -> Self {
        Self {
            net: totals.net_sum.clone(),
            gross: totals.gross_sum.clone(),
            open: totals.open_amount.clone(),
        }
    }
}

impl From<&ConvertedTotals> for MetricAmounts {
    fn from(totals: &ConvertedTotals) -> Self {
        Self {
            net: totals.net_sum.clone(),
            gross: totals.gross_sum.clone(),
            open: totals.open_amount.clone(),
        }
    }
}

/// Dashboard categories for invoices. One invoice usually lands in several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceCategory {
    /// Every invoice that is not cancelled
    All,
    Draft,
    /// Issued and not fully paid
    Open,
    /// Open and past its due date
    Overdue,
    Paid,
    Cancelled,
    /// Foreign-currency invoices without a usable rate; counted, not summed
    RateUnavailable,
}

impl InvoiceCategory {
    pub fn metric(&self) -> StatisticsMetric {
        match self {
            InvoiceCategory::All
            | InvoiceCategory::Draft
            | InvoiceCategory::Paid
            | InvoiceCategory::Cancelled => StatisticsMetric::Gross,
            InvoiceCategory::Open | InvoiceCategory::Overdue => StatisticsMetric::Open,
            InvoiceCategory::RateUnavailable => StatisticsMetric::CountOnly,
        }
    }
}

/// Dashboard categories for sales orders, measured in net volume.
///
/// Serialized as a plain string (the status name, `TO_BE_INVOICED` or
/// `RATE_UNAVAILABLE`) so category maps can be written as JSON objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum OrderCategory {
    Status(OrderStatus),
    /// Commissioned volume not invoiced yet
    ToBeInvoiced,
    RateUnavailable,
}

const ORDER_CATEGORY_TO_BE_INVOICED: &str = "TO_BE_INVOICED";
const ORDER_CATEGORY_RATE_UNAVAILABLE: &str = "RATE_UNAVAILABLE";

impl OrderCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderCategory::Status(status) => status.as_str(),
            OrderCategory::ToBeInvoiced => ORDER_CATEGORY_TO_BE_INVOICED,
            OrderCategory::RateUnavailable => ORDER_CATEGORY_RATE_UNAVAILABLE,
        }
    }
}

impl fmt::Display for OrderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            ORDER_CATEGORY_TO_BE_INVOICED => Ok(OrderCategory::ToBeInvoiced),
            ORDER_CATEGORY_RATE_UNAVAILABLE => Ok(OrderCategory::RateUnavailable),
            _ => OrderStatus::from_str(s)
                .map(OrderCategory::Status)
                .map_err(|_| format!("Unknown order category: {}", s)),
        }
    }
}

impl From<OrderCategory> for String {
    fn from(category: OrderCategory) -> Self {
        category.as_str().to_string()
    }
}

impl TryFrom<String> for OrderCategory {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// Count and sum of the items that fell into one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsBucket {
    pub count: u64,
    pub sum: Money,
}

impl StatisticsBucket {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            count: 0,
            sum: Money::zero(currency),
        }
    }

    /// Returns a new bucket with one more item of `amount`.
    pub fn with(&self, amount: &Money) -> Result<Self> {
        Ok(Self {
            count: self.count + 1,
            sum: self.sum.add(amount)?,
        })
    }

    pub fn merge(&self, other: &StatisticsBucket) -> Result<Self> {
        Ok(Self {
            count: self.count + other.count,
            sum: self.sum.add(&other.sum)?,
        })
    }
}

/// Invoice statistics panel for one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub currency: String,
    pub count: u64,
    pub net_sum: Money,
    pub gross_sum: Money,
    pub open_sum: Money,
    pub overdue_count: u64,
    pub overdue_sum: Money,
    pub discount_sum: Money,
    pub payment_term_days_total: i64,
    pub payment_term_count: u64,
    pub days_to_pay_total: i64,
    pub days_to_pay_count: u64,
}

impl InvoiceSummary {
    pub fn new(currency: impl Into<String>) -> Self {
        let currency = currency.into();
        Self {
            count: 0,
            net_sum: Money::zero(currency.as_str()),
            gross_sum: Money::zero(currency.as_str()),
            open_sum: Money::zero(currency.as_str()),
            overdue_count: 0,
            overdue_sum: Money::zero(currency.as_str()),
            discount_sum: Money::zero(currency.as_str()),
            payment_term_days_total: 0,
            payment_term_count: 0,
            days_to_pay_total: 0,
            days_to_pay_count: 0,
            currency,
        }
    }

    pub fn add(&mut self, totals: &InvoiceTotals) -> Result<()> {
        self.count += 1;
        self.net_sum = self.net_sum.add(&totals.net_sum)?;
        self.gross_sum = self.gross_sum.add(&totals.gross_sum)?;
        if !totals.is_paid {
            self.open_sum = self.open_sum.add(&totals.open_amount)?;
        }
        if totals.is_overdue {
            self.overdue_count += 1;
            self.overdue_sum = self.overdue_sum.add(&totals.open_amount)?;
        }
        if let Some(discount) = &totals.discount_amount {
            self.discount_sum = self.discount_sum.add(discount)?;
        }
        if let Some(days) = totals.payment_term_days {
            self.payment_term_days_total = self.payment_term_days_total.saturating_add(days);
            self.payment_term_count += 1;
        }
        if let Some(days) = totals.days_to_pay {
            self.days_to_pay_total = self.days_to_pay_total.saturating_add(days);
            self.days_to_pay_count += 1;
        }
        Ok(())
    }

    /// Average agreed payment term in days, one decimal place.
    pub fn average_payment_term(&self) -> Option<Decimal> {
        average(self.payment_term_days_total, self.payment_term_count)
    }

    /// Average days between invoice date and actual payment, one decimal place.
    pub fn average_days_to_pay(&self) -> Option<Decimal> {
        average(self.days_to_pay_total, self.days_to_pay_count)
    }
}

fn average(total: i64, count: u64) -> Option<Decimal> {
    if count == 0 {
        return None;
    }
    Some(ratio(Decimal::from(total), Decimal::from(count), 1))
}
