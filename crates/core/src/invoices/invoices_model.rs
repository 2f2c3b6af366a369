use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::allocations::CostAllocation;
use crate::errors::ValidationError;
use crate::money::Money;
use crate::utils::time_utils::{add_days, days_between};

/// Which side of the business an invoice belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceKind {
    /// Outgoing invoice to a customer
    #[default]
    Sales,
    /// Incoming invoice from a vendor
    Vendor,
}

/// Lifecycle status of an invoice as maintained by the editing workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Planned, not yet sent
    Draft,
    #[default]
    Issued,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "DRAFT",
            InvoiceStatus::Issued => "ISSUED",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Optional behaviours an invoice takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceCapabilities {
    /// Totals may be converted into the system currency
    pub currency_conversion: bool,
    /// Positions carry cost allocations that must be reconciled
    pub cost_allocation: bool,
}

impl Default for InvoiceCapabilities {
    fn default() -> Self {
        Self {
            currency_conversion: true,
            cost_allocation: true,
        }
    }
}

/// Payment details only vendor invoices carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VendorDetails {
    pub receiver: Option<String>,
    pub iban: Option<String>,
    pub bic: Option<String>,
    pub customer_reference: Option<String>,
}

/// A date that is either given explicitly or as an offset in days from the
/// invoice date. Only one representation is authoritative at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum DueDateSpec {
    ExplicitDate(NaiveDate),
    TermDays(i64),
    #[default]
    Unset,
}

/// Both representations of a [`DueDateSpec`] after derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTerm {
    pub date: Option<NaiveDate>,
    pub days: Option<i64>,
}

impl DueDateSpec {
    /// Builds the term from the two stored fields; an explicit date wins.
    pub fn from_fields(date: Option<NaiveDate>, days: Option<i64>) -> Self {
        match (date, days) {
            (Some(date), _) => DueDateSpec::ExplicitDate(date),
            (None, Some(days)) => DueDateSpec::TermDays(days),
            (None, None) => DueDateSpec::Unset,
        }
    }

    /// Derives the missing representation relative to `invoice_date`.
    pub fn resolve(&self, invoice_date: NaiveDate) -> ResolvedTerm {
        match *self {
            DueDateSpec::ExplicitDate(date) => ResolvedTerm {
                date: Some(date),
                days: Some(days_between(invoice_date, date)),
            },
            DueDateSpec::TermDays(days) => ResolvedTerm {
                date: add_days(invoice_date, days),
                days: Some(days),
            },
            DueDateSpec::Unset => ResolvedTerm::default(),
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, DueDateSpec::Unset)
    }
}

/// A single invoice or order position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Position number, stable across edits and used for cross-references
    pub position: u32,
    #[serde(default)]
    pub text: String,
    pub quantity: Decimal,
    pub unit_net: Money,
    /// Ratio in [0, 1], e.g. 0.19
    pub vat_rate: Decimal,
    #[serde(default)]
    pub deleted: bool,
    /// Cost allocations in arena order; removed rows stay as tombstones
    #[serde(default)]
    pub allocations: Vec<CostAllocation>,
}

impl LineItem {
    pub fn new(position: u32, quantity: Decimal, unit_net: Money, vat_rate: Decimal) -> Self {
        Self {
            position,
            text: String::new(),
            quantity,
            unit_net,
            vat_rate,
            deleted: false,
            allocations: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_allocations(mut self, allocations: Vec<CostAllocation>) -> Self {
        self.allocations = allocations;
        self
    }

    pub fn currency(&self) -> &str {
        self.unit_net.currency()
    }

    /// Allocations that have not been removed.
    pub fn active_allocations(&self) -> impl Iterator<Item = &CostAllocation> {
        self.allocations.iter().filter(|a| !a.deleted)
    }

    /// Input validation for the editing workflow. The calculator itself never rejects.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.vat_rate < Decimal::ZERO || self.vat_rate > Decimal::ONE {
            return Err(ValidationError::VatRateOutOfRange {
                position: self.position,
                rate: self.vat_rate,
            });
        }
        Ok(())
    }
}

/// Computed amounts of one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemAmounts {
    pub position: u32,
    pub net_sum: Money,
    pub vat_amount: Money,
    pub gross_sum: Money,
}

/// Sales or vendor invoice as loaded by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub number: Option<String>,
    #[serde(default)]
    pub kind: InvoiceKind,
    #[serde(default)]
    pub capabilities: InvoiceCapabilities,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub currency: String,
    pub invoice_date: NaiveDate,
    #[serde(default)]
    pub due: DueDateSpec,
    #[serde(default)]
    pub discount: DueDateSpec,
    /// Skonto in percent, e.g. 2 for two percent
    pub discount_percent: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
    pub paid_date: Option<NaiveDate>,
    pub positions: Vec<LineItem>,
    #[serde(default)]
    pub deleted: bool,
    pub project_id: Option<String>,
    pub vendor: Option<VendorDetails>,
}

impl Invoice {
    pub fn new(
        id: impl Into<String>,
        kind: InvoiceKind,
        currency: impl Into<String>,
        invoice_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            number: None,
            kind,
            capabilities: InvoiceCapabilities::default(),
            status: InvoiceStatus::default(),
            currency: currency.into(),
            invoice_date,
            due: DueDateSpec::Unset,
            discount: DueDateSpec::Unset,
            discount_percent: None,
            paid_amount: None,
            paid_date: None,
            positions: Vec::new(),
            deleted: false,
            project_id: None,
            vendor: None,
        }
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn with_positions(mut self, positions: Vec<LineItem>) -> Self {
        self.positions = positions;
        self
    }

    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_due(mut self, due: DueDateSpec) -> Self {
        self.due = due;
        self
    }

    pub fn with_discount(mut self, discount: DueDateSpec, percent: Option<Decimal>) -> Self {
        self.discount = discount;
        self.discount_percent = percent;
        self
    }

    pub fn with_payment(mut self, amount: Decimal, date: Option<NaiveDate>) -> Self {
        self.paid_amount = Some(amount);
        self.paid_date = date;
        self
    }

    /// Human-facing reference: the invoice number, or the id while unnumbered.
    pub fn label(&self) -> &str {
        self.number.as_deref().unwrap_or(&self.id)
    }

    pub fn position(&self, number: u32) -> Option<&LineItem> {
        self.positions.iter().find(|p| p.position == number)
    }

    pub fn position_mut(&mut self, number: u32) -> Option<&mut LineItem> {
        self.positions.iter_mut().find(|p| p.position == number)
    }
}

/// Totals of an invoice, recomputed on demand and never stored on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub currency: String,
    pub positions: Vec<LineItemAmounts>,
    pub net_sum: Money,
    pub vat_amount: Money,
    pub gross_sum: Money,
    pub paid_amount: Money,
    /// gross - paid
    pub open_amount: Money,
    pub due_date: Option<NaiveDate>,
    pub payment_term_days: Option<i64>,
    pub discount_date: Option<NaiveDate>,
    pub discount_term_days: Option<i64>,
    pub discount_amount: Option<Money>,
    pub gross_after_discount: Option<Money>,
    pub is_overdue: bool,
    pub is_paid: bool,
    /// Days from invoice date to the recorded payment
    pub days_to_pay: Option<i64>,
    /// Days from today to the due date, negative once it has passed
    pub days_until_due: Option<i64>,
}

/// Invoice amounts expressed in another currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedTotals {
    pub currency: String,
    pub rate: Decimal,
    pub rate_date: NaiveDate,
    pub net_sum: Money,
    pub vat_amount: Money,
    pub gross_sum: Money,
    pub open_amount: Money,
}
