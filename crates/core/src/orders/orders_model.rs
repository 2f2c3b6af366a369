use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::invoices::LineItem;

/// Sales pipeline status of an order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Potential,
    Offered,
    LetterOfIntent,
    Commissioned,
    Escalated,
    Completed,
    Rejected,
    Replaced,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Potential => "POTENTIAL",
            OrderStatus::Offered => "OFFERED",
            OrderStatus::LetterOfIntent => "LETTER_OF_INTENT",
            OrderStatus::Commissioned => "COMMISSIONED",
            OrderStatus::Escalated => "ESCALATED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Rejected => "REJECTED",
            OrderStatus::Replaced => "REPLACED",
        }
    }

    /// The customer has placed the order, so its volume is billable.
    pub fn is_commissioned(&self) -> bool {
        matches!(
            self,
            OrderStatus::Commissioned | OrderStatus::Escalated | OrderStatus::Completed
        )
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "POTENTIAL" => Ok(OrderStatus::Potential),
            "OFFERED" => Ok(OrderStatus::Offered),
            "LETTER_OF_INTENT" => Ok(OrderStatus::LetterOfIntent),
            "COMMISSIONED" => Ok(OrderStatus::Commissioned),
            "ESCALATED" => Ok(OrderStatus::Escalated),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "REJECTED" => Ok(OrderStatus::Rejected),
            "REPLACED" => Ok(OrderStatus::Replaced),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

/// A sales order; positions share the invoice line-item shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub number: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    pub currency: String,
    pub order_date: NaiveDate,
    #[serde(default)]
    pub positions: Vec<LineItem>,
    /// Net amount already invoiced against this order
    pub invoiced_net: Option<Decimal>,
    #[serde(default)]
    pub deleted: bool,
    pub project_id: Option<String>,
}

impl Order {
    pub fn new(
        id: impl Into<String>,
        status: OrderStatus,
        currency: impl Into<String>,
        order_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            number: None,
            status,
            currency: currency.into(),
            order_date,
            positions: Vec::new(),
            invoiced_net: None,
            deleted: false,
            project_id: None,
        }
    }

    pub fn with_positions(mut self, positions: Vec<LineItem>) -> Self {
        self.positions = positions;
        self
    }

    pub fn with_invoiced(mut self, invoiced_net: Decimal) -> Self {
        self.invoiced_net = Some(invoiced_net);
        self
    }

    pub fn label(&self) -> &str {
        self.number.as_deref().unwrap_or(&self.id)
    }
}
