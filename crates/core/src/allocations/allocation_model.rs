use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{MIN_ALLOCATION_ROWS, PERCENT_PRECISION};
use crate::money::{percentage, Money};
use crate::settings::Settings;

/// Share of a position's net amount booked to a cost center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostAllocation {
    /// Stable, unique within the position; never reused after deletion
    pub index: u32,
    /// Cost center (Kost1)
    pub cost_center_id: Option<String>,
    /// Project-bound cost-2 code (Kost2)
    pub cost2_id: Option<String>,
    pub net_amount: Money,
    pub comment: Option<String>,
    /// Tombstone flag; removed rows keep their index
    #[serde(default)]
    pub deleted: bool,
}

impl CostAllocation {
    pub fn new(index: u32, net_amount: Money) -> Self {
        Self {
            index,
            cost_center_id: None,
            cost2_id: None,
            net_amount,
            comment: None,
            deleted: false,
        }
    }

    pub fn with_cost_center(mut self, cost_center_id: impl Into<String>) -> Self {
        self.cost_center_id = Some(cost_center_id.into());
        self
    }

    pub fn with_cost2(mut self, cost2_id: impl Into<String>) -> Self {
        self.cost2_id = Some(cost2_id.into());
        self
    }
}

/// A cost-2 code of the project a position belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cost2Code {
    pub id: String,
    pub active: bool,
}

impl Cost2Code {
    pub fn active(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            active: true,
        }
    }

    pub fn inactive(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            active: false,
        }
    }
}

/// Result of matching a position's allocations against its net amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub position: u32,
    pub net_sum: Money,
    pub allocated: Money,
    /// net_sum - allocated; positive means under-allocated, negative over-allocated
    pub shortfall: Money,
    /// Active allocations in index order
    pub allocations: Vec<CostAllocation>,
}

impl Reconciliation {
    pub fn is_balanced(&self) -> bool {
        self.shortfall.is_zero()
    }

    /// Allocated share of the net amount in percent; zero for a zero position.
    pub fn allocated_percentage(&self) -> Decimal {
        percentage(
            self.allocated.amount(),
            self.net_sum.amount(),
            PERCENT_PRECISION,
        )
    }
}

/// Caller-supplied rules for removing allocation rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationPolicy {
    /// Whether the owning invoice is currently editable
    pub editable: bool,
    /// Rows a position with a non-zero net amount keeps
    pub min_rows: usize,
}

impl AllocationPolicy {
    pub fn editable(editable: bool) -> Self {
        Self {
            editable,
            min_rows: MIN_ALLOCATION_ROWS,
        }
    }

    pub fn from_settings(settings: &Settings, editable: bool) -> Self {
        Self {
            editable,
            min_rows: settings.min_allocation_rows.max(1),
        }
    }
}
