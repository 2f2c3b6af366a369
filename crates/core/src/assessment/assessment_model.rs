//! Business assessment (BWA) models: row definitions, ledger records and the
//! computed report tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// One booked amount on a ledger account, as delivered by the accounting import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecord {
    pub account_number: u32,
    /// Signed amount; credits are negative
    pub amount: Decimal,
    pub cost_center_id: Option<String>,
    pub cost2_id: Option<String>,
    pub date: NaiveDate,
}

impl LedgerRecord {
    pub fn new(account_number: u32, amount: Decimal, date: NaiveDate) -> Self {
        Self {
            account_number,
            amount,
            cost_center_id: None,
            cost2_id: None,
            date,
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

/// Inclusive range of ledger account numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRange {
    pub from: u32,
    pub to: u32,
}

impl AccountRange {
    pub fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    pub fn single(account: u32) -> Self {
        Self::new(account, account)
    }

    pub fn contains(&self, account: u32) -> bool {
        (self.from..=self.to).contains(&account)
    }
}

/// Adds (or subtracts) the amount of a row computed earlier in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaTerm {
    pub row_id: String,
    #[serde(default)]
    pub negate: bool,
}

impl FormulaTerm {
    pub fn plus(row_id: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            negate: false,
        }
    }

    pub fn minus(row_id: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            negate: true,
        }
    }
}

/// Verbosity level of a row. Lower levels are shown in more condensed views.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Summary,
    #[default]
    Standard,
    Detail,
}

/// Layout of one report row. A row's amount is the sum of the ledger records
/// on its accounts, its child rows and its formula terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowDefinition {
    pub id: String,
    pub number: Option<String>,
    pub title: String,
    #[serde(default)]
    pub indent: u32,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub accounts: Vec<AccountRange>,
    /// Terms may only reference rows that come earlier in the report
    #[serde(default)]
    pub terms: Vec<FormulaTerm>,
    #[serde(default)]
    pub children: Vec<RowDefinition>,
}

impl RowDefinition {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            number: None,
            title: title.into(),
            indent: 0,
            priority: Priority::default(),
            accounts: Vec::new(),
            terms: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn with_accounts(mut self, accounts: Vec<AccountRange>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_terms(mut self, terms: Vec<FormulaTerm>) -> Self {
        self.terms = terms;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Children are indented one level below their parent, at every depth.
    pub fn with_children(mut self, children: Vec<RowDefinition>) -> Self {
        self.children = children;
        let indent = self.indent;
        self.indent_children(indent);
        self
    }

    fn indent_children(&mut self, parent_indent: u32) {
        let child_indent = parent_indent + 1;
        for child in &mut self.children {
            child.indent = child.indent.max(child_indent);
            let indent = child.indent;
            child.indent_children(indent);
        }
    }
}

/// Selects the ledger records a report is built from. Unset criteria match all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    pub cost_center_id: Option<String>,
    pub cost2_id: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl RecordFilter {
    pub fn with_cost_center(mut self, cost_center_id: impl Into<String>) -> Self {
        self.cost_center_id = Some(cost_center_id.into());
        self
    }

    pub fn with_cost2(mut self, cost2_id: impl Into<String>) -> Self {
        self.cost2_id = Some(cost2_id.into());
        self
    }

    pub fn between(mut self, from_date: NaiveDate, to_date: NaiveDate) -> Self {
        self.from_date = Some(from_date);
        self.to_date = Some(to_date);
        self
    }

    pub fn matches(&self, record: &LedgerRecord) -> bool {
        if let Some(cost_center) = &self.cost_center_id {
            if record.cost_center_id.as_ref() != Some(cost_center) {
                return false;
            }
        }
        if let Some(cost2) = &self.cost2_id {
            if record.cost2_id.as_ref() != Some(cost2) {
                return false;
            }
        }
        if self.from_date.is_some_and(|from| record.date < from) {
            return false;
        }
        if self.to_date.is_some_and(|to| record.date > to) {
            return false;
        }
        true
    }
}

/// One column of a table: a named record selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSpec {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub filter: RecordFilter,
}

impl ReportSpec {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            filter: RecordFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessAssessmentRow {
    pub id: String,
    pub number: Option<String>,
    pub title: String,
    pub indent: u32,
    pub priority: Priority,
    pub amount: Money,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<BusinessAssessmentRow>,
}

impl BusinessAssessmentRow {
    pub fn find(&self, id: &str) -> Option<&BusinessAssessmentRow> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// A computed report: one row tree for one record selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessAssessment {
    pub report_id: String,
    pub title: String,
    pub currency: String,
    /// Number of ledger records that passed the report's filter
    pub record_count: usize,
    pub rows: Vec<BusinessAssessmentRow>,
}

impl BusinessAssessment {
    pub fn find_row(&self, id: &str) -> Option<&BusinessAssessmentRow> {
        self.rows.iter().find_map(|row| row.find(id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentColumn {
    pub report_id: String,
    pub title: String,
}

/// A row aligned across all columns of a table; `amounts[i]` belongs to `columns[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentTableRow {
    pub id: String,
    pub number: Option<String>,
    pub title: String,
    pub indent: u32,
    pub priority: Priority,
    pub amounts: Vec<Money>,
}

/// Reports side by side, rows in definition order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessAssessmentTable {
    pub currency: String,
    pub columns: Vec<AssessmentColumn>,
    pub rows: Vec<AssessmentTableRow>,
}

impl BusinessAssessmentTable {
    pub fn row(&self, id: &str) -> Option<&AssessmentTableRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Amount of row `id` in the column of report `report_id`.
    pub fn amount(&self, id: &str, report_id: &str) -> Option<&Money> {
        let column = self
            .columns
            .iter()
            .position(|column| column.report_id == report_id)?;
        self.row(id)?.amounts.get(column)
    }
}
