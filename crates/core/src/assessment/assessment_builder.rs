use std::collections::{BTreeSet, HashMap, HashSet};

use log::debug;
use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::assessment::{
    AssessmentColumn, AssessmentTableRow, BusinessAssessment, BusinessAssessmentRow,
    BusinessAssessmentTable, LedgerRecord, Priority, ReportSpec, RowDefinition,
};
use crate::errors::{Error, Result, ValidationError};
use crate::money::Money;

fn validate_definitions(definitions: &[RowDefinition]) -> Result<()> {
    fn visit<'a>(rows: &'a [RowDefinition], seen: &mut HashSet<&'a str>) -> Result<()> {
        for row in rows {
            if !seen.insert(row.id.as_str()) {
                return Err(Error::Assessment(format!("duplicate row id '{}'", row.id)));
            }
            if let Some(range) = row.accounts.iter().find(|range| range.from > range.to) {
                return Err(Error::Assessment(format!(
                    "row '{}' has an empty account range {}..{}",
                    row.id, range.from, range.to
                )));
            }
            visit(&row.children, seen)?;
        }
        Ok(())
    }
    visit(definitions, &mut HashSet::new())
}

/// Computes rows depth-first: children before their parent, siblings in order.
/// `computed` holds the unrounded amount of every row finished so far.
struct RowEvaluator<'a> {
    records: Vec<&'a LedgerRecord>,
    currency: &'a str,
    computed: HashMap<&'a str, Decimal>,
}

impl<'a> RowEvaluator<'a> {
    /// `depth` is the nesting level; a row is never indented less than its depth.
    fn evaluate(
        &mut self,
        definition: &'a RowDefinition,
        depth: u32,
    ) -> Result<BusinessAssessmentRow> {
        let children = definition
            .children
            .iter()
            .map(|child| self.evaluate(child, depth + 1))
            .collect::<Result<Vec<_>>>()?;

        let overflow = || Error::Assessment(format!("amount overflow in row '{}'", definition.id));

        let mut amount = self
            .records
            .iter()
            .filter(|record| {
                definition
                    .accounts
                    .iter()
                    .any(|range| range.contains(record.account_number))
            })
            .try_fold(Decimal::ZERO, |acc, record| acc.checked_add(record.amount))
            .ok_or_else(overflow)?;
        for child in &definition.children {
            let child_amount = self.computed.get(child.id.as_str()).copied().unwrap_or_default();
            amount = amount.checked_add(child_amount).ok_or_else(overflow)?;
        }
        for term in &definition.terms {
            let Some(referenced) = self.computed.get(term.row_id.as_str()).copied() else {
                return Err(Error::Assessment(format!(
                    "row '{}' references '{}', which is not computed before it",
                    definition.id, term.row_id
                )));
            };
            let next = if term.negate {
                amount.checked_sub(referenced)
            } else {
                amount.checked_add(referenced)
            };
            amount = next.ok_or_else(overflow)?;
        }

        self.computed.insert(definition.id.as_str(), amount);
        Ok(BusinessAssessmentRow {
            id: definition.id.clone(),
            number: definition.number.clone(),
            title: definition.title.clone(),
            indent: definition.indent.max(depth),
            priority: definition.priority,
            amount: Money::new(amount, self.currency),
            children,
        })
    }
}

/// Builds one report from the records selected by `spec.filter`.
///
/// Row amounts are signed sums; rounding to the currency scale happens once per
/// row, so parents and formula rows add up unrounded values.
pub fn build_report(
    definitions: &[RowDefinition],
    spec: &ReportSpec,
    records: &[LedgerRecord],
    currency: &str,
) -> Result<BusinessAssessment> {
    if currency.trim().is_empty() {
        return Err(ValidationError::MissingField("currency".to_string()).into());
    }
    validate_definitions(definitions)?;

    let selected: Vec<&LedgerRecord> = records
        .iter()
        .filter(|record| spec.filter.matches(record))
        .collect();
    debug!(
        "Building assessment '{}' from {} of {} records",
        spec.id,
        selected.len(),
        records.len()
    );

    let record_count = selected.len();
    let mut evaluator = RowEvaluator {
        records: selected,
        currency,
        computed: HashMap::new(),
    };
    let rows = definitions
        .iter()
        .map(|definition| evaluator.evaluate(definition, 0))
        .collect::<Result<Vec<_>>>()?;

    Ok(BusinessAssessment {
        report_id: spec.id.clone(),
        title: spec.title.clone(),
        currency: currency.to_string(),
        record_count,
        rows,
    })
}

fn flatten<'a>(rows: &'a [BusinessAssessmentRow], out: &mut Vec<&'a BusinessAssessmentRow>) {
    for row in rows {
        out.push(row);
        flatten(&row.children, out);
    }
}

/// Builds every report independently and lines their rows up by id.
pub fn build_table(
    definitions: &[RowDefinition],
    reports: &[ReportSpec],
    records: &[LedgerRecord],
    currency: &str,
) -> Result<BusinessAssessmentTable> {
    let built = reports
        .par_iter()
        .map(|spec| build_report(definitions, spec, records, currency))
        .collect::<Result<Vec<_>>>()?;
    Ok(align(&built, currency))
}

/// Lines up already built reports. Rows follow the first report's order;
/// a row missing from a report shows zero in that column.
pub fn align(reports: &[BusinessAssessment], currency: &str) -> BusinessAssessmentTable {
    let columns = reports
        .iter()
        .map(|report| AssessmentColumn {
            report_id: report.report_id.clone(),
            title: report.title.clone(),
        })
        .collect();

    let per_report: Vec<HashMap<&str, &BusinessAssessmentRow>> = reports
        .iter()
        .map(|report| {
            let mut flat = Vec::new();
            flatten(&report.rows, &mut flat);
            flat.into_iter().map(|row| (row.id.as_str(), row)).collect()
        })
        .collect();

    let mut layout = Vec::new();
    let mut seen = HashSet::new();
    for report in reports {
        let mut flat = Vec::new();
        flatten(&report.rows, &mut flat);
        layout.extend(flat.into_iter().filter(|row| seen.insert(row.id.as_str())));
    }

    let rows = layout
        .into_iter()
        .map(|row| AssessmentTableRow {
            id: row.id.clone(),
            number: row.number.clone(),
            title: row.title.clone(),
            indent: row.indent,
            priority: row.priority,
            amounts: per_report
                .iter()
                .map(|index| {
                    index
                        .get(row.id.as_str())
                        .map(|found| found.amount.clone())
                        .unwrap_or_else(|| Money::zero(currency))
                })
                .collect(),
        })
        .collect();

    BusinessAssessmentTable {
        currency: currency.to_string(),
        columns,
        rows,
    }
}

/// Rows at or above the requested verbosity, with their amounts untouched.
/// A hidden row hides its subtree.
pub fn rows_with_priority(
    rows: &[BusinessAssessmentRow],
    max_priority: Priority,
) -> Vec<BusinessAssessmentRow> {
    rows.iter()
        .filter(|row| row.priority <= max_priority)
        .map(|row| BusinessAssessmentRow {
            children: rows_with_priority(&row.children, max_priority),
            ..row.clone()
        })
        .collect()
}

/// One drill-down report per cost center found in the parent's records. Each
/// child keeps the parent's other criteria and can be built on its own.
pub fn child_reports_by_cost_center(
    parent: &ReportSpec,
    records: &[LedgerRecord],
) -> Vec<ReportSpec> {
    let cost_centers: BTreeSet<&str> = records
        .iter()
        .filter(|record| parent.filter.matches(record))
        .filter_map(|record| record.cost_center_id.as_deref())
        .collect();

    cost_centers
        .into_iter()
        .map(|cost_center| {
            ReportSpec::new(
                format!("{}/{}", parent.id, cost_center),
                format!("{} - {}", parent.title, cost_center),
            )
            .with_filter(parent.filter.clone().with_cost_center(cost_center))
        })
        .collect()
}
