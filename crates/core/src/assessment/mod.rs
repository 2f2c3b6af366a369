//! Business assessment module - rolls ledger records up into report row trees
//! and lines several reports up as table columns.

pub mod assessment_builder;
mod assessment_model;

pub use assessment_builder::{
    align, build_report, build_table, child_reports_by_cost_center, rows_with_priority,
};
pub use assessment_model::*;
