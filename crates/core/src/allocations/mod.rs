//! Cost allocation ("Kostzuweisung") module - reconciles the cost-center split of a
//! position against its net amount.

mod allocation_errors;
mod allocation_model;
pub mod allocation_reconciler;

pub use allocation_errors::AllocationError;
pub use allocation_model::*;
pub use allocation_reconciler::{
    add_default_allocation, delete_allocation, ensure_default_allocation, invoice_shortfalls,
    is_deletable, reconcile,
};

#[cfg(test)]
mod allocation_reconciler_tests;
