use log::debug;

use crate::allocations::{
    AllocationError, AllocationPolicy, Cost2Code, CostAllocation, Reconciliation,
};
use crate::errors::{Error, Result};
use crate::invoices::{compute_line_item, Invoice, LineItem};
use crate::money::Money;

fn active_sorted(item: &LineItem) -> Vec<CostAllocation> {
    let mut allocations: Vec<CostAllocation> = item.active_allocations().cloned().collect();
    allocations.sort_by_key(|a| a.index);
    allocations
}

/// Matches the active allocations of `item` against its net amount.
///
/// The shortfall is signed: positive when money is still unassigned, negative
/// when more than the net amount has been allocated. Neither is an error.
pub fn reconcile(item: &LineItem) -> Result<Reconciliation> {
    let net_sum = compute_line_item(item)?.net_sum;
    let allocations = active_sorted(item);
    let allocated = Money::sum(item.currency(), allocations.iter().map(|a| &a.net_amount))?;
    let shortfall = net_sum.subtract(&allocated)?;
    Ok(Reconciliation {
        position: item.position,
        net_sum,
        allocated,
        shortfall,
        allocations,
    })
}

/// Appends a new allocation row that balances the position.
///
/// The new row gets the next free index, copies the cost references (not the
/// amount) of the visible predecessor row and is preset to the current
/// shortfall. Without a cost-2 reference it falls back to the first active
/// cost-2 code of the position's project.
pub fn add_default_allocation(
    item: &mut LineItem,
    project_codes: &[Cost2Code],
) -> Result<CostAllocation> {
    let reconciliation = reconcile(item)?;

    let index = match item.allocations.iter().map(|a| a.index).max() {
        Some(max) => max.checked_add(1).ok_or_else(|| {
            Error::Unexpected(format!(
                "allocation index overflow in position {}",
                item.position
            ))
        })?,
        None => 0,
    };

    let mut allocation = CostAllocation::new(index, reconciliation.shortfall);
    if let Some(predecessor) = reconciliation.allocations.last() {
        allocation.cost_center_id = predecessor.cost_center_id.clone();
        allocation.cost2_id = predecessor.cost2_id.clone();
    }
    if allocation.cost2_id.is_none() {
        allocation.cost2_id = project_codes
            .iter()
            .find(|code| code.active)
            .map(|code| code.id.clone());
    }

    debug!(
        "Adding allocation {} to position {} with {}",
        index, item.position, allocation.net_amount
    );
    item.allocations.push(allocation.clone());
    Ok(allocation)
}

/// Returns the active allocations, creating the single default row first if the
/// position has none yet.
pub fn ensure_default_allocation(item: &mut LineItem) -> Result<Vec<CostAllocation>> {
    if item.active_allocations().next().is_none() {
        add_default_allocation(item, &[])?;
    }
    Ok(active_sorted(item))
}

fn check_deletable(item: &LineItem, index: u32, policy: AllocationPolicy) -> Result<()> {
    let not_deletable = |reason: &str| AllocationError::NotDeletable {
        position: item.position,
        index,
        reason: reason.to_string(),
    };

    if !item.active_allocations().any(|a| a.index == index) {
        return Err(AllocationError::NotFound {
            position: item.position,
            index,
        }
        .into());
    }
    if !policy.editable {
        return Err(not_deletable("invoice is not editable").into());
    }

    let active = item.active_allocations().count();
    if active <= policy.min_rows {
        let net_sum = compute_line_item(item)?.net_sum;
        if !net_sum.is_zero() {
            return Err(not_deletable("position needs at least one allocation row").into());
        }
    }
    Ok(())
}

/// Whether the allocation `index` of `item` may be removed under `policy`.
pub fn is_deletable(item: &LineItem, index: u32, policy: AllocationPolicy) -> bool {
    check_deletable(item, index, policy).is_ok()
}

/// Removes allocation `index` (as a tombstone, so indices stay stable) and returns
/// the remaining active allocations.
pub fn delete_allocation(
    item: &mut LineItem,
    index: u32,
    policy: AllocationPolicy,
) -> Result<Vec<CostAllocation>> {
    check_deletable(item, index, policy)?;
    if let Some(allocation) = item
        .allocations
        .iter_mut()
        .find(|a| a.index == index && !a.deleted)
    {
        allocation.deleted = true;
    }
    Ok(active_sorted(item))
}

/// Reconciles every non-deleted position and returns those that do not balance.
pub fn invoice_shortfalls(invoice: &Invoice) -> Result<Vec<Reconciliation>> {
    if !invoice.capabilities.cost_allocation {
        return Err(AllocationError::NotSupported(invoice.label().to_string()).into());
    }
    let mut shortfalls = Vec::new();
    for item in invoice.positions.iter().filter(|p| !p.deleted) {
        let reconciliation = reconcile(item)?;
        if !reconciliation.is_balanced() {
            shortfalls.push(reconciliation);
        }
    }
    Ok(shortfalls)
}
