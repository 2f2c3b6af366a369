#[cfg(test)]
mod tests {
    use crate::allocations::{
        add_default_allocation, delete_allocation, ensure_default_allocation, invoice_shortfalls,
        is_deletable, reconcile, AllocationError, AllocationPolicy, Cost2Code, CostAllocation,
    };
    use crate::errors::Error;
    use crate::invoices::{Invoice, InvoiceKind, LineItem};
    use crate::money::Money;
    use chrono::NaiveDate;
    use rust_decimal::RoundingStrategy;
    use rust_decimal_macros::dec;

    fn eur(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, "EUR")
    }

    fn position_of_100() -> LineItem {
        LineItem::new(1, dec!(1), eur(dec!(100.00)), dec!(0.19))
    }

    #[test]
    fn test_shortfall_is_net_minus_allocated() {
        let item = position_of_100()
            .with_allocations(vec![CostAllocation::new(0, eur(dec!(60.00))).with_cost_center("4711")]);
        let reconciliation = reconcile(&item).unwrap();
        assert_eq!(reconciliation.shortfall, eur(dec!(40.00)));
        assert_eq!(reconciliation.allocated, eur(dec!(60.00)));
        assert_eq!(reconciliation.allocated_percentage(), dec!(60.00));
        assert!(!reconciliation.is_balanced());
    }

    #[test]
    fn test_over_allocation_gives_negative_shortfall() {
        let item = position_of_100().with_allocations(vec![
            CostAllocation::new(0, eur(dec!(70.00))),
            CostAllocation::new(1, eur(dec!(50.00))),
        ]);
        assert_eq!(reconcile(&item).unwrap().shortfall, eur(dec!(-20.00)));
    }

    #[test]
    fn test_sub_cent_allocations_summing_exactly_balance() {
        let mills = |amount| Money::rounded(amount, "EUR", 3, RoundingStrategy::MidpointAwayFromZero);
        let item = position_of_100().with_allocations(vec![
            CostAllocation::new(0, mills(dec!(33.335))),
            CostAllocation::new(1, mills(dec!(33.335))),
            CostAllocation::new(2, mills(dec!(33.330))),
        ]);
        let reconciliation = reconcile(&item).unwrap();
        assert_eq!(reconciliation.allocated, eur(dec!(100.00)));
        assert!(reconciliation.shortfall.is_zero());
        assert!(reconciliation.is_balanced());
    }

    #[test]
    fn test_stored_allocations_are_normalised_on_load() {
        let stored: Vec<Money> = serde_json::from_str(
            r#"[{"amount":"33.335","currency":"EUR"},{"amount":"66.664","currency":"EUR"}]"#,
        )
        .unwrap();
        let item = position_of_100().with_allocations(
            stored
                .into_iter()
                .enumerate()
                .map(|(index, amount)| CostAllocation::new(index as u32, amount))
                .collect(),
        );
        let reconciliation = reconcile(&item).unwrap();
        assert_eq!(reconciliation.allocated, eur(dec!(100.00)));
        assert!(reconciliation.is_balanced());
    }

    #[test]
    fn test_tombstoned_rows_are_ignored() {
        let mut removed = CostAllocation::new(1, eur(dec!(40.00)));
        removed.deleted = true;
        let item = position_of_100()
            .with_allocations(vec![CostAllocation::new(0, eur(dec!(60.00))), removed]);
        let reconciliation = reconcile(&item).unwrap();
        assert_eq!(reconciliation.shortfall, eur(dec!(40.00)));
        assert_eq!(reconciliation.allocations.len(), 1);
    }

    #[test]
    fn test_add_default_allocation_balances_position() {
        let mut item = position_of_100().with_allocations(vec![CostAllocation::new(
            0,
            eur(dec!(60.00)),
        )
        .with_cost_center("4711")
        .with_cost2("5.100.01.02")]);

        let added = add_default_allocation(&mut item, &[]).unwrap();
        assert_eq!(added.index, 1);
        assert_eq!(added.net_amount, eur(dec!(40.00)));
        assert_eq!(added.cost_center_id.as_deref(), Some("4711"));
        assert_eq!(added.cost2_id.as_deref(), Some("5.100.01.02"));
        assert!(reconcile(&item).unwrap().is_balanced());
    }

    #[test]
    fn test_add_default_allocation_on_over_allocated_position() {
        let mut item = position_of_100()
            .with_allocations(vec![CostAllocation::new(0, eur(dec!(130.00)))]);
        let added = add_default_allocation(&mut item, &[]).unwrap();
        assert_eq!(added.net_amount, eur(dec!(-30.00)));
        assert!(reconcile(&item).unwrap().is_balanced());
    }

    #[test]
    fn test_first_active_project_code_is_default() {
        let mut item = position_of_100();
        let codes = vec![
            Cost2Code::inactive("5.100.01.00"),
            Cost2Code::active("5.100.01.01"),
            Cost2Code::active("5.100.01.02"),
        ];
        let added = add_default_allocation(&mut item, &codes).unwrap();
        assert_eq!(added.index, 0);
        assert_eq!(added.cost2_id.as_deref(), Some("5.100.01.01"));
        assert_eq!(added.net_amount, eur(dec!(100.00)));
    }

    #[test]
    fn test_predecessor_code_wins_over_project_default() {
        let mut item = position_of_100()
            .with_allocations(vec![CostAllocation::new(0, eur(dec!(10.00))).with_cost2("A")]);
        let added = add_default_allocation(&mut item, &[Cost2Code::active("B")]).unwrap();
        assert_eq!(added.cost2_id.as_deref(), Some("A"));
    }

    #[test]
    fn test_indices_are_never_reused() {
        let mut item = position_of_100().with_allocations(vec![
            CostAllocation::new(0, eur(dec!(50.00))),
            CostAllocation::new(1, eur(dec!(50.00))),
        ]);
        delete_allocation(&mut item, 1, AllocationPolicy::editable(true)).unwrap();
        let added = add_default_allocation(&mut item, &[]).unwrap();
        assert_eq!(added.index, 2);
        assert_eq!(added.net_amount, eur(dec!(50.00)));
    }

    #[test]
    fn test_delete_returns_remaining_rows() {
        let mut item = position_of_100().with_allocations(vec![
            CostAllocation::new(0, eur(dec!(50.00))),
            CostAllocation::new(1, eur(dec!(30.00))),
            CostAllocation::new(2, eur(dec!(20.00))),
        ]);
        let remaining = delete_allocation(&mut item, 1, AllocationPolicy::editable(true)).unwrap();
        let indices: Vec<u32> = remaining.iter().map(|a| a.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(item.allocations.len(), 3);
        assert_eq!(reconcile(&item).unwrap().shortfall, eur(dec!(30.00)));
    }

    #[test]
    fn test_last_row_of_non_zero_position_is_kept() {
        let mut item =
            position_of_100().with_allocations(vec![CostAllocation::new(0, eur(dec!(100.00)))]);
        let policy = AllocationPolicy::editable(true);
        assert!(!is_deletable(&item, 0, policy));
        let err = delete_allocation(&mut item, 0, policy).unwrap_err();
        assert!(matches!(
            err,
            Error::Allocation(AllocationError::NotDeletable { index: 0, .. })
        ));
    }

    #[test]
    fn test_last_row_of_zero_position_may_go() {
        let item = LineItem::new(1, dec!(0), eur(dec!(100.00)), dec!(0.19))
            .with_allocations(vec![CostAllocation::new(0, eur(dec!(0)))]);
        assert_eq!(reconcile(&item).unwrap().allocated_percentage(), dec!(0));
        assert!(is_deletable(&item, 0, AllocationPolicy::editable(true)));
    }

    #[test]
    fn test_not_editable_blocks_deletion() {
        let item = position_of_100().with_allocations(vec![
            CostAllocation::new(0, eur(dec!(50.00))),
            CostAllocation::new(1, eur(dec!(50.00))),
        ]);
        assert!(!is_deletable(&item, 1, AllocationPolicy::editable(false)));
        assert!(is_deletable(&item, 1, AllocationPolicy::editable(true)));
    }

    #[test]
    fn test_unknown_index_is_not_found() {
        let mut item = position_of_100();
        let err = delete_allocation(&mut item, 9, AllocationPolicy::editable(true)).unwrap_err();
        assert!(matches!(
            err,
            Error::Allocation(AllocationError::NotFound { position: 1, index: 9 })
        ));
    }

    #[test]
    fn test_ensure_default_allocation_is_lazy() {
        let mut empty = LineItem::new(3, dec!(0), eur(dec!(0)), dec!(0.19));
        let rows = ensure_default_allocation(&mut empty).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].net_amount.is_zero());

        let again = ensure_default_allocation(&mut empty).unwrap();
        assert_eq!(again.len(), 1);
        assert_eq!(empty.allocations.len(), 1);
    }

    #[test]
    fn test_invoice_shortfalls_lists_unbalanced_positions() {
        let balanced = LineItem::new(1, dec!(1), eur(dec!(10.00)), dec!(0.19))
            .with_allocations(vec![CostAllocation::new(0, eur(dec!(10.00)))]);
        let open = LineItem::new(2, dec!(2), eur(dec!(10.00)), dec!(0.19))
            .with_allocations(vec![CostAllocation::new(0, eur(dec!(5.00)))]);
        let mut gone = LineItem::new(3, dec!(1), eur(dec!(99.00)), dec!(0.19));
        gone.deleted = true;

        let invoice = Invoice::new(
            "inv-1",
            InvoiceKind::Vendor,
            "EUR",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .with_positions(vec![balanced, open, gone]);

        let shortfalls = invoice_shortfalls(&invoice).unwrap();
        assert_eq!(shortfalls.len(), 1);
        assert_eq!(shortfalls[0].position, 2);
        assert_eq!(shortfalls[0].shortfall, eur(dec!(15.00)));
    }

    #[test]
    fn test_invoice_without_capability_is_rejected() {
        let mut invoice = Invoice::new(
            "inv-2",
            InvoiceKind::Sales,
            "EUR",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .with_positions(vec![position_of_100()]);
        invoice.capabilities.cost_allocation = false;
        assert!(matches!(
            invoice_shortfalls(&invoice),
            Err(Error::Allocation(AllocationError::NotSupported(_)))
        ));
    }

    #[test]
    fn test_allocation_in_other_currency_fails() {
        let item = position_of_100()
            .with_allocations(vec![CostAllocation::new(0, Money::new(dec!(1), "USD"))]);
        assert!(matches!(reconcile(&item), Err(Error::Money(_))));
    }
}
