#[cfg(test)]
mod tests {
    use crate::errors::Error;
    use crate::fx::{CurrencyPair, CurrencyRateTable};
    use crate::invoices::{DueDateSpec, Invoice, InvoiceKind, InvoiceStatus, LineItem};
    use crate::money::Money;
    use crate::orders::{Order, OrderStatus};
    use crate::statistics::{
        aggregate, aggregate_parallel, currency_warnings, summarize, InvoiceCategory,
        InvoiceDashboardClassifier, OrderCategory, OrderStatusClassifier, StatisticsAccumulator,
        StatisticsBucket,
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 3, 1)
    }

    fn eur(amount: Decimal) -> Money {
        Money::new(amount, "EUR")
    }

    /// One position of 100 net at 19% VAT, so 119 gross.
    fn invoice(id: &str, currency: &str) -> Invoice {
        Invoice::new(id, InvoiceKind::Sales, currency, date(2024, 1, 1))
            .with_number(format!("RE-{id}"))
            .with_positions(vec![LineItem::new(
                1,
                dec!(1),
                Money::new(dec!(100.00), currency),
                dec!(0.19),
            )])
    }

    fn rates() -> CurrencyRateTable {
        CurrencyRateTable::new(vec![
            CurrencyPair::new("EUR", "USD").with_rate(date(2023, 1, 1), dec!(1.25))
        ])
        .unwrap()
    }

    fn dashboard_invoices() -> Vec<Invoice> {
        let mut deleted = invoice("G", "EUR");
        deleted.deleted = true;
        vec![
            invoice("A", "EUR").with_due(DueDateSpec::TermDays(14)),
            invoice("B", "EUR").with_payment(dec!(119.00), Some(date(2024, 1, 21))),
            invoice("C", "EUR").with_status(InvoiceStatus::Cancelled),
            invoice("D", "EUR").with_status(InvoiceStatus::Draft),
            invoice("E", "USD"),
            invoice("F", "CHF"),
            deleted,
        ]
    }

    fn bucket(count: u64, sum: Decimal) -> StatisticsBucket {
        StatisticsBucket {
            count,
            sum: eur(sum),
        }
    }

    #[test]
    fn test_dashboard_buckets() {
        let table = rates();
        let classifier = InvoiceDashboardClassifier::new("EUR", today(), &table);
        let buckets = aggregate(&dashboard_invoices(), &classifier).unwrap();

        assert_eq!(buckets[&InvoiceCategory::All], bucket(4, dec!(452.20)));
        assert_eq!(buckets[&InvoiceCategory::Open], bucket(2, dec!(214.20)));
        assert_eq!(buckets[&InvoiceCategory::Overdue], bucket(1, dec!(119.00)));
        assert_eq!(buckets[&InvoiceCategory::Paid], bucket(1, dec!(119.00)));
        assert_eq!(buckets[&InvoiceCategory::Draft], bucket(1, dec!(119.00)));
        assert_eq!(buckets[&InvoiceCategory::Cancelled], bucket(1, dec!(119.00)));
        assert_eq!(buckets[&InvoiceCategory::RateUnavailable], bucket(1, dec!(0)));
    }

    #[test]
    fn test_aggregation_leaves_input_untouched() {
        let table = rates();
        let classifier = InvoiceDashboardClassifier::new("EUR", today(), &table);
        let invoices = dashboard_invoices();
        let before = invoices.clone();
        aggregate(&invoices, &classifier).unwrap();
        assert_eq!(invoices, before);
    }

    #[test]
    fn test_conversion_disabled_counts_as_unavailable() {
        let table = rates();
        let classifier = InvoiceDashboardClassifier::new("EUR", today(), &table);
        let mut usd = invoice("E", "USD");
        usd.capabilities.currency_conversion = false;
        let buckets = aggregate([&usd], &classifier).unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[&InvoiceCategory::RateUnavailable].count, 1);
    }

    #[test]
    fn test_paged_accumulation_matches_single_pass() {
        let table = rates();
        let classifier = InvoiceDashboardClassifier::new("EUR", today(), &table);
        let invoices = dashboard_invoices();

        let mut accumulator = StatisticsAccumulator::new(&classifier);
        for page in invoices.chunks(3) {
            accumulator.extend(page).unwrap();
        }
        assert_eq!(accumulator.item_count(), 6);
        assert_eq!(accumulator.snapshot().len(), 7);
        assert_eq!(
            accumulator.finish(),
            aggregate(&invoices, &classifier).unwrap()
        );
    }

    #[test]
    fn test_parallel_aggregation_matches_sequential() {
        let table = rates();
        let classifier = InvoiceDashboardClassifier::new("EUR", today(), &table);
        let invoices: Vec<Invoice> = dashboard_invoices()
            .into_iter()
            .cycle()
            .take(70)
            .collect();
        assert_eq!(
            aggregate_parallel(&invoices, &classifier).unwrap(),
            aggregate(&invoices, &classifier).unwrap()
        );
    }

    #[test]
    fn test_failed_item_is_not_half_applied() {
        let table = rates();
        let classifier = InvoiceDashboardClassifier::new("EUR", today(), &table);
        let mut broken = invoice("X", "EUR");
        broken.currency = String::new();

        let mut accumulator = StatisticsAccumulator::new(&classifier);
        accumulator.push(&invoice("A", "EUR")).unwrap();
        assert!(matches!(
            accumulator.push(&broken),
            Err(Error::InvalidInvoiceState(_))
        ));
        assert_eq!(accumulator.item_count(), 1);
        assert_eq!(
            accumulator.snapshot()[&InvoiceCategory::All],
            bucket(1, dec!(119.00))
        );
        assert!(aggregate(&[broken], &classifier).is_err());
    }

    #[test]
    fn test_order_pipeline_buckets() {
        let table = rates();
        let classifier = OrderStatusClassifier::new("EUR", &table);
        let position = |amount| LineItem::new(1, dec!(1), eur(amount), dec!(0.19));
        let orders = vec![
            Order::new("o-1", OrderStatus::Commissioned, "EUR", date(2024, 1, 1))
                .with_positions(vec![position(dec!(10000.00))])
                .with_invoiced(dec!(4000)),
            Order::new("o-2", OrderStatus::Offered, "EUR", date(2024, 1, 2))
                .with_positions(vec![position(dec!(500.00))]),
            Order::new("o-3", OrderStatus::Offered, "EUR", date(2024, 1, 3))
                .with_positions(vec![position(dec!(250.00))]),
            Order::new("o-4", OrderStatus::Potential, "JPY", date(2024, 1, 4)),
        ];

        let buckets = aggregate(&orders, &classifier).unwrap();
        assert_eq!(
            buckets[&OrderCategory::Status(OrderStatus::Commissioned)],
            bucket(1, dec!(10000.00))
        );
        assert_eq!(buckets[&OrderCategory::ToBeInvoiced], bucket(1, dec!(6000.00)));
        assert_eq!(
            buckets[&OrderCategory::Status(OrderStatus::Offered)],
            bucket(2, dec!(750.00))
        );
        assert_eq!(buckets[&OrderCategory::RateUnavailable].count, 1);
    }

    #[test]
    fn test_order_buckets_serialize_as_json_object() {
        let table = rates();
        let classifier = OrderStatusClassifier::new("EUR", &table);
        let orders = vec![Order::new("o-1", OrderStatus::Commissioned, "EUR", date(2024, 1, 1))
            .with_positions(vec![LineItem::new(1, dec!(1), eur(dec!(800.00)), dec!(0.19))])];
        let buckets = aggregate(&orders, &classifier).unwrap();

        let json = serde_json::to_value(&buckets).unwrap();
        assert_eq!(json["COMMISSIONED"]["count"], 1);
        assert_eq!(json["TO_BE_INVOICED"]["sum"]["amount"], "800.00");

        let restored: std::collections::HashMap<OrderCategory, StatisticsBucket> =
            serde_json::from_value(json).unwrap();
        assert_eq!(restored, buckets);
    }

    #[test]
    fn test_order_category_string_form() {
        let letter = OrderCategory::Status(OrderStatus::LetterOfIntent);
        assert_eq!(letter.to_string(), "LETTER_OF_INTENT");
        assert_eq!("LETTER_OF_INTENT".parse::<OrderCategory>(), Ok(letter));
        assert_eq!(
            "RATE_UNAVAILABLE".parse::<OrderCategory>(),
            Ok(OrderCategory::RateUnavailable)
        );
        assert!("SHIPPED".parse::<OrderCategory>().is_err());
    }

    #[test]
    fn test_currency_warnings_follow_input_order() {
        let table = rates();
        let mut deleted = invoice("Z", "GBP");
        deleted.deleted = true;
        let invoices = vec![
            invoice("1", "CHF"),
            invoice("2", "USD"),
            invoice("3", "EUR"),
            deleted,
            invoice("4", "CHF"),
        ];

        let warnings = currency_warnings(&invoices, &table, "EUR");
        assert_eq!(
            warnings,
            vec![
                "Invoice RE-1: no conversion rate configured for CHF -> EUR".to_string(),
                "Invoice RE-4: no conversion rate configured for CHF -> EUR".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_pair_still_yields_totals() {
        let table = CurrencyRateTable::default();
        let usd = invoice("U", "USD");
        assert_eq!(currency_warnings([&usd], &table, "EUR").len(), 1);

        let summaries = summarize([&usd], today()).unwrap();
        assert_eq!(
            summaries["USD"].gross_sum,
            Money::new(dec!(119.00), "USD")
        );
    }

    #[test]
    fn test_summary_per_currency() {
        let invoices = vec![
            invoice("A", "EUR").with_due(DueDateSpec::TermDays(14)),
            invoice("B", "EUR")
                .with_due(DueDateSpec::TermDays(30))
                .with_payment(dec!(119.00), Some(date(2024, 1, 21))),
            invoice("C", "EUR").with_status(InvoiceStatus::Cancelled),
            invoice("E", "USD"),
        ];

        let summaries = summarize(&invoices, today()).unwrap();
        assert_eq!(summaries.len(), 2);

        let eur_summary = &summaries["EUR"];
        assert_eq!(eur_summary.count, 2);
        assert_eq!(eur_summary.gross_sum, eur(dec!(238.00)));
        assert_eq!(eur_summary.open_sum, eur(dec!(119.00)));
        assert_eq!(eur_summary.overdue_count, 1);
        assert_eq!(eur_summary.average_payment_term(), Some(dec!(22.0)));
        assert_eq!(eur_summary.average_days_to_pay(), Some(dec!(20.0)));

        assert_eq!(summaries["USD"].average_payment_term(), None);
    }

    #[test]
    fn test_summary_saturates_huge_payment_terms() {
        let invoices = vec![
            invoice("A", "EUR").with_due(DueDateSpec::TermDays(i64::MAX)),
            invoice("B", "EUR").with_due(DueDateSpec::TermDays(i64::MAX)),
        ];

        let summaries = summarize(&invoices, today()).unwrap();
        let eur_summary = &summaries["EUR"];
        assert_eq!(eur_summary.payment_term_count, 2);
        assert_eq!(eur_summary.payment_term_days_total, i64::MAX);
        assert!(eur_summary.average_payment_term().is_some());
    }
}
