use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;

use crate::allocations::{invoice_shortfalls, AllocationPolicy, Reconciliation};
use crate::errors::Result;
use crate::fx::{CurrencyRateTable, FxRateProviderTrait};
use crate::invoices::{convert_totals, recalculate, ConvertedTotals, Invoice, InvoiceTotals};
use crate::money::round_half_up;
use crate::orders::Order;
use crate::settings::Settings;
use crate::statistics::{
    aggregate_parallel, currency_warnings, InvoiceCategory, InvoiceDashboardClassifier,
    OrderCategory, OrderStatusClassifier, StatisticsBucket,
};

/// Host-facing entry point: recomputes invoice views with the configured
/// system currency, business time zone and current rate snapshot.
pub trait InvoiceServiceTrait: Send + Sync {
    /// Totals as of the business "today".
    fn recalculate(&self, invoice: &Invoice) -> Result<InvoiceTotals>;

    fn recalculate_as_of(&self, invoice: &Invoice, today: NaiveDate) -> Result<InvoiceTotals>;

    /// Totals expressed in the system currency. `None` when the invoice is
    /// already in the system currency, cannot be converted, or no rate is known.
    fn system_currency_totals(
        &self,
        invoice: &Invoice,
        today: NaiveDate,
    ) -> Result<Option<ConvertedTotals>>;

    fn shortfalls(&self, invoice: &Invoice) -> Result<Vec<Reconciliation>>;

    fn dashboard_statistics(
        &self,
        invoices: &[Invoice],
        today: NaiveDate,
    ) -> Result<HashMap<InvoiceCategory, StatisticsBucket>>;

    fn order_statistics(&self, orders: &[Order])
        -> Result<HashMap<OrderCategory, StatisticsBucket>>;

    fn currency_warnings(&self, invoices: &[Invoice]) -> Result<Vec<String>>;
}

pub struct InvoiceService {
    rate_provider: Arc<dyn FxRateProviderTrait>,
    settings: Settings,
}

impl InvoiceService {
    pub fn new(rate_provider: Arc<dyn FxRateProviderTrait>, settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            rate_provider,
            settings,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Deletion rules for allocation rows under the configured minimum.
    pub fn allocation_policy(&self, editable: bool) -> AllocationPolicy {
        AllocationPolicy::from_settings(&self.settings, editable)
    }

    /// Takes a fresh snapshot of the provider's rates; the snapshot is never
    /// mutated while a computation reads it.
    fn rate_table(&self) -> Result<CurrencyRateTable> {
        let table = CurrencyRateTable::from_provider(self.rate_provider.as_ref())?;
        debug!("Loaded rate table with {} currency pairs", table.len());
        Ok(table)
    }
}

impl InvoiceServiceTrait for InvoiceService {
    fn recalculate(&self, invoice: &Invoice) -> Result<InvoiceTotals> {
        let today = self.settings.today()?;
        self.recalculate_as_of(invoice, today)
    }

    fn recalculate_as_of(&self, invoice: &Invoice, today: NaiveDate) -> Result<InvoiceTotals> {
        recalculate(invoice, today)
    }

    fn system_currency_totals(
        &self,
        invoice: &Invoice,
        today: NaiveDate,
    ) -> Result<Option<ConvertedTotals>> {
        let system_currency = self.settings.system_currency.as_str();
        if !invoice.capabilities.currency_conversion || invoice.currency == system_currency {
            return Ok(None);
        }
        let totals = recalculate(invoice, today)?;
        let table = self.rate_table()?;
        Ok(
            convert_totals(&totals, &table, system_currency, invoice.invoice_date).map(
                |mut converted| {
                    converted.rate = round_half_up(converted.rate, self.settings.rate_precision);
                    converted
                },
            ),
        )
    }

    fn shortfalls(&self, invoice: &Invoice) -> Result<Vec<Reconciliation>> {
        invoice_shortfalls(invoice)
    }

    fn dashboard_statistics(
        &self,
        invoices: &[Invoice],
        today: NaiveDate,
    ) -> Result<HashMap<InvoiceCategory, StatisticsBucket>> {
        let table = self.rate_table()?;
        let classifier =
            InvoiceDashboardClassifier::new(&self.settings.system_currency, today, &table);
        aggregate_parallel(invoices, &classifier)
    }

    fn order_statistics(
        &self,
        orders: &[Order],
    ) -> Result<HashMap<OrderCategory, StatisticsBucket>> {
        let table = self.rate_table()?;
        let classifier = OrderStatusClassifier::new(&self.settings.system_currency, &table);
        aggregate_parallel(orders, &classifier)
    }

    fn currency_warnings(&self, invoices: &[Invoice]) -> Result<Vec<String>> {
        let table = self.rate_table()?;
        Ok(currency_warnings(invoices, &table, &self.settings.system_currency))
    }
}
