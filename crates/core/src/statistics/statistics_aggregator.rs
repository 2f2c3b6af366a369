use std::collections::HashMap;
use std::marker::PhantomData;

use chrono::NaiveDate;
use log::{debug, warn};
use rayon::prelude::*;

use crate::errors::Result;
use crate::fx::CurrencyRateTable;
use crate::invoices::{recalculate, Invoice, InvoiceStatus};
use crate::money::Money;
use crate::statistics::{Aggregatable, Classifier, InvoiceSummary, StatisticsBucket};

pub type BucketMap<C> = HashMap<C, StatisticsBucket>;

/// Incremental form of [`aggregate`] for input that arrives in pages.
///
/// Each `push` either applies all of an item's classifications or none of them.
pub struct StatisticsAccumulator<'c, T, C: Classifier<T>> {
    classifier: &'c C,
    buckets: BucketMap<C::Category>,
    items: u64,
    _item: PhantomData<fn(&T)>,
}

impl<'c, T: Aggregatable, C: Classifier<T>> StatisticsAccumulator<'c, T, C> {
    pub fn new(classifier: &'c C) -> Self {
        Self {
            classifier,
            buckets: HashMap::new(),
            items: 0,
            _item: PhantomData,
        }
    }

    pub fn push(&mut self, item: &T) -> Result<()> {
        if item.is_deleted() {
            return Ok(());
        }
        let classified = self.classifier.classify(item)?;
        apply(&mut self.buckets, self.classifier.currency(), classified)?;
        self.items += 1;
        Ok(())
    }

    pub fn extend<'i, I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = &'i T>,
        T: 'i,
    {
        items.into_iter().try_for_each(|item| self.push(item))
    }

    /// Number of non-deleted items folded in so far.
    pub fn item_count(&self) -> u64 {
        self.items
    }

    pub fn snapshot(&self) -> &BucketMap<C::Category> {
        &self.buckets
    }

    pub fn finish(self) -> BucketMap<C::Category> {
        debug!(
            "Aggregated {} items into {} buckets",
            self.items,
            self.buckets.len()
        );
        self.buckets
    }
}

fn apply<K: Eq + std::hash::Hash + Clone>(
    buckets: &mut BucketMap<K>,
    currency: &str,
    classified: Vec<(K, Money)>,
) -> Result<()> {
    let mut staged: BucketMap<K> = HashMap::new();
    for (category, amount) in classified {
        let updated = match staged.get(&category).or_else(|| buckets.get(&category)) {
            Some(bucket) => bucket.with(&amount)?,
            None => StatisticsBucket::new(currency).with(&amount)?,
        };
        staged.insert(category, updated);
    }
    buckets.extend(staged);
    Ok(())
}

/// Folds the items into buckets in one pass. Deleted items are skipped.
pub fn aggregate<'i, T, C, I>(items: I, classifier: &C) -> Result<BucketMap<C::Category>>
where
    T: Aggregatable + 'i,
    C: Classifier<T>,
    I: IntoIterator<Item = &'i T>,
{
    let mut accumulator = StatisticsAccumulator::new(classifier);
    accumulator.extend(items)?;
    Ok(accumulator.finish())
}

/// Same result as [`aggregate`]; items are classified in parallel.
pub fn aggregate_parallel<T, C>(items: &[T], classifier: &C) -> Result<BucketMap<C::Category>>
where
    T: Aggregatable + Sync,
    C: Classifier<T>,
{
    let classified: Vec<Vec<(C::Category, Money)>> = items
        .par_iter()
        .filter(|item| !item.is_deleted())
        .map(|item| classifier.classify(item))
        .collect::<Result<_>>()?;

    let mut buckets = HashMap::new();
    for item_categories in classified {
        apply(&mut buckets, classifier.currency(), item_categories)?;
    }
    debug!(
        "Aggregated {} items in parallel into {} buckets",
        items.len(),
        buckets.len()
    );
    Ok(buckets)
}

/// Warning for a foreign-currency invoice that has no conversion pair to the
/// system currency.
pub fn currency_warning_for(
    invoice: &Invoice,
    table: &CurrencyRateTable,
    system_currency: &str,
) -> Option<String> {
    if invoice.deleted || invoice.currency == system_currency {
        return None;
    }
    if table.resolve(&invoice.currency, system_currency).is_some() {
        return None;
    }
    Some(format!(
        "Invoice {}: no conversion rate configured for {} -> {}",
        invoice.label(),
        invoice.currency,
        system_currency
    ))
}

/// One warning per affected invoice, in input order. Repeated pairs are reported
/// again for every invoice.
pub fn currency_warnings<'i, I>(
    invoices: I,
    table: &CurrencyRateTable,
    system_currency: &str,
) -> Vec<String>
where
    I: IntoIterator<Item = &'i Invoice>,
{
    let warnings: Vec<String> = invoices
        .into_iter()
        .filter_map(|invoice| currency_warning_for(invoice, table, system_currency))
        .collect();
    if !warnings.is_empty() {
        warn!("{} invoices lack a conversion rate", warnings.len());
    }
    warnings
}

/// Per-currency statistics panel. Amounts stay in each invoice's own
/// currency; cancelled and deleted invoices are left out.
pub fn summarize<'i, I>(invoices: I, today: NaiveDate) -> Result<HashMap<String, InvoiceSummary>>
where
    I: IntoIterator<Item = &'i Invoice>,
{
    let mut summaries: HashMap<String, InvoiceSummary> = HashMap::new();
    for invoice in invoices {
        if invoice.deleted || invoice.status == InvoiceStatus::Cancelled {
            continue;
        }
        let totals = recalculate(invoice, today)?;
        summaries
            .entry(totals.currency.clone())
            .or_insert_with(|| InvoiceSummary::new(totals.currency.as_str()))
            .add(&totals)?;
    }
    Ok(summaries)
}
