//! Statistics module - folds invoice and order collections into dashboard buckets.

mod classifiers;
mod statistics_model;
pub mod statistics_aggregator;

pub use classifiers::{Aggregatable, Classifier, InvoiceDashboardClassifier, OrderStatusClassifier};
pub use statistics_model::*;
pub use statistics_aggregator::{
    aggregate, aggregate_parallel, currency_warning_for, currency_warnings, summarize, BucketMap,
    StatisticsAccumulator,
};

#[cfg(test)]
mod statistics_aggregator_tests;
