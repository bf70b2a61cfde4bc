mod imp;

use serde::Serialize;

use crate::model::BookRecord;

/// Dashboard counters. `available + issued == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub total: usize,
    pub issued: usize,
    pub available: usize,
}

pub trait Statistics {
    fn summary(&self) -> CatalogSummary;
    /// Number of books per category name, sorted by name.
    fn by_category(&self) -> Vec<(String, usize)>;
    /// The last `n` books in insertion order.
    fn recent(&self, n: usize) -> &[BookRecord];
}
