use std::collections::BTreeMap;

use crate::model::BookRecord;
use crate::statistics::{CatalogSummary, Statistics};

impl Statistics for [BookRecord] {
    fn summary(&self) -> CatalogSummary {
        let total = self.len();
        let issued = self.iter().filter(|b| b.is_issued()).count();
        CatalogSummary {
            total,
            issued,
            available: total - issued,
        }
    }

    fn by_category(&self) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for book in self {
            *counts.entry(book.category.as_str()).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect()
    }

    fn recent(&self, n: usize) -> &[BookRecord] {
        &self[self.len().saturating_sub(n)..]
    }
}
