//! Record of the pages written during one build.

use std::collections::BTreeMap;

use serde::Serialize;

/// A page that was written, as listed in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryItem {
    pub code: String,
    pub message: String,
    /// Link relative to the output directory, e.g. `ghost/404.html`.
    pub path: String,
}

/// Pages grouped by template name.
///
/// Buckets are keyed in a `BTreeMap` so templates always enumerate in
/// sorted name order.
#[derive(Debug, Default)]
pub struct History {
    buckets: BTreeMap<String, Vec<HistoryItem>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item to the bucket for `template`.
    pub fn record(&mut self, template: &str, item: HistoryItem) {
        match self.buckets.get_mut(template) {
            Some(items) => items.push(item),
            None => {
                self.buckets.insert(template.to_string(), vec![item]);
            }
        }
    }

    /// Sort every bucket by code, comparing the codes as plain strings.
    pub fn sort(&mut self) {
        for items in self.buckets.values_mut() {
            items.sort_by(|a, b| a.code.cmp(&b.code));
        }
    }

    /// Buckets in template name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[HistoryItem])> {
        self.buckets
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }
}
