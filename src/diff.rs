//! Catalog diffing
//!
//! Pure comparison of the fetched catalog against the previous snapshot.
//! Categories are independent: a model whose prices were cut to zero shows
//! up as both newly free and a price drop. Models removed from the catalog
//! are not reported.

use crate::openrouter::ModelEntry;
use std::collections::HashMap;

/// A price reduction, carrying the previous prices for display
#[derive(Debug, Clone, PartialEq)]
pub struct PriceDrop {
    pub model: ModelEntry,
    pub old_input: f64,
    pub old_output: f64,
}

/// Classified changes between two catalogs
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChangeSet {
    pub new_models: Vec<ModelEntry>,
    pub newly_free: Vec<ModelEntry>,
    pub price_drops: Vec<PriceDrop>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.new_models.is_empty() && self.newly_free.is_empty() && self.price_drops.is_empty()
    }

    /// Total number of change lines across all categories
    pub fn len(&self) -> usize {
        self.new_models.len() + self.newly_free.len() + self.price_drops.len()
    }
}

/// Compare the fetched catalog against the previous snapshot.
///
/// With an empty `old` (first run) every model is new and no price
/// comparisons are possible. Output order follows `new` so messages are
/// deterministic.
pub fn diff(old: &[ModelEntry], new: &[ModelEntry]) -> ChangeSet {
    let old_by_id: HashMap<&str, &ModelEntry> =
        old.iter().map(|m| (m.id.as_str(), m)).collect();

    let mut changes = ChangeSet::default();

    for model in new {
        let prev = match old_by_id.get(model.id.as_str()) {
            Some(prev) => *prev,
            None => {
                changes.new_models.push(model.clone());
                continue;
            }
        };

        if !prev.is_free() && model.is_free() {
            changes.newly_free.push(model.clone());
        }

        if model.input_price < prev.input_price || model.output_price < prev.output_price {
            changes.price_drops.push(PriceDrop {
                model: model.clone(),
                old_input: prev.input_price,
                old_output: prev.output_price,
            });
        }
    }

    changes
}
