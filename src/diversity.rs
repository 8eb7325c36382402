//! Post-ranking diversity filter.
//!
//! Walks a ranked list in order and caps how often one brand or one primary
//! ingredient may appear in the visible result set. Admitted products keep
//! their relative rank; nothing is re-scored or re-sorted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::catalog::ScoredProduct;
use crate::reference::normalize_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiversityLimits {
    pub max_per_brand: usize,
    pub max_per_ingredient: usize,
    pub max_results: usize,
}

impl Default for DiversityLimits {
    fn default() -> Self {
        Self {
            max_per_brand: 2,
            max_per_ingredient: 2,
            max_results: 6,
        }
    }
}

/// Filter a ranked list under the given limits. Stops as soon as the result
/// target is reached. Products without a primary ingredient consume brand
/// budget only.
pub fn apply_diversity(ranked: Vec<ScoredProduct>, limits: DiversityLimits) -> Vec<ScoredProduct> {
    let mut brand_counts: HashMap<String, usize> = HashMap::new();
    let mut ingredient_counts: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(limits.max_results.min(ranked.len()));

    for item in ranked {
        if out.len() >= limits.max_results {
            break;
        }

        let brand_key = normalize_key(&item.product.brand);
        if brand_counts.get(&brand_key).copied().unwrap_or(0) >= limits.max_per_brand {
            continue;
        }

        let ingredient_key = item.primary_ingredient.as_deref().map(normalize_key);
        if let Some(key) = &ingredient_key {
            if ingredient_counts.get(key).copied().unwrap_or(0) >= limits.max_per_ingredient {
                continue;
            }
        }

        *brand_counts.entry(brand_key).or_insert(0) += 1;
        if let Some(key) = ingredient_key {
            *ingredient_counts.entry(key).or_insert(0) += 1;
        }
        out.push(item);
    }

    out
}
