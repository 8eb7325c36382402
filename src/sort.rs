//! Client-facing sort controls applied after ranking.
//!
//! "value" is rating per currency unit; products without a usable price sort
//! last under it.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::catalog::ScoredProduct;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Ranking order as produced by the scoring step.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    Rating,
    Value,
}

pub fn apply_sort(items: &mut [ScoredProduct], key: SortKey) {
    match key {
        SortKey::Relevance => {}
        SortKey::PriceAsc => {
            items.sort_by(|a, b| cmp_f32(a.product.price, b.product.price));
        }
        SortKey::PriceDesc => {
            items.sort_by(|a, b| cmp_f32(b.product.price, a.product.price));
        }
        SortKey::Rating => {
            items.sort_by(|a, b| cmp_f32(b.product.rating, a.product.rating));
        }
        SortKey::Value => {
            items.sort_by(|a, b| cmp_f32(value_of(b), value_of(a)));
        }
    }
}

fn value_of(s: &ScoredProduct) -> f32 {
    if s.product.price.is_finite() && s.product.price > 0.0 {
        s.product.rating / s.product.price
    } else {
        0.0
    }
}

fn cmp_f32(a: f32, b: f32) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;

    fn item(id: &str, price: f32, rating: f32, z: f32) -> ScoredProduct {
        ScoredProduct {
            product: Product {
                id: id.into(),
                title: id.into(),
                price,
                rating,
                ..Default::default()
            },
            z_score: z,
            match_reasons: Vec::new(),
            primary_ingredient: None,
        }
    }

    fn ids(items: &[ScoredProduct]) -> Vec<&str> {
        items.iter().map(|s| s.product.id.as_str()).collect()
    }

    #[test]
    fn relevance_keeps_ranking_order() {
        let mut items = vec![item("a", 30.0, 4.0, 90.0), item("b", 10.0, 5.0, 80.0)];
        apply_sort(&mut items, SortKey::Relevance);
        assert_eq!(ids(&items), vec!["a", "b"]);
    }

    #[test]
    fn price_and_rating_sorts() {
        let mut items = vec![
            item("a", 30.0, 4.0, 90.0),
            item("b", 10.0, 5.0, 80.0),
            item("c", 20.0, 3.0, 70.0),
        ];
        apply_sort(&mut items, SortKey::PriceAsc);
        assert_eq!(ids(&items), vec!["b", "c", "a"]);
        apply_sort(&mut items, SortKey::Rating);
        assert_eq!(ids(&items), vec!["b", "a", "c"]);
    }

    #[test]
    fn value_sort_guards_zero_price() {
        let mut items = vec![
            item("free", 0.0, 5.0, 90.0),
            item("cheap", 10.0, 4.0, 80.0),
            item("pricey", 100.0, 5.0, 70.0),
        ];
        apply_sort(&mut items, SortKey::Value);
        // 0-price items sort last instead of dividing by zero.
        assert_eq!(ids(&items), vec!["cheap", "pricey", "free"]);
    }

    #[test]
    fn sort_keys_deserialize_kebab_case() {
        let k: SortKey = serde_json::from_str(r#""price-asc""#).unwrap();
        assert_eq!(k, SortKey::PriceAsc);
        let k: SortKey = serde_json::from_str(r#""value""#).unwrap();
        assert_eq!(k, SortKey::Value);
    }
}
