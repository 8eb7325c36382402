//! Catalog product model.
//!
//! `Product` is the pre-score catalog record as the storefront ships it; the
//! wire shape is camelCase for the JS front-end, and every matching-metadata
//! field is optional with a serde default so sparse catalog data still scores.
//! `ScoredProduct` is the annotated copy the ranking pass produces; catalog
//! records are never mutated.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Coarse brand reputation classification driving part of the Quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrandTier {
    A,
    B,
    C,
}

impl BrandTier {
    /// Fixed point value contributed to the Quality score.
    pub fn points(self) -> f32 {
        match self {
            BrandTier::A => 6.0,
            BrandTier::B => 4.0,
            BrandTier::C => 2.0,
        }
    }
}

/// A catalog record. Identity/display fields are always present; everything
/// the matcher consumes degrades gracefully when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub price: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f32>,
    /// Star rating, 0–5.
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub badges: Vec<String>,
    /// Canonical ingredient keys, primary ingredient first.
    #[serde(default)]
    pub master_ingredients: Vec<String>,
    /// Ingredient key → dosage amount in the ingredient's canonical unit.
    #[serde(default)]
    pub ingredient_strength: HashMap<String, f32>,
    /// Goal keys this product supports; empty means untagged.
    #[serde(default)]
    pub goal_tags: Vec<String>,
    /// Demographic key → suitability multiplier in [0, 1].
    #[serde(default)]
    pub demographic_scores: HashMap<String, f32>,
    /// Activity key → suitability multiplier in [0, 1].
    #[serde(default)]
    pub activity_scores: HashMap<String, f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_tier: Option<BrandTier>,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_gluten_free: bool,
    #[serde(default)]
    pub is_organic: bool,
    #[serde(default)]
    pub third_party_tested: bool,
    /// Category tags; diversity bookkeeping only, never scored.
    #[serde(default)]
    pub category: Vec<String>,
}

/// A product annotated by one ranking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,
    /// Rounded 0–100 aggregate relevance/quality score.
    pub z_score: f32,
    /// Deduplicated, display-capped explanation strings.
    pub match_reasons: Vec<String>,
    /// The matched ingredient judged most responsible for the ingredient
    /// score; also drives the diversity filter's per-ingredient bucketing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_ingredient: Option<String>,
}

/// Built-in demo catalog served by `/recommend`. Mirrors the static mock
/// data the storefront ships; real deployments pass their own catalog to
/// `/rank`.
pub fn demo_catalog() -> Vec<Product> {
    DEMO_CATALOG.clone()
}

static DEMO_CATALOG: Lazy<Vec<Product>> = Lazy::new(|| {
    vec![
        Product {
            id: "zyn-001".into(),
            title: "Triple Magnesium Complex".into(),
            brand: "Thorne".into(),
            vendor: "ZYNAVA".into(),
            price: 27.0,
            rating: 4.8,
            review_count: 1843,
            badges: vec!["bestseller".into()],
            master_ingredients: vec!["magnesium-glycinate".into(), "magnesium-citrate".into()],
            ingredient_strength: HashMap::from([
                ("magnesium-glycinate".into(), 200.0),
                ("magnesium-citrate".into(), 150.0),
            ]),
            goal_tags: vec!["sleep".into(), "stress".into()],
            demographic_scores: HashMap::from([
                ("male-36-50".into(), 0.9),
                ("female-36-50".into(), 0.9),
            ]),
            activity_scores: HashMap::from([("athlete".into(), 0.95)]),
            third_party_tested: true,
            category: vec!["minerals".into()],
            ..Default::default()
        },
        Product {
            id: "zyn-002".into(),
            title: "Deep Sleep Melatonin Gummies".into(),
            brand: "Nature Made".into(),
            vendor: "ZYNAVA".into(),
            price: 14.5,
            original_price: Some(18.0),
            rating: 4.6,
            review_count: 5212,
            master_ingredients: vec!["melatonin".into(), "l-theanine".into()],
            ingredient_strength: HashMap::from([
                ("melatonin".into(), 3.0),
                ("l-theanine".into(), 100.0),
            ]),
            goal_tags: vec!["sleep".into()],
            is_gluten_free: true,
            category: vec!["sleep-aids".into()],
            ..Default::default()
        },
        Product {
            id: "zyn-003".into(),
            title: "KSM-66 Ashwagandha".into(),
            brand: "NOW Foods".into(),
            vendor: "ZYNAVA".into(),
            price: 19.9,
            rating: 4.7,
            review_count: 3407,
            master_ingredients: vec!["ashwagandha".into()],
            ingredient_strength: HashMap::from([("ashwagandha".into(), 600.0)]),
            goal_tags: vec!["stress".into(), "energy".into()],
            activity_scores: HashMap::from([("active".into(), 0.9)]),
            is_vegan: true,
            is_organic: true,
            third_party_tested: true,
            category: vec!["adaptogens".into()],
            ..Default::default()
        },
        Product {
            id: "zyn-004".into(),
            title: "Ultra Omega-3 Fish Oil".into(),
            brand: "Nordic Naturals".into(),
            vendor: "ZYNAVA".into(),
            price: 32.0,
            rating: 4.9,
            review_count: 9120,
            master_ingredients: vec!["omega-3".into()],
            ingredient_strength: HashMap::from([("omega-3".into(), 1100.0)]),
            goal_tags: vec!["heart-health".into(), "focus".into()],
            demographic_scores: HashMap::from([
                ("male-51-65".into(), 0.95),
                ("female-51-65".into(), 0.95),
            ]),
            third_party_tested: true,
            category: vec!["fish-oils".into()],
            ..Default::default()
        },
        Product {
            id: "zyn-005".into(),
            title: "Vitamin D3 5000 IU".into(),
            brand: "Nutricost".into(),
            vendor: "ZYNAVA".into(),
            price: 9.9,
            rating: 4.5,
            review_count: 15230,
            master_ingredients: vec!["vitamin-d3".into()],
            ingredient_strength: HashMap::from([("vitamin-d3".into(), 5000.0)]),
            goal_tags: vec!["immunity".into(), "overall-health".into()],
            is_gluten_free: true,
            category: vec!["vitamins".into()],
            ..Default::default()
        },
        Product {
            id: "zyn-006".into(),
            title: "Organic Elderberry + Zinc".into(),
            brand: "Garden of Life".into(),
            vendor: "ZYNAVA".into(),
            price: 22.5,
            rating: 4.7,
            review_count: 2210,
            master_ingredients: vec!["elderberry".into(), "zinc".into(), "vitamin-c".into()],
            ingredient_strength: HashMap::from([
                ("elderberry".into(), 300.0),
                ("zinc".into(), 15.0),
                ("vitamin-c".into(), 90.0),
            ]),
            goal_tags: vec!["immunity".into()],
            is_vegan: true,
            is_organic: true,
            category: vec!["immune-support".into()],
            ..Default::default()
        },
        Product {
            id: "zyn-007".into(),
            title: "B12 Energy Drops".into(),
            brand: "Solgar".into(),
            vendor: "ZYNAVA".into(),
            price: 16.0,
            rating: 4.4,
            review_count: 980,
            master_ingredients: vec!["b12".into()],
            ingredient_strength: HashMap::from([("b12".into(), 1000.0)]),
            goal_tags: vec!["energy".into()],
            activity_scores: HashMap::from([("sedentary".into(), 0.85)]),
            is_vegan: true,
            category: vec!["vitamins".into()],
            ..Default::default()
        },
        Product {
            id: "zyn-008".into(),
            title: "Creatine Monohydrate Powder".into(),
            brand: "Nutricost".into(),
            vendor: "ZYNAVA".into(),
            price: 24.9,
            rating: 4.8,
            review_count: 7630,
            master_ingredients: vec!["creatine".into()],
            ingredient_strength: HashMap::from([("creatine".into(), 5000.0)]),
            goal_tags: vec!["fitness".into(), "energy".into()],
            activity_scores: HashMap::from([
                ("athlete".into(), 1.0),
                ("active".into(), 0.9),
            ]),
            third_party_tested: true,
            category: vec!["sports-nutrition".into()],
            ..Default::default()
        },
        Product {
            id: "zyn-009".into(),
            title: "Daily Probiotic 30B CFU".into(),
            brand: "Garden of Life".into(),
            vendor: "ZYNAVA".into(),
            price: 29.0,
            rating: 4.6,
            review_count: 4105,
            master_ingredients: vec!["probiotics".into()],
            ingredient_strength: HashMap::from([("probiotics".into(), 30.0)]),
            goal_tags: vec!["digestion".into(), "overall-health".into()],
            is_vegan: true,
            is_gluten_free: true,
            category: vec!["digestive-health".into()],
            ..Default::default()
        },
        Product {
            id: "zyn-010".into(),
            title: "Calm Focus L-Theanine".into(),
            brand: "Nature's Bounty".into(),
            vendor: "ZYNAVA".into(),
            price: 12.0,
            rating: 4.3,
            review_count: 640,
            master_ingredients: vec!["l-theanine".into(), "caffeine".into()],
            ingredient_strength: HashMap::from([
                ("l-theanine".into(), 200.0),
                ("caffeine".into(), 100.0),
            ]),
            goal_tags: vec!["focus".into(), "stress".into()],
            category: vec!["nootropics".into()],
            ..Default::default()
        },
        Product {
            id: "zyn-011".into(),
            title: "Turmeric Curcumin Complex".into(),
            brand: "Life Extension".into(),
            vendor: "ZYNAVA".into(),
            price: 26.0,
            rating: 4.7,
            review_count: 1890,
            master_ingredients: vec!["turmeric".into(), "black-pepper-extract".into()],
            ingredient_strength: HashMap::from([("turmeric".into(), 1000.0)]),
            goal_tags: vec!["overall-health".into()],
            is_vegan: true,
            third_party_tested: true,
            category: vec!["herbals".into()],
            ..Default::default()
        },
        Product {
            id: "zyn-012".into(),
            title: "Iron + Vitamin C Complex".into(),
            brand: "Spring Valley".into(),
            vendor: "ZYNAVA".into(),
            price: 8.5,
            rating: 4.2,
            review_count: 312,
            master_ingredients: vec!["iron".into(), "vitamin-c".into()],
            ingredient_strength: HashMap::from([
                ("iron".into(), 18.0),
                ("vitamin-c".into(), 250.0),
            ]),
            goal_tags: vec!["energy".into()],
            demographic_scores: HashMap::from([("female-18-25".into(), 0.9)]),
            is_gluten_free: true,
            category: vec!["minerals".into()],
            ..Default::default()
        },
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_json_round_trip_uses_camel_case() {
        let p = &demo_catalog()[0];
        let v = serde_json::to_value(p).expect("serialize product");
        assert!(v.get("masterIngredients").is_some());
        assert!(v.get("ingredientStrength").is_some());
        assert!(v.get("reviewCount").is_some());
        // Absent optionals are omitted entirely.
        assert!(v.get("brandTier").is_none());
        let back: Product = serde_json::from_value(v).expect("deserialize product");
        assert_eq!(&back, p);
    }

    #[test]
    fn sparse_record_deserializes_with_defaults() {
        let p: Product =
            serde_json::from_str(r#"{"id":"x","title":"Bare Minimum"}"#).expect("sparse json");
        assert!(p.master_ingredients.is_empty());
        assert!(p.goal_tags.is_empty());
        assert_eq!(p.rating, 0.0);
        assert!(!p.is_vegan);
        assert!(p.brand_tier.is_none());
    }

    #[test]
    fn brand_tier_points_are_fixed() {
        assert_eq!(BrandTier::A.points(), 6.0);
        assert_eq!(BrandTier::B.points(), 4.0);
        assert_eq!(BrandTier::C.points(), 2.0);
    }

    #[test]
    fn demo_catalog_records_are_well_formed() {
        let catalog = demo_catalog();
        assert!(catalog.len() >= 10);
        for p in &catalog {
            assert!(!p.id.is_empty());
            assert!(!p.master_ingredients.is_empty(), "{} has no ingredients", p.id);
            assert!(p.rating >= 0.0 && p.rating <= 5.0, "{} rating", p.id);
            for ing in p.ingredient_strength.keys() {
                assert!(
                    p.master_ingredients.iter().any(|m| m == ing),
                    "{} strength key {} not in ingredient list",
                    p.id,
                    ing
                );
            }
        }
    }
}
