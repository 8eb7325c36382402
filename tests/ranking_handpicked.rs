// tests/ranking_handpicked.rs
//
// Handpicked scoring scenarios with pinned expected values. These pin the
// load-bearing constants (tier multipliers, neutral defaults, sub-score
// formulas); if one of these moves, it's a product decision, not a refactor.

use std::collections::HashMap;

use zynava_match_engine::catalog::Product;
use zynava_match_engine::quiz::QuizInput;
use zynava_match_engine::reference::ReferenceData;
use zynava_match_engine::score::{
    quality::review_points, score_dietary, score_goal, score_ingredients, score_product,
    CategoryWeights,
};

fn reference() -> ReferenceData {
    ReferenceData::default_seed()
}

fn weights() -> CategoryWeights {
    CategoryWeights::default()
}

#[test]
fn optimal_magnesium_variant_scores_the_full_35() {
    // ingredients ["magnesium-glycinate"], strength 200, target ["magnesium"],
    // range {min:100, optimal:200, max:400} → 1.0 × 1.0 × 35 = 35.
    let p = Product {
        id: "mag".into(),
        title: "Magnesium Glycinate".into(),
        master_ingredients: vec!["magnesium-glycinate".into()],
        ingredient_strength: HashMap::from([("magnesium-glycinate".into(), 200.0)]),
        ..Default::default()
    };
    let r = score_ingredients(&p, &["magnesium".to_string()], &reference(), 35.0);
    assert_eq!(r.score, 35.0);
    assert_eq!(r.primary_ingredient.as_deref(), Some("magnesium-glycinate"));
}

#[test]
fn untagged_product_scores_exactly_half_the_goal_ceiling() {
    let p = Product {
        id: "untagged".into(),
        title: "Untagged".into(),
        ..Default::default()
    };
    let r = score_goal(&p, "sleep", &reference(), 15.0);
    assert_eq!(r.score, 7.5);
}

#[test]
fn review_sub_score_at_five_stars_and_nine_reviews_is_four() {
    // ratingPoints = 5/5 × 3 = 3, volumePoints = log10(10) = 1.
    assert!((review_points(5.0, 9) - 4.0).abs() < 1e-5);
}

#[test]
fn vegan_organic_product_hits_the_dietary_ceiling_exactly() {
    let p = Product {
        id: "vegan".into(),
        title: "Vegan Organic".into(),
        is_vegan: true,
        is_organic: true,
        ..Default::default()
    };
    let r = score_dietary(&p, &["vegan".to_string()], 10.0);
    assert_eq!(r.score, 10.0);
}

#[test]
fn fully_matched_product_composes_all_six_categories() {
    // A deliberately maxed-out product for a poor-sleep vegan athlete quiz:
    // covers all four targets at optimal doses.
    let p = Product {
        id: "max".into(),
        title: "Sleep Stack Complete".into(),
        brand: "Thorne".into(),
        rating: 5.0,
        review_count: 10_000,
        master_ingredients: vec![
            "magnesium-glycinate".into(),
            "melatonin".into(),
            "l-theanine".into(),
            "valerian".into(),
        ],
        ingredient_strength: HashMap::from([
            ("magnesium-glycinate".into(), 200.0),
            ("melatonin".into(), 3.0),
            ("l-theanine".into(), 200.0),
            ("valerian".into(), 500.0),
        ]),
        goal_tags: vec!["sleep".into()],
        demographic_scores: HashMap::from([("female-26-35".into(), 1.0)]),
        activity_scores: HashMap::from([("athlete".into(), 1.0)]),
        is_vegan: true,
        is_organic: true,
        third_party_tested: true,
        ..Default::default()
    };
    let quiz = QuizInput {
        goal: "sleep".into(),
        concern: "poor-sleep".into(),
        activity: "athlete".into(),
        diet_preferences: vec!["vegan".into()],
        ..Default::default()
    };
    let reference = reference();
    let targets = zynava_match_engine::resolve_target_ingredients(&quiz, &reference);
    let scored = score_product(&p, &quiz, &targets, &reference, &weights());

    // ingredient 35 + goal 15 + demographic 15 + activity 10
    // + quality (6 + 3 + 3 + 1.5 = 13.5) + dietary 10 = 98.5 → 99 rounded.
    assert_eq!(scored.z_score, 99.0);
    assert!(scored.match_reasons.len() <= 5, "display cap");
    assert_eq!(
        scored.primary_ingredient.as_deref(),
        Some("magnesium-glycinate"),
        "first optimal match in catalog order"
    );
}

#[test]
fn one_bad_field_degrades_one_category_not_the_run() {
    // Non-finite rating zeroes only the rating term; everything else scores.
    let p = Product {
        id: "odd".into(),
        title: "Odd Rating".into(),
        brand: "Thorne".into(),
        rating: f32::NAN,
        review_count: 10,
        goal_tags: vec!["sleep".into()],
        master_ingredients: vec!["magnesium".into()],
        ingredient_strength: HashMap::from([("magnesium".into(), 200.0)]),
        ..Default::default()
    };
    let quiz = QuizInput {
        goal: "sleep".into(),
        concern: "poor-sleep".into(),
        ..Default::default()
    };
    let reference = reference();
    let targets = zynava_match_engine::resolve_target_ingredients(&quiz, &reference);
    let scored = score_product(&p, &quiz, &targets, &reference, &weights());
    assert!(scored.z_score > 0.0);
    assert!(scored.z_score <= 100.0);
}
