// src/score/mod.rs
//! Z-SCORE composition: resolves the user's target ingredient list, runs the
//! per-category scorers over each candidate product, and produces the
//! ranked, annotated result list.
//!
//! The whole pipeline is a pure function of its inputs: no I/O, no shared
//! state, safe to invoke once per request without locking.

pub mod activity;
pub mod demographics;
pub mod dietary;
pub mod goals;
pub mod ingredients;
pub mod quality;
pub mod weights;

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::info;

use crate::catalog::{Product, ScoredProduct};
use crate::quiz::QuizInput;
use crate::reference::ReferenceData;

// Re-export convenient types.
pub use crate::score::activity::score_activity;
pub use crate::score::demographics::score_demographics;
pub use crate::score::dietary::score_dietary;
pub use crate::score::goals::score_goal;
pub use crate::score::ingredients::{score_ingredients, DoseTier, IngredientScoreResult};
pub use crate::score::quality::score_quality;
pub use crate::score::weights::{CategoryWeights, HotReloadWeights};

/// Display cap for per-product match reasons.
pub const MAX_DISPLAY_REASONS: usize = 5;

/// Final fallback stack key when neither concern nor goal resolves.
pub const FALLBACK_GOAL: &str = "overall-health";

/// Internal return shape of every per-category scorer. `score` stays within
/// the category's point ceiling.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreResult {
    pub score: f32,
    pub reasons: Vec<String>,
}

/// Resolve the ingredient list the user is implicitly or explicitly seeking:
/// concern first, then the goal-keyed starter stack, then the overall-health
/// stack as the final fallback.
pub fn resolve_target_ingredients(quiz: &QuizInput, reference: &ReferenceData) -> Vec<String> {
    if quiz.has_concern() {
        if let Some(list) = reference.concern_targets(&quiz.concern) {
            return list.to_vec();
        }
    }
    if let Some(stack) = reference.starter_stack(&quiz.goal) {
        return stack.to_vec();
    }
    reference
        .starter_stack(FALLBACK_GOAL)
        .map(|s| s.to_vec())
        .unwrap_or_default()
}

/// Score one product against the quiz. Produces a fresh annotated record;
/// the catalog input is never mutated.
pub fn score_product(
    product: &Product,
    quiz: &QuizInput,
    targets: &[String],
    reference: &ReferenceData,
    weights: &CategoryWeights,
) -> ScoredProduct {
    let ingredient = score_ingredients(product, targets, reference, weights.ingredient);
    let goal = score_goal(product, &quiz.goal, reference, weights.goal);
    let demographic = score_demographics(product, &quiz.demographic, weights.demographic);
    let activity = score_activity(product, &quiz.activity, weights.activity);
    let quality = score_quality(product, reference, weights.quality);
    let dietary = score_dietary(product, &quiz.diet_preferences, weights.dietary);

    let total = ingredient.score
        + goal.score
        + demographic.score
        + activity.score
        + quality.score
        + dietary.score;

    // Fixed category order, dedup across categories, cap for display.
    let mut reasons = ingredient.reasons;
    reasons.extend(goal.reasons);
    reasons.extend(demographic.reasons);
    reasons.extend(activity.reasons);
    reasons.extend(quality.reasons);
    reasons.extend(dietary.reasons);
    let match_reasons = dedup_reasons(reasons, MAX_DISPLAY_REASONS);

    ScoredProduct {
        product: product.clone(),
        z_score: total.max(0.0).round(),
        match_reasons,
        primary_ingredient: ingredient.primary_ingredient,
    }
}

/// Rank a candidate catalog for one quiz. Sort is stable: equal scores keep
/// catalog order.
pub fn rank_products(
    products: &[Product],
    quiz: &QuizInput,
    reference: &ReferenceData,
    weights: &CategoryWeights,
) -> Vec<ScoredProduct> {
    let targets = resolve_target_ingredients(quiz, reference);

    let mut scored: Vec<ScoredProduct> = products
        .iter()
        .map(|p| score_product(p, quiz, &targets, reference, weights))
        .collect();

    scored.sort_by(|a, b| b.z_score.partial_cmp(&a.z_score).unwrap_or(Ordering::Equal));

    dev_log_ranking(quiz, &targets, &scored);
    scored
}

/// Drop duplicate reason strings (first occurrence wins) and truncate.
fn dedup_reasons(reasons: Vec<String>, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for r in reasons {
        if out.len() >= cap {
            break;
        }
        if seen.insert(r.clone()) {
            out.push(r);
        }
    }
    out
}

/// Human-facing spelling of a kebab-case key ("l-theanine" → "l theanine").
pub(crate) fn display_name(key: &str) -> String {
    key.replace('-', " ")
}

/* ----------------------------
Dev diagnostics (anonymized)
---------------------------- */

// Dev logging gate: SCORING_DEV_LOG=1 AND dev env (debug build, the `debug`
// feature, or SHUTTLE_ENV in {local,development,dev}).
pub(crate) fn dev_logging_enabled() -> bool {
    let on = std::env::var("SCORING_DEV_LOG").ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) || cfg!(feature = "debug") {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

// Short stable hash for anonymized logging of quiz input.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

pub(crate) fn truncate_vec<T: ToString>(v: &[T], max: usize) -> Vec<String> {
    v.iter().take(max).map(|x| x.to_string()).collect()
}

/// Minimal, anonymized dev logger for ranking runs. Never logs raw quiz
/// answers; only a hashed id plus short lists.
fn dev_log_ranking(quiz: &QuizInput, targets: &[String], scored: &[ScoredProduct]) {
    if !dev_logging_enabled() {
        return;
    }
    let id = anon_hash(&format!(
        "{}|{}|{}|{}",
        quiz.goal, quiz.demographic, quiz.activity, quiz.concern
    ));
    let targets_short = truncate_vec(targets, 5);
    let top: Vec<String> = scored
        .iter()
        .take(3)
        .map(|s| format!("{}:{}", s.product.id, s.z_score))
        .collect();
    info!(
        target: "zscore",
        %id,
        products = scored.len(),
        targets = ?targets_short,
        top = ?top,
        "ranking complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::demo_catalog;

    fn reference() -> ReferenceData {
        ReferenceData::default_seed()
    }

    fn quiz(goal: &str, concern: &str) -> QuizInput {
        QuizInput {
            goal: goal.into(),
            concern: concern.into(),
            ..Default::default()
        }
    }

    #[test]
    fn concern_overrides_goal_stack() {
        let r = reference();
        let t = resolve_target_ingredients(&quiz("energy", "poor-sleep"), &r);
        assert!(t.iter().any(|i| i == "melatonin"));
        assert!(!t.iter().any(|i| i == "b12"));
    }

    #[test]
    fn goal_stack_when_concern_is_none() {
        let r = reference();
        let t = resolve_target_ingredients(&quiz("energy", "none"), &r);
        assert!(t.iter().any(|i| i == "b12"));
    }

    #[test]
    fn unknown_goal_falls_back_to_overall_health_stack() {
        let r = reference();
        let t = resolve_target_ingredients(&quiz("mystery", "none"), &r);
        assert_eq!(
            t,
            r.starter_stack(FALLBACK_GOAL).expect("fallback stack").to_vec()
        );
    }

    #[test]
    fn unknown_concern_falls_through_to_goal_stack() {
        let r = reference();
        let t = resolve_target_ingredients(&quiz("sleep", "mystery-concern"), &r);
        assert!(t.iter().any(|i| i == "magnesium"));
    }

    #[test]
    fn total_is_bounded_and_sorted() {
        let r = reference();
        let w = CategoryWeights::default();
        let catalog = demo_catalog();
        let ranked = rank_products(&catalog, &quiz("sleep", "none"), &r, &w);
        assert_eq!(ranked.len(), catalog.len());
        for s in &ranked {
            assert!(s.z_score >= 0.0 && s.z_score <= 100.0, "{}", s.product.id);
            assert!(s.match_reasons.len() <= MAX_DISPLAY_REASONS);
        }
        for pair in ranked.windows(2) {
            assert!(pair[0].z_score >= pair[1].z_score);
        }
    }

    #[test]
    fn scoring_is_deterministic() {
        let r = reference();
        let w = CategoryWeights::default();
        let catalog = demo_catalog();
        let q = quiz("stress", "high-stress");
        let a = rank_products(&catalog, &q, &r, &w);
        let b = rank_products(&catalog, &q, &r, &w);
        assert_eq!(a, b);
    }

    #[test]
    fn reasons_are_deduped_in_order() {
        let deduped = dedup_reasons(
            vec![
                "Third-party tested".into(),
                "Vegan-friendly".into(),
                "Third-party tested".into(),
            ],
            5,
        );
        assert_eq!(deduped, vec!["Third-party tested", "Vegan-friendly"]);
    }

    #[test]
    fn sleep_quiz_prefers_the_magnesium_complex() {
        let r = reference();
        let w = CategoryWeights::default();
        let ranked = rank_products(&demo_catalog(), &quiz("sleep", "poor-sleep"), &r, &w);
        // The magnesium and melatonin products both carry sleep targets; the
        // creatine powder should not outrank them.
        let top_ids: Vec<&str> = ranked.iter().take(3).map(|s| s.product.id.as_str()).collect();
        assert!(top_ids.contains(&"zyn-001") || top_ids.contains(&"zyn-002"));
        let creatine_pos = ranked
            .iter()
            .position(|s| s.product.id == "zyn-008")
            .unwrap();
        assert!(creatine_pos >= 3, "creatine ranked too high for a sleep quiz");
    }
}
