//! Ingredient matching and dosage-quality scoring — the single largest
//! Z-SCORE factor.
//!
//! Matching is a loose bidirectional substring check so catalog naming
//! variants ("magnesium-glycinate") still match a target ("magnesium")
//! without a synonym table. Each match is then judged against the
//! ingredient's reference dose range and the final score rewards both
//! breadth (fraction of the target list covered) and dosing quality.

use std::collections::HashSet;

use crate::catalog::Product;
use crate::reference::{DoseRange, ReferenceData};
use crate::score::display_name;

/// Multiplier applied when no reference range exists or the dose is unusable.
pub const NEUTRAL_DOSE_MULTIPLIER: f32 = 0.7;

/// Match coverage at or above this ratio earns a summary reason.
const COVERAGE_REASON_THRESHOLD: f32 = 0.5;

/// Where a dose falls relative to its reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoseTier {
    Underdosed,
    Suboptimal,
    Optimal,
    Overdosed,
}

impl DoseTier {
    /// Classify a positive dose against a range. `[optimal, max]` is the
    /// optimal band, inclusive on both ends.
    pub fn classify(amount: f32, range: &DoseRange) -> Self {
        if amount < range.min {
            DoseTier::Underdosed
        } else if amount < range.optimal {
            DoseTier::Suboptimal
        } else if amount <= range.max {
            DoseTier::Optimal
        } else {
            DoseTier::Overdosed
        }
    }

    /// Fixed quality multiplier per tier.
    pub fn multiplier(self) -> f32 {
        match self {
            DoseTier::Underdosed => 0.5,
            DoseTier::Suboptimal => 0.8,
            DoseTier::Optimal => 1.0,
            DoseTier::Overdosed => 0.6,
        }
    }
}

/// Ingredient-category result; carries the primary-ingredient pick the
/// diversity filter buckets on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IngredientScoreResult {
    pub score: f32,
    pub reasons: Vec<String>,
    pub primary_ingredient: Option<String>,
}

/// Loose bidirectional substring match, case-insensitive.
pub fn ingredient_matches(a: &str, b: &str) -> bool {
    let a = a.trim().to_ascii_lowercase();
    let b = b.trim().to_ascii_lowercase();
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}

/// Accumulator for the match fold.
#[derive(Default)]
struct MatchAcc {
    covered_targets: HashSet<usize>,
    quality_sum: f32,
    match_count: usize,
    best: Option<(String, f32)>,
    reasons: Vec<String>,
}

/// Score a product's ingredient list against the user's target list.
///
/// `score = (covered targets / target count) × mean dose quality × ceiling`.
/// The denominator is the target list size, never the product list size: a
/// product covering all targets earns full match-ratio credit regardless of
/// how many unrelated ingredients it also contains.
pub fn score_ingredients(
    product: &Product,
    targets: &[String],
    reference: &ReferenceData,
    ceiling: f32,
) -> IngredientScoreResult {
    // Missing ingredient data or an empty target list is a floor, not an error.
    if product.master_ingredients.is_empty() || targets.is_empty() {
        return IngredientScoreResult::default();
    }

    let acc = product
        .master_ingredients
        .iter()
        .fold(MatchAcc::default(), |mut acc, ingredient| {
            let hits: Vec<usize> = targets
                .iter()
                .enumerate()
                .filter(|(_, t)| ingredient_matches(ingredient, t))
                .map(|(i, _)| i)
                .collect();
            if hits.is_empty() {
                return acc;
            }

            let dose = lookup_strength(product, ingredient);
            // Range resolved by the target key first so variants are judged
            // against the canonical ingredient's window.
            let range = hits
                .iter()
                .find_map(|&i| reference.dose_range(&targets[i]))
                .or_else(|| reference.dose_range(ingredient));

            let (multiplier, tier) = match (range, dose) {
                (Some(r), Some(d)) if d > 0.0 && d.is_finite() => {
                    let tier = DoseTier::classify(d, &r);
                    (tier.multiplier(), Some(tier))
                }
                _ => (NEUTRAL_DOSE_MULTIPLIER, None),
            };

            acc.covered_targets.extend(hits);
            acc.quality_sum += multiplier;
            acc.match_count += 1;
            // Highest multiplier wins; first encountered wins ties, which is
            // catalog ingredient order (primary ingredient listed first).
            if acc.best.as_ref().map_or(true, |(_, best)| multiplier > *best) {
                acc.best = Some((ingredient.clone(), multiplier));
            }
            if tier == Some(DoseTier::Optimal) {
                acc.reasons
                    .push(format!("Optimal {} dose", display_name(ingredient)));
            }
            acc
        });

    if acc.match_count == 0 {
        return IngredientScoreResult::default();
    }

    let coverage = acc.covered_targets.len() as f32 / targets.len() as f32;
    let mean_quality = acc.quality_sum / acc.match_count as f32;
    let score = (coverage * mean_quality * ceiling).clamp(0.0, ceiling);

    let mut reasons = acc.reasons;
    if coverage >= COVERAGE_REASON_THRESHOLD {
        reasons.push(format!(
            "Matches {} of {} ingredients for your needs",
            acc.covered_targets.len(),
            targets.len()
        ));
    }

    IngredientScoreResult {
        score,
        reasons,
        primary_ingredient: acc.best.map(|(ingredient, _)| ingredient),
    }
}

/// Dosage for an ingredient key; falls back to a case-insensitive scan when
/// the catalog map key doesn't byte-match the ingredient list entry.
fn lookup_strength(product: &Product, ingredient: &str) -> Option<f32> {
    if let Some(&d) = product.ingredient_strength.get(ingredient) {
        return Some(d);
    }
    product
        .ingredient_strength
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(ingredient))
        .map(|(_, &d)| d)
}
