//! Demographic fit scoring.
//!
//! The demographic identifier is a composite `"<gender>-<ageband>"` key
//! ("male-36-50"); products carry a per-key suitability multiplier map.

use crate::catalog::Product;
use crate::score::ScoreResult;

/// Multiplier used when the product has no entry for the user's key.
pub const DEFAULT_DEMOGRAPHIC_FACTOR: f32 = 0.7;

const HIGHLY_SUITED_THRESHOLD: f32 = 0.9;

/// Split a composite key on the first hyphen: gender, then the age band.
pub fn split_demographic(key: &str) -> (&str, &str) {
    key.split_once('-').unwrap_or((key, ""))
}

pub fn score_demographics(product: &Product, demographic: &str, ceiling: f32) -> ScoreResult {
    let factor = resolve_factor(product, demographic);

    let mut reasons = Vec::new();
    if factor >= HIGHLY_SUITED_THRESHOLD {
        let (gender, age) = split_demographic(demographic);
        if age.is_empty() {
            reasons.push(format!("Highly suited for {gender}s"));
        } else {
            reasons.push(format!("Highly suited for {gender}s aged {age}"));
        }
    }

    ScoreResult {
        score: (factor * ceiling).clamp(0.0, ceiling),
        reasons,
    }
}

fn resolve_factor(product: &Product, demographic: &str) -> f32 {
    let factor = product
        .demographic_scores
        .get(demographic)
        .copied()
        .unwrap_or(DEFAULT_DEMOGRAPHIC_FACTOR);
    if factor.is_finite() {
        factor.clamp(0.0, 1.0)
    } else {
        DEFAULT_DEMOGRAPHIC_FACTOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const CEILING: f32 = 15.0;

    fn with_scores(scores: &[(&str, f32)]) -> Product {
        Product {
            id: "test".into(),
            title: "Test".into(),
            demographic_scores: scores
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<HashMap<_, _>>(),
            ..Default::default()
        }
    }

    #[test]
    fn missing_key_uses_default_factor() {
        let r = score_demographics(&with_scores(&[]), "male-36-50", CEILING);
        assert_eq!(r.score, DEFAULT_DEMOGRAPHIC_FACTOR * CEILING);
        assert!(r.reasons.is_empty());
    }

    #[test]
    fn high_suitability_emits_reason() {
        let r = score_demographics(&with_scores(&[("male-36-50", 0.95)]), "male-36-50", CEILING);
        assert_eq!(r.score, 0.95 * CEILING);
        assert_eq!(r.reasons, vec!["Highly suited for males aged 36-50"]);
    }

    #[test]
    fn split_keeps_age_band_intact() {
        assert_eq!(split_demographic("male-36-50"), ("male", "36-50"));
        assert_eq!(split_demographic("female-65-plus"), ("female", "65-plus"));
        assert_eq!(split_demographic("other"), ("other", ""));
    }

    #[test]
    fn out_of_range_multipliers_are_clamped() {
        let r = score_demographics(&with_scores(&[("male-36-50", 3.0)]), "male-36-50", CEILING);
        assert_eq!(r.score, CEILING);
        let r = score_demographics(&with_scores(&[("male-36-50", -1.0)]), "male-36-50", CEILING);
        assert_eq!(r.score, 0.0);
        let r = score_demographics(
            &with_scores(&[("male-36-50", f32::NAN)]),
            "male-36-50",
            CEILING,
        );
        assert_eq!(r.score, DEFAULT_DEMOGRAPHIC_FACTOR * CEILING);
    }
}
