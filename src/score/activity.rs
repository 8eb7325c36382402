//! Activity/lifestyle fit scoring. Same shape as the demographic scorer
//! with a smaller ceiling.

use crate::catalog::Product;
use crate::score::{display_name, ScoreResult};

/// Multiplier used when the product has no entry for the user's key.
pub const DEFAULT_ACTIVITY_FACTOR: f32 = 0.7;

const HIGHLY_SUITED_THRESHOLD: f32 = 0.9;

pub fn score_activity(product: &Product, activity: &str, ceiling: f32) -> ScoreResult {
    let factor = {
        let f = product
            .activity_scores
            .get(activity)
            .copied()
            .unwrap_or(DEFAULT_ACTIVITY_FACTOR);
        if f.is_finite() {
            f.clamp(0.0, 1.0)
        } else {
            DEFAULT_ACTIVITY_FACTOR
        }
    };

    let mut reasons = Vec::new();
    if factor >= HIGHLY_SUITED_THRESHOLD {
        reasons.push(format!(
            "Great fit for your {} lifestyle",
            display_name(activity)
        ));
    }

    ScoreResult {
        score: (factor * ceiling).clamp(0.0, ceiling),
        reasons,
    }
}
