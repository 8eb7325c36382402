//! Goal alignment scoring via the goal-relatedness matrix.

use crate::catalog::Product;
use crate::reference::ReferenceData;
use crate::score::{display_name, ScoreResult};

/// Credit for products that carry no goal tags at all. Sparse catalog data
/// gets half credit instead of a zero.
pub const UNTAGGED_GOAL_FACTOR: f32 = 0.5;

const PERFECT_MATCH_THRESHOLD: f32 = 0.8;
const RELATED_MATCH_THRESHOLD: f32 = 0.5;

/// Score the best relatedness between the product's goal tags and the
/// user's single primary goal.
pub fn score_goal(
    product: &Product,
    user_goal: &str,
    reference: &ReferenceData,
    ceiling: f32,
) -> ScoreResult {
    if product.goal_tags.is_empty() {
        return ScoreResult {
            score: ceiling * UNTAGGED_GOAL_FACTOR,
            reasons: Vec::new(),
        };
    }

    let best = product
        .goal_tags
        .iter()
        .map(|tag| reference.relatedness(user_goal, tag))
        .fold(0.0f32, f32::max);

    let mut reasons = Vec::new();
    if best >= PERFECT_MATCH_THRESHOLD {
        reasons.push(format!("Perfect match for your {} goal", display_name(user_goal)));
    } else if best >= RELATED_MATCH_THRESHOLD {
        reasons.push(format!("Supports your {} goal", display_name(user_goal)));
    }

    ScoreResult {
        score: (best * ceiling).clamp(0.0, ceiling),
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;

    const CEILING: f32 = 15.0;

    fn tagged(tags: &[&str]) -> Product {
        Product {
            id: "test".into(),
            title: "Test".into(),
            goal_tags: tags.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn reference() -> ReferenceData {
        ReferenceData::default_seed()
    }

    #[test]
    fn untagged_product_gets_flat_half_credit() {
        let r = score_goal(&tagged(&[]), "sleep", &reference(), CEILING);
        assert_eq!(r.score, 7.5);
        assert!(r.reasons.is_empty());
    }

    #[test]
    fn exact_tag_is_a_perfect_match() {
        let r = score_goal(&tagged(&["sleep"]), "sleep", &reference(), CEILING);
        assert_eq!(r.score, 15.0);
        assert!(r.reasons.iter().any(|s| s.contains("Perfect match")));
    }

    #[test]
    fn best_tag_wins_across_multiple() {
        // "fitness" is unrelated to sleep (0.3) but "stress" relates at 0.7.
        let r = score_goal(&tagged(&["fitness", "stress"]), "sleep", &reference(), CEILING);
        assert_eq!(r.score, 0.7 * CEILING);
        assert!(r.reasons.iter().any(|s| s.contains("Supports your sleep goal")));
    }

    #[test]
    fn unrelated_tags_score_fallback_without_reasons() {
        let r = score_goal(&tagged(&["fitness"]), "sleep", &reference(), CEILING);
        assert_eq!(r.score, 0.3 * CEILING);
        assert!(r.reasons.is_empty());
    }

    #[test]
    fn unknown_user_goal_stays_total() {
        let r = score_goal(&tagged(&["sleep"]), "mystery-goal", &reference(), CEILING);
        assert_eq!(r.score, 0.5 * CEILING);
    }
}
