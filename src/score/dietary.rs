//! Dietary fit scoring.
//!
//! Hard dietary exclusion happens upstream of ranking, so any product that
//! reaches the scorer has already passed; the base score reflects that.
//! Bonuses reward exceeding the stated requirements, and organic is credited
//! regardless of the stated diet.

use crate::catalog::Product;
use crate::score::ScoreResult;

pub const DIETARY_BASE_POINTS: f32 = 5.0;
const VEGAN_BONUS: f32 = 3.0;
const GLUTEN_FREE_BONUS: f32 = 2.0;
const ORGANIC_BONUS: f32 = 2.0;

pub fn score_dietary(product: &Product, diet_preferences: &[String], ceiling: f32) -> ScoreResult {
    let wants = |tag: &str| diet_preferences.iter().any(|d| d.eq_ignore_ascii_case(tag));

    let mut score = DIETARY_BASE_POINTS;
    let mut reasons = Vec::new();

    if wants("vegan") && product.is_vegan {
        score += VEGAN_BONUS;
        reasons.push("Vegan-friendly".to_string());
    }
    if wants("gluten-free") && product.is_gluten_free {
        score += GLUTEN_FREE_BONUS;
    }
    if product.is_organic {
        score += ORGANIC_BONUS;
        reasons.push("Made with organic ingredients".to_string());
    }

    ScoreResult {
        score: score.min(ceiling),
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CEILING: f32 = 10.0;

    fn diets(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn flags(vegan: bool, gluten_free: bool, organic: bool) -> Product {
        Product {
            id: "test".into(),
            title: "Test".into(),
            is_vegan: vegan,
            is_gluten_free: gluten_free,
            is_organic: organic,
            ..Default::default()
        }
    }

    #[test]
    fn base_score_is_unconditional() {
        let r = score_dietary(&flags(false, false, false), &[], CEILING);
        assert_eq!(r.score, DIETARY_BASE_POINTS);
        assert!(r.reasons.is_empty());
    }

    #[test]
    fn vegan_and_organic_hit_the_ceiling_exactly() {
        let r = score_dietary(&flags(true, false, true), &diets(&["vegan"]), CEILING);
        assert_eq!(r.score, 10.0);
        assert_eq!(
            r.reasons,
            vec!["Vegan-friendly", "Made with organic ingredients"]
        );
    }

    #[test]
    fn bonuses_require_the_matching_preference() {
        // Vegan product without a vegan preference earns no vegan bonus.
        let r = score_dietary(&flags(true, true, false), &diets(&["gluten-free"]), CEILING);
        assert_eq!(r.score, DIETARY_BASE_POINTS + 2.0);
        assert!(r.reasons.is_empty());
    }

    #[test]
    fn organic_is_credited_without_a_preference() {
        let r = score_dietary(&flags(false, false, true), &[], CEILING);
        assert_eq!(r.score, DIETARY_BASE_POINTS + 2.0);
    }

    #[test]
    fn all_bonuses_clamp_to_ceiling() {
        let r = score_dietary(
            &flags(true, true, true),
            &diets(&["vegan", "gluten-free"]),
            CEILING,
        );
        // 5 + 3 + 2 + 2 would be 12; clamped.
        assert_eq!(r.score, CEILING);
    }
}
