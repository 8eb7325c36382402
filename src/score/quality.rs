//! Trust/quality scoring: brand reputation, review signal, certifications.
//! Three independently-capped sub-scores summed into one category.

use crate::catalog::{BrandTier, Product};
use crate::reference::ReferenceData;
use crate::score::ScoreResult;

/// Rating contributes up to 3 points, review volume up to 3 more.
const RATING_POINTS_MAX: f32 = 3.0;
const VOLUME_POINTS_MAX: f32 = 3.0;
/// Certification bonus budget; only third-party testing is wired up today.
const CERTIFICATION_POINTS_MAX: f32 = 3.0;
const THIRD_PARTY_TESTED_BONUS: f32 = 1.5;

/// Ratings at or above this earn a reason.
const HIGH_RATING_THRESHOLD: f32 = 4.7;

/// Review sub-score: linear in rating, logarithmic in volume. Volume credit
/// saturates near 1000 reviews so review-count gaming can't dominate.
pub fn review_points(rating: f32, review_count: u32) -> f32 {
    let rating = if rating.is_finite() {
        rating.clamp(0.0, 5.0)
    } else {
        0.0
    };
    let rating_points = rating / 5.0 * RATING_POINTS_MAX;
    let volume_points = ((review_count as f32 + 1.0).log10()).min(VOLUME_POINTS_MAX);
    rating_points + volume_points
}

pub fn score_quality(product: &Product, reference: &ReferenceData, ceiling: f32) -> ScoreResult {
    let mut reasons = Vec::new();

    // Brand tier: explicit field, then brand-name lookup, then lowest tier.
    let tier = product
        .brand_tier
        .or_else(|| reference.brand_tier(&product.brand))
        .unwrap_or(BrandTier::C);
    let brand_points = tier.points();
    if tier == BrandTier::A {
        reasons.push(format!("{} is a top-tier brand", product.brand));
    }

    let review = review_points(product.rating, product.review_count);
    if product.rating.is_finite() && product.rating >= HIGH_RATING_THRESHOLD {
        reasons.push(format!("Rated {:.1}/5 by customers", product.rating));
    }

    let mut certification_points = 0.0;
    if product.third_party_tested {
        certification_points += THIRD_PARTY_TESTED_BONUS;
        reasons.push("Third-party tested".to_string());
    }
    let certification_points = certification_points.min(CERTIFICATION_POINTS_MAX);

    ScoreResult {
        score: (brand_points + review + certification_points).clamp(0.0, ceiling),
        reasons,
    }
}
