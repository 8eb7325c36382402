use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::catalog::{demo_catalog, Product, ScoredProduct};
use crate::diversity::{apply_diversity, DiversityLimits};
use crate::history::{History, RankingEntry};
use crate::quiz::{QuizInput, QuizQuery};
use crate::reference::{ReferenceData, ReferenceHandle};
use crate::score::{rank_products, resolve_target_ingredients, HotReloadWeights};
use crate::sort::{apply_sort, SortKey};

#[derive(Clone)]
pub struct AppState {
    pub reference: ReferenceHandle,
    pub weights: Arc<HotReloadWeights>,
    pub history: Arc<History>,
    pub catalog: Arc<Vec<Product>>,
}

impl AppState {
    /// Default wiring: reference tables from disk (seed fallback), weights
    /// from config/weights.json, the built-in demo catalog.
    pub fn from_env() -> Self {
        Self {
            reference: ReferenceHandle::new(ReferenceData::load()),
            weights: Arc::new(HotReloadWeights::new(None)),
            history: Arc::new(History::with_capacity(500)),
            catalog: Arc::new(demo_catalog()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/rank", post(rank))
        .route("/recommend", get(recommend))
        .route("/debug/last-ranking", get(debug_last_ranking))
        .route("/debug/reference", get(debug_reference))
        .route("/admin/reload-reference", get(admin_reload_reference))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Body of POST /rank: the caller's own catalog plus quiz answers.
/// Diversity and sort are opt-in; by default the full ranked list returns
/// in relevance order.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankRequest {
    #[serde(default)]
    quiz: QuizInput,
    products: Vec<Product>,
    #[serde(default)]
    diversity: Option<DiversityLimits>,
    #[serde(default)]
    sort: Option<SortKey>,
}

async fn rank(
    State(state): State<AppState>,
    Json(req): Json<RankRequest>,
) -> Json<Vec<ScoredProduct>> {
    let reference = state.reference.current();
    let weights = state.weights.current();

    let mut ranked = rank_products(&req.products, &req.quiz, &reference, &weights);
    crate::metrics::record_ranking(req.products.len());
    state.history.push(&req.quiz, &ranked);

    if let Some(limits) = req.diversity {
        ranked = apply_diversity(ranked, limits);
    }
    if let Some(key) = req.sort {
        apply_sort(&mut ranked, key);
    }
    Json(ranked)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecommendResponse {
    target_ingredients: Vec<String>,
    products: Vec<ScoredProduct>,
}

/// GET /recommend: quiz answers arrive as URL query parameters; ranks the
/// demo catalog and applies the default diversity limits.
async fn recommend(
    State(state): State<AppState>,
    Query(query): Query<QuizQuery>,
) -> Json<RecommendResponse> {
    let quiz = query.resolve();
    let reference = state.reference.current();
    let weights = state.weights.current();

    let target_ingredients = resolve_target_ingredients(&quiz, &reference);
    let ranked = rank_products(&state.catalog, &quiz, &reference, &weights);
    crate::metrics::record_ranking(state.catalog.len());
    state.history.push(&quiz, &ranked);

    let products = apply_diversity(ranked, DiversityLimits::default());
    Json(RecommendResponse {
        target_ingredients,
        products,
    })
}

async fn debug_last_ranking(State(state): State<AppState>) -> Json<Vec<RankingEntry>> {
    Json(state.history.snapshot_last_n(10))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReferenceSummary {
    dose_ranges: usize,
    goal_relatedness_rows: usize,
    concerns: usize,
    starter_stacks: usize,
    brand_tiers: usize,
}

async fn debug_reference(State(state): State<AppState>) -> Json<ReferenceSummary> {
    let r = state.reference.current();
    Json(ReferenceSummary {
        dose_ranges: r.dose_ranges.len(),
        goal_relatedness_rows: r.goal_relatedness.len(),
        concerns: r.concern_ingredients.len(),
        starter_stacks: r.starter_stacks.len(),
        brand_tiers: r.brand_tiers.len(),
    })
}

#[derive(Serialize)]
struct ReloadResponse {
    reloaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn admin_reload_reference(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReloadResponse>) {
    match state.reference.reload_from_disk() {
        Ok(()) => (
            StatusCode::OK,
            Json(ReloadResponse {
                reloaded: true,
                error: None,
            }),
        ),
        Err(e) => {
            warn!(error = %e, "reference reload failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ReloadResponse {
                    reloaded: false,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
