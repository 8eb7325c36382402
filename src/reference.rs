// src/reference.rs
//! Reference tables the scorers consult: per-ingredient dose ranges, the
//! goal-relatedness matrix, concern→ingredient mapping, goal starter stacks,
//! and brand-tier classifications.
//!
//! - Loads from TOML (`REFERENCE_CONFIG_PATH`, default `config/reference.toml`).
//! - Falls back to a built-in seed when no config is readable.
//! - Keys are normalized kebab-case; brand and dose lookups fall back
//!   exact match → substring match → None.
//! - `ReferenceHandle` is a threadsafe wrapper with an optional dev-gated
//!   hot-reload watcher (`REFERENCE_HOT_RELOAD=1`).

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

use crate::catalog::BrandTier;

pub const DEFAULT_REFERENCE_CONFIG_PATH: &str = "config/reference.toml";
pub const ENV_REFERENCE_CONFIG_PATH: &str = "REFERENCE_CONFIG_PATH";

/// Relatedness credited when the user's goal has no matrix row at all.
pub const NEUTRAL_RELATEDNESS: f32 = 0.5;
/// Relatedness credited when the row exists but the product tag is unrelated.
pub const FALLBACK_RELATEDNESS: f32 = 0.3;

/// Effective dosing window for one ingredient, in its canonical unit.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DoseRange {
    pub min: f32,
    pub optimal: f32,
    pub max: f32,
}

/// The full reference data set. All tables default to empty so a partial
/// TOML file is still valid; lookups have explicit defaults instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub dose_ranges: HashMap<String, DoseRange>,
    #[serde(default)]
    pub goal_relatedness: HashMap<String, HashMap<String, f32>>,
    #[serde(default)]
    pub concern_ingredients: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub starter_stacks: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub brand_tiers: HashMap<String, BrandTier>,
}

impl ReferenceData {
    /// Load from the configured TOML file.
    pub fn from_toml() -> anyhow::Result<Self> {
        let path = config_path();
        let content = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read reference config at {}: {}", path.display(), e)
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let data: ReferenceData = toml::from_str(toml_str)?;
        Ok(data)
    }

    /// Load from disk, falling back to the built-in seed.
    pub fn load() -> Self {
        match Self::from_toml() {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "reference config unavailable; using built-in seed");
                Self::default_seed()
            }
        }
    }

    /// Dose range for an ingredient key: exact lookup first, then a
    /// bidirectional-substring scan so naming variants like
    /// "magnesium-glycinate" resolve to the "magnesium" range.
    pub fn dose_range(&self, ingredient: &str) -> Option<DoseRange> {
        let key = normalize_key(ingredient);
        if key.is_empty() {
            return None;
        }
        if let Some(&r) = self.dose_ranges.get(&key) {
            return Some(r);
        }
        self.dose_ranges
            .iter()
            .find(|(k, _)| key.contains(k.as_str()) || k.contains(&key))
            .map(|(_, &r)| r)
    }

    /// Relatedness coefficient between the user's goal and a product tag.
    /// Identical tags always score 1.0, even without a matrix row, so
    /// scoring stays total for unknown-but-equal goals.
    pub fn relatedness(&self, user_goal: &str, product_tag: &str) -> f32 {
        let user = normalize_key(user_goal);
        let tag = normalize_key(product_tag);
        if user == tag {
            return 1.0;
        }
        match self.goal_relatedness.get(&user) {
            None => NEUTRAL_RELATEDNESS,
            Some(row) => row
                .get(&tag)
                .copied()
                .map(|v| v.clamp(0.0, 1.0))
                .unwrap_or(FALLBACK_RELATEDNESS),
        }
    }

    /// Target ingredient list for a stated concern.
    pub fn concern_targets(&self, concern: &str) -> Option<&[String]> {
        self.concern_ingredients
            .get(&normalize_key(concern))
            .map(|v| v.as_slice())
    }

    /// Goal-keyed starter ingredient stack.
    pub fn starter_stack(&self, goal: &str) -> Option<&[String]> {
        self.starter_stacks
            .get(&normalize_key(goal))
            .map(|v| v.as_slice())
    }

    /// Brand tier by brand name: exact lookup first, then substring.
    /// Returns `None` for unknown brands; the quality scorer applies the
    /// lowest-tier default.
    pub fn brand_tier(&self, brand: &str) -> Option<BrandTier> {
        let key = normalize_key(brand);
        if key.is_empty() {
            return None;
        }
        if let Some(&t) = self.brand_tiers.get(&key) {
            return Some(t);
        }
        self.brand_tiers
            .iter()
            .find(|(k, _)| key.contains(k.as_str()) || k.contains(&key))
            .map(|(_, &t)| t)
    }

    /// Built-in seed covering the common advisor catalog. Used as fallback
    /// when no config is found; `config/reference.toml` mirrors it.
    pub fn default_seed() -> Self {
        SEED.clone()
    }
}

static SEED: Lazy<ReferenceData> = Lazy::new(build_seed);

fn build_seed() -> ReferenceData {
    let mut dose_ranges = HashMap::new();
    for (k, min, optimal, max) in [
        ("magnesium", 100.0, 200.0, 400.0),
        ("melatonin", 0.5, 3.0, 10.0),
        ("l-theanine", 100.0, 200.0, 400.0),
        ("ashwagandha", 250.0, 600.0, 1000.0),
        ("rhodiola", 100.0, 300.0, 600.0),
        ("valerian", 300.0, 500.0, 900.0),
        ("vitamin-c", 250.0, 500.0, 2000.0),
        ("vitamin-d3", 1000.0, 2000.0, 5000.0),
        ("zinc", 5.0, 15.0, 40.0),
        ("elderberry", 100.0, 300.0, 1200.0),
        ("omega-3", 500.0, 1000.0, 3000.0),
        ("coq10", 90.0, 200.0, 400.0),
        ("b12", 100.0, 500.0, 2000.0),
        ("iron", 8.0, 18.0, 45.0),
        ("creatine", 3000.0, 5000.0, 10000.0),
        ("ginkgo", 60.0, 120.0, 240.0),
        ("probiotics", 1.0, 10.0, 100.0),
        ("turmeric", 500.0, 1000.0, 2000.0),
        ("collagen", 2500.0, 10000.0, 20000.0),
        ("caffeine", 50.0, 100.0, 400.0),
        ("fiber", 3000.0, 5000.0, 10000.0),
        ("ginger", 250.0, 500.0, 1500.0),
    ] {
        dose_ranges.insert(k.to_string(), DoseRange { min, optimal, max });
    }

    let mut goal_relatedness: HashMap<String, HashMap<String, f32>> = HashMap::new();
    let rows: &[(&str, &[(&str, f32)])] = &[
        (
            "energy",
            &[
                ("energy", 1.0),
                ("focus", 0.7),
                ("fitness", 0.6),
                ("overall-health", 0.5),
                ("stress", 0.4),
            ],
        ),
        (
            "sleep",
            &[("sleep", 1.0), ("stress", 0.7), ("overall-health", 0.5)],
        ),
        (
            "stress",
            &[
                ("stress", 1.0),
                ("sleep", 0.7),
                ("focus", 0.5),
                ("overall-health", 0.5),
            ],
        ),
        (
            "focus",
            &[
                ("focus", 1.0),
                ("energy", 0.7),
                ("stress", 0.5),
                ("overall-health", 0.5),
            ],
        ),
        (
            "immunity",
            &[
                ("immunity", 1.0),
                ("overall-health", 0.6),
                ("digestion", 0.4),
            ],
        ),
        (
            "fitness",
            &[
                ("fitness", 1.0),
                ("energy", 0.7),
                ("overall-health", 0.5),
                ("heart-health", 0.4),
            ],
        ),
        (
            "digestion",
            &[
                ("digestion", 1.0),
                ("immunity", 0.5),
                ("overall-health", 0.5),
            ],
        ),
        (
            "heart-health",
            &[
                ("heart-health", 1.0),
                ("overall-health", 0.6),
                ("fitness", 0.5),
            ],
        ),
        (
            "overall-health",
            &[
                ("overall-health", 1.0),
                ("energy", 0.6),
                ("sleep", 0.6),
                ("immunity", 0.6),
                ("digestion", 0.6),
                ("heart-health", 0.6),
                ("fitness", 0.5),
                ("focus", 0.5),
                ("stress", 0.5),
            ],
        ),
    ];
    for (goal, pairs) in rows {
        let row = pairs
            .iter()
            .map(|(tag, v)| (tag.to_string(), *v))
            .collect();
        goal_relatedness.insert(goal.to_string(), row);
    }

    let mut concern_ingredients = HashMap::new();
    for (concern, list) in [
        ("low-energy", vec!["b12", "iron", "coq10", "ashwagandha"]),
        (
            "poor-sleep",
            vec!["magnesium", "melatonin", "l-theanine", "valerian"],
        ),
        (
            "high-stress",
            vec!["ashwagandha", "rhodiola", "l-theanine", "magnesium"],
        ),
        ("brain-fog", vec!["omega-3", "ginkgo", "b12", "caffeine"]),
        (
            "frequent-illness",
            vec!["vitamin-c", "vitamin-d3", "zinc", "elderberry"],
        ),
        ("joint-pain", vec!["turmeric", "collagen", "omega-3"]),
        ("digestive-issues", vec!["probiotics", "fiber", "ginger"]),
        ("high-cholesterol", vec!["omega-3", "coq10", "fiber"]),
    ] {
        concern_ingredients.insert(
            concern.to_string(),
            list.into_iter().map(str::to_string).collect(),
        );
    }

    let mut starter_stacks = HashMap::new();
    for (goal, list) in [
        ("energy", vec!["b12", "coq10", "iron"]),
        ("sleep", vec!["magnesium", "melatonin", "l-theanine"]),
        ("stress", vec!["ashwagandha", "rhodiola", "magnesium"]),
        ("focus", vec!["omega-3", "l-theanine", "ginkgo"]),
        ("immunity", vec!["vitamin-c", "vitamin-d3", "zinc"]),
        ("fitness", vec!["creatine", "magnesium", "omega-3"]),
        ("digestion", vec!["probiotics", "fiber", "ginger"]),
        ("heart-health", vec!["omega-3", "coq10", "fiber"]),
        (
            "overall-health",
            vec!["vitamin-d3", "omega-3", "magnesium", "probiotics"],
        ),
    ] {
        starter_stacks.insert(
            goal.to_string(),
            list.into_iter().map(str::to_string).collect(),
        );
    }

    let mut brand_tiers = HashMap::new();
    for (brand, tier) in [
        ("thorne", BrandTier::A),
        ("pure-encapsulations", BrandTier::A),
        ("life-extension", BrandTier::A),
        ("nordic-naturals", BrandTier::A),
        ("now-foods", BrandTier::B),
        ("garden-of-life", BrandTier::B),
        ("solgar", BrandTier::B),
        ("nature-made", BrandTier::B),
        ("jarrow-formulas", BrandTier::B),
        ("natures-bounty", BrandTier::C),
        ("nutricost", BrandTier::C),
        ("spring-valley", BrandTier::C),
    ] {
        brand_tiers.insert(brand.to_string(), tier);
    }

    ReferenceData {
        dose_ranges,
        goal_relatedness,
        concern_ingredients,
        starter_stacks,
        brand_tiers,
    }
}

/// Normalize a lookup key to kebab-case: lowercase, trim, separators and
/// punctuation collapsed to single dashes ("NOW Foods" → "now-foods",
/// "Nature's Bounty" → "natures-bounty").
pub fn normalize_key(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_dash = false;
    for ch in s.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(ch.to_lowercase());
        } else if matches!(ch, ' ' | '-' | '_' | '/' | '\\' | '—' | '–' | '.' | ',') {
            pending_dash = true;
        }
        // Apostrophes and other punctuation are dropped entirely.
    }
    out
}

/* ----------------------------
Thread-safe handle + hot reload
---------------------------- */

/// A threadsafe handle that can hot-reload the underlying tables in
/// dev/local. Enable with REFERENCE_HOT_RELOAD=1 (dev-gated).
#[derive(Clone)]
pub struct ReferenceHandle {
    inner: Arc<RwLock<ReferenceData>>,
}

impl ReferenceHandle {
    pub fn new(data: ReferenceData) -> Self {
        Self {
            inner: Arc::new(RwLock::new(data)),
        }
    }

    /// Snapshot of the current tables. Clones; one snapshot per request.
    pub fn current(&self) -> ReferenceData {
        self.inner
            .read()
            .map(|g| g.clone())
            .unwrap_or_else(|_| ReferenceData::default_seed())
    }

    /// Swap in a new data set atomically.
    pub fn replace(&self, data: ReferenceData) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = data;
        }
    }

    /// Re-read the configured TOML file and swap on success.
    pub fn reload_from_disk(&self) -> anyhow::Result<()> {
        let data = ReferenceData::from_toml()?;
        self.replace(data);
        info!("reference tables reloaded");
        Ok(())
    }
}

fn config_path() -> PathBuf {
    std::env::var(ENV_REFERENCE_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_REFERENCE_CONFIG_PATH))
}

/// Returns true if we should enable hot reload (dev/local only).
fn hot_reload_enabled() -> bool {
    let want = std::env::var("REFERENCE_HOT_RELOAD")
        .ok()
        .map(|v| v == "1")
        .unwrap_or(false);
    if !want {
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

/// Start a polling watcher on `path` that hot-reloads into `handle`.
/// Polls mtime every 2s. Uses only std, no external deps.
pub fn start_hot_reload_thread(handle: ReferenceHandle, path: PathBuf) {
    if !hot_reload_enabled() {
        return;
    }

    thread::spawn(move || {
        let poll = Duration::from_secs(2);
        let mut last_mtime: Option<SystemTime> = None;

        loop {
            match fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(mtime) => {
                    let changed = match last_mtime {
                        None => {
                            last_mtime = Some(mtime);
                            false
                        }
                        Some(prev) => mtime > prev,
                    };
                    if changed {
                        if let Ok(content) = fs::read_to_string(&path) {
                            if let Ok(new_data) = ReferenceData::from_toml_str(&content) {
                                handle.replace(new_data);
                                info!(path = %path.display(), "reference tables hot-reloaded");
                            }
                        }
                        last_mtime = Some(mtime);
                    }
                }
                Err(_) => {
                    // File missing or unreadable; keep trying.
                }
            }
            thread::sleep(poll);
        }
    });
}
