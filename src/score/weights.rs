//! Category weight table (point ceilings) with hot-reload from
//! config/weights.json.
//!
//! JSON shape:
//! {
//!   "ingredient": 35.0,
//!   "goal": 15.0,
//!   "demographic": 15.0,
//!   "activity": 10.0,
//!   "quality": 15.0,
//!   "dietary": 10.0,
//!   "caution_penalty_max": 20.0
//! }
//!
//! On each `current()` call we check the file's modified time and reload if
//! changed.

use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
    time::SystemTime,
};

/// Point ceilings per score category. Each scorer clamps to its ceiling, so
/// the aggregate never exceeds the sum of the six positive categories.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub ingredient: f32,
    pub goal: f32,
    pub demographic: f32,
    pub activity: f32,
    pub quality: f32,
    pub dietary: f32,
    /// Caution/safety penalty budget. Reserved: no scorer emits it, and the
    /// orchestrator sums only the positive categories.
    pub caution_penalty_max: f32,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            ingredient: 35.0,
            goal: 15.0,
            demographic: 15.0,
            activity: 10.0,
            quality: 15.0,
            dietary: 10.0,
            caution_penalty_max: 20.0,
        }
    }
}

impl CategoryWeights {
    /// Sum of the six positive category ceilings (100 with defaults).
    pub fn positive_total(&self) -> f32 {
        self.ingredient + self.goal + self.demographic + self.activity + self.quality + self.dietary
    }
}

/// Hot-reload wrapper: reloads when the config file mtime changes.
#[derive(Debug)]
pub struct HotReloadWeights {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    weights: CategoryWeights,
    last_modified: Option<SystemTime>,
}

impl HotReloadWeights {
    /// Create with a path (defaults to "config/weights.json" if `None`).
    pub fn new(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("config/weights.json"));
        Self {
            path,
            inner: RwLock::new(State {
                weights: CategoryWeights::default(),
                last_modified: None,
            }),
        }
    }

    /// Get the latest weights, reloading if the config file changed.
    pub fn current(&self) -> CategoryWeights {
        // Fast path: check metadata without grabbing write lock yet.
        let needs_reload = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => {
                let guard = self.inner.read().unwrap();
                guard.last_modified != Some(mtime)
            }
            Err(_) => {
                // If file isn't there, we keep defaults; no reload.
                false
            }
        };

        if !needs_reload {
            return self.inner.read().unwrap().weights;
        }

        // Slow path: reload with write lock.
        let mut guard = self.inner.write().unwrap();
        // Double-check in case of races.
        if let Ok(meta) = fs::metadata(&self.path) {
            if let Ok(mtime) = meta.modified() {
                if guard.last_modified != Some(mtime) {
                    if let Ok(w) = load_weights_file(&self.path) {
                        guard.weights = w;
                        guard.last_modified = Some(mtime);
                    }
                }
            }
        }
        guard.weights
    }
}

/// Load weights directly (no caching). Public for tests/tools.
pub fn load_weights_file(path: &Path) -> io::Result<CategoryWeights> {
    let bytes = fs::read(path)?;
    let w: CategoryWeights = serde_json::from_slice(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(w)
}
