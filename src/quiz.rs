//! Quiz input: the user profile produced by the advisor questionnaire.
//!
//! The front-end passes answers as URL query parameters. Multi-select fields
//! arrive comma-joined; single-select fields pass through as-is. Missing or
//! blank parameters resolve to the documented defaults below, so a quiz
//! value can always be built and scoring never fails on sparse input.

use serde::{Deserialize, Serialize};

pub const DEFAULT_GOAL: &str = "overall-health";
pub const DEFAULT_DEMOGRAPHIC: &str = "female-26-35";
pub const DEFAULT_ACTIVITY: &str = "moderate";
/// Sentinel for "no concern selected".
pub const CONCERN_NONE: &str = "none";

/// Resolved quiz answers used by the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizInput {
    /// Primary wellness goal, e.g. "energy", "sleep", "overall-health".
    #[serde(alias = "goals")]
    pub goal: String,
    /// Composite `"<gender>-<ageband>"` identifier, e.g. "male-36-50".
    pub demographic: String,
    /// Activity/lifestyle identifier, e.g. "sedentary", "athlete".
    pub activity: String,
    /// Diet tags such as "vegan" or "gluten-free"; empty means no preference.
    pub diet_preferences: Vec<String>,
    /// Single concern identifier, or "none".
    #[serde(alias = "concerns")]
    pub concern: String,
    /// Free-form comma-joined shopping preferences. Display-only, not scored.
    pub preferences: String,
}

impl Default for QuizInput {
    fn default() -> Self {
        Self {
            goal: DEFAULT_GOAL.to_string(),
            demographic: DEFAULT_DEMOGRAPHIC.to_string(),
            activity: DEFAULT_ACTIVITY.to_string(),
            diet_preferences: Vec::new(),
            concern: CONCERN_NONE.to_string(),
            preferences: String::new(),
        }
    }
}

impl QuizInput {
    /// True when the user picked a concern other than the "none" sentinel.
    pub fn has_concern(&self) -> bool {
        !self.concern.is_empty() && self.concern != CONCERN_NONE
    }

    /// Case-insensitive diet-tag membership check.
    pub fn wants_diet(&self, tag: &str) -> bool {
        self.diet_preferences
            .iter()
            .any(|d| d.eq_ignore_ascii_case(tag))
    }
}

/// Raw query parameters as they arrive on `/recommend`. Everything optional;
/// `resolve()` applies defaults and splits the multi-select fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizQuery {
    pub goals: Option<String>,
    pub demographic: Option<String>,
    pub activity: Option<String>,
    pub diet: Option<String>,
    pub concerns: Option<String>,
    pub preferences: Option<String>,
}

impl QuizQuery {
    pub fn resolve(self) -> QuizInput {
        QuizInput {
            goal: single(self.goals, DEFAULT_GOAL),
            demographic: single(self.demographic, DEFAULT_DEMOGRAPHIC),
            activity: single(self.activity, DEFAULT_ACTIVITY),
            diet_preferences: split_multi(self.diet),
            concern: single(self.concerns, CONCERN_NONE),
            preferences: self.preferences.unwrap_or_default().trim().to_string(),
        }
    }
}

/// Normalize a single-select answer; blank or missing falls back to `default`.
fn single(raw: Option<String>, default: &str) -> String {
    match raw {
        Some(s) => {
            let s = s.trim().to_ascii_lowercase();
            if s.is_empty() {
                default.to_string()
            } else {
                s
            }
        }
        None => default.to_string(),
    }
}

/// Split a comma-joined multi-select answer into normalized tags.
fn split_multi(raw: Option<String>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
