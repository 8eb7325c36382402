//! history.rs — in-memory log of recent ranking runs for the /debug surface.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::ScoredProduct;
use crate::quiz::QuizInput;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub ts: DateTime<Utc>,
    pub goal: String,
    pub concern: String,
    pub product_count: usize,
    // Short diagnostic fingerprints, not the full result set:
    pub top_ids: Vec<String>,
    pub top_scores: Vec<f32>,
}

#[derive(Debug)]
pub struct History {
    inner: Mutex<Vec<RankingEntry>>,
    cap: usize,
}

impl History {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(10_000))),
            cap: cap.min(10_000),
        }
    }

    pub fn push(&self, quiz: &QuizInput, ranked: &[ScoredProduct]) {
        let (ids, scores) = {
            let mut ids = Vec::new();
            let mut scores = Vec::new();
            for s in ranked.iter().take(3) {
                ids.push(s.product.id.clone());
                scores.push(s.z_score);
            }
            (ids, scores)
        };

        let entry = RankingEntry {
            ts: Utc::now(),
            goal: quiz.goal.clone(),
            concern: quiz.concern.clone(),
            product_count: ranked.len(),
            top_ids: ids,
            top_scores: scores,
        };

        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<RankingEntry> {
        let v = self.inner.lock().expect("history mutex poisoned");
        let len = v.len();
        let start = len.saturating_sub(n);
        v[start..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(history: &History, goal: &str) {
        let quiz = QuizInput {
            goal: goal.into(),
            ..Default::default()
        };
        history.push(&quiz, &[]);
    }

    #[test]
    fn capped_at_capacity() {
        let h = History::with_capacity(3);
        for i in 0..5 {
            entry(&h, &format!("goal-{i}"));
        }
        let snap = h.snapshot_last_n(10);
        assert_eq!(snap.len(), 3);
        assert_eq!(snap[0].goal, "goal-2");
        assert_eq!(snap[2].goal, "goal-4");
    }

    #[test]
    fn snapshot_returns_most_recent() {
        let h = History::with_capacity(100);
        entry(&h, "sleep");
        entry(&h, "energy");
        let snap = h.snapshot_last_n(1);
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].goal, "energy");
    }
}
