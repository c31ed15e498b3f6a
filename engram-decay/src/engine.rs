use chrono::{DateTime, Utc};
use engram_core::config::DecayConfig;

use crate::formula;

/// Config-bound decay scoring. Wraps the pure [`formula`] functions with
/// calendar math; holds no other state.
#[derive(Debug, Clone)]
pub struct DecayEngine {
    config: DecayConfig,
}

impl DecayEngine {
    pub fn new(config: DecayConfig) -> Self {
        Self { config }
    }

    /// Decay score for an item created at `created_at`, evaluated at `now`.
    pub fn score(&self, created_at: DateTime<Utc>, access_count: u64, now: DateTime<Utc>) -> f32 {
        let age_days = (now - created_at).num_seconds().max(0) as f32 / 86_400.0;
        formula::decay_score(age_days, access_count, &self.config)
    }

    /// Whether a score falls under the soft-forgetting threshold. Items
    /// under it are excluded from default ranking but stay retrievable
    /// by direct id lookup.
    pub fn below_threshold(&self, score: f32) -> bool {
        score < self.config.threshold_score
    }

    pub fn threshold(&self) -> f32 {
        self.config.threshold_score
    }

    pub fn config(&self) -> &DecayConfig {
        &self.config
    }
}

impl Default for DecayEngine {
    fn default() -> Self {
        Self::new(DecayConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn future_created_at_scores_one() {
        let engine = DecayEngine::default();
        let now = Utc::now();
        let score = engine.score(now + Duration::days(3), 0, now);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn threshold_gate_matches_config() {
        let engine = DecayEngine::default();
        assert!(engine.below_threshold(0.05));
        assert!(!engine.below_threshold(0.15));
    }
}
