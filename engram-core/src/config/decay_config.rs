use serde::{Deserialize, Serialize};

use super::defaults;

/// How an item's decay score falls off with age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayStrategy {
    /// `exp(-ln(2) * age / half_life)`: score halves every half-life.
    Exponential,
    /// `max(0, 1 - age / half_life)`: hits zero at one half-life.
    Linear,
    /// `1.0` before the half-life, `0.0` after.
    Threshold,
}

/// Decay subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// Decay curve shape.
    pub strategy: DecayStrategy,
    /// Half-life in days.
    pub half_life_days: f32,
    /// Items scoring below this are excluded from default ranking but
    /// stay retrievable by direct id lookup.
    pub threshold_score: f32,
    /// Each recorded access multiplies the effective half-life by this.
    pub access_boost_base: f32,
    /// Cap on the cumulative access multiplier.
    pub access_boost_cap: f32,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            strategy: DecayStrategy::Exponential,
            half_life_days: defaults::DEFAULT_DECAY_HALF_LIFE_DAYS,
            threshold_score: defaults::DEFAULT_DECAY_THRESHOLD_SCORE,
            access_boost_base: defaults::DEFAULT_ACCESS_BOOST_BASE,
            access_boost_cap: defaults::DEFAULT_ACCESS_BOOST_CAP,
        }
    }
}
