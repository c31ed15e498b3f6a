use engram_core::config::{DecayConfig, DecayStrategy};

/// Decay score for an item of the given age, in [0.0, 1.0].
///
/// ```text
/// exponential: exp(-ln(2) * age / h')
/// linear:      max(0, 1 - age / h')
/// threshold:   1.0 if age < h' else 0.0
/// ```
///
/// where `h'` is the access-boosted effective half-life.
pub fn decay_score(age_days: f32, access_count: u64, config: &DecayConfig) -> f32 {
    let half_life = effective_half_life(access_count, config);
    let score = match config.strategy {
        DecayStrategy::Exponential => {
            (-std::f32::consts::LN_2 * age_days / half_life).exp()
        }
        DecayStrategy::Linear => 1.0 - age_days / half_life,
        DecayStrategy::Threshold => {
            if age_days < half_life {
                1.0
            } else {
                0.0
            }
        }
    };

    // Negative ages from clock skew would push the exponential above 1.0.
    score.clamp(0.0, 1.0)
}

/// Effective half-life after the access boost.
///
/// Each recorded access multiplies the half-life by `access_boost_base`;
/// the cumulative multiplier is capped so heavy access cannot make an
/// item immortal.
pub fn effective_half_life(access_count: u64, config: &DecayConfig) -> f32 {
    let exponent = access_count.min(i32::MAX as u64) as i32;
    let boost = config
        .access_boost_base
        .powi(exponent)
        .min(config.access_boost_cap);
    config.half_life_days * boost
}

/// Per-component view of one decay computation, for logs and tests.
#[derive(Debug, Clone, Copy)]
pub struct DecayBreakdown {
    pub age_days: f32,
    pub access_boost: f32,
    pub effective_half_life: f32,
    pub score: f32,
}

pub fn compute_breakdown(age_days: f32, access_count: u64, config: &DecayConfig) -> DecayBreakdown {
    let effective = effective_half_life(access_count, config);
    DecayBreakdown {
        age_days,
        access_boost: effective / config.half_life_days,
        effective_half_life: effective,
        score: decay_score(age_days, access_count, config),
    }
}
