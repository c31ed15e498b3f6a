use engram_core::config::{DecayConfig, DecayStrategy};
use engram_decay::formula::{decay_score, effective_half_life};
use proptest::prelude::*;

fn arb_strategy() -> impl Strategy<Value = DecayStrategy> {
    prop_oneof![
        Just(DecayStrategy::Exponential),
        Just(DecayStrategy::Linear),
        Just(DecayStrategy::Threshold),
    ]
}

fn arb_config() -> impl Strategy<Value = DecayConfig> {
    (arb_strategy(), 1.0f32..365.0, 1.0f32..1.3, 1.0f32..5.0).prop_map(
        |(strategy, half_life_days, boost_base, boost_cap)| DecayConfig {
            strategy,
            half_life_days,
            access_boost_base: boost_base,
            access_boost_cap: boost_cap,
            ..DecayConfig::default()
        },
    )
}

proptest! {
    // ── Bounded in [0, 1] ────────────────────────────────────────────────

    #[test]
    fn score_is_bounded(
        config in arb_config(),
        age_days in -10.0f32..10_000.0,
        access_count in 0u64..100_000,
    ) {
        let score = decay_score(age_days, access_count, &config);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    // ── Non-increasing in age ────────────────────────────────────────────

    #[test]
    fn older_never_scores_higher(
        config in arb_config(),
        age_days in 0.0f32..1_000.0,
        delta in 0.0f32..1_000.0,
        access_count in 0u64..1_000,
    ) {
        let newer = decay_score(age_days, access_count, &config);
        let older = decay_score(age_days + delta, access_count, &config);
        prop_assert!(older <= newer + f32::EPSILON);
    }

    // ── Non-decreasing in access count ───────────────────────────────────

    #[test]
    fn more_accesses_never_score_lower(
        config in arb_config(),
        age_days in 0.0f32..1_000.0,
        access_count in 0u64..500,
    ) {
        let cold = decay_score(age_days, access_count, &config);
        let warm = decay_score(age_days, access_count + 1, &config);
        prop_assert!(warm + 1e-6 >= cold);
    }

    // ── Effective half-life bounds ───────────────────────────────────────

    #[test]
    fn effective_half_life_is_bounded_by_cap(
        config in arb_config(),
        access_count in 0u64..100_000,
    ) {
        let effective = effective_half_life(access_count, &config);
        prop_assert!(effective >= config.half_life_days * 0.999);
        prop_assert!(effective <= config.half_life_days * config.access_boost_cap * 1.001);
    }
}
