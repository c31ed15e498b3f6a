//! Character-budget packing for ranked results.

use engram_core::models::RankedResult;
use tracing::debug;

/// Keep ranked results whose full text fits the remaining character
/// budget. Chunks are included whole or not at all; the first result is
/// always kept, over budget or not, so a small-budget query still gets
/// an answer.
pub(crate) fn pack_results(ranked: Vec<RankedResult>, budget_chars: usize) -> Vec<RankedResult> {
    let mut kept = Vec::with_capacity(ranked.len());
    let mut remaining = budget_chars;

    for (position, result) in ranked.into_iter().enumerate() {
        let cost = result.text.chars().count();
        if position == 0 {
            remaining = remaining.saturating_sub(cost);
            kept.push(result);
        } else if cost <= remaining {
            remaining -= cost;
            kept.push(result);
        } else {
            debug!(
                chunk_id = %result.chunk_id,
                cost,
                remaining,
                "result dropped by character budget"
            );
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use engram_core::models::SignalScores;
    use proptest::prelude::*;
    use uuid::Uuid;

    use super::*;

    fn result_with_text(text: &str) -> RankedResult {
        RankedResult {
            chunk_id: Uuid::new_v4(),
            source_id: Uuid::new_v4(),
            text: text.to_string(),
            created_at: Utc::now(),
            scores: SignalScores {
                lexical: Some(1.0),
                semantic: None,
                fused: 1.0,
                decay: 1.0,
                final_score: 1.0,
            },
            provenance: None,
        }
    }

    fn total_chars(results: &[RankedResult]) -> usize {
        results.iter().map(|r| r.text.chars().count()).sum()
    }

    #[test]
    fn results_within_budget_all_survive() {
        let packed = pack_results(vec![result_with_text("aaaa"), result_with_text("bbbb")], 10);
        assert_eq!(packed.len(), 2);
    }

    #[test]
    fn first_result_survives_even_over_budget() {
        let packed = pack_results(vec![result_with_text("a very long answer")], 3);
        assert_eq!(packed.len(), 1);
    }

    #[test]
    fn oversized_tail_is_dropped_whole() {
        let packed = pack_results(
            vec![result_with_text("aaaa"), result_with_text("bbbbbbbb")],
            10,
        );
        assert_eq!(packed.len(), 1);
        assert_eq!(packed[0].text, "aaaa");
    }

    #[test]
    fn later_result_can_fill_a_gap_an_earlier_one_missed() {
        let packed = pack_results(
            vec![
                result_with_text("aaaa"),
                result_with_text("bbbbbbbb"),
                result_with_text("cc"),
            ],
            8,
        );
        assert_eq!(packed.len(), 2);
        assert_eq!(packed[1].text, "cc");
    }

    #[test]
    fn budget_counts_chars_not_bytes() {
        // Four chars, twelve bytes.
        let packed = pack_results(
            vec![result_with_text("abcd"), result_with_text("日本語グ")],
            8,
        );
        assert_eq!(packed.len(), 2);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(pack_results(Vec::new(), 100).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Total kept text never exceeds the budget, except when the
        /// first result alone does; kept results preserve rank order.
        #[test]
        fn packing_respects_the_budget(
            texts in proptest::collection::vec("[a-z]{0,30}", 1..12),
            budget in 0usize..100,
        ) {
            let ranked: Vec<RankedResult> =
                texts.iter().map(|t| result_with_text(t)).collect();
            let order: Vec<Uuid> = ranked.iter().map(|r| r.chunk_id).collect();
            let packed = pack_results(ranked, budget);

            prop_assert!(!packed.is_empty());
            prop_assert_eq!(packed[0].chunk_id, order[0]);
            let first_cost = packed[0].text.chars().count();
            prop_assert!(total_chars(&packed) <= budget.max(first_cost));

            // Rank order survives packing.
            let mut cursor = 0;
            for result in &packed {
                let at = order[cursor..]
                    .iter()
                    .position(|id| *id == result.chunk_id);
                prop_assert!(at.is_some());
                cursor += at.unwrap_or(0) + 1;
            }
        }
    }
}
