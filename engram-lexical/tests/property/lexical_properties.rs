use std::collections::HashMap;

use engram_core::config::LexicalConfig;
use engram_lexical::{tokenize, LexicalIndex};
use proptest::prelude::*;
use uuid::Uuid;

fn arb_doc() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-f]{1,6}", 0..30).prop_map(|words| words.join(" "))
}

#[derive(Debug, Clone)]
enum Op {
    Index(u8, String),
    Remove(u8),
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![
            3 => (0u8..16, arb_doc()).prop_map(|(slot, text)| Op::Index(slot, text)),
            1 => (0u8..16).prop_map(Op::Remove),
        ],
        0..40,
    )
}

fn slot_ids() -> Vec<Uuid> {
    (0..16).map(|_| Uuid::new_v4()).collect()
}

proptest! {
    // ── Incremental stats match a from-scratch recount ───────────────────

    #[test]
    fn stats_track_live_documents(ops in arb_ops()) {
        let index = LexicalIndex::new(&LexicalConfig::default());
        let ids = slot_ids();
        let mut live: HashMap<Uuid, usize> = HashMap::new();

        for op in ops {
            match op {
                Op::Index(slot, text) => {
                    let id = ids[slot as usize];
                    index.index(id, &text).unwrap();
                    live.insert(id, tokenize(&text).len());
                }
                Op::Remove(slot) => {
                    let id = ids[slot as usize];
                    index.remove(id).unwrap();
                    live.remove(&id);
                }
            }

            let stats = index.stats().unwrap();
            prop_assert_eq!(stats.doc_count, live.len());
            prop_assert_eq!(stats.total_tokens, live.values().map(|&l| l as u64).sum::<u64>());
        }
    }

    // ── Search shape invariants ──────────────────────────────────────────

    #[test]
    fn search_is_bounded_sorted_and_positive(
        docs in proptest::collection::vec(arb_doc(), 1..20),
        query in arb_doc(),
        k in 1usize..10,
    ) {
        let index = LexicalIndex::new(&LexicalConfig::default());
        for doc in &docs {
            index.index(Uuid::new_v4(), doc).unwrap();
        }

        let results = index.search(&query, k).unwrap();
        prop_assert!(results.len() <= k);
        for pair in results.windows(2) {
            prop_assert!(pair[0].1 >= pair[1].1);
        }
        for (_, score) in &results {
            prop_assert!(*score > 0.0);
        }
    }

    // ── Reindexing is idempotent ─────────────────────────────────────────

    #[test]
    fn double_index_equals_single_index(doc in arb_doc(), query in arb_doc()) {
        let once = LexicalIndex::new(&LexicalConfig::default());
        let twice = LexicalIndex::new(&LexicalConfig::default());
        let id = Uuid::new_v4();

        once.index(id, &doc).unwrap();
        twice.index(id, &doc).unwrap();
        twice.index(id, &doc).unwrap();

        prop_assert_eq!(once.stats().unwrap(), twice.stats().unwrap());
        prop_assert_eq!(once.search(&query, 5).unwrap(), twice.search(&query, 5).unwrap());
    }

    // ── Remove undoes index ──────────────────────────────────────────────

    #[test]
    fn remove_restores_prior_results(
        base in proptest::collection::vec(arb_doc(), 1..10),
        extra in arb_doc(),
        query in arb_doc(),
    ) {
        let index = LexicalIndex::new(&LexicalConfig::default());
        for doc in &base {
            index.index(Uuid::new_v4(), doc).unwrap();
        }
        let before = index.search(&query, 10).unwrap();
        let before_stats = index.stats().unwrap();

        let id = Uuid::new_v4();
        index.index(id, &extra).unwrap();
        index.remove(id).unwrap();

        prop_assert_eq!(index.search(&query, 10).unwrap(), before);
        prop_assert_eq!(index.stats().unwrap(), before_stats);
    }
}
