use std::collections::HashSet;

use engram_core::config::VectorConfig;
use engram_vector::{HnswIndex, VectorMeta};
use proptest::prelude::*;
use uuid::Uuid;

const DIM: usize = 4;

fn arb_vector() -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0, DIM)
        .prop_filter("needs a nonzero norm", |v| {
            v.iter().map(|x| x * x).sum::<f32>() > 1e-3
        })
}

/// Caps wide enough that no insertion-time edge is ever pruned, keeping
/// the base layer connected for any input set below the cap.
fn wide_config() -> VectorConfig {
    VectorConfig {
        m: 6,
        m_max: 64,
        ef_construction: 64,
        ..VectorConfig::default()
    }
}

fn anon_meta() -> VectorMeta {
    VectorMeta {
        source_id: Uuid::new_v4(),
        content_preview: String::new(),
    }
}

fn build(vectors: &[Vec<f32>]) -> (HnswIndex, Vec<Uuid>) {
    let index = HnswIndex::new(&wide_config());
    let ids: Vec<Uuid> = vectors.iter().map(|_| Uuid::new_v4()).collect();
    for (id, v) in ids.iter().zip(vectors) {
        index.add(*id, v.clone(), anon_meta()).unwrap();
    }
    (index, ids)
}

proptest! {
    // ── Search shape invariants ──────────────────────────────────────────

    #[test]
    fn results_are_sorted_unique_and_in_range(
        vectors in proptest::collection::vec(arb_vector(), 1..25),
        query in arb_vector(),
        k in 1usize..8,
    ) {
        let (index, ids) = build(&vectors);
        let results = index.search(&query, k, 32).unwrap();

        prop_assert!(results.len() <= k);
        for pair in results.windows(2) {
            prop_assert!(pair[0].1 >= pair[1].1);
        }
        let mut seen = HashSet::new();
        for (id, sim) in &results {
            prop_assert!(ids.contains(id));
            prop_assert!(seen.insert(*id));
            prop_assert!(*sim >= -1.001 && *sim <= 1.001);
        }
    }

    // ── Recall with an exhaustive beam ───────────────────────────────────

    #[test]
    fn an_indexed_vector_is_its_own_nearest_neighbor(
        vectors in proptest::collection::vec(arb_vector(), 1..25),
        pick in any::<proptest::sample::Index>(),
    ) {
        let (index, _) = build(&vectors);
        let query = &vectors[pick.index(vectors.len())];
        let results = index.search(query, 1, 64).unwrap();
        prop_assert_eq!(results.len(), 1);
        prop_assert!(results[0].1 >= 1.0 - 1e-4);
    }

    // ── Insert semantics ─────────────────────────────────────────────────

    #[test]
    fn duplicate_ids_are_ignored(v1 in arb_vector(), v2 in arb_vector()) {
        let index = HnswIndex::new(&wide_config());
        let id = Uuid::new_v4();
        index.add(id, v1, anon_meta()).unwrap();
        index.add(id, v2, anon_meta()).unwrap();
        prop_assert_eq!(index.len().unwrap(), 1);
    }

    #[test]
    fn first_insert_fixes_the_dimension(
        v in arb_vector(),
        extra in -1.0f32..1.0,
    ) {
        let index = HnswIndex::new(&wide_config());
        index.add(Uuid::new_v4(), v.clone(), anon_meta()).unwrap();

        let mut wider = v;
        wider.push(if extra == 0.0 { 1.0 } else { extra });
        prop_assert!(index.add(Uuid::new_v4(), wider, anon_meta()).is_err());
    }
}
