//! Property tests for the content store: round trips and filter
//! invariants over arbitrary payloads.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use uuid::Uuid;

use engram_core::models::{Chunk, Payload, Record, RecordFilter, RecordKind};
use engram_core::traits::IContentStore;
use engram_storage::StorageEngine;

fn arb_kind() -> impl Strategy<Value = RecordKind> {
    prop_oneof![Just(RecordKind::Event), Just(RecordKind::Document)]
}

/// Printable ASCII with quotes and backslashes, to stress the JSON
/// columns.
fn arb_metadata() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z]{1,6}", "[ -~]{0,12}", 0..4)
}

fn arb_record() -> impl Strategy<Value = Record> {
    (arb_kind(), "\\PC{0,40}", arb_metadata()).prop_map(|(kind, text, metadata)| {
        Record::new(kind, Payload::Text(text), metadata)
    })
}

fn chunk_at(source: &Record, index: u32, text: String) -> Chunk {
    Chunk {
        chunk_id: Uuid::new_v4(),
        source_id: source.id,
        text,
        start_offset: index * 10,
        end_offset: index * 10 + 10,
        chunk_index: index,
        embedding_ref: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Everything written is read back unchanged, whatever the payload
    /// or metadata contains.
    #[test]
    fn append_get_round_trips(record in arb_record()) {
        let store = StorageEngine::open_in_memory().unwrap();
        store.append(&record).unwrap();

        let fetched = store.get(record.id).unwrap().unwrap();
        prop_assert_eq!(fetched.kind, record.kind);
        prop_assert_eq!(fetched.payload, record.payload);
        prop_assert_eq!(fetched.metadata, record.metadata);
        prop_assert_eq!(fetched.created_at, record.created_at);
        prop_assert!(!fetched.archived);
    }

    /// The archived filter partitions the store exactly: no record is
    /// lost and none appears on both sides.
    #[test]
    fn archived_filter_partitions_records(
        records in prop::collection::vec(arb_record(), 1..8),
        mask in prop::collection::vec(any::<bool>(), 8),
    ) {
        let store = StorageEngine::open_in_memory().unwrap();
        let mut archived_ids = BTreeSet::new();
        for (record, archive) in records.iter().zip(&mask) {
            store.append(record).unwrap();
            if *archive {
                store.set_archived(record.id, true).unwrap();
                archived_ids.insert(record.id);
            }
        }

        let live = store.query(
            &RecordFilter { archived: Some(false), ..Default::default() },
            100,
        ).unwrap();
        let hidden = store.query(
            &RecordFilter { archived: Some(true), ..Default::default() },
            100,
        ).unwrap();

        prop_assert_eq!(live.len() + hidden.len(), records.len());
        prop_assert!(live.iter().all(|r| !archived_ids.contains(&r.id)));
        prop_assert!(hidden.iter().all(|r| archived_ids.contains(&r.id)));
        prop_assert_eq!(store.record_count().unwrap(), records.len());
    }

    /// Chunks come back ordered by index no matter the insertion order.
    #[test]
    fn chunks_come_back_in_index_order(
        texts in prop::collection::vec("[a-z ]{0,20}", 1..6),
    ) {
        let store = StorageEngine::open_in_memory().unwrap();
        let record = Record::new(
            RecordKind::Document,
            Payload::Text(texts.join(" ")),
            BTreeMap::new(),
        );
        // Inserted highest index first.
        let chunks: Vec<Chunk> = texts
            .iter()
            .enumerate()
            .rev()
            .map(|(i, text)| chunk_at(&record, i as u32, text.clone()))
            .collect();
        store.append_document(&record, &chunks, &[]).unwrap();

        let fetched = store.chunks_for_source(record.id).unwrap();
        prop_assert_eq!(fetched.len(), texts.len());
        for (i, chunk) in fetched.iter().enumerate() {
            prop_assert_eq!(chunk.chunk_index, i as u32);
            prop_assert_eq!(&chunk.text, &texts[i]);
        }
    }

    /// Marking a subset embedded leaves exactly the complement missing.
    #[test]
    fn mark_embedded_complements_missing(
        count in 1usize..8,
        mask in prop::collection::vec(any::<bool>(), 8),
    ) {
        let store = StorageEngine::open_in_memory().unwrap();
        let record = Record::new(
            RecordKind::Document,
            Payload::Text("backfill source".to_string()),
            BTreeMap::new(),
        );
        let chunks: Vec<Chunk> = (0..count)
            .map(|i| chunk_at(&record, i as u32, format!("chunk {i}")))
            .collect();
        store.append_document(&record, &chunks, &[]).unwrap();

        let marked: Vec<Uuid> = chunks
            .iter()
            .zip(&mask)
            .filter(|(_, m)| **m)
            .map(|(c, _)| c.chunk_id)
            .collect();
        store.mark_embedded(&marked).unwrap();

        let missing: BTreeSet<Uuid> = store
            .chunks_missing_embedding(100)
            .unwrap()
            .into_iter()
            .map(|c| c.chunk_id)
            .collect();
        let expected: BTreeSet<Uuid> = chunks
            .iter()
            .zip(&mask)
            .filter(|(_, m)| !**m)
            .map(|(c, _)| c.chunk_id)
            .collect();
        prop_assert_eq!(missing, expected);
    }
}
