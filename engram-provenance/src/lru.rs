//! Fixed-capacity LRU keyed by chunk id.
//!
//! A slot arena holds the entries; a `HashMap` maps chunk ids to arena
//! indices, and an intrusive doubly-linked list over the slots tracks
//! recency. All operations are O(1). Once the arena is full, eviction
//! reuses the least-recent slot in place, so a warm cache allocates
//! nothing.

use std::collections::HashMap;

use uuid::Uuid;

use engram_core::models::ProvenanceRecord;

/// Sentinel for "no neighbor" in the recency list.
const NIL: usize = usize::MAX;

struct Slot {
    id: Uuid,
    record: ProvenanceRecord,
    prev: usize,
    next: usize,
}

pub(crate) struct LruCache {
    slots: Vec<Slot>,
    index: HashMap<Uuid, usize>,
    /// Most recently used.
    head: usize,
    /// Least recently used; evicted first.
    tail: usize,
    capacity: usize,
}

impl LruCache {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
            head: NIL,
            tail: NIL,
            capacity: capacity.max(1),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Look up a record and mark it most recent.
    pub(crate) fn get(&mut self, id: Uuid) -> Option<ProvenanceRecord> {
        let idx = *self.index.get(&id)?;
        self.move_to_front(idx);
        Some(self.slots[idx].record.clone())
    }

    /// Insert or refresh a record. At capacity, the least-recent entry
    /// is evicted and its slot reused.
    pub(crate) fn insert(&mut self, record: ProvenanceRecord) {
        let id = record.chunk_id;
        if let Some(&idx) = self.index.get(&id) {
            self.slots[idx].record = record;
            self.move_to_front(idx);
            return;
        }

        let idx = if self.index.len() < self.capacity {
            let idx = self.slots.len();
            self.slots.push(Slot {
                id,
                record,
                prev: NIL,
                next: NIL,
            });
            idx
        } else {
            let idx = self.evict_tail();
            let slot = &mut self.slots[idx];
            slot.id = id;
            slot.record = record;
            idx
        };

        self.index.insert(id, idx);
        self.push_front(idx);
    }

    fn push_front(&mut self, idx: usize) {
        self.slots[idx].prev = NIL;
        self.slots[idx].next = self.head;
        if self.head != NIL {
            self.slots[self.head].prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn unlink(&mut self, idx: usize) {
        let prev = self.slots[idx].prev;
        let next = self.slots[idx].next;
        if prev != NIL {
            self.slots[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.slots[next].prev = prev;
        } else {
            self.tail = prev;
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    /// Unlink the least-recent entry and return its arena index for
    /// reuse. Only called when the cache is full, so a tail exists.
    fn evict_tail(&mut self) -> usize {
        let idx = self.tail;
        self.unlink(idx);
        self.index.remove(&self.slots[idx].id);
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn row(id: Uuid) -> ProvenanceRecord {
        ProvenanceRecord {
            chunk_id: id,
            source_id: Uuid::new_v4(),
            start_offset: 0,
            end_offset: 10,
            confidence: 1.0,
            tracked_at: Utc::now(),
        }
    }

    #[test]
    fn evicts_least_recently_used_at_capacity() {
        let mut cache = LruCache::new(2);
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        cache.insert(row(a));
        cache.insert(row(b));
        cache.insert(row(c));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(a).is_none());
        assert!(cache.get(b).is_some());
        assert!(cache.get(c).is_some());
    }

    #[test]
    fn get_refreshes_recency() {
        let mut cache = LruCache::new(2);
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        cache.insert(row(a));
        cache.insert(row(b));
        // a becomes most recent, so b is now the eviction candidate.
        assert!(cache.get(a).is_some());
        cache.insert(row(c));

        assert!(cache.get(a).is_some());
        assert!(cache.get(b).is_none());
        assert!(cache.get(c).is_some());
    }

    #[test]
    fn reinserting_updates_in_place() {
        let mut cache = LruCache::new(4);
        let id = Uuid::new_v4();
        cache.insert(row(id));
        let mut updated = row(id);
        updated.confidence = 0.25;
        cache.insert(updated);

        assert_eq!(cache.len(), 1);
        let fetched = cache.get(id).unwrap();
        assert!((fetched.confidence - 0.25).abs() < 1e-6);
    }

    #[test]
    fn full_cache_reuses_slots_instead_of_growing() {
        let mut cache = LruCache::new(2);
        for _ in 0..10 {
            cache.insert(row(Uuid::new_v4()));
        }
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.slots.len(), 2);
    }

    #[test]
    fn capacity_one_cycles_through_single_slot() {
        let mut cache = LruCache::new(1);
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        cache.insert(row(a));
        cache.insert(row(b));
        assert!(cache.get(a).is_none());
        assert!(cache.get(b).is_some());
        assert_eq!(cache.len(), 1);
    }

    /// Reference model: a recency-ordered Vec, most recent first.
    #[derive(Default)]
    struct Model {
        order: Vec<Uuid>,
    }

    impl Model {
        fn touch(&mut self, id: Uuid, capacity: usize) {
            self.order.retain(|&x| x != id);
            self.order.insert(0, id);
            self.order.truncate(capacity);
        }

        fn get(&mut self, id: Uuid) -> bool {
            if self.order.contains(&id) {
                self.retain_to_front(id);
                true
            } else {
                false
            }
        }

        fn retain_to_front(&mut self, id: Uuid) {
            self.order.retain(|&x| x != id);
            self.order.insert(0, id);
        }
    }

    proptest! {
        /// The arena cache behaves exactly like a naive recency list,
        /// for any interleaving of inserts and lookups.
        #[test]
        fn matches_reference_model(
            capacity in 1usize..6,
            ops in prop::collection::vec((0u8..10, any::<bool>()), 0..60),
        ) {
            let ids: Vec<Uuid> = (0..10).map(|_| Uuid::new_v4()).collect();
            let mut cache = LruCache::new(capacity);
            let mut model = Model::default();

            for (slot, is_insert) in ops {
                let id = ids[slot as usize];
                if is_insert {
                    cache.insert(row(id));
                    model.touch(id, capacity);
                } else {
                    let hit = cache.get(id).is_some();
                    prop_assert_eq!(hit, model.get(id));
                }
                prop_assert_eq!(cache.len(), model.order.len());
                prop_assert!(cache.len() <= capacity);
            }

            for &id in &ids {
                let expected = model.order.contains(&id);
                prop_assert_eq!(cache.index.contains_key(&id), expected);
            }
        }
    }
}
