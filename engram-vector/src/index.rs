use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use engram_core::config::VectorConfig;
use engram_core::errors::IndexError;
use engram_core::EngramResult;
use ordered_float::OrderedFloat;
use rand::Rng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::distance::{cosine_distance, normalize};
use crate::node::{Node, VectorMeta};
use crate::snapshot;

/// Hard ceiling on layer assignment.
const MAX_LEVEL: usize = 16;

/// Heap entry. `Ord` is reversed on distance so `BinaryHeap::pop` yields
/// the closest node first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub dist: OrderedFloat<f32>,
    pub node_idx: usize,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other.dist.cmp(&self.dist)
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
pub(crate) struct Inner {
    pub(crate) nodes: Vec<Node>,
    pub(crate) ids: HashMap<Uuid, usize>,
    pub(crate) entry: Option<usize>,
    pub(crate) max_level: usize,
    pub(crate) dimension: Option<usize>,
    pub(crate) live: usize,
}

/// HNSW graph over unit vectors, cosine similarity, arena-backed.
///
/// Nodes live in a `Vec` and reference each other by arena index, so
/// adjacency updates are plain integer writes. Removal tombstones a node
/// in place; the graph is never restructured, which keeps the entry point
/// valid for as long as the index lives.
///
/// Insertion runs in two phases: neighbor selection under the read lock
/// (concurrent searches proceed), then a short splice under the write lock
/// that makes the fully linked node visible atomically.
#[derive(Debug)]
pub struct HnswIndex {
    inner: RwLock<Inner>,
    m: usize,
    m_max: usize,
    ef_construction: usize,
}

struct InsertPlan {
    level: usize,
    /// Chosen neighbors per layer, `links[0]` being layer 0.
    links: Vec<Vec<usize>>,
    /// Arena length the plan was computed against.
    stamp: usize,
}

impl HnswIndex {
    pub fn new(config: &VectorConfig) -> Self {
        let m = config.m.max(2);
        Self {
            inner: RwLock::new(Inner {
                nodes: Vec::new(),
                ids: HashMap::new(),
                entry: None,
                max_level: 0,
                dimension: config.dimension,
                live: 0,
            }),
            m,
            m_max: config.m_max.max(m),
            ef_construction: config.ef_construction.max(1),
        }
    }

    // --- Mutation ---

    /// Inserts a vector under `id`. The embedding is L2-normalized before
    /// storage; zero-norm input is rejected. Re-adding an id that is
    /// already present (live or tombstoned) is a no-op, so whole-document
    /// ingestion retries stay safe.
    pub fn add(&self, id: Uuid, embedding: Vec<f32>, meta: VectorMeta) -> EngramResult<()> {
        let vector = normalize(embedding)?;
        let level = sample_level(self.m);

        let plan = {
            let inner = self.read_guard()?;
            if inner.ids.contains_key(&id) {
                debug!(%id, "vector id already indexed, skipping");
                return Ok(());
            }
            check_dimension(&inner, vector.len())?;
            plan_links(&inner, &vector, level, self.m, self.ef_construction)
        };

        let mut inner = self.write_guard()?;
        if inner.ids.contains_key(&id) {
            debug!(%id, "vector id already indexed, skipping");
            return Ok(());
        }
        check_dimension(&inner, vector.len())?;
        // A writer that slipped in between the two guards invalidates the
        // plan; recompute against the current arena.
        let plan = if inner.nodes.len() == plan.stamp {
            plan
        } else {
            plan_links(&inner, &vector, level, self.m, self.ef_construction)
        };
        splice(&mut inner, id, vector, meta, plan, self.m, self.m_max);
        Ok(())
    }

    /// Tombstones `id`. The node keeps its edges and stays navigable; it
    /// just stops appearing in results. Returns `false` when the id is
    /// unknown or already tombstoned.
    pub fn remove(&self, id: Uuid) -> EngramResult<bool> {
        let mut inner = self.write_guard()?;
        let idx = match inner.ids.get(&id) {
            Some(&idx) => idx,
            None => return Ok(false),
        };
        if inner.nodes[idx].tombstoned {
            return Ok(false);
        }
        inner.nodes[idx].tombstoned = true;
        inner.live -= 1;
        debug!(%id, "vector tombstoned");
        Ok(true)
    }

    // --- Queries ---

    /// Returns up to `k` `(id, cosine similarity)` pairs, most similar
    /// first. `ef` widens the layer-0 beam (floored at `k`). An empty
    /// index yields an empty Vec, not an error.
    pub fn search(&self, query: &[f32], k: usize, ef: usize) -> EngramResult<Vec<(Uuid, f32)>> {
        let inner = self.read_guard()?;
        let entry = match inner.entry {
            Some(entry) if inner.live > 0 && k > 0 => entry,
            _ => return Ok(Vec::new()),
        };
        if let Some(expected) = inner.dimension {
            if expected != query.len() {
                return Err(IndexError::DimensionMismatch {
                    expected,
                    actual: query.len(),
                }
                .into());
            }
        }
        let query = normalize(query.to_vec())?;

        let mut curr = entry;
        for layer in (1..=inner.max_level).rev() {
            curr = greedy_closest(&inner, &query, curr, layer);
        }
        let found = search_layer(&inner, &query, curr, 0, ef.max(k));

        let results: Vec<(Uuid, f32)> = found
            .into_iter()
            .filter(|c| !inner.nodes[c.node_idx].tombstoned)
            .take(k)
            .map(|c| (inner.nodes[c.node_idx].id, 1.0 - c.dist.into_inner()))
            .collect();
        debug!(k, ef, returned = results.len(), "vector search");
        Ok(results)
    }

    /// Number of live (non-tombstoned) vectors.
    pub fn len(&self) -> EngramResult<usize> {
        Ok(self.read_guard()?.live)
    }

    pub fn is_empty(&self) -> EngramResult<bool> {
        Ok(self.read_guard()?.live == 0)
    }

    /// Whether `id` is indexed and live.
    pub fn contains(&self, id: Uuid) -> EngramResult<bool> {
        let inner = self.read_guard()?;
        Ok(inner
            .ids
            .get(&id)
            .is_some_and(|&idx| !inner.nodes[idx].tombstoned))
    }

    pub fn dimension(&self) -> EngramResult<Option<usize>> {
        Ok(self.read_guard()?.dimension)
    }

    /// Metadata for a live vector.
    pub fn meta(&self, id: Uuid) -> EngramResult<Option<VectorMeta>> {
        let inner = self.read_guard()?;
        Ok(inner
            .ids
            .get(&id)
            .map(|&idx| &inner.nodes[idx])
            .filter(|node| !node.tombstoned)
            .map(|node| node.meta.clone()))
    }

    // --- Persistence ---

    /// Writes the whole graph to a single snapshot file. The write goes
    /// to a temp sibling, is fsynced, then renamed over `path`, so a
    /// crash mid-save leaves the previous snapshot intact.
    pub fn save(&self, path: &Path) -> EngramResult<()> {
        let inner = self.read_guard()?;
        snapshot::write_snapshot(&inner, self.m, self.m_max, self.ef_construction, path)?;
        info!(
            nodes = inner.nodes.len(),
            live = inner.live,
            path = %path.display(),
            "vector snapshot saved"
        );
        Ok(())
    }

    /// Reconstructs an index from a snapshot. Arena order and adjacency
    /// come back exactly as saved, so search behavior is identical to the
    /// index that wrote the file. Graph parameters are taken from the
    /// snapshot, not from config.
    pub fn load(path: &Path) -> EngramResult<Self> {
        let loaded = snapshot::read_snapshot(path)?;
        info!(
            nodes = loaded.inner.nodes.len(),
            live = loaded.inner.live,
            path = %path.display(),
            "vector snapshot loaded"
        );
        Ok(Self {
            inner: RwLock::new(loaded.inner),
            m: loaded.m,
            m_max: loaded.m_max,
            ef_construction: loaded.ef_construction,
        })
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, Inner>, IndexError> {
        self.inner.read().map_err(|e| IndexError::LockPoisoned {
            details: format!("vector index read lock: {e}"),
        })
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, Inner>, IndexError> {
        self.inner.write().map_err(|e| IndexError::LockPoisoned {
            details: format!("vector index write lock: {e}"),
        })
    }
}

fn check_dimension(inner: &Inner, actual: usize) -> Result<(), IndexError> {
    match inner.dimension {
        Some(expected) if expected != actual => {
            Err(IndexError::DimensionMismatch { expected, actual })
        }
        _ => Ok(()),
    }
}

/// Geometric layer assignment: P(level >= l) = (1/m)^l, capped at
/// `MAX_LEVEL`.
fn sample_level(m: usize) -> usize {
    let continue_p = 1.0 / m as f64;
    let mut rng = rand::thread_rng();
    let mut level = 0;
    while level < MAX_LEVEL && rng.gen::<f64>() < continue_p {
        level += 1;
    }
    level
}

/// Hill-climbs at `layer` from `curr` to the neighbor closest to `query`
/// until no neighbor improves.
fn greedy_closest(inner: &Inner, query: &[f32], mut curr: usize, layer: usize) -> usize {
    let mut best = cosine_distance(query, &inner.nodes[curr].vector);
    let mut changed = true;
    while changed {
        changed = false;
        let neighbors = match inner.nodes[curr].neighbors.get(layer) {
            Some(list) => list,
            None => break,
        };
        for &n in neighbors {
            if let Some(node) = inner.nodes.get(n) {
                let d = cosine_distance(query, &node.vector);
                if d < best {
                    best = d;
                    curr = n;
                    changed = true;
                }
            }
        }
    }
    curr
}

/// Best-first expansion at one layer, bounded by `ef`. Returns candidates
/// sorted closest first; ties break on arena index.
fn search_layer(
    inner: &Inner,
    query: &[f32],
    entry_idx: usize,
    layer: usize,
    ef: usize,
) -> Vec<Candidate> {
    let mut visited = vec![false; inner.nodes.len()];
    // `frontier` pops the closest unexpanded node; `found` pops the
    // farthest kept result, bounding the working set at `ef`.
    let mut frontier: BinaryHeap<Candidate> = BinaryHeap::new();
    let mut found: BinaryHeap<Reverse<Candidate>> = BinaryHeap::new();

    let seed = Candidate {
        dist: OrderedFloat(cosine_distance(query, &inner.nodes[entry_idx].vector)),
        node_idx: entry_idx,
    };
    visited[entry_idx] = true;
    frontier.push(seed);
    found.push(Reverse(seed));

    while let Some(closest) = frontier.pop() {
        if let Some(Reverse(worst)) = found.peek() {
            if found.len() >= ef && closest.dist > worst.dist {
                break;
            }
        }
        let neighbors = match inner.nodes[closest.node_idx].neighbors.get(layer) {
            Some(list) => list.as_slice(),
            None => continue,
        };
        for &n in neighbors {
            if n >= visited.len() || visited[n] {
                continue;
            }
            visited[n] = true;
            let cand = Candidate {
                dist: OrderedFloat(cosine_distance(query, &inner.nodes[n].vector)),
                node_idx: n,
            };
            let keep = match found.peek() {
                Some(Reverse(worst)) => found.len() < ef || cand.dist < worst.dist,
                None => true,
            };
            if keep {
                frontier.push(cand);
                found.push(Reverse(cand));
                if found.len() > ef {
                    found.pop();
                }
            }
        }
    }

    let mut out: Vec<Candidate> = found.into_iter().map(|Reverse(c)| c).collect();
    out.sort_by(|a, b| a.dist.cmp(&b.dist).then(a.node_idx.cmp(&b.node_idx)));
    out
}

/// Phase 1 of insertion: pick the neighbors the new node will link to,
/// without touching the graph.
fn plan_links(
    inner: &Inner,
    vector: &[f32],
    level: usize,
    m: usize,
    ef_construction: usize,
) -> InsertPlan {
    let mut links: Vec<Vec<usize>> = vec![Vec::new(); level + 1];
    if let Some(entry) = inner.entry {
        let mut curr = entry;
        for layer in (level + 1..=inner.max_level).rev() {
            curr = greedy_closest(inner, vector, curr, layer);
        }
        for layer in (0..=level.min(inner.max_level)).rev() {
            let found = search_layer(inner, vector, curr, layer, ef_construction);
            if let Some(first) = found.first() {
                curr = first.node_idx;
            }
            links[layer] = found.iter().take(m).map(|c| c.node_idx).collect();
        }
    }
    InsertPlan {
        level,
        links,
        stamp: inner.nodes.len(),
    }
}

/// Phase 2 of insertion: append the node, write back-links, prune peers
/// over their connection cap by dropping the least similar edge.
fn splice(
    inner: &mut Inner,
    id: Uuid,
    vector: Vec<f32>,
    meta: VectorMeta,
    plan: InsertPlan,
    m: usize,
    m_max: usize,
) {
    let new_idx = inner.nodes.len();
    if inner.dimension.is_none() {
        inner.dimension = Some(vector.len());
    }
    inner.nodes.push(Node {
        id,
        vector,
        neighbors: plan.links.clone(),
        meta,
        tombstoned: false,
    });
    inner.ids.insert(id, new_idx);
    inner.live += 1;

    for (layer, peers) in plan.links.iter().enumerate() {
        // Layer 0 carries the dense base graph and gets the wider cap.
        let cap = if layer == 0 { m_max } else { m };
        for &peer in peers {
            if inner.nodes[peer].neighbors.get(layer).is_none() {
                continue;
            }
            inner.nodes[peer].neighbors[layer].push(new_idx);
            if inner.nodes[peer].neighbors[layer].len() <= cap {
                continue;
            }
            let weakest = {
                let peer_node = &inner.nodes[peer];
                let mut worst_pos = 0;
                let mut worst_dist = f32::NEG_INFINITY;
                for (pos, &n) in peer_node.neighbors[layer].iter().enumerate() {
                    if let Some(other) = inner.nodes.get(n) {
                        let d = cosine_distance(&peer_node.vector, &other.vector);
                        if d > worst_dist {
                            worst_dist = d;
                            worst_pos = pos;
                        }
                    }
                }
                worst_pos
            };
            inner.nodes[peer].neighbors[layer].swap_remove(weakest);
        }
    }

    if inner.entry.is_none() || plan.level > inner.max_level {
        inner.entry = Some(new_idx);
        inner.max_level = plan.level;
    }
}
