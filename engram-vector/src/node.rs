use uuid::Uuid;

/// Payload carried alongside the embedding so neighbors can be shown
/// without a storage round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorMeta {
    pub source_id: Uuid,
    pub content_preview: String,
}

/// One graph node in the arena. Adjacency is stored as arena indices per
/// layer (`neighbors[layer]`), never as pointers, so edges cannot dangle.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub id: Uuid,
    pub vector: Vec<f32>,
    /// `neighbors.len() == level + 1`; a node participates in every layer
    /// up to the one it was assigned at insertion.
    pub neighbors: Vec<Vec<usize>>,
    pub meta: VectorMeta,
    /// Tombstoned nodes stay in the arena and keep their edges. They are
    /// traversed during search but never returned, which keeps the entry
    /// point valid no matter what has been removed.
    pub tombstoned: bool,
}

impl Node {
    pub(crate) fn level(&self) -> usize {
        self.neighbors.len().saturating_sub(1)
    }
}
