//! Score normalization and weighted signal fusion.
//!
//! BM25 scores and cosine similarities live on different scales, so each
//! list is normalized to `[0, 1]` on its own before any combination.

use std::collections::HashMap;

use uuid::Uuid;

/// A chunk after fusion, before decay blending.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FusedCandidate {
    pub chunk_id: Uuid,
    /// Normalized BM25 score, when the chunk matched the query text.
    pub lexical: Option<f32>,
    /// Normalized cosine similarity, when ANN surfaced the chunk.
    pub semantic: Option<f32>,
    pub fused: f32,
}

/// Min-max normalize a ranked list in place.
///
/// A single-result list, or one where every score is equal, normalizes
/// to `1.0` so the signal still carries full weight downstream.
pub(crate) fn normalize_scores(ranked: &mut [(Uuid, f32)]) {
    let Some(&(_, first)) = ranked.first() else {
        return;
    };
    let mut min = first;
    let mut max = first;
    for &(_, score) in ranked.iter() {
        min = min.min(score);
        max = max.max(score);
    }
    let range = max - min;
    if range <= f32::EPSILON {
        for (_, score) in ranked.iter_mut() {
            *score = 1.0;
        }
        return;
    }
    for (_, score) in ranked.iter_mut() {
        *score = (*score - min) / range;
    }
}

/// Merge two normalized lists into one candidate set.
///
/// Chunks present in both lists combine as a weighted sum. Chunks
/// present in only one list keep that list's score unchanged; a missing
/// signal is never treated as zero.
pub(crate) fn fuse(
    lexical: &[(Uuid, f32)],
    semantic: &[(Uuid, f32)],
    lexical_weight: f32,
    semantic_weight: f32,
) -> Vec<FusedCandidate> {
    let mut merged: HashMap<Uuid, (Option<f32>, Option<f32>)> =
        HashMap::with_capacity(lexical.len() + semantic.len());
    for &(id, score) in lexical {
        merged.entry(id).or_insert((None, None)).0 = Some(score);
    }
    for &(id, score) in semantic {
        merged.entry(id).or_insert((None, None)).1 = Some(score);
    }

    merged
        .into_iter()
        .map(|(chunk_id, (lexical, semantic))| {
            let fused = match (lexical, semantic) {
                (Some(lex), Some(sem)) => semantic_weight * sem + lexical_weight * lex,
                (Some(lex), None) => lex,
                (None, Some(sem)) => sem,
                // Every merged entry came from at least one list.
                (None, None) => 0.0,
            };
            FusedCandidate {
                chunk_id,
                lexical,
                semantic,
                fused,
            }
        })
        .collect()
}
