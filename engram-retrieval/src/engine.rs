//! RetrievalEngine: orchestrates the hybrid search pipeline.
//!
//! One query runs BM25 and ANN sub-searches concurrently, normalizes and
//! fuses their scores, blends in decay, then cuts the ranked list to a
//! result count and a character budget.

use std::collections::HashMap;

use chrono::Utc;
use engram_core::config::defaults::DEFAULT_EF_SEARCH;
use engram_core::config::RetrievalConfig;
use engram_core::errors::EngramResult;
use engram_core::models::{CandidateChunk, RankedResult, SearchOutcome, SearchRequest, SignalScores};
use engram_core::traits::IContentStore;
use engram_decay::DecayEngine;
use engram_lexical::LexicalIndex;
use engram_provenance::ProvenanceTracker;
use engram_vector::HnswIndex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::budget;
use crate::fusion;

/// The hybrid retriever. Borrows the engine's shared structures for the
/// duration of one or more queries; construction is free, so callers
/// typically build one per query.
///
/// Queries never mutate index content. The access-count bump for
/// returned chunks is best-effort and logged on failure.
pub struct RetrievalEngine<'a, S: IContentStore> {
    store: &'a S,
    lexical: &'a LexicalIndex,
    vector: &'a HnswIndex,
    decay: &'a DecayEngine,
    provenance: &'a ProvenanceTracker<S>,
    config: RetrievalConfig,
    /// Layer-0 beam width used when the request does not carry one.
    default_ef: usize,
}

impl<'a, S: IContentStore> RetrievalEngine<'a, S> {
    pub fn new(
        store: &'a S,
        lexical: &'a LexicalIndex,
        vector: &'a HnswIndex,
        decay: &'a DecayEngine,
        provenance: &'a ProvenanceTracker<S>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            store,
            lexical,
            vector,
            decay,
            provenance,
            config,
            default_ef: DEFAULT_EF_SEARCH,
        }
    }

    /// Override the beam width used for requests without an explicit `ef`.
    pub fn with_default_ef(mut self, ef: usize) -> Self {
        self.default_ef = ef;
        self
    }

    /// Run the full retrieval pipeline.
    ///
    /// `request.k` and `request.budget_chars` of `0` fall back to the
    /// configured defaults. Both sub-indexes empty is a normal outcome
    /// and yields an empty result set, not an error.
    pub fn search(&self, request: &SearchRequest) -> EngramResult<SearchOutcome> {
        let k = or_default(request.k, self.config.default_k);
        let budget_chars = or_default(request.budget_chars, self.config.default_budget_chars);
        let oversample = k.saturating_mul(self.config.oversample_factor.max(1));
        let ef = request.ef.unwrap_or(self.default_ef);

        // Step 1: BM25 and ANN sub-searches. They touch disjoint
        // structures, so they run concurrently and join before fusion.
        let (lexical_ranked, semantic_ranked) = rayon::join(
            || self.lexical.search(&request.text, oversample),
            || match &request.embedding {
                Some(embedding) => self.vector.search(embedding, oversample, ef),
                None => Ok(Vec::new()),
            },
        );
        let mut lexical_ranked = lexical_ranked?;
        let mut semantic_ranked = semantic_ranked?;

        if lexical_ranked.is_empty() && semantic_ranked.is_empty() {
            debug!("no candidates from either sub-index");
            return Ok(SearchOutcome::empty());
        }
        // Past the early return, an empty semantic list means the query
        // was ranked on the lexical signal alone.
        let semantic_degraded = semantic_ranked.is_empty();

        // Step 2: normalize each list to [0, 1] independently.
        fusion::normalize_scores(&mut lexical_ranked);
        fusion::normalize_scores(&mut semantic_ranked);

        // Step 3: weighted fusion; single-signal chunks keep their score.
        let fused = fusion::fuse(
            &lexical_ranked,
            &semantic_ranked,
            self.config.lexical_weight,
            self.config.semantic_weight,
        );
        debug!(
            lexical = lexical_ranked.len(),
            semantic = semantic_ranked.len(),
            fused = fused.len(),
            "sub-searches fused"
        );

        // Step 4: hydrate candidates with record context. Archived
        // sources drop out here; ids the store no longer knows are
        // skipped silently.
        let ids: Vec<Uuid> = fused.iter().map(|c| c.chunk_id).collect();
        let hydrated: HashMap<Uuid, CandidateChunk> = self
            .store
            .candidates_by_ids(&ids)?
            .into_iter()
            .map(|c| (c.chunk.chunk_id, c))
            .collect();

        // Step 5: blend decay into the final score. Chunks decayed past
        // the soft-forgetting threshold leave default ranking but stay
        // reachable by direct id lookup.
        let now = Utc::now();
        let mut results: Vec<RankedResult> = Vec::with_capacity(fused.len());
        for candidate in fused {
            let Some(context) = hydrated.get(&candidate.chunk_id) else {
                continue;
            };
            if context.archived {
                continue;
            }
            let decay = self
                .decay
                .score(context.created_at, context.access_count, now);
            if self.decay.below_threshold(decay) {
                debug!(chunk_id = %candidate.chunk_id, decay, "candidate decayed out");
                continue;
            }
            let final_score =
                self.config.fused_weight * candidate.fused + self.config.decay_weight * decay;
            results.push(RankedResult {
                chunk_id: candidate.chunk_id,
                source_id: context.chunk.source_id,
                text: context.chunk.text.clone(),
                created_at: context.created_at,
                scores: SignalScores {
                    lexical: candidate.lexical,
                    semantic: candidate.semantic,
                    fused: candidate.fused,
                    decay,
                    final_score,
                },
                provenance: None,
            });
        }

        // Step 6: order by final score, newer chunks first on ties, then
        // by id so equal-score equal-time results stay deterministic.
        results.sort_by(|a, b| {
            b.scores
                .final_score
                .total_cmp(&a.scores.final_score)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| a.chunk_id.cmp(&b.chunk_id))
        });

        // Step 7: cut to k results, then pack the character budget.
        results.truncate(k);
        let mut results = budget::pack_results(results, budget_chars);

        // Step 8: attach provenance to what survived.
        for result in &mut results {
            result.provenance = self.provenance.get(result.chunk_id)?;
        }

        // Step 9: best-effort access bump for the returned chunks.
        let returned: Vec<Uuid> = results.iter().map(|r| r.chunk_id).collect();
        if let Err(error) = self.store.record_access(&returned) {
            warn!(%error, "access count bump failed");
        }

        info!(
            requested = k,
            returned = results.len(),
            semantic_degraded,
            "retrieval complete"
        );
        Ok(SearchOutcome {
            results,
            semantic_degraded,
        })
    }
}

fn or_default(value: usize, fallback: usize) -> usize {
    if value == 0 {
        fallback
    } else {
        value
    }
}
