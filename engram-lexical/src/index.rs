use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use engram_core::config::LexicalConfig;
use engram_core::errors::{EngramResult, IndexError};
use tracing::debug;
use uuid::Uuid;

use crate::stats::CorpusStats;
use crate::tokenize::tokenize;

/// One indexed document's bookkeeping.
struct DocEntry {
    /// Token count, for length normalization.
    len: u32,
    /// Distinct terms, for exact posting removal.
    terms: Vec<String>,
}

struct Inner {
    /// term -> (chunk -> term frequency)
    postings: HashMap<String, HashMap<Uuid, u32>>,
    docs: HashMap<Uuid, DocEntry>,
    stats: CorpusStats,
}

impl Inner {
    /// Drop every trace of a document. No-op when absent.
    fn remove_doc(&mut self, chunk_id: Uuid) {
        let Some(entry) = self.docs.remove(&chunk_id) else {
            return;
        };
        for term in &entry.terms {
            if let Some(plist) = self.postings.get_mut(term) {
                plist.remove(&chunk_id);
                if plist.is_empty() {
                    self.postings.remove(term);
                }
            }
        }
        self.stats.doc_count = self.docs.len();
        self.stats.total_tokens -= u64::from(entry.len);
    }
}

/// In-memory BM25 inverted index. Single writer, concurrent readers.
///
/// Scores use `IDF(t) = ln((N - df + 0.5) / (df + 0.5) + 1)`; the `+1`
/// inside the log keeps IDF positive for terms present in most of the
/// corpus.
pub struct LexicalIndex {
    inner: RwLock<Inner>,
    k1: f32,
    b: f32,
}

impl LexicalIndex {
    pub fn new(config: &LexicalConfig) -> Self {
        Self {
            inner: RwLock::new(Inner {
                postings: HashMap::new(),
                docs: HashMap::new(),
                stats: CorpusStats::default(),
            }),
            k1: config.k1,
            b: config.b,
        }
    }

    /// Index a chunk's text. Idempotent: reindexing an id replaces its
    /// postings, leaving `N` unchanged.
    pub fn index(&self, chunk_id: Uuid, text: &str) -> EngramResult<()> {
        let tokens = tokenize(text);
        let mut inner = self.write_guard()?;
        inner.remove_doc(chunk_id);

        let len = tokens.len() as u32;
        let mut tf: HashMap<String, u32> = HashMap::new();
        for token in tokens {
            *tf.entry(token).or_insert(0) += 1;
        }

        let mut terms = Vec::with_capacity(tf.len());
        for (term, count) in tf {
            inner
                .postings
                .entry(term.clone())
                .or_default()
                .insert(chunk_id, count);
            terms.push(term);
        }

        inner.docs.insert(chunk_id, DocEntry { len, terms });
        inner.stats.doc_count = inner.docs.len();
        inner.stats.total_tokens += u64::from(len);
        Ok(())
    }

    /// Remove a chunk from the index. No-op for unknown ids.
    pub fn remove(&self, chunk_id: Uuid) -> EngramResult<()> {
        let mut inner = self.write_guard()?;
        inner.remove_doc(chunk_id);
        Ok(())
    }

    /// Top-`k` chunks for a raw keyword query, scores descending. Ties
    /// order by chunk id so results are deterministic. An empty query or
    /// an empty index returns an empty list.
    pub fn search(&self, query: &str, k: usize) -> EngramResult<Vec<(Uuid, f32)>> {
        let q_tokens = tokenize(query);
        if q_tokens.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let inner = self.read_guard()?;
        if inner.stats.doc_count == 0 {
            return Ok(Vec::new());
        }

        let n = inner.stats.doc_count as f32;
        let avgdl = inner.stats.avg_doc_len().max(1e-6);
        let unique_terms: BTreeSet<&str> = q_tokens.iter().map(String::as_str).collect();

        let mut scores: HashMap<Uuid, f32> = HashMap::new();
        for term in unique_terms {
            let Some(plist) = inner.postings.get(term) else {
                continue;
            };
            let df = plist.len() as f32;
            let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
            for (&chunk_id, &tf) in plist {
                let dl = inner.docs.get(&chunk_id).map_or(0, |d| d.len) as f32;
                let tf = tf as f32;
                let denom = tf + self.k1 * (1.0 - self.b + self.b * dl / avgdl);
                *scores.entry(chunk_id).or_insert(0.0) += idf * (tf * (self.k1 + 1.0)) / denom;
            }
        }

        let mut ranked: Vec<(Uuid, f32)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(k);

        debug!(
            query_terms = q_tokens.len(),
            candidates = ranked.len(),
            "lexical search"
        );
        Ok(ranked)
    }

    /// Snapshot of the corpus statistics.
    pub fn stats(&self) -> EngramResult<CorpusStats> {
        Ok(self.read_guard()?.stats)
    }

    /// Number of indexed documents.
    pub fn doc_count(&self) -> EngramResult<usize> {
        Ok(self.read_guard()?.stats.doc_count)
    }

    /// Number of distinct terms.
    pub fn term_count(&self) -> EngramResult<usize> {
        Ok(self.read_guard()?.postings.len())
    }

    pub fn contains(&self, chunk_id: Uuid) -> EngramResult<bool> {
        Ok(self.read_guard()?.docs.contains_key(&chunk_id))
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, Inner>, IndexError> {
        self.inner.read().map_err(|e| IndexError::LockPoisoned {
            details: format!("lexical index read lock: {e}"),
        })
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, Inner>, IndexError> {
        self.inner.write().map_err(|e| IndexError::LockPoisoned {
            details: format!("lexical index write lock: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(docs: &[(Uuid, &str)]) -> LexicalIndex {
        let index = LexicalIndex::new(&LexicalConfig::default());
        for (id, text) in docs {
            index.index(*id, text).unwrap();
        }
        index
    }

    #[test]
    fn matching_term_scores_positive() {
        let id = Uuid::new_v4();
        let index = index_with(&[(id, "the capital of france is paris")]);
        let results = index.search("capital", 5).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, id);
        assert!(results[0].1 > 0.0);
    }

    #[test]
    fn empty_query_returns_nothing() {
        let index = index_with(&[(Uuid::new_v4(), "some text")]);
        assert!(index.search("", 5).unwrap().is_empty());
        assert!(index.search("...", 5).unwrap().is_empty());
    }

    #[test]
    fn empty_index_returns_nothing() {
        let index = LexicalIndex::new(&LexicalConfig::default());
        assert!(index.search("anything", 5).unwrap().is_empty());
    }
}
