/// Corpus-wide statistics the BM25 formula depends on.
///
/// Owned by the index instance and mutated only inside `index`/`remove`,
/// so `N` and the average document length stay consistent with the
/// postings without any full-corpus rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CorpusStats {
    /// Number of indexed documents (`N`).
    pub doc_count: usize,
    /// Total token count across all indexed documents.
    pub total_tokens: u64,
}

impl CorpusStats {
    /// Average document length in tokens. Zero for an empty corpus.
    pub fn avg_doc_len(&self) -> f32 {
        if self.doc_count == 0 {
            0.0
        } else {
            self.total_tokens as f32 / self.doc_count as f32
        }
    }
}
