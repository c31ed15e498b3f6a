//! # engram-lexical
//!
//! From-scratch BM25 inverted index. Corpus statistics (`N`, average
//! document length) update incrementally on every `index`/`remove` call,
//! so single-document changes never trigger a rebuild.

mod index;
mod stats;
mod tokenize;

pub use index::LexicalIndex;
pub use stats::CorpusStats;
pub use tokenize::tokenize;
