//! # engram-chunker
//!
//! Cuts source text into sentence-respecting chunks with offset-stable
//! spans. Canonical spans are contiguous, never overlap, and tile the
//! input exactly; the configured overlap is repeated into chunk *text*
//! only, so downstream provenance stays byte-exact.

mod sentence;

use engram_core::config::ChunkerConfig;
use engram_core::errors::ConfigError;
use engram_core::models::Chunk;
use uuid::Uuid;

use sentence::sentence_end;

/// A produced chunk plus how its boundaries were chosen. Hard character
/// splits carry less provenance confidence than sentence-aligned cuts.
#[derive(Debug, Clone)]
pub struct ChunkCut {
    pub chunk: Chunk,
    pub sentence_aligned: bool,
}

/// Sentence-respecting chunker. Sizes are in characters; offsets in the
/// produced chunks are byte offsets on char boundaries.
#[derive(Debug, Clone)]
pub struct Chunker {
    target_size: usize,
    overlap: usize,
    /// A single sentence longer than this many chars is hard-split.
    hard_limit: usize,
}

impl Chunker {
    pub fn new(config: &ChunkerConfig) -> Result<Self, ConfigError> {
        if config.target_size == 0 {
            return Err(ConfigError::invalid("chunker.target_size", "must be >= 1"));
        }
        if config.overlap >= config.target_size {
            return Err(ConfigError::invalid(
                "chunker.overlap",
                format!(
                    "overlap ({}) must be < target_size ({})",
                    config.overlap, config.target_size
                ),
            ));
        }
        if config.max_sentence_factor < 1.0 {
            return Err(ConfigError::invalid(
                "chunker.max_sentence_factor",
                "must be >= 1.0",
            ));
        }
        Ok(Self {
            target_size: config.target_size,
            overlap: config.overlap,
            hard_limit: (config.target_size as f32 * config.max_sentence_factor).ceil() as usize,
        })
    }

    /// Lazily cut `text` into chunks for `source_id`. One pass per call:
    /// the returned iterator walks the text once and is not restartable.
    pub fn chunk<'a>(&self, source_id: Uuid, text: &'a str) -> Chunks<'a> {
        Chunks {
            source_id,
            text,
            target_size: self.target_size,
            overlap: self.overlap,
            hard_limit: self.hard_limit,
            pos: 0,
            index: 0,
            prev_tail: String::new(),
            hard_end: None,
        }
    }
}

/// Lazy chunk iterator. Accumulates whole sentences up to the target
/// size; a sentence exceeding the hard limit is split into fixed-width
/// character pieces instead.
pub struct Chunks<'a> {
    source_id: Uuid,
    text: &'a str,
    target_size: usize,
    overlap: usize,
    hard_limit: usize,
    /// Next unconsumed byte.
    pos: usize,
    index: u32,
    /// Last `overlap` chars of the previous canonical span.
    prev_tail: String,
    /// End byte of the oversized sentence currently being hard-split.
    hard_end: Option<usize>,
}

impl Iterator for Chunks<'_> {
    type Item = ChunkCut;

    fn next(&mut self) -> Option<ChunkCut> {
        if let Some(end) = self.hard_end {
            return Some(self.next_hard_piece(end));
        }
        if self.pos >= self.text.len() {
            return None;
        }

        let start = self.pos;
        let mut total_chars = 0usize;

        while self.pos < self.text.len() {
            let (s_end, s_chars) = sentence_end(self.text, self.pos);
            if s_chars > self.hard_limit {
                if total_chars == 0 {
                    self.hard_end = Some(s_end);
                    return Some(self.next_hard_piece(s_end));
                }
                // Emit what we have; the oversized sentence starts fresh
                // on the next call.
                break;
            }
            if total_chars > 0 && total_chars + s_chars > self.target_size {
                break;
            }
            self.pos = s_end;
            total_chars += s_chars;
        }

        let end = self.pos;
        Some(self.emit(start, end, true))
    }
}

impl Chunks<'_> {
    /// Cut the next `target_size` chars from the oversized sentence
    /// ending at `end`.
    fn next_hard_piece(&mut self, end: usize) -> ChunkCut {
        let slice = &self.text[self.pos..end];
        let piece_end = match slice.char_indices().nth(self.target_size) {
            Some((i, _)) => self.pos + i,
            None => end,
        };
        let start = self.pos;
        self.pos = piece_end;
        if self.pos >= end {
            self.hard_end = None;
        }
        self.emit(start, piece_end, false)
    }

    fn emit(&mut self, start: usize, end: usize, sentence_aligned: bool) -> ChunkCut {
        let span = &self.text[start..end];
        let mut text = String::with_capacity(self.prev_tail.len() + span.len());
        text.push_str(&self.prev_tail);
        text.push_str(span);

        // Retain the canonical span's last `overlap` chars for the next
        // chunk's leading context.
        self.prev_tail.clear();
        if self.overlap > 0 {
            let tail_start = span
                .char_indices()
                .rev()
                .nth(self.overlap - 1)
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.prev_tail.push_str(&span[tail_start..]);
        }

        let chunk = Chunk {
            chunk_id: Uuid::new_v4(),
            source_id: self.source_id,
            text,
            start_offset: start as u32,
            end_offset: end as u32,
            chunk_index: self.index,
            embedding_ref: None,
        };
        self.index += 1;
        ChunkCut {
            chunk,
            sentence_aligned,
        }
    }
}
