// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "engram.db";
pub const DEFAULT_WAL_MODE: bool = true;
pub const DEFAULT_MMAP_SIZE: u64 = 268_435_456; // 256 MB
pub const DEFAULT_CACHE_SIZE: i64 = -64_000; // 64 MB (negative = KB)
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Chunker ---
pub const DEFAULT_CHUNK_TARGET_CHARS: usize = 1_000;
pub const DEFAULT_CHUNK_OVERLAP_CHARS: usize = 100;
pub const DEFAULT_MAX_SENTENCE_FACTOR: f32 = 1.5;

// --- Lexical index ---
pub const DEFAULT_BM25_K1: f32 = 1.5;
pub const DEFAULT_BM25_B: f32 = 0.75;

// --- Vector index ---
pub const DEFAULT_HNSW_M: usize = 16;
pub const DEFAULT_HNSW_M_MAX: usize = 32;
pub const DEFAULT_EF_CONSTRUCTION: usize = 200;
pub const DEFAULT_EF_SEARCH: usize = 50;

// --- Embeddings ---
pub const DEFAULT_EMBED_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_EMBED_MAX_RETRIES: u32 = 2;
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 50;
pub const DEFAULT_L1_CACHE_SIZE: u64 = 10_000;
pub const DEFAULT_L1_CACHE_TTL_SECS: u64 = 3_600; // 1 hour

// --- Decay ---
pub const DEFAULT_DECAY_HALF_LIFE_DAYS: f32 = 30.0;
pub const DEFAULT_DECAY_THRESHOLD_SCORE: f32 = 0.1;
pub const DEFAULT_ACCESS_BOOST_BASE: f32 = 1.1;
pub const DEFAULT_ACCESS_BOOST_CAP: f32 = 3.0;

// --- Provenance ---
pub const DEFAULT_PROVENANCE_CACHE_CAPACITY: usize = 10_000;

// --- Retrieval ---
pub const DEFAULT_RESULT_COUNT: usize = 10;
pub const DEFAULT_BUDGET_CHARS: usize = 8_000;
pub const DEFAULT_SEMANTIC_WEIGHT: f32 = 0.6;
pub const DEFAULT_LEXICAL_WEIGHT: f32 = 0.4;
pub const DEFAULT_FUSED_WEIGHT: f32 = 0.8;
pub const DEFAULT_DECAY_WEIGHT: f32 = 0.2;
pub const DEFAULT_OVERSAMPLE_FACTOR: usize = 3;
