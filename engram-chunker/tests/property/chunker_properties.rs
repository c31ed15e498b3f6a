use engram_chunker::Chunker;
use engram_core::config::ChunkerConfig;
use proptest::prelude::*;
use uuid::Uuid;

fn arb_text() -> impl Strategy<Value = String> {
    // Mixed-script prose with terminators, newlines, and the occasional
    // unterminated run.
    proptest::collection::vec(
        prop_oneof![
            4 => "[a-z]{1,12}",
            1 => "[éüλ中]{1,4}",
            2 => Just(" ".to_string()),
            1 => Just(". ".to_string()),
            1 => Just("! ".to_string()),
            1 => Just("\n".to_string()),
        ],
        0..80,
    )
    .prop_map(|parts| parts.concat())
}

fn arb_config() -> impl Strategy<Value = ChunkerConfig> {
    (10usize..200, 0usize..9, 0u8..3).prop_map(|(target, overlap, factor_step)| ChunkerConfig {
        target_size: target,
        overlap: overlap.min(target - 1),
        max_sentence_factor: 1.0 + factor_step as f32 * 0.5,
    })
}

proptest! {
    // ── Spans tile the input exactly ─────────────────────────────────────

    #[test]
    fn canonical_spans_reassemble_to_input(text in arb_text(), config in arb_config()) {
        let chunker = Chunker::new(&config).unwrap();
        let rebuilt: String = chunker
            .chunk(Uuid::new_v4(), &text)
            .map(|cut| text[cut.chunk.start_offset as usize..cut.chunk.end_offset as usize].to_string())
            .collect();
        prop_assert_eq!(rebuilt, text);
    }

    // ── No zero-length chunks, contiguous, ordered ───────────────────────

    #[test]
    fn spans_are_nonempty_contiguous_ordered(text in arb_text(), config in arb_config()) {
        let chunker = Chunker::new(&config).unwrap();
        let mut expected_start = 0u32;
        let mut expected_index = 0u32;
        for cut in chunker.chunk(Uuid::new_v4(), &text) {
            prop_assert_eq!(cut.chunk.start_offset, expected_start);
            prop_assert!(cut.chunk.start_offset < cut.chunk.end_offset);
            prop_assert_eq!(cut.chunk.chunk_index, expected_index);
            expected_start = cut.chunk.end_offset;
            expected_index += 1;
        }
        prop_assert_eq!(expected_start as usize, text.len());
    }

    // ── Chunk size stays within the hard allowance ───────────────────────

    #[test]
    fn span_char_count_respects_hard_limit(text in arb_text(), config in arb_config()) {
        let chunker = Chunker::new(&config).unwrap();
        let hard_limit =
            (config.target_size as f32 * config.max_sentence_factor).ceil() as usize;
        for cut in chunker.chunk(Uuid::new_v4(), &text) {
            let span =
                &text[cut.chunk.start_offset as usize..cut.chunk.end_offset as usize];
            prop_assert!(span.chars().count() <= hard_limit.max(config.target_size));
        }
    }

    // ── Overlap never leaks into offsets ─────────────────────────────────

    #[test]
    fn text_is_span_plus_bounded_overlap(text in arb_text(), config in arb_config()) {
        let chunker = Chunker::new(&config).unwrap();
        for cut in chunker.chunk(Uuid::new_v4(), &text) {
            let span =
                &text[cut.chunk.start_offset as usize..cut.chunk.end_offset as usize];
            prop_assert!(cut.chunk.text.ends_with(span));
            let lead_chars =
                cut.chunk.text.chars().count() - span.chars().count();
            prop_assert!(lead_chars <= config.overlap);
            if cut.chunk.chunk_index == 0 {
                prop_assert_eq!(lead_chars, 0);
            }
        }
    }
}
