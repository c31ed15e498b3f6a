use uuid::Uuid;

/// Check whether a decayed score calls for archival.
pub fn should_archive(decay_score: f32, threshold: f32) -> bool {
    decay_score < threshold
}

/// Archival decision with metadata for audit logging.
#[derive(Debug, Clone)]
pub struct ArchivalDecision {
    pub source_id: Uuid,
    pub should_archive: bool,
    pub decay_score: f32,
    pub threshold: f32,
    pub reason: String,
}

/// Evaluate archival eligibility for one record. Already-archived
/// records are never re-archived.
pub fn evaluate(
    source_id: Uuid,
    already_archived: bool,
    decay_score: f32,
    threshold: f32,
) -> ArchivalDecision {
    if already_archived {
        return ArchivalDecision {
            source_id,
            should_archive: false,
            decay_score,
            threshold,
            reason: "already archived".to_string(),
        };
    }

    let archive = should_archive(decay_score, threshold);
    let reason = if archive {
        format!("decay score {decay_score:.3} below threshold {threshold:.3}")
    } else {
        "decay score above threshold".to_string()
    };

    ArchivalDecision {
        source_id,
        should_archive: archive,
        decay_score,
        threshold,
        reason,
    }
}
