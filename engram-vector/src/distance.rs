use engram_core::errors::IndexError;

/// Dot product over equal-length slices. Unrolled 8 wide so the
/// accumulation autovectorizes.
#[inline(always)]
pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    let mut sum = 0.0;

    let chunks = a.chunks_exact(8);
    let b_chunks = b.chunks_exact(8);
    let remainder_start = a.len() - a.len() % 8;

    for (ac, bc) in chunks.zip(b_chunks) {
        sum += ac[0] * bc[0]
            + ac[1] * bc[1]
            + ac[2] * bc[2]
            + ac[3] * bc[3]
            + ac[4] * bc[4]
            + ac[5] * bc[5]
            + ac[6] * bc[6]
            + ac[7] * bc[7];
    }

    for i in remainder_start..a.len() {
        sum += a[i] * b[i];
    }

    sum
}

/// Cosine distance between two unit vectors. Lower is closer.
#[inline(always)]
pub(crate) fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - dot(a, b)
}

/// Scales a vector to unit L2 norm. Zero-norm and non-finite input cannot
/// participate in cosine ranking and is rejected rather than stored.
pub(crate) fn normalize(mut vector: Vec<f32>) -> Result<Vec<f32>, IndexError> {
    let norm_sq = dot(&vector, &vector);
    if !norm_sq.is_finite() {
        return Err(IndexError::InvalidVector {
            reason: "non-finite component".to_string(),
        });
    }
    if norm_sq == 0.0 {
        return Err(IndexError::InvalidVector {
            reason: "zero-norm vector".to_string(),
        });
    }

    let inv = 1.0 / norm_sq.sqrt();
    for v in &mut vector {
        *v *= inv;
    }
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_handles_remainder_lengths() {
        // 11 elements exercises both the unrolled body and the tail.
        let a: Vec<f32> = (1..=11).map(|i| i as f32).collect();
        let b = vec![2.0; 11];
        assert_eq!(dot(&a, &b), 2.0 * (11.0 * 12.0 / 2.0));
    }

    #[test]
    fn normalize_produces_unit_norm() {
        let v = normalize(vec![3.0, 4.0]).unwrap();
        assert!((dot(&v, &v) - 1.0).abs() < 1e-6);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn normalize_rejects_zero_and_nan() {
        assert!(normalize(vec![0.0, 0.0, 0.0]).is_err());
        assert!(normalize(vec![1.0, f32::NAN]).is_err());
    }

    #[test]
    fn identical_unit_vectors_have_zero_distance() {
        let v = normalize(vec![0.2, -0.7, 1.3]).unwrap();
        assert!(cosine_distance(&v, &v).abs() < 1e-6);
    }
}
