//! Deterministic degraded-mode embedding.
//!
//! Not semantically meaningful: the only purpose is to let the pipeline keep
//! executing with a well-formed unit vector when the real backend is
//! unavailable. Callers must check the trust flag before relying on
//! similarities computed from these vectors.

/// Synthesize a unit vector purely from the trimmed input text.
///
/// Rolling hash over the bytes, then `sin(hash + i)` per component rescaled
/// to [0, 1], L2-normalized.
pub fn hash_embedding(text: &str, dim: usize) -> Vec<f32> {
    let trimmed = text.trim();
    let mut hash: u64 = 0;
    for byte in trimmed.bytes() {
        hash = hash.wrapping_mul(31).wrapping_add(u64::from(byte));
    }
    let seed = hash as f64;
    let mut vector: Vec<f32> = (0..dim)
        .map(|i| (((seed + i as f64).sin() + 1.0) / 2.0) as f32)
        .collect();
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut vector {
            *x /= norm;
        }
    }
    vector
}
