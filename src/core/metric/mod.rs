//! # Metric Module
//!
//! Cosine distance between embeddings and the threshold decision.
//!
//! Distance is `1 - cos(a, b)`, so it ranges over [0, 2]: 0 for identical
//! direction, 1 for orthogonal, 2 for opposite.

mod threshold;

pub use threshold::{VerificationThreshold, DEFAULT_THRESHOLD};

use crate::error::MetricError;

/// Cosine distance `1 - a.b / (|a| |b|)`.
///
/// A zero vector on either side has no direction; it is treated as
/// orthogonal to everything (distance 1).
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Result<f32, MetricError> {
    if a.len() != b.len() {
        return Err(MetricError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    // Accumulate in f64.
    let (dot, norm_a, norm_b) = a.iter().zip(b).fold((0f64, 0f64, 0f64), |acc, (&x, &y)| {
        let (x, y) = (x as f64, y as f64);
        (acc.0 + x * y, acc.1 + x * x, acc.2 + y * y)
    });

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if denominator == 0.0 {
        return Ok(1.0);
    }

    Ok((1.0 - dot / denominator) as f32)
}
