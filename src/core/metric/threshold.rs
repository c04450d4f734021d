//! Threshold decision for verification pairs.

use crate::core::pairs::PairKind;
use crate::error::MetricError;
use serde::{Deserialize, Serialize};

/// Cosine distance separating "same person" from "different person"
pub const DEFAULT_THRESHOLD: f32 = 0.6;

/// Fixed-threshold verifier
///
/// A matched pair is verified correctly when its distance is strictly
/// below the threshold, a mismatched pair when strictly above. A distance
/// equal to the threshold is wrong for both kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerificationThreshold {
    value: f32,
}

impl VerificationThreshold {
    pub fn new(value: f32) -> Result<Self, MetricError> {
        if !value.is_finite() || !(0.0..=2.0).contains(&value) {
            return Err(MetricError::InvalidThreshold { value });
        }
        Ok(Self { value })
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Whether the distance says "same person"
    pub fn accepts(&self, distance: f32) -> bool {
        distance < self.value
    }

    /// Whether the distance says "different person"
    pub fn rejects(&self, distance: f32) -> bool {
        distance > self.value
    }

    /// Whether the decision for a pair of the given kind is correct
    pub fn is_correct(&self, kind: PairKind, distance: f32) -> bool {
        match kind {
            PairKind::Matched => self.accepts(distance),
            PairKind::Mismatched => self.rejects(distance),
        }
    }
}

impl Default for VerificationThreshold {
    fn default() -> Self {
        Self {
            value: DEFAULT_THRESHOLD,
        }
    }
}

impl std::fmt::Display for VerificationThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
