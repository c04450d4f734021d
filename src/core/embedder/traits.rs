//! Trait definitions for face embedding models.

use crate::core::metric;
use crate::core::preprocess::FaceImage;
use crate::error::{InferenceError, MetricError};
use serde::{Deserialize, Serialize};

/// The two variants of the model under evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModelVariant {
    /// uint8 on-device model (TFLite)
    Quantized,
    /// Floating-point reference model (ONNX)
    FloatingPoint,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 2] = [ModelVariant::Quantized, ModelVariant::FloatingPoint];

    /// Label used in the accuracy summary
    pub fn label(&self) -> &'static str {
        match self {
            ModelVariant::Quantized => "Quantized",
            ModelVariant::FloatingPoint => "Floating-point",
        }
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelVariant::Quantized => write!(f, "quantized"),
            ModelVariant::FloatingPoint => write!(f, "floating-point"),
        }
    }
}

/// Trait for face embedding backends
pub trait Embedder: Send + Sync {
    /// Compute the embedding of one preprocessed face.
    ///
    /// The face must already have the size reported by `input_size`.
    fn embed(&self, face: &FaceImage) -> Result<Embedding, InferenceError>;

    /// Which variant this backend runs
    fn variant(&self) -> ModelVariant;

    /// Spatial input size (width, height) the model expects
    fn input_size(&self) -> (u32, u32);
}

/// A face embedding vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// Cosine distance to another embedding of the same dimension
    pub fn distance(&self, other: &Embedding) -> Result<f32, MetricError> {
        metric::cosine_distance(&self.0, &other.0)
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}
