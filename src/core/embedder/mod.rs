//! # Embedder Module
//!
//! Runs face images through the model variants under evaluation.
//!
//! ## Backends
//! - **Quantized** - uint8 TFLite model, input shape read from the model
//! - **Floating-point** - reference model exported to ONNX, fed pixels / 255
//!
//! Both backends run on tract, so no vendor runtime is needed.
//!
//! ## Example
//! ```rust,ignore
//! use face_verify_eval::core::embedder::{EmbedderConfig, ModelVariant};
//!
//! let embedder = EmbedderConfig::new(ModelVariant::Quantized)
//!     .model_path("facenet512_uint8.tflite")
//!     .build()?;
//!
//! let embedding = embedder.embed(&face)?;
//! ```

mod onnx;
mod tensor;
mod tflite;
mod traits;

pub use onnx::OnnxEmbedder;
pub use tensor::InputEncoding;
pub use tflite::TfliteEmbedder;
pub use traits::{Embedder, Embedding, ModelVariant};

use crate::error::InferenceError;
use std::path::PathBuf;

/// Input size of FaceNet-512 and of a 45px-cropped LFW image
pub const DEFAULT_INPUT_SIZE: (u32, u32) = (160, 160);

/// Configuration builder for embedders
#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    variant: ModelVariant,
    model_path: PathBuf,
    input_size: (u32, u32),
}

impl EmbedderConfig {
    /// Defaults to the model file names produced by the conversion recipe
    pub fn new(variant: ModelVariant) -> Self {
        let model_path = match variant {
            ModelVariant::Quantized => "facenet512_uint8.tflite",
            ModelVariant::FloatingPoint => "facenet512.onnx",
        };

        Self {
            variant,
            model_path: PathBuf::from(model_path),
            input_size: DEFAULT_INPUT_SIZE,
        }
    }

    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    /// Input size for models that do not declare one (ONNX reference)
    pub fn input_size(mut self, width: u32, height: u32) -> Self {
        self.input_size = (width, height);
        self
    }

    /// Load the model
    pub fn build(self) -> Result<Box<dyn Embedder>, InferenceError> {
        match self.variant {
            ModelVariant::Quantized => Ok(Box::new(TfliteEmbedder::load(&self.model_path)?)),
            ModelVariant::FloatingPoint => Ok(Box::new(OnnxEmbedder::load(
                &self.model_path,
                self.input_size,
            )?)),
        }
    }
}
