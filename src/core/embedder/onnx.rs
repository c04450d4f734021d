//! Floating-point reference model executed through tract's ONNX frontend.

use super::tensor::{face_to_tensor, output_to_embedding, InputEncoding};
use super::tflite::check_input_size;
use super::{Embedder, Embedding, ModelVariant};
use crate::core::preprocess::FaceImage;
use crate::error::InferenceError;
use std::path::Path;
use tract_onnx::prelude::*;

/// Runs the reference model exported to ONNX
pub struct OnnxEmbedder {
    plan: TypedRunnableModel<TypedModel>,
    input_size: (u32, u32),
}

impl OnnxEmbedder {
    /// Load the model with a fixed `f32 [1, H, W, 3]` input.
    pub fn load(path: &Path, input_size: (u32, u32)) -> Result<Self, InferenceError> {
        if !path.is_file() {
            return Err(InferenceError::ModelNotFound {
                path: path.to_path_buf(),
            });
        }

        let (width, height) = input_size;
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|m| {
                m.with_input_fact(0, f32::fact([1, height as usize, width as usize, 3]).into())
            })
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| InferenceError::LoadFailed {
                path: path.to_path_buf(),
                reason: format!("{:#}", e),
            })?;

        tracing::info!(
            path = %path.display(),
            width,
            height,
            "Loaded floating-point model"
        );

        Ok(Self { plan, input_size })
    }
}

impl Embedder for OnnxEmbedder {
    fn embed(&self, face: &FaceImage) -> Result<Embedding, InferenceError> {
        check_input_size(face, self.input_size)?;

        let input = face_to_tensor(face, InputEncoding::UnitF32)?;
        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::RunFailed(format!("{:#}", e)))?;

        output_to_embedding(&outputs)
    }

    fn variant(&self) -> ModelVariant {
        ModelVariant::FloatingPoint
    }

    fn input_size(&self) -> (u32, u32) {
        self.input_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_is_reported() {
        let result = OnnxEmbedder::load(Path::new("/nonexistent/facenet512.onnx"), (160, 160));
        assert!(matches!(result, Err(InferenceError::ModelNotFound { .. })));
    }

    #[test]
    fn garbage_model_fails_to_load() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), b"not a protobuf model").unwrap();

        let result = OnnxEmbedder::load(temp.path(), (160, 160));
        assert!(matches!(result, Err(InferenceError::LoadFailed { .. })));
    }
}
