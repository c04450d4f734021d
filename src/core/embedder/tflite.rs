//! Quantized on-device model executed through tract's TFLite frontend.

use super::tensor::{face_to_tensor, nhwc_size, output_to_embedding, InputEncoding};
use super::{Embedder, Embedding, ModelVariant};
use crate::core::preprocess::FaceImage;
use crate::error::InferenceError;
use std::path::Path;
use tract_core::prelude::*;
use tract_tflite::Tflite;

/// Runs a `.tflite` face model
pub struct TfliteEmbedder {
    plan: TypedRunnableModel<TypedModel>,
    encoding: InputEncoding,
    input_size: (u32, u32),
}

impl TfliteEmbedder {
    /// Load and optimize a TFLite model.
    ///
    /// Input shape and datum type are taken from the model itself.
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        if !path.is_file() {
            return Err(InferenceError::ModelNotFound {
                path: path.to_path_buf(),
            });
        }

        let load_failed = |e: TractError| InferenceError::LoadFailed {
            path: path.to_path_buf(),
            reason: format!("{:#}", e),
        };

        let model = Tflite::default().model_for_path(path).map_err(load_failed)?;

        let fact = model.input_fact(0).map_err(load_failed)?.clone();
        let shape = fact.shape.as_concrete().ok_or_else(|| {
            InferenceError::UnsupportedInput("input shape is not concrete".to_string())
        })?;
        let input_size = nhwc_size(shape).ok_or_else(|| {
            InferenceError::UnsupportedInput(format!("expected NHWC input, found {:?}", shape))
        })?;
        let encoding = InputEncoding::for_datum_type(fact.datum_type)?;

        let plan = model
            .into_optimized()
            .and_then(|m| m.into_runnable())
            .map_err(load_failed)?;

        tracing::info!(
            path = %path.display(),
            width = input_size.0,
            height = input_size.1,
            datum_type = ?fact.datum_type,
            "Loaded quantized model"
        );

        Ok(Self {
            plan,
            encoding,
            input_size,
        })
    }
}

impl Embedder for TfliteEmbedder {
    fn embed(&self, face: &FaceImage) -> Result<Embedding, InferenceError> {
        check_input_size(face, self.input_size)?;

        let input = face_to_tensor(face, self.encoding)?;
        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::RunFailed(format!("{:#}", e)))?;

        output_to_embedding(&outputs)
    }

    fn variant(&self) -> ModelVariant {
        ModelVariant::Quantized
    }

    fn input_size(&self) -> (u32, u32) {
        self.input_size
    }
}

pub(super) fn check_input_size(face: &FaceImage, expected: (u32, u32)) -> Result<(), InferenceError> {
    if face.dimensions() != expected {
        return Err(InferenceError::InputSize {
            expected_width: expected.0,
            expected_height: expected.1,
            actual_width: face.width(),
            actual_height: face.height(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preprocess::ChannelOrder;
    use image::RgbImage;

    #[test]
    fn missing_model_is_reported() {
        let result = TfliteEmbedder::load(Path::new("/nonexistent/facenet512_uint8.tflite"));
        assert!(matches!(result, Err(InferenceError::ModelNotFound { .. })));
    }

    #[test]
    fn garbage_model_fails_to_load() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), b"definitely not a flatbuffer").unwrap();

        let result = TfliteEmbedder::load(temp.path());
        assert!(matches!(result, Err(InferenceError::LoadFailed { .. })));
    }

    #[test]
    fn input_size_mismatch_is_error() {
        let face = FaceImage::from_rgb(RgbImage::new(100, 100), ChannelOrder::Bgr);

        let result = check_input_size(&face, (160, 160));
        assert!(matches!(
            result,
            Err(InferenceError::InputSize {
                expected_width: 160,
                actual_width: 100,
                ..
            })
        ));
    }
}
