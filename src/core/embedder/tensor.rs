//! Conversion between face images and tract tensors.

use super::Embedding;
use crate::core::preprocess::FaceImage;
use crate::error::InferenceError;
use tract_core::prelude::*;

/// How pixel bytes are mapped to the model's input datum type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEncoding {
    /// Raw bytes, optionally tagged with the input's quantization params
    RawU8(Option<DatumType>),
    /// Float in [0, 1]
    UnitF32,
}

impl InputEncoding {
    /// Pick the encoding for a model input datum type
    pub fn for_datum_type(dt: DatumType) -> Result<Self, InferenceError> {
        match dt {
            DatumType::U8 => Ok(InputEncoding::RawU8(None)),
            DatumType::QU8(_) => Ok(InputEncoding::RawU8(Some(dt))),
            DatumType::F32 => Ok(InputEncoding::UnitF32),
            other => Err(InferenceError::UnsupportedInput(format!(
                "input datum type {:?}",
                other
            ))),
        }
    }
}

/// Build an NHWC batch-of-one tensor from a face
pub fn face_to_tensor(face: &FaceImage, encoding: InputEncoding) -> Result<Tensor, InferenceError> {
    let height = face.height() as usize;
    let width = face.width() as usize;

    let array = tract_ndarray::Array4::from_shape_vec((1, height, width, 3), face.pixels().to_vec())
        .map_err(|e| InferenceError::UnsupportedInput(format!("face buffer: {}", e)))?;

    match encoding {
        InputEncoding::RawU8(quantized) => {
            let tensor: Tensor = array.into();
            match quantized {
                Some(dt) => Ok(tensor
                    .cast_to_dt(dt)
                    .map_err(|e| InferenceError::UnsupportedInput(format!("{:#}", e)))?
                    .into_owned()),
                None => Ok(tensor),
            }
        }
        InputEncoding::UnitF32 => Ok(array.mapv(|v| v as f32 / 255.0).into()),
    }
}

/// Flatten the first model output into an embedding, dequantizing if needed
pub fn output_to_embedding(outputs: &TVec<TValue>) -> Result<Embedding, InferenceError> {
    let output = outputs.first().ok_or(InferenceError::EmptyOutput)?;

    let values = output
        .cast_to::<f32>()
        .map_err(|e| InferenceError::RunFailed(format!("{:#}", e)))?;
    let view = values
        .to_array_view::<f32>()
        .map_err(|e| InferenceError::RunFailed(format!("{:#}", e)))?;

    let embedding: Vec<f32> = view.iter().copied().collect();
    if embedding.is_empty() {
        return Err(InferenceError::EmptyOutput);
    }

    Ok(Embedding::new(embedding))
}

/// Spatial size of an NHWC input shape, if it is one
pub fn nhwc_size(shape: &[usize]) -> Option<(u32, u32)> {
    match shape {
        [1, h, w, 3] => Some((*w as u32, *h as u32)),
        _ => None,
    }
}
