//! SIMD-accelerated resizing of face crops.
//!
//! Only used when a model's input size differs from the crop size.

use super::FaceImage;
use crate::error::PreprocessError;
use fast_image_resize::{images::Image, PixelType, ResizeOptions, Resizer};

/// Resizer for 3-channel 8-bit face images
pub struct FastResizer {
    resizer: Resizer,
}

impl FastResizer {
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
        }
    }

    /// Resize with a bilinear filter, keeping the channel order.
    pub fn resize(
        &mut self,
        face: &FaceImage,
        width: u32,
        height: u32,
    ) -> Result<FaceImage, PreprocessError> {
        if face.width() == 0 || face.height() == 0 {
            return Err(PreprocessError::ResizeFailed(
                "Invalid source dimensions".to_string(),
            ));
        }

        if width == 0 || height == 0 {
            return Err(PreprocessError::ResizeFailed(
                "Invalid destination dimensions".to_string(),
            ));
        }

        let src_image = Image::from_vec_u8(
            face.width(),
            face.height(),
            face.pixels().to_vec(),
            PixelType::U8x3,
        )
        .map_err(|e| PreprocessError::ResizeFailed(format!("Failed to create source image: {}", e)))?;

        let mut dst_image = Image::new(width, height, PixelType::U8x3);

        let options = ResizeOptions::new().resize_alg(fast_image_resize::ResizeAlg::Convolution(
            fast_image_resize::FilterType::Bilinear,
        ));

        self.resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| PreprocessError::ResizeFailed(e.to_string()))?;

        Ok(FaceImage::from_raw(
            width,
            height,
            face.channel_order(),
            dst_image.into_vec(),
        ))
    }
}

impl Default for FastResizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preprocess::ChannelOrder;
    use image::{Rgb, RgbImage};

    fn solid(width: u32, height: u32) -> FaceImage {
        FaceImage::from_rgb(
            RgbImage::from_pixel(width, height, Rgb([10, 100, 250])),
            ChannelOrder::Rgb,
        )
    }

    #[test]
    fn resize_produces_correct_dimensions() {
        let resized = FastResizer::new().resize(&solid(160, 160), 112, 112).unwrap();

        assert_eq!(resized.dimensions(), (112, 112));
        assert_eq!(resized.pixels().len(), 112 * 112 * 3);
    }

    #[test]
    fn resize_preserves_solid_color() {
        let resized = FastResizer::new().resize(&solid(50, 50), 10, 10).unwrap();

        let close = |actual: u8, expected: u8| (actual as i32 - expected as i32).abs() <= 1;
        assert!(close(resized.channel(5, 5, 0).unwrap(), 10));
        assert!(close(resized.channel(5, 5, 1).unwrap(), 100));
        assert!(close(resized.channel(5, 5, 2).unwrap(), 250));
    }

    #[test]
    fn zero_destination_is_error() {
        let result = FastResizer::new().resize(&solid(10, 10), 0, 10);
        assert!(matches!(result, Err(PreprocessError::ResizeFailed(_))));
    }

    #[test]
    fn resizer_reuse() {
        let mut resizer = FastResizer::new();
        let face = solid(64, 64);

        let first = resizer.resize(&face, 16, 16).unwrap();
        let second = resizer.resize(&face, 16, 16).unwrap();

        assert_eq!(first, second);
    }
}
