//! # Preprocess Module
//!
//! Turns an LFW image file into the pixel buffer a face model consumes.
//!
//! ## Steps
//! 1. Decode (zune-jpeg for JPEG, image crate otherwise)
//! 2. Center crop by a fixed margin on every edge (250x250 -> 160x160)
//! 3. Reorder channels (BGR by default)
//! 4. Resize to the model input when the crop does not already match
//!
//! ## Example
//! ```rust,ignore
//! use face_verify_eval::core::preprocess::{PreprocessConfig, ChannelOrder};
//!
//! let config = PreprocessConfig::new()
//!     .crop_margin(45)
//!     .channel_order(ChannelOrder::Bgr);
//!
//! let face = config.load(&path)?;
//! ```

pub mod decode;
pub mod mmap;
pub mod resize;

pub use decode::FastDecoder;
pub use resize::FastResizer;

use crate::error::PreprocessError;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Margin removed from each edge of a deep-funneled LFW image
pub const DEFAULT_CROP_MARGIN: u32 = 45;

/// Channel layout of the pixel buffer handed to the models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// OpenCV order, what the reference pipeline was fed
    Bgr,
    Rgb,
}

impl std::fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelOrder::Bgr => write!(f, "BGR"),
            ChannelOrder::Rgb => write!(f, "RGB"),
        }
    }
}

/// A preprocessed face: interleaved 8-bit pixels in HWC layout
#[derive(Debug, Clone, PartialEq)]
pub struct FaceImage {
    width: u32,
    height: u32,
    order: ChannelOrder,
    pixels: Vec<u8>,
}

impl FaceImage {
    /// Build from an RGB image, reordering channels as requested
    pub fn from_rgb(image: RgbImage, order: ChannelOrder) -> Self {
        let (width, height) = image.dimensions();
        let mut pixels = image.into_raw();

        if order == ChannelOrder::Bgr {
            for pixel in pixels.chunks_exact_mut(3) {
                pixel.swap(0, 2);
            }
        }

        Self {
            width,
            height,
            order,
            pixels,
        }
    }

    pub(crate) fn from_raw(width: u32, height: u32, order: ChannelOrder, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            order,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.order
    }

    /// Raw HWC bytes
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Value of channel `c` at (`x`, `y`), `None` outside the image
    pub fn channel(&self, x: usize, y: usize, c: usize) -> Option<u8> {
        if x >= self.width as usize || y >= self.height as usize || c >= 3 {
            return None;
        }
        self.pixels.get((y * self.width as usize + x) * 3 + c).copied()
    }

    /// Return an image of the requested size, resizing only when needed
    pub fn fit_to(&self, width: u32, height: u32) -> Result<FaceImage, PreprocessError> {
        if self.dimensions() == (width, height) {
            return Ok(self.clone());
        }
        FastResizer::new().resize(self, width, height)
    }
}

/// Configuration for loading faces from disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    crop_margin: u32,
    channel_order: ChannelOrder,
}

impl PreprocessConfig {
    /// Defaults: 45 pixel margin, BGR
    pub fn new() -> Self {
        Self {
            crop_margin: DEFAULT_CROP_MARGIN,
            channel_order: ChannelOrder::Bgr,
        }
    }

    pub fn crop_margin(mut self, margin: u32) -> Self {
        self.crop_margin = margin;
        self
    }

    pub fn channel_order(mut self, order: ChannelOrder) -> Self {
        self.channel_order = order;
        self
    }

    pub fn margin(&self) -> u32 {
        self.crop_margin
    }

    pub fn order(&self) -> ChannelOrder {
        self.channel_order
    }

    /// Decode, crop and reorder one image
    pub fn load(&self, path: &Path) -> Result<FaceImage, PreprocessError> {
        let image = FastDecoder::decode(path)?;
        let cropped = center_crop(image, self.crop_margin, path)?;
        Ok(FaceImage::from_rgb(cropped, self.channel_order))
    }
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove `margin` pixels from every edge
pub fn center_crop(image: RgbImage, margin: u32, path: &Path) -> Result<RgbImage, PreprocessError> {
    if margin == 0 {
        return Ok(image);
    }

    let (width, height) = image.dimensions();
    if margin.saturating_mul(2) >= width || margin.saturating_mul(2) >= height {
        return Err(PreprocessError::CropTooLarge {
            path: path.to_path_buf(),
            margin,
            width,
            height,
        });
    }

    Ok(image::imageops::crop_imm(&image, margin, margin, width - 2 * margin, height - 2 * margin)
        .to_image())
}
