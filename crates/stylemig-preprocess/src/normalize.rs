use ndarray::Array3;
use serde::{Deserialize, Serialize};
use stylemig_source::{Image, CHANNELS};

use crate::{PreprocessError, Result, Tensor};

/// Per-channel (mean, std) applied after scaling bytes to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Normalization {
    /// ImageNet statistics used by torchvision models.
    pub const TORCHVISION: Normalization = Normalization {
        mean: [0.485, 0.456, 0.406],
        std: [0.229, 0.224, 0.225],
    };

    /// Checked constructor: every mean finite, every std finite and > 0.
    pub fn new(mean: [f32; 3], std: [f32; 3]) -> Result<Self> {
        let norm = Self { mean, std };
        norm.validate()?;
        Ok(norm)
    }

    pub fn validate(&self) -> Result<()> {
        for channel in 0..3 {
            let (mean, std) = (self.mean[channel], self.std[channel]);
            if !mean.is_finite() || !std.is_finite() || std <= 0.0 {
                return Err(PreprocessError::InvalidNormalization { channel, mean, std });
            }
        }
        Ok(())
    }

    /// Map a raw byte of `channel` into model space.
    #[inline]
    pub fn apply(&self, channel: usize, value: u8) -> f32 {
        (f32::from(value) / 255.0 - self.mean[channel]) / self.std[channel]
    }

    /// Inverse of [`apply`](Self::apply), back to the `[0, 255]` scale.
    #[inline]
    pub fn invert(&self, channel: usize, value: f32) -> f32 {
        (value * self.std[channel] + self.mean[channel]) * 255.0
    }
}

impl Default for Normalization {
    fn default() -> Self {
        Self::TORCHVISION
    }
}

/// Convert an RGBA image into a channel-major `(3, H, W)` tensor.
///
/// Alpha is dropped.  The image must already be at the model's input
/// size; nothing here resizes.
pub fn encode(image: &Image, norm: &Normalization) -> Tensor {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let mut tensor = Array3::<f32>::zeros((3, h, w));

    for (idx, px) in image.pixels().chunks_exact(CHANNELS).enumerate() {
        let (y, x) = (idx / w, idx % w);
        for c in 0..3 {
            tensor[[c, y, x]] = norm.apply(c, px[c]);
        }
    }
    tensor
}
