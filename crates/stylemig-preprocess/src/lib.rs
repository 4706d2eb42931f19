//! stylemig‑preprocess – resize + normalize RGBA images into model tensors.
//!
//! Two pure stages live here:
//!
//! * [`resize`] – triangle-filtered rescale to the model's input size.
//! * [`encode`] – per-channel `(v/255 - mean) / std`, packed channel-major
//!   into a `(3, H, W)` [`Tensor`].
//!
//! [`Preprocessor`] chains them for callers that only want a tensor.

use ndarray::Array3;
use stylemig_source::Image;
use thiserror::Error;

mod normalize;
mod scale;

pub use normalize::{encode, Normalization};
pub use scale::resize;

/// Model input tensor, shape `(3, H, W)`, standard layout.
///
/// Because the array is C-contiguous, `as_slice()` yields the R block,
/// then G, then B, each row-major.
pub type Tensor = Array3<f32>;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("invalid source image {width}x{height}: scale factor undefined")]
    InvalidImage { width: u32, height: u32 },
    #[error("invalid resize target {width}x{height}")]
    InvalidTarget { width: u32, height: u32 },
    #[error("resampling failed: {0:?}")]
    Resize(resize::Error),
    #[error("invalid normalization for channel {channel}: mean {mean}, std {std}")]
    InvalidNormalization { channel: usize, mean: f32, std: f32 },
}

pub type Result<T> = std::result::Result<T, PreprocessError>;

impl From<resize::Error> for PreprocessError {
    fn from(err: resize::Error) -> Self {
        PreprocessError::Resize(err)
    }
}

#[derive(Clone, Debug)]
pub struct Preprocessor {
    dst_w: u32,
    dst_h: u32,
    norm: Normalization,
}

impl Preprocessor {
    /// Create a pre‑processor that outputs a normalized 3×H×W tensor.
    pub fn new(dst_w: u32, dst_h: u32, norm: Normalization) -> Self {
        Self { dst_w, dst_h, norm }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.dst_w, self.dst_h)
    }

    pub fn normalization(&self) -> &Normalization {
        &self.norm
    }

    /// Resize then encode.
    pub fn run(&self, image: &Image) -> Result<Tensor> {
        let resized = resize(image, self.dst_w, self.dst_h)?;
        Ok(encode(&resized, &self.norm))
    }
}
