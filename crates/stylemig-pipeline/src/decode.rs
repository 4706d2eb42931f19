//! Range normalizer: arbitrary float buffer → grayscale RGBA image.

use stylemig_source::{Image, CHANNELS, OPAQUE};
use thiserror::Error;

/// Gray level used when the buffer has no spread (max == min).
pub const FLAT_GRAY: u8 = 0;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("output buffer holds {actual} values, {width}x{height} needs {expected}")]
    ShapeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("cannot decode into a {width}x{height} image")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Smallest and largest finite value, `None` if there is none.
pub fn value_range(buffer: &[f32]) -> Option<(f32, f32)> {
    buffer
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Min-max rescale `buffer` into a `width`×`height` grayscale image.
///
/// Each value lands in R, G and B of its pixel, alpha is opaque.  A
/// buffer with no spread decodes to [`FLAT_GRAY`] instead of dividing by
/// zero; `+inf` still renders white there.
pub fn decode(buffer: &[f32], width: u32, height: u32) -> Result<Image, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }
    let expected = width as usize * height as usize;
    if buffer.len() != expected {
        return Err(DecodeError::ShapeMismatch {
            width,
            height,
            expected,
            actual: buffer.len(),
        });
    }

    let mut pixels = Vec::with_capacity(expected * CHANNELS);
    match value_range(buffer) {
        Some((min, max)) if max > min => {
            let (min, delta) = (f64::from(min), f64::from(max) - f64::from(min));
            for &v in buffer {
                let g = intensity(f64::from(v), min, delta);
                pixels.extend_from_slice(&[g, g, g, OPAQUE]);
            }
        }
        _ => {
            log::warn!("output buffer has no spread, rendering flat gray");
            for &v in buffer {
                let g = if v == f32::INFINITY { u8::MAX } else { FLAT_GRAY };
                pixels.extend_from_slice(&[g, g, g, OPAQUE]);
            }
        }
    }

    Image::new(width, height, pixels).map_err(|_| DecodeError::InvalidDimensions { width, height })
}

// NaN falls through the saturating cast as 0; infinities clamp.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn intensity(v: f64, min: f64, delta: f64) -> u8 {
    ((v - min) / delta * 255.0).round().clamp(0.0, 255.0) as u8
}
