// stylemig-source/src/lib.rs
// ============================================================
// Image source crate for stylemig
// Decodes PNG/JPEG assets into a flat RGBA8 buffer that every
// later stage (resize, encode, decode) agrees on.
// ------------------------------------------------------------
// Public API:
//   * load_image(path)        – decode a file into an Image
//   * Image::from_encoded()   – decode in-memory bytes
//   * Image::to_rgba_image()  – hand pixels back to `image`
// ============================================================

//! stylemig – image source layer
//!
//! An [`Image`] is width, height and a row-major RGBA8 buffer with no
//! padding.  The constructor enforces `pixels.len() == w * h * 4`, so
//! every stage downstream can index the buffer without re-checking.
//! Zero-sized images are representable on purpose: rejecting them is the
//! resizer's job, not the container's.

use std::path::{Path, PathBuf};
use thiserror::Error;

mod convert;

/// Bytes per RGBA8 pixel.
pub const CHANNELS: usize = 4;

/// Fully opaque alpha value.
pub const OPAQUE: u8 = 255;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("pixel buffer holds {actual} bytes, {width}x{height} RGBA needs {expected}")]
    BufferLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("image dimensions {width}x{height} overflow the address space")]
    TooLarge { width: u32, height: u32 },
    #[error("failed to load image from {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to decode image bytes: {0}")]
    Decode(#[source] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ImageError>;

/// Decoded RGBA8 image, row-major, 4 interleaved channels per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Image {
    /// Wrap an existing RGBA8 buffer.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = buffer_len(width, height)?;
        if pixels.len() != expected {
            return Err(ImageError::BufferLength {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Image where every pixel holds the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let len = buffer_len(width, height)?;
        let pixels = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self { width, height, pixels })
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> [u8; 4],
    {
        let mut pixels = Vec::with_capacity(buffer_len(width, height)?);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }
        Ok(Self { width, height, pixels })
    }

    /// Decode a PNG/JPEG byte stream.
    pub fn from_encoded(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes).map_err(ImageError::Decode)?;
        Ok(Self::from(decoded.to_rgba8()))
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

    /// True when either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value at (x, y), `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let base = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let px = &self.pixels[base..base + CHANNELS];
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Decode an image file from disk into RGBA8.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Image> {
    let path = path.as_ref();
    let decoded = image::open(path).map_err(|source| ImageError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let image = Image::from(decoded.to_rgba8());
    log::debug!(
        "loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

fn buffer_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(ImageError::TooLarge { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_buffer() {
        let err = Image::new(2, 2, vec![0; 15]).unwrap_err();
        match err {
            ImageError::BufferLength { expected, actual, .. } => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 15);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn zero_sized_image_is_representable() {
        let img = Image::new(0, 7, Vec::new()).unwrap();
        assert!(img.is_empty());
        assert_eq!(img.dimensions(), (0, 7));
    }

    #[test]
    fn pixel_addressing_is_row_major() {
        let img = Image::from_fn(3, 2, |x, y| [x as u8, y as u8, 9, OPAQUE]).unwrap();
        assert_eq!(img.pixels().len(), 3 * 2 * 4);
        assert_eq!(img.pixel(2, 1), Some([2, 1, 9, 255]));
        // second row starts after three pixels
        assert_eq!(&img.pixels()[12..16], &[0, 1, 9, 255]);
        assert_eq!(img.pixel(3, 0), None);
    }

    #[test]
    fn filled_repeats_value() {
        let img = Image::filled(4, 4, [128, 128, 128, 255]).unwrap();
        assert!(img.pixels().chunks_exact(4).all(|p| p == [128, 128, 128, 255]));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = Image::from_encoded(b"definitely not a png").unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
    }
}
