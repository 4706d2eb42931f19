use ::resize::{new, Pixel, Type};
use rgb::FromSlice;
use stylemig_source::{Image, CHANNELS};

use crate::{PreprocessError, Result};

/// Rescale `image` to exactly `dst_w`×`dst_h` with a triangle (bilinear) filter.
///
/// Horizontal and vertical factors are independent, so aspect ratio is
/// not preserved.  Alpha is filtered as a plain channel (no premultiply).
pub fn resize(image: &Image, dst_w: u32, dst_h: u32) -> Result<Image> {
    let (src_w, src_h) = image.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(PreprocessError::InvalidImage {
            width: src_w,
            height: src_h,
        });
    }
    if dst_w == 0 || dst_h == 0 {
        return Err(PreprocessError::InvalidTarget {
            width: dst_w,
            height: dst_h,
        });
    }

    let sx = dst_w as f32 / src_w as f32;
    let sy = dst_h as f32 / src_h as f32;
    log::debug!("resize {src_w}x{src_h} -> {dst_w}x{dst_h} (sx={sx:.4}, sy={sy:.4})");

    if (src_w, src_h) == (dst_w, dst_h) {
        return Ok(image.clone());
    }

    let mut dst = vec![0u8; dst_w as usize * dst_h as usize * CHANNELS];

    let mut resizer = new(
        src_w as usize,
        src_h as usize,
        dst_w as usize,
        dst_h as usize,
        Pixel::RGBA8,
        Type::Triangle,
    )?;
    resizer.resize(image.pixels().as_rgba(), dst.as_rgba_mut())?;

    // buffer was sized from dst_w/dst_h above, so this cannot mismatch
    Image::new(dst_w, dst_h, dst).map_err(|_| PreprocessError::InvalidTarget {
        width: dst_w,
        height: dst_h,
    })
}
