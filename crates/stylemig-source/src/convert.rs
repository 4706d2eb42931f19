// stylemig-source/src/convert.rs
use crate::Image;
use image::RgbaImage;

// `RgbaImage` already guarantees w*h*4 bytes, so no re-validation.
impl From<RgbaImage> for Image {
    fn from(buf: RgbaImage) -> Self {
        let (width, height) = buf.dimensions();
        Image {
            width,
            height,
            pixels: buf.into_raw(),
        }
    }
}

impl Image {
    /// Copy the pixels into an `image::RgbaImage` for display or encoding.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }
}
