use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbImage};

use crate::imaging::domain::image_codec::{CodecError, ImageCodec};
use crate::shared::crop_region::CropRegion;
use crate::shared::frame::Frame;

/// Decodes JPEG/PNG/WebP uploads and renders PNG headshots with the
/// `image` crate.
pub struct ImageCrateCodec {
    filter: FilterType,
}

impl ImageCrateCodec {
    pub fn new() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }
}

impl Default for ImageCrateCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCodec for ImageCrateCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Frame, CodecError> {
        let img = image::load_from_memory(bytes)?.to_rgb8();
        let (width, height) = img.dimensions();
        Ok(Frame::new(img.into_raw(), width, height))
    }

    fn render(
        &self,
        frame: &Frame,
        crop: CropRegion,
        target_size: u32,
    ) -> Result<Vec<u8>, CodecError> {
        if crop.size == 0 || !crop.fits_within(frame.width(), frame.height()) {
            return Err(format!(
                "crop {}x{} at ({}, {}) does not fit a {}x{} image",
                crop.size,
                crop.size,
                crop.left,
                crop.top,
                frame.width(),
                frame.height()
            )
            .into());
        }

        let img = RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;
        let square = imageops::crop_imm(&img, crop.left, crop.top, crop.size, crop.size).to_image();
        let resized = imageops::resize(&square, target_size, target_size, self.filter);

        let mut out = Cursor::new(Vec::new());
        resized.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let mut img = RgbImage::new(width, height);
        for (x, _y, pixel) in img.enumerate_pixels_mut() {
            *pixel = if x < width / 2 {
                image::Rgb([200, 20, 20])
            } else {
                image::Rgb([20, 20, 200])
            };
        }
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_reports_dimensions() {
        let codec = ImageCrateCodec::new();
        let frame = codec.decode(&encoded(120, 80, ImageFormat::Png)).unwrap();
        assert_eq!(frame.width(), 120);
        assert_eq!(frame.height(), 80);
        assert_eq!(&frame.data()[..3], &[200, 20, 20]);
    }

    #[test]
    fn test_decode_jpeg() {
        let codec = ImageCrateCodec::new();
        let frame = codec.decode(&encoded(64, 48, ImageFormat::Jpeg)).unwrap();
        assert_eq!((frame.width(), frame.height()), (64, 48));
    }

    #[test]
    fn test_decode_garbage_is_error() {
        assert!(ImageCrateCodec::new().decode(b"not an image").is_err());
    }

    #[test]
    fn test_render_produces_square_png() {
        let codec = ImageCrateCodec::new();
        let frame = codec.decode(&encoded(120, 80, ImageFormat::Png)).unwrap();
        let png = codec
            .render(&frame, CropRegion::new(20, 0, 80), 50)
            .unwrap();

        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
        let out = image::load_from_memory(&png).unwrap();
        assert_eq!((out.width(), out.height()), (50, 50));
    }

    #[test]
    fn test_render_takes_pixels_from_crop() {
        let codec = ImageCrateCodec::new().with_filter(FilterType::Nearest);
        let frame = codec.decode(&encoded(100, 50, ImageFormat::Png)).unwrap();
        // Right half only: every output pixel is blue
        let png = codec.render(&frame, CropRegion::new(50, 0, 50), 10).unwrap();
        let out = image::load_from_memory(&png).unwrap().to_rgb8();
        assert!(out.pixels().all(|p| p.0 == [20, 20, 200]));
    }

    #[test]
    fn test_render_rejects_crop_outside_frame() {
        let codec = ImageCrateCodec::new();
        let frame = Frame::new(vec![0; 10 * 10 * 3], 10, 10);
        assert!(codec.render(&frame, CropRegion::new(5, 0, 6), 4).is_err());
        assert!(codec.render(&frame, CropRegion::new(0, 0, 0), 4).is_err());
    }
}
