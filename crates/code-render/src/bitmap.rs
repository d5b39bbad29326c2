//! Encoded code bitmaps.

use std::fmt;
use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader, ImageResult};

use crate::Result;

/// A PNG-encoded code image with its intrinsic pixel size.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Bitmap {
    /// Encode an image as PNG.
    pub fn from_image(img: &DynamicImage) -> Result<Self> {
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(Self {
            png,
            width: img.width(),
            height: img.height(),
        })
    }

    /// Decode the PNG back into pixels.
    pub fn decode(&self) -> ImageResult<DynamicImage> {
        image::load_from_memory_with_format(&self.png, ImageFormat::Png)
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_bytes", &self.png.len())
            .finish()
    }
}

/// Height/width ratio read from the encoded image header.
///
/// Returns `None` when the bytes cannot be read or the width is zero.
pub fn try_aspect_ratio(bitmap: &Bitmap) -> Option<f32> {
    let (width, height) = ImageReader::new(Cursor::new(&bitmap.png))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()?;
    if width == 0 {
        return None;
    }
    Some(height as f32 / width as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn bitmap(width: u32, height: u32) -> Bitmap {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([255])));
        Bitmap::from_image(&img).unwrap()
    }

    #[test]
    fn from_image_records_dimensions() {
        let b = bitmap(40, 10);
        assert_eq!((b.width, b.height), (40, 10));
        assert!(b.png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn aspect_ratio_is_height_over_width() {
        let ratio = try_aspect_ratio(&bitmap(200, 50)).unwrap();
        assert!((ratio - 0.25).abs() < 1e-6);
    }

    #[test]
    fn corrupt_bytes_have_no_ratio() {
        let broken = Bitmap {
            png: vec![1, 2, 3, 4],
            width: 10,
            height: 10,
        };
        assert!(try_aspect_ratio(&broken).is_none());
        assert!(broken.decode().is_err());
    }

    #[test]
    fn decode_round_trips_size() {
        let img = bitmap(12, 7).decode().unwrap();
        assert_eq!((img.width(), img.height()), (12, 7));
    }
}
