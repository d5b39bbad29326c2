//! Pixel-exact resizing for code bitmaps.

use image::GrayImage;
use image::imageops::{self, FilterType};
use tracing::debug;

/// Resize a square code image to `side`×`side` pixels.
///
/// Uses nearest-neighbour filtering so module edges stay sharp for
/// scanners. Returns a copy unchanged if it already has the target size.
pub fn scale_to_square(img: &GrayImage, side: u32) -> GrayImage {
    let side = side.max(1);
    if img.width() == side && img.height() == side {
        debug!(side, "Code already at target size, skipping resize");
        return img.clone();
    }

    debug!(
        orig_w = img.width(),
        orig_h = img.height(),
        side,
        "Resizing code image"
    );

    imageops::resize(img, side, side, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn scales_up_to_side() {
        let img = GrayImage::from_pixel(21, 21, Luma([0]));
        let out = scale_to_square(&img, 200);
        assert_eq!(out.dimensions(), (200, 200));
    }

    #[test]
    fn keeps_pixels_binary() {
        let mut img = GrayImage::from_pixel(2, 2, Luma([255]));
        img.put_pixel(0, 0, Luma([0]));
        let out = scale_to_square(&img, 7);
        assert!(out.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn zero_side_becomes_one() {
        let img = GrayImage::new(5, 5);
        assert_eq!(scale_to_square(&img, 0).dimensions(), (1, 1));
    }
}
