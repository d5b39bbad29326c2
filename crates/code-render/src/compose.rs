//! Image composition: paste, stack and pad grayscale bitmaps.

use image::{GrayImage, Luma};

const WHITE: Luma<u8> = Luma([255]);

/// Copy `top` onto `base` with its top-left corner at (`x`, `y`).
///
/// Offsets may be negative; anything outside `base` is clipped.
pub fn paste(base: &mut GrayImage, top: &GrayImage, x: i64, y: i64) {
    for (dx, dy, pixel) in top.enumerate_pixels() {
        let target_x = x + i64::from(dx);
        let target_y = y + i64::from(dy);
        if target_x >= 0
            && target_y >= 0
            && target_x < i64::from(base.width())
            && target_y < i64::from(base.height())
        {
            base.put_pixel(target_x as u32, target_y as u32, *pixel);
        }
    }
}

/// Concatenate images vertically (top to bottom), centred horizontally.
///
/// The output width equals the maximum width; the background is white.
pub fn concat_vertical(images: &[GrayImage]) -> GrayImage {
    if images.is_empty() {
        return GrayImage::from_pixel(1, 1, WHITE);
    }

    let max_width = images.iter().map(|i| i.width()).max().unwrap_or(1);
    let total_height: u32 = images.iter().map(|i| i.height()).sum();

    let mut result = GrayImage::from_pixel(max_width, total_height.max(1), WHITE);

    let mut y_offset = 0i64;
    for img in images {
        let x = i64::from((max_width - img.width()) / 2);
        paste(&mut result, img, x, y_offset);
        y_offset += i64::from(img.height());
    }

    result
}

/// Surround an image with a white border of `margin` pixels.
pub fn pad(img: &GrayImage, margin: u32) -> GrayImage {
    let mut result = GrayImage::from_pixel(
        img.width() + margin * 2,
        img.height() + margin * 2,
        WHITE,
    );
    paste(&mut result, img, i64::from(margin), i64::from(margin));
    result
}
