//! QR code rendering.

use image::{DynamicImage, GrayImage, Luma};
use qrcode::{EcLevel, QrCode};

use crate::compose;
use crate::resize::scale_to_square;
use crate::{RenderError, Result};

/// Smallest side of the code itself, regardless of margin.
pub const MIN_INNER_SIZE: u32 = 64;

/// Pixels of margin per margin unit on each side.
const MARGIN_UNIT_PX: u32 = 10;

/// QR error-correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QrEcLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl From<QrEcLevel> for EcLevel {
    fn from(level: QrEcLevel) -> Self {
        match level {
            QrEcLevel::L => EcLevel::L,
            QrEcLevel::M => EcLevel::M,
            QrEcLevel::Q => EcLevel::Q,
            QrEcLevel::H => EcLevel::H,
        }
    }
}

impl std::str::FromStr for QrEcLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(QrEcLevel::L),
            "M" => Ok(QrEcLevel::M),
            "Q" => Ok(QrEcLevel::Q),
            "H" => Ok(QrEcLevel::H),
            other => Err(format!("unknown error-correction level '{other}'")),
        }
    }
}

/// QR rendering options.
#[derive(Debug, Clone)]
pub struct QrOptions {
    /// Side of the output image in pixels.
    pub size: u32,
    /// Margin in units of 10px on each side.
    pub margin: u32,
    pub ec_level: QrEcLevel,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            size: 256,
            margin: 2,
            ec_level: QrEcLevel::M,
        }
    }
}

impl QrOptions {
    /// Side of the code inside the white canvas.
    pub fn inner_size(&self) -> u32 {
        self.size
            .saturating_sub(self.margin * 2 * MARGIN_UNIT_PX)
            .max(MIN_INNER_SIZE)
    }
}

/// Generate a QR code image for `data`.
///
/// Returns a grayscale image of exactly `size`×`size` pixels: white canvas
/// with the code centred. A code larger than the canvas is clipped evenly.
pub fn generate_qr(data: &str, options: &QrOptions) -> Result<DynamicImage> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), options.ec_level.into())
        .map_err(|e| RenderError::Qr {
            data: data.to_string(),
            reason: e.to_string(),
        })?;
    let modules = code.to_colors();
    let module_count = code.width() as u32;

    let inner = options.inner_size();
    let scale = (inner / module_count).max(1);
    let img_size = module_count * scale;

    let mut img = GrayImage::from_pixel(img_size, img_size, Luma([255u8]));

    for (i, color) in modules.iter().enumerate() {
        let x = (i as u32) % module_count;
        let y = (i as u32) / module_count;

        if *color == qrcode::Color::Dark {
            for dx in 0..scale {
                for dy in 0..scale {
                    img.put_pixel(x * scale + dx, y * scale + dy, Luma([0u8]));
                }
            }
        }
    }

    let code_img = scale_to_square(&img, inner);

    let size = options.size.max(1);
    let mut canvas = GrayImage::from_pixel(size, size, Luma([255u8]));
    let offset = (i64::from(size) - i64::from(inner)) / 2;
    compose::paste(&mut canvas, &code_img, offset, offset);

    Ok(DynamicImage::ImageLuma8(canvas))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_qr_matches_requested_size() {
        let img = generate_qr("1234567890", &QrOptions::default()).unwrap();
        assert_eq!(img.width(), 256);
        assert_eq!(img.height(), 256);
    }

    #[test]
    fn margin_is_left_white() {
        let img = generate_qr("1234567890", &QrOptions::default())
            .unwrap()
            .to_luma8();
        // 2 margin units = 20px on each side
        for i in 0..20 {
            assert_eq!(img.get_pixel(i, i)[0], 255);
        }
    }

    #[test]
    fn inner_size_never_below_minimum() {
        let options = QrOptions {
            size: 80,
            margin: 4,
            ec_level: QrEcLevel::L,
        };
        assert_eq!(options.inner_size(), MIN_INNER_SIZE);
    }

    #[test]
    fn small_canvas_clips_code() {
        let options = QrOptions {
            size: 40,
            margin: 0,
            ec_level: QrEcLevel::M,
        };
        let img = generate_qr("abc", &options).unwrap();
        assert_eq!(img.width(), 40);
    }

    #[test]
    fn ec_level_parses() {
        assert_eq!("h".parse::<QrEcLevel>().unwrap(), QrEcLevel::H);
        assert!("X".parse::<QrEcLevel>().is_err());
    }
}
