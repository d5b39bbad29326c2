//! Code128 barcode rendering.

use ab_glyph::{FontArc, PxScale};
use barcoders::sym::code128::Code128;
use image::{DynamicImage, GrayImage, Luma};
use tracing::warn;

use crate::compose;
use crate::text;
use crate::{RenderError, Result};

/// Quiet zone around the symbol, in pixels. Laser scanners need it.
pub const QUIET_ZONE: u32 = 10;

/// Pixel size of the human-readable line.
pub const TEXT_SIZE: f32 = 14.0;

/// Gap between bars and the human-readable line.
const TEXT_MARGIN: u32 = 2;

/// Code128 character set B selector (printable ASCII).
const CHARSET_B: char = 'Ɓ';

/// Code128 character set C selector (digit pairs).
const CHARSET_C: char = 'Ć';

/// Barcode rendering options.
#[derive(Debug, Clone)]
pub struct BarcodeOptions {
    /// Width of one module in pixels.
    pub bar_width: u32,
    /// Height of the bars in pixels.
    pub bar_height: u32,
    /// Print the encoded value under the bars.
    pub show_text: bool,
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self {
            bar_width: 2,
            bar_height: 60,
            show_text: true,
        }
    }
}

/// Prefix `data` with the character sets to encode it in.
///
/// Digit-only values use set C, two digits per symbol; an odd leading digit
/// goes out in set B before switching. Everything else uses set B.
pub fn select_charsets(data: &str) -> String {
    let digits_only = data.len() >= 2 && data.bytes().all(|b| b.is_ascii_digit());
    if !digits_only {
        return format!("{CHARSET_B}{data}");
    }
    if data.len() % 2 == 0 {
        format!("{CHARSET_C}{data}")
    } else {
        let (head, pairs) = data.split_at(1);
        format!("{CHARSET_B}{head}{CHARSET_C}{pairs}")
    }
}

/// Encode `data` as Code128 modules (1 = bar).
pub fn encode_modules(data: &str) -> Result<Vec<u8>> {
    let symbol = Code128::new(select_charsets(data)).map_err(|e| RenderError::Barcode {
        data: data.to_string(),
        reason: e.to_string(),
    })?;
    Ok(symbol.encode())
}

/// Generate a Code128 barcode image for `data`.
///
/// The human-readable line needs a font; without one it is left out and
/// only the bars are drawn.
pub fn generate_barcode(
    data: &str,
    options: &BarcodeOptions,
    font: Option<&FontArc>,
) -> Result<DynamicImage> {
    let modules = encode_modules(data)?;
    let bar_width = options.bar_width.max(1);
    let bar_height = options.bar_height.max(1);

    let mut bars = GrayImage::from_pixel(
        modules.len() as u32 * bar_width,
        bar_height,
        Luma([255u8]),
    );
    for (i, module) in modules.iter().enumerate() {
        if *module == 1 {
            let x0 = i as u32 * bar_width;
            for x in x0..x0 + bar_width {
                for y in 0..bar_height {
                    bars.put_pixel(x, y, Luma([0u8]));
                }
            }
        }
    }

    let symbol = match (options.show_text, font) {
        (true, Some(font)) => {
            let scale = PxScale::from(TEXT_SIZE);
            let lh = text::line_height(font, scale);
            let mut caption = GrayImage::from_pixel(bars.width(), lh + TEXT_MARGIN, Luma([255u8]));
            text::draw_centered_text(
                &mut caption,
                font,
                scale,
                TEXT_MARGIN as i32,
                data,
                Luma([0u8]),
            );
            compose::concat_vertical(&[bars, caption])
        }
        (true, None) => {
            warn!(data, "No caption font available, barcode text omitted");
            bars
        }
        (false, _) => bars,
    };

    Ok(DynamicImage::ImageLuma8(compose::pad(&symbol, QUIET_ZONE)))
}
