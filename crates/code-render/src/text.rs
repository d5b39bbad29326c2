//! Caption text measurement, wrapping and bitmap drawing.
//!
//! Measurements come in two flavours: pixels at a [`PxScale`] for text drawn
//! into code bitmaps, and millimetres at a point size for captions placed on
//! PDF pages.

use ab_glyph::{Font, PxScale, ScaleFont};
use image::{GrayImage, Luma};
use imageproc::drawing::draw_text_mut;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Measure the pixel width of a string at the given font and scale.
pub fn measure_text_width<F: Font>(font: &F, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width.ceil() as u32
}

/// Compute the line height for the given font and scale.
pub fn line_height<F: Font>(font: &F, scale: PxScale) -> u32 {
    let scaled = font.as_scaled(scale);
    (scaled.ascent() - scaled.descent() + scaled.line_gap()).ceil() as u32
}

/// Width of `text` in millimetres when set at `pt` points.
///
/// Uses unscaled advances and kerning in font units, so the result matches
/// what a PDF viewer lays out for the embedded font.
pub fn text_width_mm<F: Font>(font: &F, text: &str, pt: f32) -> f32 {
    let units_per_em = font.units_per_em().unwrap_or(1000.0);
    let mut units = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            units += font.kern_unscaled(prev, glyph_id);
        }
        units += font.h_advance_unscaled(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    units / units_per_em * pt * MM_PER_PT
}

/// Draw text horizontally centred on a grayscale image.
pub fn draw_centered_text<F: Font>(
    img: &mut GrayImage,
    font: &F,
    scale: PxScale,
    y: i32,
    text: &str,
    color: Luma<u8>,
) {
    let text_width = measure_text_width(font, scale, text) as i32;
    let x = ((img.width() as i32) - text_width).max(0) / 2;
    draw_text_mut(img, color, x, y, scale, font, text);
}

/// Wrap text to fit within `max_width`, as reported by `measure`.
///
/// Words are split on whitespace; a single word wider than the limit is
/// broken character by character. Always returns at least one line.
pub fn wrap_text<M>(text: &str, max_width: f32, measure: M) -> Vec<String>
where
    M: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0.0f32;

    for word in text.split_inclusive(|c: char| c.is_whitespace()) {
        let word_width = measure(word);

        if current_width + word_width > max_width && !current_line.is_empty() {
            lines.push(current_line.trim_end().to_string());
            current_line = String::new();
            current_width = 0.0;
        }

        if word_width > max_width && current_line.is_empty() {
            let mut char_line = String::new();
            let mut char_width = 0.0f32;
            for ch in word.chars() {
                let ch_w = measure(ch.encode_utf8(&mut [0u8; 4]));
                if char_width + ch_w > max_width && !char_line.is_empty() {
                    lines.push(char_line);
                    char_line = String::new();
                    char_width = 0.0;
                }
                char_line.push(ch);
                char_width += ch_w;
            }
            current_line = char_line;
            current_width = char_width;
            continue;
        }

        current_line.push_str(word);
        current_width += word_width;
    }

    if !current_line.trim_end().is_empty() {
        lines.push(current_line.trim_end().to_string());
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// First line of `text` wrapped to `max_width`; the rest is clipped.
pub fn first_line<M>(text: &str, max_width: f32, measure: M) -> String
where
    M: Fn(&str) -> f32,
{
    wrap_text(text, max_width, measure)
        .into_iter()
        .next()
        .unwrap_or_default()
}
