use code_render::Bitmap;
use sheet_layout::CellRect;

/// Horizontal anchor of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    /// `x` is the right edge of the text.
    Right,
}

/// Drawing surface in millimetres with a top-left origin.
///
/// Text is placed by its baseline. The first page exists as soon as the
/// canvas is created; `add_page` starts the next one.
pub trait PageCanvas {
    fn add_page(&mut self);

    /// Rendered width of `text` at `pt`, in millimetres.
    fn text_width(&self, text: &str, pt: f32) -> f32;

    fn text(&mut self, text: &str, pt: f32, x: f32, baseline: f32, align: Align);

    /// Stroke a line in the given gray level (0 = black, 1 = white).
    fn line(&mut self, from: (f32, f32), to: (f32, f32), gray: f32);

    fn rect(&mut self, rect: CellRect, gray: f32);

    /// Place `bitmap` with its top-left corner at (`x`, `top`), scaled to
    /// `width` mm with its aspect ratio kept.
    fn image(&mut self, bitmap: &Bitmap, x: f32, top: f32, width: f32) -> Result<(), String>;
}
