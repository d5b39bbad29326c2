//! printpdf-backed [`PageCanvas`].

use std::io::Cursor;

use code_render::{Bitmap, visual_text};
use code_render::text::text_width_mm;
use printpdf::{
    Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef, Line, Mm,
    PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Px, Rgb,
};
use sheet_layout::{CellRect, PageGeometry};

use super::canvas::{Align, PageCanvas};
use crate::error::ExportError;
use crate::font::CaptionFont;

const LAYER_NAME: &str = "Codes";
const LINE_THICKNESS: f32 = 0.3;

/// A PDF under construction, always positioned on its last page.
pub struct PageDocument {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    caption_font: CaptionFont,
    page_width: f32,
    page_height: f32,
    pages: usize,
}

impl PageDocument {
    /// Create a document with one empty page and the caption font embedded.
    pub fn new(title: &str, geometry: &PageGeometry, caption_font: &CaptionFont) -> Result<Self, ExportError> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(geometry.page_width),
            Mm(geometry.page_height),
            LAYER_NAME,
        );
        let font = doc
            .add_external_font(Cursor::new(caption_font.bytes().to_vec()))
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            font,
            caption_font: caption_font.clone(),
            page_width: geometry.page_width,
            page_height: geometry.page_height,
            pages: 1,
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Serialize the finished document.
    pub fn finish(self) -> Result<Vec<u8>, ExportError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| ExportError::Pdf(e.to_string()))
    }

    /// Page coordinates grow upwards from the bottom edge.
    fn flip(&self, y: f32) -> Mm {
        Mm(self.page_height - y)
    }

    fn stroke(&self, points: &[(f32, f32)], closed: bool, gray: f32) {
        let gray = gray.clamp(0.0, 1.0);
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(gray, gray, gray, None)));
        self.layer.set_outline_thickness(LINE_THICKNESS);
        let points = points
            .iter()
            .map(|&(x, y)| (Point::new(Mm(x), self.flip(y)), false))
            .collect();
        self.layer.add_line(Line {
            points,
            is_closed: closed,
        });
    }
}

impl PageCanvas for PageDocument {
    fn add_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(self.page_width), Mm(self.page_height), LAYER_NAME);
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.pages += 1;
    }

    fn text_width(&self, text: &str, pt: f32) -> f32 {
        text_width_mm(self.caption_font.glyphs(), &visual_text(text), pt)
    }

    fn text(&mut self, text: &str, pt: f32, x: f32, baseline: f32, align: Align) {
        if text.is_empty() {
            return;
        }
        // glyphs are placed in string order, so draw the shaped visual form
        let visual = visual_text(text);
        let x = match align {
            Align::Left => x,
            Align::Right => x - text_width_mm(self.caption_font.glyphs(), &visual, pt),
        };
        self.layer
            .use_text(visual, pt, Mm(x), self.flip(baseline), &self.font);
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), gray: f32) {
        self.stroke(&[from, to], false, gray);
    }

    fn rect(&mut self, rect: CellRect, gray: f32) {
        self.stroke(
            &[
                (rect.x, rect.y),
                (rect.right(), rect.y),
                (rect.right(), rect.bottom()),
                (rect.x, rect.bottom()),
            ],
            true,
            gray,
        );
    }

    fn image(&mut self, bitmap: &Bitmap, x: f32, top: f32, width: f32) -> Result<(), String> {
        if bitmap.width == 0 || width <= 0.0 {
            return Err("empty bitmap".into());
        }
        let rgb = bitmap.decode().map_err(|e| e.to_string())?.to_rgb8();
        let (px_w, px_h) = rgb.dimensions();

        // dpi chosen so the bitmap spans exactly `width` mm
        let dpi = px_w as f32 / (width / 25.4);
        let height = px_h as f32 / dpi * 25.4;

        let image = Image::from(ImageXObject {
            width: Px(px_w as usize),
            height: Px(px_h as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: false,
            image_data: rgb.into_raw(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });
        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(self.flip(top + height)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
        Ok(())
    }
}
