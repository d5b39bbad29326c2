//! Page geometry constants (millimetres, origin top-left).

use serde::{Deserialize, Serialize};

/// A4 portrait width.
pub const A4_WIDTH_MM: f32 = 210.0;

/// A4 portrait height.
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Fixed page geometry and search bounds for one export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    /// Outer margin on every side.
    pub margin: f32,
    /// Space reserved under the top margin for the group header.
    pub header_height: f32,
    pub gap_x: f32,
    pub gap_y: f32,
    pub min_columns: u32,
    pub max_columns: u32,
    /// Bounds on the searched cell size (cell width).
    pub min_cell: f32,
    pub max_cell: f32,
    /// Decrement used while shrinking a cell until it fits.
    pub shrink_step: f32,
    /// Cell size used when no column count fits.
    pub fallback_cell: f32,
    /// Inset between the cell border and its content.
    pub cell_padding: f32,
    pub header_font_pt: f32,
}

impl PageGeometry {
    /// A4 sheet for square QR cells with a two-line caption.
    pub fn qr_a4() -> Self {
        Self {
            page_width: A4_WIDTH_MM,
            page_height: A4_HEIGHT_MM,
            margin: 8.0,
            header_height: 12.0,
            gap_x: 3.0,
            gap_y: 4.0,
            min_columns: 3,
            max_columns: 6,
            min_cell: 22.0,
            max_cell: 70.0,
            shrink_step: 1.0,
            fallback_cell: 32.0,
            cell_padding: 2.0,
            header_font_pt: 16.0,
        }
    }

    /// A4 sheet for wide barcode cells with the caption above the code.
    pub fn barcode_a4() -> Self {
        Self {
            page_width: A4_WIDTH_MM,
            page_height: A4_HEIGHT_MM,
            margin: 7.0,
            header_height: 10.0,
            gap_x: 4.0,
            gap_y: 5.0,
            min_columns: 3,
            max_columns: 4,
            min_cell: 42.0,
            max_cell: 66.0,
            shrink_step: 1.0,
            fallback_cell: 60.0,
            cell_padding: 2.0,
            header_font_pt: 14.0,
        }
    }

    /// Drawable width between the side margins.
    pub fn available_width(&self) -> f32 {
        self.page_width - self.margin * 2.0
    }

    /// Drawable height below the header and above the bottom margin.
    pub fn available_height(&self) -> f32 {
        self.page_height - (self.margin + self.header_height) - self.margin
    }

    /// Top-left corner of the first cell.
    pub fn origin(&self) -> (f32, f32) {
        (self.margin, self.margin + self.header_height)
    }

    /// Baseline of the header text.
    pub fn header_baseline(&self) -> f32 {
        self.margin
    }

    /// Vertical position of the rule under the header.
    pub fn header_rule_y(&self) -> f32 {
        self.margin + 2.0
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::qr_a4()
    }
}
