//! Grid search for the largest cell that fits a page quota.
//!
//! For every column count from `max_columns` down to `min_columns` the cell
//! starts at the widest size the page allows and shrinks until the rows
//! needed for the quota fit vertically. The biggest cell wins; on equal
//! size the denser grid (more columns) wins. When nothing fits, a fixed
//! fallback plan is returned instead of an error.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geometry::PageGeometry;

/// Slack allowed when comparing accumulated float sizes with the page.
const FIT_TOLERANCE: f32 = 0.001;

/// Height of the two caption lines above a barcode.
pub const WIDE_CAPTION_HEIGHT: f32 = 10.0;

/// Space between the caption and the barcode.
pub const WIDE_CAPTION_GAP: f32 = 2.0;

/// Height/width ratio assumed when a barcode image cannot be read.
pub const DEFAULT_ASPECT_RATIO: f32 = 0.30;

/// What one cell holds, which decides how tall it is for a given width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellShape {
    /// Square code with name and ID lines below it.
    SquareWithCaption,
    /// Wide code with name and class lines above it.
    WideWithCaption { aspect_ratio: f32 },
}

impl CellShape {
    /// Wide shape with a sanitised ratio (non-positive or NaN → default).
    pub fn wide(aspect_ratio: f32) -> Self {
        let aspect_ratio = if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            aspect_ratio
        } else {
            DEFAULT_ASPECT_RATIO
        };
        CellShape::WideWithCaption { aspect_ratio }
    }

    /// Width of the code image inside a cell of width `size`.
    pub fn image_width(&self, size: f32, padding: f32) -> f32 {
        size - padding * 2.0
    }

    /// Cell height for a cell of width `size`.
    pub fn cell_height(&self, size: f32, padding: f32) -> f32 {
        match self {
            CellShape::SquareWithCaption => size + caption_tier(size).text_height,
            CellShape::WideWithCaption { aspect_ratio } => {
                padding
                    + WIDE_CAPTION_HEIGHT
                    + WIDE_CAPTION_GAP
                    + self.image_width(size, padding) * aspect_ratio
                    + padding
            }
        }
    }
}

/// Caption font sizes and line positions for a square cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionTier {
    pub name_pt: f32,
    pub id_pt: f32,
    /// Space both lines take under the code.
    pub text_height: f32,
    /// Baseline of the name, measured from the bottom of the code.
    pub name_baseline: f32,
    /// Baseline of the ID, measured from the bottom of the code.
    pub id_baseline: f32,
}

/// Caption tier for a square cell of side `size` mm.
pub fn caption_tier(size: f32) -> CaptionTier {
    if size <= 28.0 {
        CaptionTier {
            name_pt: 7.0,
            id_pt: 6.0,
            text_height: 7.0 + 5.0,
            name_baseline: 4.5,
            id_baseline: 8.2,
        }
    } else if size <= 38.0 {
        CaptionTier {
            name_pt: 8.0,
            id_pt: 7.0,
            text_height: 8.0 + 5.0,
            name_baseline: 5.2,
            id_baseline: 9.0,
        }
    } else {
        CaptionTier {
            name_pt: 9.0,
            id_pt: 8.0,
            text_height: 8.0 + 6.0,
            name_baseline: 5.2,
            id_baseline: 9.0,
        }
    }
}

/// The chosen grid for a run of pages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub columns: u32,
    pub cell_width: f32,
    pub cell_height: f32,
    /// Rows that actually fit with the chosen cell height.
    pub rows_per_page: u32,
    pub items_per_page: u32,
    pub shape: CellShape,
    /// True when no candidate fitted and the fixed fallback was used.
    pub fallback: bool,
}

impl LayoutPlan {
    fn new(columns: u32, size: f32, shape: CellShape, geometry: &PageGeometry, fallback: bool) -> Self {
        let cell_height = shape.cell_height(size, geometry.cell_padding);
        let rows_per_page = rows_per_page(cell_height, geometry);
        Self {
            columns,
            cell_width: size,
            cell_height,
            rows_per_page,
            items_per_page: rows_per_page * columns,
            shape,
            fallback,
        }
    }

    /// Width of the code image drawn in each cell.
    pub fn image_width(&self, geometry: &PageGeometry) -> f32 {
        self.shape.image_width(self.cell_width, geometry.cell_padding)
    }

    /// Total grid width for `columns` cells.
    pub fn grid_width(&self, geometry: &PageGeometry) -> f32 {
        span(self.columns, self.cell_width, geometry.gap_x)
    }

    /// Total grid height for a full page.
    pub fn grid_height(&self, geometry: &PageGeometry) -> f32 {
        span(self.rows_per_page, self.cell_height, geometry.gap_y)
    }
}

/// Choose columns and cell size so `quota` items fit on one page.
pub fn compute_layout(quota: u32, geometry: &PageGeometry, shape: CellShape) -> LayoutPlan {
    let quota = quota.max(1);
    let min_cols = geometry.min_columns.max(1);
    let max_cols = geometry.max_columns;

    let mut best: Option<(u32, f32)> = None;

    for cols in (min_cols..=max_cols).rev() {
        let needed_rows = quota.div_ceil(cols);
        let Some(size) = largest_fitting_size(cols, needed_rows, geometry, &shape) else {
            debug!(cols, needed_rows, "No cell size fits");
            continue;
        };

        debug!(cols, needed_rows, size, "Candidate layout");
        match best {
            Some((_, best_size)) if size <= best_size => {}
            _ => best = Some((cols, size)),
        }
    }

    match best {
        Some((cols, size)) => {
            let plan = LayoutPlan::new(cols, size, shape, geometry, false);
            debug!(
                columns = plan.columns,
                cell_width = plan.cell_width,
                cell_height = plan.cell_height,
                items_per_page = plan.items_per_page,
                "Layout chosen"
            );
            plan
        }
        None => {
            warn!(
                quota,
                min_cols,
                fallback_cell = geometry.fallback_cell,
                "No layout fits the quota, using fallback"
            );
            LayoutPlan::new(min_cols, geometry.fallback_cell, shape, geometry, true)
        }
    }
}

/// Largest cell width for `cols` columns that fits `rows` rows, if any.
fn largest_fitting_size(cols: u32, rows: u32, geometry: &PageGeometry, shape: &CellShape) -> Option<f32> {
    let avail_w = geometry.available_width();
    let avail_h = geometry.available_height();
    let step = if geometry.shrink_step > 0.0 {
        geometry.shrink_step
    } else {
        1.0
    };

    let widest = ((avail_w - geometry.gap_x * (cols as f32 - 1.0)) / cols as f32).floor();
    let mut size = geometry.min_cell.max(geometry.max_cell.min(widest));

    while size >= geometry.min_cell {
        let cell_h = shape.cell_height(size, geometry.cell_padding);
        let total_h = span(rows, cell_h, geometry.gap_y);
        let total_w = span(cols, size, geometry.gap_x);

        if total_h <= avail_h + FIT_TOLERANCE && total_w <= avail_w + FIT_TOLERANCE {
            return Some(size);
        }
        size -= step;
    }

    None
}

/// Rows of height `cell_h` that fit the available height (at least one).
fn rows_per_page(cell_h: f32, geometry: &PageGeometry) -> u32 {
    let rows = ((geometry.available_height() + geometry.gap_y) / (cell_h + geometry.gap_y)).floor();
    if rows.is_finite() && rows >= 1.0 {
        rows as u32
    } else {
        1
    }
}

/// Length of `n` cells of `cell` with `gap` between neighbours.
fn span(n: u32, cell: f32, gap: f32) -> f32 {
    if n == 0 {
        return 0.0;
    }
    n as f32 * cell + gap * (n as f32 - 1.0)
}
