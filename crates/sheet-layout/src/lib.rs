//! Page layout for printable code sheets.
//!
//! Chooses a grid (columns × cell size) that fits a fixed number of codes
//! on one A4 page with the largest legible cells, groups items by class and
//! splits each group into fixed-capacity pages.

pub mod geometry;
pub mod group;
pub mod packer;
pub mod paginate;

// Re-exports for convenience
pub use geometry::PageGeometry;
pub use group::{Group, collate, group_by_key};
pub use packer::{CaptionTier, CellShape, LayoutPlan, caption_tier, compute_layout};
pub use paginate::{CellRect, PageRun, Placement, paginate};

/// Codes per page the layout search aims for.
pub const DEFAULT_QUOTA: u32 = 33;
