//! PDF output: the page canvas abstraction, its printpdf implementation and
//! the page composers.

pub mod canvas;
pub mod compose;
pub mod document;

pub use canvas::{Align, PageCanvas};
pub use compose::{SheetLabels, compose_barcode_pages, compose_qr_pages};
pub use document::PageDocument;
