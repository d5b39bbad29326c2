//! Code bitmap rendering for identity cards.
//!
//! Renders one record's identifier as a square QR image or a Code128
//! barcode, encodes it as PNG and provides the caption text helpers shared
//! with the page composer.

pub mod barcode;
pub mod bitmap;
pub mod compose;
pub mod qr;
pub mod resize;
pub mod shaping;
pub mod text;

use ab_glyph::FontArc;
use roster::IdentityRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

// Re-exports for convenience
pub use barcode::{BarcodeOptions, generate_barcode};
pub use bitmap::{Bitmap, try_aspect_ratio};
pub use qr::{QrOptions, generate_qr};
pub use shaping::visual_text;

/// Which kind of code is produced for each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    Qr,
    Barcode,
}

impl CodeKind {
    /// Label used in output file names (`QR_By_Class.pdf`).
    pub fn label(self) -> &'static str {
        match self {
            CodeKind::Qr => "QR",
            CodeKind::Barcode => "BARCODE",
        }
    }
}

impl std::str::FromStr for CodeKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qr" => Ok(CodeKind::Qr),
            "barcode" => Ok(CodeKind::Barcode),
            other => Err(format!("unknown code kind '{other}' (expected 'qr' or 'barcode')")),
        }
    }
}

/// A record together with its rendered code, ready for export.
#[derive(Debug, Clone)]
pub struct RenderedItem {
    pub record: IdentityRecord,
    pub folder_key: String,
    pub bitmap: Bitmap,
    pub kind: CodeKind,
}

/// Errors that can occur while rendering a code bitmap.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("QR encode error for '{data}': {reason}")]
    Qr { data: String, reason: String },

    #[error("Barcode encode error for '{data}': {reason}")]
    Barcode { data: String, reason: String },

    #[error("PNG encode error: {0}")]
    Encode(#[from] image::ImageError),
}

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Renders records into [`RenderedItem`]s with fixed settings.
#[derive(Clone)]
pub struct CodeRenderer {
    kind: CodeKind,
    qr: QrOptions,
    barcode: BarcodeOptions,
    font: Option<FontArc>,
}

impl CodeRenderer {
    pub fn new(kind: CodeKind) -> Self {
        Self {
            kind,
            qr: QrOptions::default(),
            barcode: BarcodeOptions::default(),
            font: None,
        }
    }

    /// Builder: set QR options.
    pub fn with_qr_options(mut self, options: QrOptions) -> Self {
        self.qr = options;
        self
    }

    /// Builder: set barcode options.
    pub fn with_barcode_options(mut self, options: BarcodeOptions) -> Self {
        self.barcode = options;
        self
    }

    /// Builder: font for the human-readable line under barcodes.
    pub fn with_font(mut self, font: Option<FontArc>) -> Self {
        self.font = font;
        self
    }

    pub fn kind(&self) -> CodeKind {
        self.kind
    }

    /// Render the identifier alone.
    pub fn render_identifier(&self, identifier: &str) -> Result<Bitmap> {
        let img = match self.kind {
            CodeKind::Qr => generate_qr(identifier, &self.qr)?,
            CodeKind::Barcode => generate_barcode(identifier, &self.barcode, self.font.as_ref())?,
        };
        Bitmap::from_image(&img)
    }

    /// Render one record.
    pub fn render(&self, record: &IdentityRecord) -> Result<RenderedItem> {
        let bitmap = self.render_identifier(&record.id)?;
        debug!(
            id = %record.id,
            width = bitmap.width,
            height = bitmap.height,
            "Rendered code"
        );
        Ok(RenderedItem {
            folder_key: record.folder_key(),
            record: record.clone(),
            bitmap,
            kind: self.kind,
        })
    }
}
