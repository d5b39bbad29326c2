//! Caption font loading.
//!
//! The font is read once per export. Its bytes are handed to every PDF
//! document and its glyph metrics are used to measure captions.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ab_glyph::FontArc;

const MAX_FONT_SIZE: u64 = 50 * 1024 * 1024; // 50MB
const VALID_EXTENSIONS: &[&str] = &[".ttf", ".otf"];

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("Caption font not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("Invalid font format (only TTF/OTF supported)")]
    InvalidFormat,
    #[error("Font file too large (max 50MB)")]
    FileTooLarge,
    #[error("Caption font could not be parsed: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A loaded caption font.
#[derive(Clone)]
pub struct CaptionFont {
    bytes: Arc<[u8]>,
    glyphs: FontArc,
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionFont")
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl CaptionFont {
    /// Read and parse a TTF/OTF file.
    pub fn load(path: &Path) -> Result<Self, FontError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default();
        if !VALID_EXTENSIONS.contains(&ext.as_str()) {
            return Err(FontError::InvalidFormat);
        }

        let meta = match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => return Err(FontError::Missing(path.to_path_buf())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FontError::Missing(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        if meta.len() > MAX_FONT_SIZE {
            return Err(FontError::FileTooLarge);
        }

        let font = Self::from_bytes(std::fs::read(path)?)?;
        tracing::info!(path = %path.display(), size = meta.len(), "Caption font loaded");
        Ok(font)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FontError> {
        let glyphs =
            FontArc::try_from_vec(bytes.clone()).map_err(|e| FontError::Parse(e.to_string()))?;
        Ok(Self {
            bytes: bytes.into(),
            glyphs,
        })
    }

    /// Raw font file, embedded into each document.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn glyphs(&self) -> &FontArc {
        &self.glyphs
    }
}
