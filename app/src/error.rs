//! Export error type.

use std::path::PathBuf;

use code_render::RenderError;
use roster::RosterError;

use crate::font::FontError;

/// Errors that stop an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No input file selected")]
    NoInput,

    #[error("Input file not found: {}", .0.display())]
    InputMissing(PathBuf),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("No data found (expected ID, name and class in columns A-C from row 2)")]
    NoRows,

    #[error("No code could be rendered ({skipped} records skipped)")]
    NothingRendered { skipped: usize },

    #[error("Caption font unavailable: {0}")]
    Font(#[from] FontError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to embed code for '{id}': {reason}")]
    Embed { id: String, reason: String },

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Problems with the user's input rather than with the export itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ExportError::NoInput
                | ExportError::InputMissing(_)
                | ExportError::Roster(_)
                | ExportError::NoRows
        )
    }
}
