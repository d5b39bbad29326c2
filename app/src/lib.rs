//! Class code sheets: turn a roster spreadsheet into QR or barcode images,
//! grouped by class, as a paged PDF or a ZIP of per-class folders.

pub mod archive;
pub mod config;
pub mod error;
pub mod export;
pub mod font;
pub mod pdf;

use std::path::{Path, PathBuf};

pub use config::{AppConfig, OutputFormat, RenderFailurePolicy};
pub use error::ExportError;
pub use export::{ExportSummary, run_export};

/// Load `.env` from the working directory or its parent.
///
/// Runs before logging is set up, so the caller reports the result.
pub fn load_dotenv() -> Option<PathBuf> {
    load_dotenv_from(&[".env", "../.env"])
}

/// Load the first readable env file among `candidates` and return its path.
/// Variables already set in the process are kept.
pub fn load_dotenv_from<P: AsRef<Path>>(candidates: &[P]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(AsRef::as_ref)
        .find(|path| dotenvy::from_filename(path).is_ok())
        .map(Path::to_path_buf)
}
