//! Identity roster loading.
//!
//! Reads the first sheet of a workbook (columns A/B/C = national ID, name,
//! class section, data from row 2), drops incomplete rows and removes
//! duplicates by `(id, class)`. Also owns the class-label normalisation used
//! for folder names and grouping.

pub mod names;
pub mod rows;
pub mod workbook;

// Re-exports for convenience
pub use names::{folder_key, safe_file_name};
pub use rows::records_from_rows;
pub use workbook::read_workbook;

/// One student row: national ID, display name and class section.
///
/// All fields are trimmed and non-empty. `(id, class_label)` is unique
/// within a loaded roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityRecord {
    pub id: String,
    pub name: String,
    pub class_label: String,
}

impl IdentityRecord {
    /// Filesystem-safe class key used for grouping and archive folders.
    pub fn folder_key(&self) -> String {
        folder_key(&self.class_label)
    }
}

/// Errors that can occur while loading a roster.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Failed to open workbook {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("Workbook has no sheets")]
    NoSheets,

    #[error("Failed to read sheet '{sheet}': {reason}")]
    Sheet { sheet: String, reason: String },
}

/// Result type alias for roster operations.
pub type Result<T> = std::result::Result<T, RosterError>;
