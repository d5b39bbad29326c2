//! Configuration: defaults, validation and loading from the environment.

pub mod app_config;
pub mod validation;

pub use app_config::AppConfig;

use serde::{Deserialize, Serialize};

/// Output container for one export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Pdf,
    Zip,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Zip => "zip",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "zip" => Ok(OutputFormat::Zip),
            other => Err(format!("unknown output format '{other}' (expected 'pdf' or 'zip')")),
        }
    }
}

/// What to do when a single record cannot be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFailurePolicy {
    /// Stop the whole export at the first failure.
    #[default]
    Abort,
    /// Log the record and continue without it.
    Skip,
}

impl std::str::FromStr for RenderFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(RenderFailurePolicy::Abort),
            "skip" => Ok(RenderFailurePolicy::Skip),
            other => Err(format!("unknown policy '{other}' (expected 'abort' or 'skip')")),
        }
    }
}
