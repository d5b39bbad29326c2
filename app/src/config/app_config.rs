//! Runtime configuration loaded from environment variables.

use std::path::{Path, PathBuf};

use code_render::qr::QrEcLevel;
use code_render::{BarcodeOptions, CodeKind, QrOptions};
use sheet_layout::{DEFAULT_QUOTA, PageGeometry};

use super::validation::validate_setting;
use super::{OutputFormat, RenderFailurePolicy};

/// Caption font shipped with the repository, relative to its root.
pub const DEFAULT_CAPTION_FONT: &str = "assets/fonts/DejaVuSans.ttf";

/// Every key read by [`AppConfig::load`].
pub const SETTING_KEYS: &[&str] = &[
    "CODE_KIND",
    "OUTPUT_FORMAT",
    "QR_SIZE",
    "QR_MARGIN",
    "QR_EC",
    "BAR_WIDTH",
    "BAR_HEIGHT",
    "SHOW_TEXT",
    "PAGE_QUOTA",
    "CAPTION_FONT_PATH",
    "SECTION_LABEL",
    "CONTINUED_LABEL",
    "OUTPUT_DIR",
    "ON_RENDER_ERROR",
    "PARALLEL_RENDER",
];

/// Runtime configuration for one export.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub code_kind: CodeKind,
    pub output_format: OutputFormat,
    pub qr: QrOptions,
    pub barcode: BarcodeOptions,
    pub page_quota: u32,
    pub caption_font_path: PathBuf,
    pub section_label: String,
    pub continued_label: String,
    pub output_dir: PathBuf,
    pub on_render_error: RenderFailurePolicy,
    pub parallel_render: bool,
    pub qr_geometry: PageGeometry,
    pub barcode_geometry: PageGeometry,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            code_kind: CodeKind::Qr,
            output_format: OutputFormat::Pdf,
            qr: QrOptions::default(),
            barcode: BarcodeOptions::default(),
            page_quota: DEFAULT_QUOTA,
            caption_font_path: PathBuf::from(DEFAULT_CAPTION_FONT),
            section_label: "Class".into(),
            continued_label: "(continued)".into(),
            output_dir: PathBuf::from("."),
            on_render_error: RenderFailurePolicy::Abort,
            parallel_render: false,
            qr_geometry: PageGeometry::qr_a4(),
            barcode_geometry: PageGeometry::barcode_a4(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values fall back to defaults;
    /// present values must pass [`validate_setting`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut values = Vec::new();
        for key in SETTING_KEYS {
            let Some(value) = lookup(key).map(|v| v.trim().to_string()) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            validate_setting(key, &value).map_err(|e| anyhow::anyhow!("{key}: {e}"))?;
            values.push((*key, value));
        }
        let g = |key: &str| -> String {
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        };

        let defaults = Self::default();
        Ok(Self {
            code_kind: parse_or(&g("CODE_KIND"), defaults.code_kind),
            output_format: parse_or(&g("OUTPUT_FORMAT"), defaults.output_format),
            qr: QrOptions {
                size: parse_or(&g("QR_SIZE"), defaults.qr.size),
                margin: parse_or(&g("QR_MARGIN"), defaults.qr.margin),
                ec_level: parse_or(&g("QR_EC"), QrEcLevel::M),
            },
            barcode: BarcodeOptions {
                bar_width: parse_or(&g("BAR_WIDTH"), defaults.barcode.bar_width),
                bar_height: parse_or(&g("BAR_HEIGHT"), defaults.barcode.bar_height),
                show_text: parse_or(&g("SHOW_TEXT"), defaults.barcode.show_text),
            },
            page_quota: parse_or(&g("PAGE_QUOTA"), defaults.page_quota),
            caption_font_path: non_empty(g("CAPTION_FONT_PATH"))
                .map(PathBuf::from)
                .unwrap_or(defaults.caption_font_path),
            section_label: non_empty(g("SECTION_LABEL")).unwrap_or(defaults.section_label),
            continued_label: non_empty(g("CONTINUED_LABEL")).unwrap_or(defaults.continued_label),
            output_dir: non_empty(g("OUTPUT_DIR"))
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            on_render_error: parse_or(&g("ON_RENDER_ERROR"), defaults.on_render_error),
            parallel_render: parse_or(&g("PARALLEL_RENDER"), defaults.parallel_render),
            qr_geometry: defaults.qr_geometry,
            barcode_geometry: defaults.barcode_geometry,
        })
    }

    /// Page geometry for the configured code kind.
    pub fn geometry(&self) -> &PageGeometry {
        match self.code_kind {
            CodeKind::Qr => &self.qr_geometry,
            CodeKind::Barcode => &self.barcode_geometry,
        }
    }

    /// Override fields of the active geometry from a JSON object on disk.
    pub fn apply_geometry_file(&mut self, path: &Path) -> Result<(), anyhow::Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
        let patch: serde_json::Value = serde_json::from_str(&text)?;
        let target = match self.code_kind {
            CodeKind::Qr => &mut self.qr_geometry,
            CodeKind::Barcode => &mut self.barcode_geometry,
        };
        *target = patch_geometry(*target, &patch)?;
        tracing::info!(path = %path.display(), "Applied geometry overrides");
        Ok(())
    }
}

/// Merge the keys of a JSON object over `base`. Unknown keys are rejected.
pub fn patch_geometry(
    base: PageGeometry,
    patch: &serde_json::Value,
) -> Result<PageGeometry, anyhow::Error> {
    let Some(fields) = patch.as_object() else {
        anyhow::bail!("geometry overrides must be a JSON object");
    };
    let mut merged = serde_json::to_value(base)?;
    if let Some(target) = merged.as_object_mut() {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    let geometry: PageGeometry = serde_json::from_value(merged)?;
    if geometry.min_columns > geometry.max_columns {
        anyhow::bail!("min_columns must not exceed max_columns");
    }
    if geometry.shrink_step <= 0.0 {
        anyhow::bail!("shrink_step must be positive");
    }
    Ok(geometry)
}

fn parse_or<T: std::str::FromStr>(s: &str, default: T) -> T {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
