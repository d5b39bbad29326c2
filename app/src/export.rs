//! The export pipeline: spreadsheet in, one PDF or ZIP file out.

use std::path::{Path, PathBuf};

use code_render::{CodeKind, CodeRenderer, RenderedItem};
use rayon::prelude::*;
use roster::IdentityRecord;
use serde::Serialize;
use sheet_layout::{CellShape, LayoutPlan, compute_layout, group_by_key};
use tracing::{info, warn};

use crate::archive::build_archive;
use crate::config::{AppConfig, OutputFormat, RenderFailurePolicy};
use crate::error::ExportError;
use crate::font::CaptionFont;
use crate::pdf::{PageDocument, SheetLabels, compose_barcode_pages, compose_qr_pages};

/// A record left out because its code could not be rendered.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    pub id: String,
    pub class_label: String,
    pub reason: String,
}

/// Outcome of a successful export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub kind: CodeKind,
    pub format: OutputFormat,
    pub output: PathBuf,
    pub records: usize,
    pub rendered: usize,
    pub groups: usize,
    /// Only set for PDF exports.
    pub pages: Option<usize>,
    pub skipped: Vec<SkippedRecord>,
    pub bytes: usize,
}

/// `QR_By_Class.pdf`, `BARCODE_By_Class.zip`, ...
pub fn default_file_name(kind: CodeKind, format: OutputFormat) -> String {
    format!("{}_By_Class.{}", kind.label(), format.extension())
}

/// Read, render, lay out and write. The output file is written in one go
/// once everything else has succeeded.
pub fn run_export(
    config: &AppConfig,
    input: Option<&Path>,
    output: Option<PathBuf>,
) -> Result<ExportSummary, ExportError> {
    let input = input.ok_or(ExportError::NoInput)?;
    if !input.is_file() {
        return Err(ExportError::InputMissing(input.to_path_buf()));
    }

    info!(input = %input.display(), kind = ?config.code_kind, format = ?config.output_format, "Starting export");
    let records = roster::read_workbook(input)?;
    if records.is_empty() {
        return Err(ExportError::NoRows);
    }
    info!(records = records.len(), "Records loaded");

    let font = load_font(config)?;
    let renderer = CodeRenderer::new(config.code_kind)
        .with_qr_options(config.qr.clone())
        .with_barcode_options(config.barcode.clone())
        .with_font(font.as_ref().map(|f| f.glyphs().clone()));

    let (items, skipped) = render_all(
        &renderer,
        &records,
        config.on_render_error,
        config.parallel_render,
    )?;
    if items.is_empty() {
        return Err(ExportError::NothingRendered {
            skipped: skipped.len(),
        });
    }
    let rendered = items.len();

    let (bytes, groups, pages) = match (config.output_format, &font) {
        (OutputFormat::Pdf, Some(font)) => {
            let (bytes, groups, pages) = write_pdf(config, font, items)?;
            (bytes, groups, Some(pages))
        }
        (OutputFormat::Pdf, None) => {
            return Err(ExportError::Pdf("caption font not loaded".into()));
        }
        (OutputFormat::Zip, _) => {
            let bytes = build_archive(&items)?;
            let groups = group_by_key(items, |item| item.folder_key.as_str()).len();
            (bytes, groups, None)
        }
    };

    let output = output.unwrap_or_else(|| {
        config
            .output_dir
            .join(default_file_name(config.code_kind, config.output_format))
    });
    std::fs::write(&output, &bytes)?;
    info!(output = %output.display(), bytes = bytes.len(), "Export written");

    Ok(ExportSummary {
        kind: config.code_kind,
        format: config.output_format,
        output,
        records: records.len(),
        rendered,
        groups,
        pages,
        skipped,
        bytes: bytes.len(),
    })
}

/// PDF exports cannot run without the caption font. ZIP exports only use it
/// for the text under barcodes, so a missing font is just a warning there.
fn load_font(config: &AppConfig) -> Result<Option<CaptionFont>, ExportError> {
    match (config.output_format, config.code_kind) {
        (OutputFormat::Pdf, _) => Ok(Some(CaptionFont::load(&config.caption_font_path)?)),
        (OutputFormat::Zip, CodeKind::Barcode) if config.barcode.show_text => {
            match CaptionFont::load(&config.caption_font_path) {
                Ok(font) => Ok(Some(font)),
                Err(e) => {
                    warn!(error = %e, "Barcode text will be omitted");
                    Ok(None)
                }
            }
        }
        (OutputFormat::Zip, _) => Ok(None),
    }
}

/// Render every record, keeping input order.
pub fn render_all(
    renderer: &CodeRenderer,
    records: &[IdentityRecord],
    policy: RenderFailurePolicy,
    parallel: bool,
) -> Result<(Vec<RenderedItem>, Vec<SkippedRecord>), ExportError> {
    let mut items = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    let mut accept = |record: &IdentityRecord, result: code_render::Result<RenderedItem>| {
        match result {
            Ok(item) => items.push(item),
            Err(e) if policy == RenderFailurePolicy::Abort => return Err(ExportError::Render(e)),
            Err(e) => {
                warn!(id = %record.id, class = %record.class_label, error = %e, "Skipping record");
                skipped.push(SkippedRecord {
                    id: record.id.clone(),
                    class_label: record.class_label.clone(),
                    reason: e.to_string(),
                });
            }
        }
        Ok(())
    };

    if parallel {
        let results: Vec<_> = records.par_iter().map(|r| renderer.render(r)).collect();
        for (record, result) in records.iter().zip(results) {
            accept(record, result)?;
        }
    } else {
        for record in records {
            accept(record, renderer.render(record))?;
        }
    }

    info!(rendered = items.len(), skipped = skipped.len(), "Rendering finished");
    Ok((items, skipped))
}

fn write_pdf(
    config: &AppConfig,
    font: &CaptionFont,
    items: Vec<RenderedItem>,
) -> Result<(Vec<u8>, usize, usize), ExportError> {
    let geometry = config.geometry();
    let labels = SheetLabels {
        section: config.section_label.clone(),
        continued: config.continued_label.clone(),
    };
    let groups = group_by_key(items, |item| item.folder_key.as_str());

    let title = format!("{}_By_Class", config.code_kind.label());
    let mut doc = PageDocument::new(&title, geometry, font)?;
    let pages = match config.code_kind {
        CodeKind::Qr => compose_qr_pages(&mut doc, &groups, geometry, config.page_quota, &labels)?,
        CodeKind::Barcode => {
            compose_barcode_pages(&mut doc, &groups, geometry, config.page_quota, &labels)?
        }
    };
    debug_assert_eq!(pages, doc.page_count());

    Ok((doc.finish()?, groups.len(), pages))
}

/// The QR plan an export with this config would use.
pub fn preview_plan(config: &AppConfig) -> LayoutPlan {
    compute_layout(
        config.page_quota,
        &config.qr_geometry,
        CellShape::SquareWithCaption,
    )
}
