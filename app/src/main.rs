//! Command-line entry point.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use class_codes_lib::config::OutputFormat;
use class_codes_lib::export::preview_plan;
use class_codes_lib::{AppConfig, run_export};
use code_render::CodeKind;

#[derive(Parser, Debug)]
#[command(
    name = "class-codes",
    version,
    about = "Generate QR or barcode sheets grouped by class from a roster spreadsheet"
)]
struct Args {
    /// Spreadsheet with ID, name and class in columns A-C (row 1 is a header)
    input: Option<PathBuf>,

    /// Code type: qr or barcode
    #[arg(short, long)]
    kind: Option<CodeKind>,

    /// Output container: pdf or zip
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Output file (defaults to <KIND>_By_Class.<ext> in OUTPUT_DIR)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Caption font (.ttf/.otf) for PDF captions and barcode text.
    /// Defaults to CAPTION_FONT_PATH, then assets/fonts/DejaVuSans.ttf
    /// relative to the working directory
    #[arg(long)]
    font: Option<PathBuf>,

    /// Target number of codes per page
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=500))]
    quota: Option<u32>,

    /// JSON file overriding page geometry fields
    #[arg(long)]
    geometry: Option<PathBuf>,

    /// Print the QR layout plan as JSON and exit
    #[arg(long)]
    print_plan: bool,

    /// Print the export summary as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn apply(&self, config: &mut AppConfig) -> anyhow::Result<()> {
        if let Some(kind) = self.kind {
            config.code_kind = kind;
        }
        if let Some(format) = self.format {
            config.output_format = format;
        }
        if let Some(font) = &self.font {
            config.caption_font_path = font.clone();
        }
        if let Some(quota) = self.quota {
            config.page_quota = quota;
        }
        if let Some(path) = &self.geometry {
            config.apply_geometry_file(path)?;
        }
        Ok(())
    }
}

fn main() {
    // .env may set RUST_LOG, so it is read before the filter is built
    let dotenv = class_codes_lib::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match &dotenv {
        Some(path) => tracing::info!("Loaded .env from: {}", path.display()),
        None => tracing::debug!("No .env file found, using system environment variables"),
    }

    if let Err(e) = run() {
        tracing::debug!("{e:?}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load()?;
    args.apply(&mut config)?;

    if args.print_plan {
        let plan = preview_plan(&config);
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let summary = run_export(&config, args.input.as_deref(), args.output.clone())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Saved {} ({} codes in {} classes{})",
            summary.output.display(),
            summary.rendered,
            summary.groups,
            summary
                .pages
                .map(|p| format!(", {p} pages"))
                .unwrap_or_default()
        );
        if !summary.skipped.is_empty() {
            println!("Skipped {} records that could not be encoded", summary.skipped.len());
        }
    }
    Ok(())
}
