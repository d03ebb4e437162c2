use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use situsheet_core::{DocumentKind, ImportConfig, SituationImporter, extract_all_sections, reader};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod formatter;

#[derive(Parser)]
#[command(name = "situcli")]
#[command(about = "Diagnostic extractor for situation spreadsheets", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the Excel/ODS file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Sheet to inspect (defaults to the first sheet)
    #[arg(short, long, value_name = "SHEET")]
    sheet: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Document type built from the rows
    #[arg(short, long, value_enum, default_value = "charge")]
    kind: Kind,

    /// Print every row of the sheet before extracting
    #[arg(long)]
    dump: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    /// Expense lines
    Charge,
    /// Revenue lines
    Entree,
}

impl From<Kind> for DocumentKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Charge => DocumentKind::Charge,
            Kind::Entree => DocumentKind::Entree,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output for scripting
    Json,
}

/// Read log filters from RUST_LOG, default to warnings only
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        ImportConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        // Try to load default config from current directory if it exists
        let default_config_path = PathBuf::from("situsheet.toml");
        if default_config_path.exists() {
            ImportConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            ImportConfig::default()
        }
    };

    let workbook = reader::read_workbook(&cli.file)
        .with_context(|| format!("Failed to read file: {}", cli.file.display()))?;
    let sheet = match &cli.sheet {
        Some(name) => workbook
            .get_sheet(name)
            .with_context(|| format!("No sheet named '{}' in {}", name, cli.file.display()))?,
        None => workbook
            .first_sheet()
            .with_context(|| format!("No sheets in {}", cli.file.display()))?,
    };

    let labels = config.marker_labels();
    let sections = extract_all_sections(sheet, &labels);

    let importer = SituationImporter::with_config(config);
    let import_date = Local::now().date_naive();
    let outcome = importer.import_sheet(sheet, cli.kind.into(), import_date);

    match cli.format {
        OutputFormat::Human => {
            if cli.dump {
                formatter::print_rows(sheet);
            }
            formatter::print_report(&cli.file, sheet, &labels, &sections, &outcome);
        }
        OutputFormat::Json => {
            formatter::print_json(&cli.file, sheet, &sections, &outcome)?;
        }
    }

    Ok(())
}
