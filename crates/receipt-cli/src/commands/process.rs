//! Process command - extract an expense from a single receipt.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use receipt_core::{
    ExpenseExtractor, ExpenseParser, ExpenseRecord, ExpenseStore, FsTextProvider, JsonlStore,
    SourcePolicy, TextProvider,
};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (text, PDF or image with an OCR response)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Append the accepted expense to the configured store
    #[arg(long)]
    store: bool,

    /// Show fields that fell back to their defaults
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let source_ref = args.input.to_string_lossy().to_string();
    let kind = SourcePolicy::from_config(&config.sources).classify(&source_ref);
    if !kind.is_supported() {
        anyhow::bail!("Unsupported file type: {}", args.input.display());
    }

    info!("Processing {} file: {}", kind, args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Extracting text...");
    pb.set_position(10);

    let provider = FsTextProvider::new(PathBuf::new())
        .with_ocr_sidecar_suffix(config.sources.ocr_sidecar_suffix.clone());
    let text = provider.extract_text(&source_ref, kind)?;

    if text.trim().is_empty() {
        pb.finish_and_clear();
        anyhow::bail!("No text extracted from {}", args.input.display());
    }

    pb.set_message("Extracting expense fields...");
    pb.set_position(60);

    let parser = ExpenseParser::from_config(&config.extraction);
    let result = parser.extract(&text, &source_ref);

    pb.finish_and_clear();

    if args.show_warnings {
        for warning in &result.warnings {
            eprintln!("{} {}", style("!").yellow(), warning);
        }
    }

    let warnings = result.warnings.len();
    let processing_time_ms = result.processing_time_ms;
    let record = result
        .accept()
        .map_err(|reason| anyhow::anyhow!("Expense rejected: {}", reason))?;

    if args.store {
        let mut store = JsonlStore::new(&config.store.path);
        store.put(&record)?;
        eprintln!(
            "{} Stored expense {} in {}",
            style("✓").green(),
            record.id,
            store.path().display()
        );
    }

    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!(
        "Extraction took {}ms with {} defaulted fields, total {:?}",
        processing_time_ms,
        warnings,
        start.elapsed()
    );

    Ok(())
}

/// Render one record in the requested format.
pub fn format_record(record: &ExpenseRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(std::slice::from_ref(record)),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

const CSV_HEADER: [&str; 7] = [
    "id",
    "date",
    "amount",
    "category",
    "description",
    "source_ref",
    "processed_at",
];

/// Render records as CSV with a header row.
pub fn format_csv(records: &[ExpenseRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;

    for record in records {
        wtr.write_record([
            record.id.as_str(),
            &record.date.to_string(),
            &record.amount.to_string(),
            record.category.as_str(),
            &record.description,
            &record.source_ref,
            &record.processed_at.to_rfc3339(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ExpenseRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense: {}\n", record.description));
    output.push_str(&format!("  Amount:   {}\n", record.amount));
    output.push_str(&format!("  Category: {}\n", record.category));
    output.push_str(&format!("  Date:     {}\n", record.date));
    output.push_str(&format!("  Source:   {}\n", record.source_ref));
    output.push_str(&format!("  ID:       {}\n", record.id));

    output
}
