//! Batch processing command for multiple receipts.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use receipt_core::{
    BatchProcessor, BatchReport, DocumentOutcome, ExpenseStore, FsTextProvider, JsonlStore,
    MemoryStore,
};

use super::process::{format_record, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Append accepted expenses to the configured store
    #[arg(long)]
    store: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;
    let sidecar_suffix = config.sources.ocr_sidecar_suffix.clone();

    // OCR responses sit next to their images and are not documents themselves
    let files: Vec<String> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .map(|p| p.to_string_lossy().to_string())
        .filter(|p| sidecar_suffix.is_empty() || !p.ends_with(&sidecar_suffix))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let mut store: Box<dyn ExpenseStore> = if args.store {
        Box::new(JsonlStore::new(&config.store.path))
    } else {
        Box::new(MemoryStore::new())
    };

    let provider =
        FsTextProvider::new(PathBuf::new()).with_ocr_sidecar_suffix(sidecar_suffix.clone());
    let mut processor = BatchProcessor::from_config(&config, provider, &mut *store);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut report = BatchReport::default();
    for file in &files {
        report.documents.push(processor.process_document(file));
        pb.inc(1);
    }

    pb.finish_and_clear();

    if let Some(output_dir) = &args.output_dir {
        for doc in &report.documents {
            if let DocumentOutcome::Stored(record) = &doc.outcome {
                let output_name = Path::new(&doc.source_ref)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("expense");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_record(record, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &report)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        report.documents.len(),
        start.elapsed()
    );
    println!(
        "   {} stored, {} rejected, {} skipped, {} failed",
        style(report.processed_count()).green(),
        style(report.rejected_count()).yellow(),
        style(report.skipped_count()).dim(),
        style(report.failed_count()).red()
    );

    let problems: Vec<_> = report
        .documents
        .iter()
        .filter(|d| !matches!(d.outcome, DocumentOutcome::Stored(_)))
        .collect();

    if !problems.is_empty() {
        println!();
        println!("{}", style("Not stored:").yellow());
        for doc in problems {
            println!(
                "  - {} ({}): {}",
                doc.source_ref,
                doc.outcome.label(),
                outcome_detail(&doc.outcome)
            );
        }
    }

    Ok(())
}

fn outcome_detail(outcome: &DocumentOutcome) -> String {
    match outcome {
        DocumentOutcome::Stored(record) => record.id.clone(),
        DocumentOutcome::Rejected { reason, .. } => reason.to_string(),
        DocumentOutcome::Skipped(reason) => reason.to_string(),
        DocumentOutcome::Failed(error) => error.clone(),
    }
}

fn write_summary(path: &Path, report: &BatchReport) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "id",
        "date",
        "amount",
        "category",
        "description",
        "warnings",
        "detail",
        "content_type",
    ])?;

    for doc in &report.documents {
        let filename = Path::new(&doc.source_ref)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let record = match &doc.outcome {
            DocumentOutcome::Stored(record) | DocumentOutcome::Rejected { record, .. } => {
                Some(record)
            }
            _ => None,
        };

        let detail = match &doc.outcome {
            DocumentOutcome::Stored(_) => String::new(),
            other => outcome_detail(other),
        };

        wtr.write_record([
            filename,
            doc.outcome.label(),
            record.map(|r| r.id.as_str()).unwrap_or(""),
            &record.map(|r| r.date.to_string()).unwrap_or_default(),
            &record.map(|r| r.amount.to_string()).unwrap_or_default(),
            record.map(|r| r.category.as_str()).unwrap_or(""),
            record.map(|r| r.description.as_str()).unwrap_or(""),
            &doc.warnings.len().to_string(),
            &detail,
            doc.content_type,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
