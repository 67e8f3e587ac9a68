//! List command - show stored expenses, newest first.

use clap::Args;
use serde::Serialize;

use receipt_core::{sort_by_date_desc, ExpenseRecord, ExpenseStore, JsonlStore};

use super::process::{format_csv, OutputFormat};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Show at most this many expenses
    #[arg(short = 'n', long)]
    limit: Option<usize>,
}

#[derive(Serialize)]
struct Listing<'a> {
    expenses: &'a [ExpenseRecord],
    count: usize,
}

pub async fn run(args: ListArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let store = JsonlStore::new(&config.store.path);

    let mut records = store.scan()?;
    sort_by_date_desc(&mut records);
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&Listing {
            expenses: &records,
            count: records.len(),
        })?,
        OutputFormat::Csv => format_csv(&records)?,
        OutputFormat::Text => format_table(&records),
    };

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }

    Ok(())
}

fn format_table(records: &[ExpenseRecord]) -> String {
    let mut output = String::new();

    for record in records {
        output.push_str(&format!(
            "{}  {:>10}  {:<10}  {}\n",
            record.date,
            record.amount.to_string(),
            record.category.as_str(),
            record.description
        ));
    }
    output.push_str(&format!("{} expenses\n", records.len()));

    output
}
