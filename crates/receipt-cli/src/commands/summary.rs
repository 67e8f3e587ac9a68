//! Summary command - expense totals by category and month.

use clap::Args;
use console::style;

use receipt_core::{ExpenseStore, JsonlStore, Summary};

/// Arguments for the summary command.
#[derive(Args)]
pub struct SummaryArgs {
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: SummaryArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let records = JsonlStore::new(&config.store.path).scan()?;
    let summary = Summary::from_records(&records);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {} expenses, total {}",
        style("ℹ").blue(),
        summary.count,
        style(summary.total).bold()
    );

    if summary.count == 0 {
        return Ok(());
    }

    println!();
    println!("{}", style("By category:").bold());
    for (category, bucket) in &summary.by_category {
        println!(
            "  {:<12} {:>12}  ({})",
            category.as_str(),
            bucket.total.to_string(),
            bucket.count
        );
    }

    println!();
    println!("{}", style("By month:").bold());
    for (month, bucket) in &summary.by_month {
        println!(
            "  {:<12} {:>12}  ({})",
            month,
            bucket.total.to_string(),
            bucket.count
        );
        if let Some(categories) = summary.by_month_category.get(month) {
            for (category, bucket) in categories {
                println!(
                    "    {:<10} {:>12}  ({})",
                    category.as_str(),
                    bucket.total.to_string(),
                    bucket.count
                );
            }
        }
    }

    Ok(())
}
