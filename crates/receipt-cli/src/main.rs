//! CLI application for receipt expense extraction.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, list, process, summary};

/// Receipt expenses - Extract structured expenses from receipts
#[derive(Parser)]
#[command(name = "receipt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract an expense from a single receipt
    Process(process::ProcessArgs),

    /// Process multiple receipts
    Batch(batch::BatchArgs),

    /// List stored expenses, newest first
    List(list::ListArgs),

    /// Show expense totals by category and month
    Summary(summary::SummaryArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Process(args) => process::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::List(args) => list::run(args, config_path).await,
        Commands::Summary(args) => summary::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
