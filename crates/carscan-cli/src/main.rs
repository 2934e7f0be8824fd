mod digest;
mod scan;
mod store;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "carscan")]
#[command(about = "Scrape, clean and summarize used-car listings")]
struct Cli {
    /// Directory for CSV and JSON outputs; overrides `CARSCAN_OUTPUT_DIR`.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check that each target is reachable and looks like a listing page.
    Probe {
        /// Targets YAML; overrides `CARSCAN_TARGETS_PATH`.
        #[arg(long)]
        targets: Option<PathBuf>,
    },
    /// Fetch every target and write the raw listing CSV.
    Scrape {
        #[arg(long)]
        targets: Option<PathBuf>,
    },
    /// Clean a raw listing CSV and write the cleaned CSV.
    Clean {
        /// Raw CSV to read; defaults to the last scrape output.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Summarize a cleaned CSV and write the JSON summary.
    Analyze {
        /// Cleaned CSV to read; defaults to the last clean output.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Scrape, clean and analyze in one pass.
    Run {
        #[arg(long)]
        targets: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = carscan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    match cli.command {
        Commands::Probe { targets } => scan::run_probe(&config, targets.as_deref()).await,
        Commands::Scrape { targets } => {
            scan::run_scrape(&config, targets.as_deref()).await.map(|_| ())
        }
        Commands::Clean { input } => scan::run_clean(&config, input.as_deref()),
        Commands::Analyze { input } => scan::run_analyze(&config, input.as_deref()),
        Commands::Run { targets } => scan::run_full(&config, targets.as_deref()).await,
    }
}
