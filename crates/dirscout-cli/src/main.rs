mod crawl;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::crawl::RunArgs;

#[derive(Debug, Parser)]
#[command(name = "dirscout")]
#[command(about = "Crawl a business directory and export enriched store records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Discover listing pages, scan them, enrich every store and write a report
    Crawl {
        #[command(flatten)]
        run: RunArgs,

        /// Report path; the extension is replaced by the format actually written
        #[arg(long, short)]
        output: Option<std::path::PathBuf>,
    },
    /// Print the listing pages a crawl would visit, without crawling them
    Plan {
        #[command(flatten)]
        run: RunArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = dirscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Crawl { run, output } => crawl::run_crawl(config, &run, output).await,
        Commands::Plan { run } => crawl::run_plan(config, &run).await,
    }
}
