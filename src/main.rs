// Catalog crawler CLI
//
// Reads a locator config, crawls the configured storefront in headless Chrome
// and writes the collected products to a JSON (or YAML) file.

use std::path::PathBuf;
use std::process::ExitCode;

use catalog_crawler::{RunOptions, logger, run};
use clap::Parser;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "catalog-crawler")]
#[command(about = "Extract product names and prices from a storefront with headless Chrome")]
struct Cli {
    /// Locator config (JSON, or YAML for .yaml/.yml)
    #[arg(short, long, env = "CATALOG_CRAWLER_CONFIG", default_value = "config.json")]
    config: PathBuf,

    /// Where to write the catalog; overwritten on success
    #[arg(short, long, env = "CATALOG_CRAWLER_OUTPUT", default_value = "menu.json")]
    output: PathBuf,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,

    /// Errors only
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.quiet);

    let options = RunOptions {
        config_path: cli.config,
        output_path: cli.output,
    };

    match run(&options).await {
        Ok(summary) => {
            info!(
                "All data saved to {} ({} items)",
                summary.output_path.display(),
                summary.items
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Crawl failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
