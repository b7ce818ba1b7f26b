//! license-search - Search Texas professional license records from the command line
//!
//! license-search provides:
//! - Case-insensitive substring filters over seven license fields
//! - Paginated streaming from the open-data API with a global record limit
//! - Ctrl-C cancellation that still reports how many records were found

use anyhow::Result;
use clap::Parser;

mod backends;
mod cli;
mod core;
mod fetch;
mod flows;
mod query;

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose {
        "warn,license_search=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);
    cli::run(cli).await
}
