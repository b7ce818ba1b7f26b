//! CLI module - Command-line interface definitions and handlers

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;

use crate::core::config::{
    SearchConfig, APP_TOKEN_ENV, DEFAULT_ENDPOINT, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS,
    ENDPOINT_ENV,
};
use crate::core::render::{OutputFormat, RecordRenderer, RenderConfig};
use crate::query::filter::{FilterCriteria, FilterField};

/// license-search - search Texas professional license records.
#[derive(Parser, Debug)]
#[command(name = "license-search")]
#[command(
    author,
    version,
    about,
    long_about = r#"Search the Texas open-data license dataset with case-insensitive substring
filters. Every filter is optional; the ones given are combined with AND.

Matching records are printed to stderr as they arrive. When the search ends
(limit reached, no more results, an error, or Ctrl-C) a summary line is printed
to stdout:

    Found N total licenses

An API app token is required in the APP_TOKEN environment variable.

Examples:
    license-search -t plumb -c harris --limit 10
    license-search --business-name "bob's" --format json
    license-search -n 90210
"#
)]
pub struct Cli {
    /// The expiration date (eg. 12/16/2025).
    #[arg(short = 'e', long = "expiration", value_name = "DATE")]
    pub expiration_date: Option<String>,

    /// The license number (eg. 90210).
    #[arg(short = 'n', long, value_name = "NUMBER")]
    pub license_number: Option<String>,

    /// The license type to search for (eg. A/C Technician).
    #[arg(short = 't', long, value_name = "TYPE")]
    pub license_type: Option<String>,

    /// The business county (eg. HARRIS).
    #[arg(short = 'c', long = "county", value_name = "COUNTY")]
    pub business_county: Option<String>,

    /// The license sub-type (eg. REG).
    #[arg(long = "subtype", alias = "st", value_name = "SUBTYPE")]
    pub license_subtype: Option<String>,

    /// The business name (eg. BOB'S PLUMBING).
    #[arg(long, alias = "bn", value_name = "NAME")]
    pub business_name: Option<String>,

    /// The owner name (eg. BOBS, BOBBY).
    #[arg(long, alias = "on", value_name = "NAME")]
    pub owner_name: Option<String>,

    /// The per-request timeout in seconds (0 disables it).
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_name = "SECS")]
    pub timeout: u64,

    /// The max records to retrieve (0 = unlimited).
    #[arg(long, default_value_t = 0, value_name = "N")]
    pub limit: usize,

    /// Largest page requested from the API at once.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_name = "N", hide = true)]
    pub page_size: usize,

    /// Dataset endpoint.
    #[arg(
        long,
        env = ENDPOINT_ENV,
        default_value = DEFAULT_ENDPOINT,
        value_name = "URL",
        hide = true
    )]
    pub endpoint: String,

    /// API app token.
    #[arg(
        long,
        env = APP_TOKEN_ENV,
        hide_env_values = true,
        value_name = "TOKEN",
        long_help = "API app token sent in the X-App-Token header.\n\n\
Usually supplied through the APP_TOKEN environment variable."
    )]
    pub app_token: Option<String>,

    /// Record output format (pretty/json).
    #[arg(
        long,
        default_value = "pretty",
        value_name = "FORMAT",
        long_help = "Select how records are printed to stderr.\n\n\
Supported values:\n\
- pretty (default): indented, colorized JSON\n\
- json: one compact JSON object per line"
    )]
    pub format: String,

    /// Disable colored output.
    #[arg(
        long,
        long_help = "Disable colored output. Color is also off when NO_COLOR is set or\n\
stderr is not a terminal."
    )]
    pub no_color: bool,

    /// Verbose mode (more diagnostics).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Filter criteria from the filter flags
    pub fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        for (field, value) in [
            (FilterField::ExpirationDate, &self.expiration_date),
            (FilterField::LicenseNumber, &self.license_number),
            (FilterField::LicenseType, &self.license_type),
            (FilterField::BusinessCounty, &self.business_county),
            (FilterField::LicenseSubtype, &self.license_subtype),
            (FilterField::BusinessName, &self.business_name),
            (FilterField::OwnerName, &self.owner_name),
        ] {
            criteria.set(field, value.clone());
        }
        criteria
    }

    fn render_config(&self) -> RenderConfig {
        let format: OutputFormat = self.format.parse().unwrap_or_default();
        let color = !self.no_color
            && std::env::var_os("NO_COLOR").is_none()
            && std::io::stderr().is_terminal();
        RenderConfig::new(format, color)
    }
}

/// Run the CLI with parsed arguments
pub async fn run(cli: Cli) -> Result<()> {
    // Fatal before any request: nothing is printed if the token is missing
    let config = SearchConfig::new(
        cli.endpoint.clone(),
        cli.app_token.clone(),
        cli.timeout,
        cli.limit,
        cli.page_size,
    )?;

    let renderer = RecordRenderer::with_config(cli.render_config());
    crate::flows::search::run_search(config, cli.criteria(), renderer).await;
    Ok(())
}
