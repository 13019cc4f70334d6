//! # Maps Leads
//!
//! A lead acquisition pipeline that searches Google Maps for a business
//! category in one or more places, opens every listing in a real browser,
//! extracts its contact details and writes a clean CSV lead sheet.
//!
//! ## Features
//!
//! - Scrolls the virtualized Maps result feed to load more listings
//! - Extracts name, rating, review count, address, phone and website
//! - Derives ZIP codes and strips tracking parameters from website links
//! - Cleans previously exported sheets (`clean` subcommand)
//!
//! ## Usage
//!
//! ```sh
//! maps_leads scrape -p "New York, Buffalo" -c restaurants -n 20
//! maps_leads clean restaurants_New_York_Buffalo_leads.csv
//! ```
//!
//! ## Architecture
//!
//! The scrape runs as a strictly sequential pipeline:
//! 1. **Loading**: Search each place and scroll its result feed
//! 2. **Extracting**: Open each result card and parse the detail pane
//! 3. **Normalizing**: Sanitize text, derive ZIP codes, canonicalize links
//! 4. **Output**: Write the lead sheet as UTF-8 CSV

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod browser;
mod cleaning;
mod cli;
mod config;
mod error;
mod models;
mod normalize;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use browser::ChromeSession;
use cli::{CleanArgs, Cli, Command, ScrapeArgs};
use config::ScraperConfig;
use pipeline::{leads_to_table, output_filename, scrape_places};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("maps_leads starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    match args.command {
        Command::Scrape(scrape) => run_scrape(scrape).await?,
        Command::Clean(clean) => run_clean(clean)?,
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

#[instrument(level = "info", skip_all)]
async fn run_scrape(args: ScrapeArgs) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => ScraperConfig::load(path).await?,
        None => ScraperConfig::default(),
    };
    args.apply_overrides(&mut config);

    let inputs = args.resolve_inputs(config.default_max_leads)?;
    if inputs.places.is_empty() {
        error!("No places given; nothing to scrape");
        return Err("no places given".into());
    }
    info!(
        places = ?inputs.places,
        category = %inputs.category,
        max_leads = inputs.max_leads,
        "Resolved scrape inputs"
    );

    // Early check: ensure output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let session = ChromeSession::launch(&config).await?;
    let leads = scrape_places(
        &session,
        &inputs.places,
        &inputs.category,
        inputs.max_leads,
        &config,
    )
    .await;
    if let Err(e) = session.close().await {
        warn!(error = %e, "Browser did not close cleanly");
    }

    let filename = output_filename(&inputs.category, &inputs.places);
    let path = Path::new(&args.output_dir).join(filename);
    leads_to_table(&leads).write(&path)?;

    info!(
        leads = leads.len(),
        places = inputs.places.len(),
        path = %path.display(),
        "Done; lead sheet saved"
    );
    Ok(())
}

#[instrument(level = "info", skip_all, fields(input = %args.input.display()))]
fn run_clean(args: CleanArgs) -> Result<(), Box<dyn Error>> {
    let table = cleaning::clean_file(&args.input, &args.columns(), &args.output)?;
    info!(
        rows = table.rows.len(),
        path = %args.output.display(),
        "Results saved"
    );
    Ok(())
}
