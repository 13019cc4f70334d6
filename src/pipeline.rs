//! Query orchestration and lead sheet assembly.
//!
//! For every place, in input order, the result feed is loaded and up to
//! `max_leads` cards are opened one after another. Leads are collected in
//! discovery order. A place whose feed never renders contributes nothing;
//! a card that fails contributes nothing; neither stops the run.

use crate::browser::BrowserSession;
use crate::config::ScraperConfig;
use crate::models::{LEAD_COLUMNS, Lead};
use crate::outputs::table::Table;
use crate::scrapers::details::extract_details;
use crate::scrapers::results::load_results;
use itertools::Itertools;
use tracing::{info, instrument, warn};

/// Scrape `category` listings for each place.
///
/// # Arguments
///
/// * `session` - The browser session every step runs in
/// * `places` - Localities to search, in order
/// * `category` - Business category, e.g. `"restaurants"`
/// * `max_leads` - Cap on cards opened per place
/// * `config` - Timeouts and scroll pacing
///
/// # Returns
///
/// Every lead that was extracted, grouped by place in input order and in
/// ranking order within a place.
#[instrument(level = "info", skip(session, config))]
pub async fn scrape_places<S: BrowserSession>(
    session: &S,
    places: &[String],
    category: &str,
    max_leads: usize,
    config: &ScraperConfig,
) -> Vec<Lead> {
    let mut leads = Vec::new();

    for place in places {
        info!(%place, %category, "Scraping place");

        let handles = match load_results(session, place, category, config).await {
            Ok(handles) => handles,
            Err(e) => {
                warn!(%place, error = %e, "Skipping place");
                continue;
            }
        };

        let total = handles.len().min(max_leads);
        let before = leads.len();
        for (i, handle) in handles.iter().take(max_leads).enumerate() {
            info!(%place, card = i + 1, total, "Extracting full details");
            if let Some(lead) = extract_details(session, handle, place, config).await {
                leads.push(lead);
            }
        }
        info!(%place, extracted = leads.len() - before, attempted = total, "Finished place");
    }

    info!(count = leads.len(), places = places.len(), "Collected leads");
    leads
}

/// Assemble leads into a table with the [`LEAD_COLUMNS`] layout.
pub fn leads_to_table(leads: &[Lead]) -> Table {
    let mut table = Table::new(LEAD_COLUMNS.iter().map(|c| c.to_string()).collect());
    table.rows = leads.iter().map(Lead::to_row).collect();
    table
}

/// Lead sheet file name: `{category}_{places}_leads.csv`, with spaces in
/// each place replaced by `_` and places joined by `_`.
///
/// # Examples
///
/// ```ignore
/// let places = vec!["New York".to_string(), "Buffalo".to_string()];
/// assert_eq!(output_filename("restaurants", &places), "restaurants_New_York_Buffalo_leads.csv");
/// ```
pub fn output_filename(category: &str, places: &[String]) -> String {
    let places = places.iter().map(|p| p.replace(' ', "_")).join("_");
    format!("{category}_{places}_leads.csv")
}

/// Split comma-separated place input, trimming and dropping empty entries.
pub fn parse_places(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a lead cap. Anything that is not a plain non-negative integer
/// falls back to `default`.
pub fn parse_max_leads(input: &str, default: usize) -> usize {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return default;
    }
    input.parse().unwrap_or(default)
}
