//! Command-line interface definitions for Maps Leads.
//!
//! Two subcommands:
//!
//! - `scrape`: search Google Maps and write a lead sheet
//! - `clean`: normalize an existing lead sheet
//!
//! Scrape inputs left off the command line are prompted for interactively.

use crate::cleaning::CleanColumns;
use crate::config::ScraperConfig;
use crate::pipeline::{parse_max_leads, parse_places};
use clap::{Args, Parser, Subcommand};
use dialoguer::Input;
use std::path::PathBuf;

/// Command-line arguments for the Maps Leads application.
///
/// # Examples
///
/// ```sh
/// # Prompt for everything
/// maps_leads scrape
///
/// # Fully scripted
/// maps_leads scrape -p "New York, Buffalo" -c restaurants -n 30 --headless
///
/// # Clean an earlier sheet
/// maps_leads clean restaurants_New_York_Buffalo_leads.csv --name-col Name
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape listings from Google Maps into a CSV lead sheet
    Scrape(ScrapeArgs),
    /// Extract ZIP codes and clean website links in an existing CSV
    Clean(CleanArgs),
}

#[derive(Args, Debug)]
pub struct ScrapeArgs {
    /// Places to search, separated by commas
    #[arg(short, long)]
    pub places: Option<String>,

    /// Business category (restaurants, cafes, schools, ...)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Number of leads per place; non-numeric values fall back to the default
    #[arg(short = 'n', long)]
    pub max_leads: Option<String>,

    /// Scroll rounds per search (overrides the config file)
    #[arg(long)]
    pub max_scrolls: Option<u32>,

    /// Directory the lead sheet is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Optional path to a YAML scraper config
    #[arg(long, env = "MAPS_LEADS_CONFIG")]
    pub config: Option<String>,

    /// Browser user agent (overrides the config file)
    #[arg(long, env = "MAPS_LEADS_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// CSV file to clean
    pub input: PathBuf,

    /// Column holding the business name
    #[arg(long, default_value = "Place")]
    pub name_col: String,

    /// Column holding the street address
    #[arg(long, default_value = "Address")]
    pub address_col: String,

    /// Column holding the website link
    #[arg(long, default_value = "Website")]
    pub website_col: String,

    /// Where the cleaned CSV is written
    #[arg(short, long, default_value = "cleaned_restaurants_output.csv")]
    pub output: PathBuf,
}

/// Fully resolved inputs of a scrape run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeInputs {
    pub places: Vec<String>,
    pub category: String,
    pub max_leads: usize,
}

impl ScrapeArgs {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut ScraperConfig) {
        if let Some(rounds) = self.max_scrolls {
            config.max_scroll_rounds = rounds;
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }
        if self.headless {
            config.headless = true;
        }
    }

    /// Resolve places, category and lead cap, prompting for any that were
    /// not passed as flags.
    pub fn resolve_inputs(&self, default_max_leads: usize) -> Result<ScrapeInputs, dialoguer::Error> {
        let places = match &self.places {
            Some(places) => places.clone(),
            None => prompt("Enter place(s), separated by commas", false)?,
        };
        let category = match &self.category {
            Some(category) => category.clone(),
            None => prompt("Enter category (restaurants, cafes, schools, etc.)", false)?,
        };
        let max_leads = match &self.max_leads {
            Some(max_leads) => max_leads.clone(),
            None => prompt("Enter number of leads per place", true)?,
        };

        Ok(ScrapeInputs {
            places: parse_places(&places),
            category: category.trim().to_string(),
            max_leads: parse_max_leads(&max_leads, default_max_leads),
        })
    }
}

impl CleanArgs {
    pub fn columns(&self) -> CleanColumns {
        CleanColumns {
            name: self.name_col.clone(),
            address: self.address_col.clone(),
            website: self.website_col.clone(),
        }
    }
}

fn prompt(text: &str, allow_empty: bool) -> Result<String, dialoguer::Error> {
    Input::<String>::new()
        .with_prompt(text)
        .allow_empty(allow_empty)
        .interact_text()
}
