//! Scraper configuration.
//!
//! Settings come from an optional YAML file; every key has a default so a
//! partial file (or none at all) is valid. Command-line flags are applied on
//! top by the caller.
//!
//! ```yaml
//! user_agent: "Mozilla/5.0"
//! headless: false
//! wait_timeout_ms: 10000
//! scroll_settle_ms: 1500
//! max_scroll_rounds: 20
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};

/// Browser and pacing settings for a scrape run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// User agent string passed to the browser at launch.
    pub user_agent: String,
    /// Run Chromium without a visible window.
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// Upper bound for every wait-until-present.
    pub wait_timeout_ms: u64,
    /// Interval between presence checks while waiting.
    pub poll_interval_ms: u64,
    /// Pause after each scroll of the result list so lazy entries render.
    pub scroll_settle_ms: u64,
    /// Pause after a card is clicked, before the detail heading is awaited.
    pub detail_settle_ms: u64,
    /// Number of scroll-to-bottom rounds per search. Always performed in full.
    pub max_scroll_rounds: u32,
    /// Lead cap per place when none is given.
    pub default_max_leads: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0".to_string(),
            headless: false,
            window_width: 1920,
            window_height: 1080,
            wait_timeout_ms: 10_000,
            poll_interval_ms: 250,
            scroll_settle_ms: 1_500,
            detail_settle_ms: 2_000,
            max_scroll_rounds: 20,
            default_max_leads: 20,
        }
    }
}

impl ScraperConfig {
    /// Read a YAML config file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] if the file cannot be read, [`ConfigError::Parse`]
    /// if it is not valid YAML for this struct.
    #[instrument(level = "info", skip_all, fields(%path))]
    pub async fn load(path: &str) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_string(),
                source,
            })?;
        let config = Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        info!(?config, "Loaded scraper configuration");
        Ok(config)
    }

    /// Parse configuration from YAML text. An empty document yields defaults.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    pub fn detail_settle(&self) -> Duration {
        Duration::from_millis(self.detail_settle_ms)
    }
}
