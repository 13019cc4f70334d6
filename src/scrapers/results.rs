//! Google Maps result list loader.
//!
//! A Maps search renders its results into a virtualized feed that only
//! materializes more cards when scrolled. The loader searches for
//! `"{category} in {place}"`, waits for the feed, scrolls it to the bottom a
//! fixed number of times and returns every card present afterwards, in
//! ranking order.
//!
//! # URL Pattern
//!
//! `https://www.google.com/maps/search/restaurants+in+Buffalo?hl=en`

use crate::browser::{BrowserSession, wait_for};
use crate::config::ScraperConfig;
use crate::error::{LoadError, SessionError};
use tokio::time::sleep;
use tracing::{debug, info, instrument};

/// The scrollable feed holding the search results.
pub const RESULTS_CONTAINER: &str = r#"div[aria-label*="Results for"], div[role="feed"]"#;

/// One result card inside the feed.
pub const RESULT_CARD: &str = "div.Nv2PK";

const SEARCH_BASE: &str = "https://www.google.com/maps/search";

/// Build the Maps search URL for a category in a place.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     search_url("coffee shops", "New York"),
///     "https://www.google.com/maps/search/coffee+shops+in+New+York?hl=en"
/// );
/// ```
pub fn search_url(category: &str, place: &str) -> String {
    let query = urlencoding::encode(&format!("{category} in {place}")).replace("%20", "+");
    format!("{SEARCH_BASE}/{query}?hl=en")
}

/// Search and collect every result card for one place.
///
/// Always performs `config.max_scroll_rounds` scrolls, each followed by
/// `config.scroll_settle`, because the feed may lag behind the scroll
/// position. Truncating to a lead cap is left to the caller.
///
/// # Errors
///
/// - [`LoadError::ContainerNotFound`] if the feed does not appear within
///   `config.wait_timeout`
/// - [`LoadError::Session`] if navigation, scrolling or the card lookup fails
#[instrument(level = "info", skip(session, config))]
pub async fn load_results<S: BrowserSession>(
    session: &S,
    place: &str,
    category: &str,
    config: &ScraperConfig,
) -> Result<Vec<S::Handle>, LoadError> {
    let url = search_url(category, place);
    debug!(%url, "Opening search");
    session.navigate(&url).await?;

    let feed = wait_for(
        session,
        RESULTS_CONTAINER,
        config.wait_timeout(),
        config.poll_interval(),
    )
    .await
    .map_err(|e| match e {
        SessionError::Timeout { timeout, .. } => LoadError::ContainerNotFound {
            place: place.to_string(),
            timeout,
        },
        other => LoadError::Session(other),
    })?;

    let settle = config.scroll_settle();
    for round in 1..=config.max_scroll_rounds {
        session.scroll_to_bottom(&feed).await?;
        sleep(settle).await;
        debug!(round, "Scrolled result feed");
    }

    let cards = session.find_all(RESULT_CARD).await?;
    info!(count = cards.len(), %place, "Found result cards");
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{FakeCard, FakeHandle, FakePlace, FakeSession};

    fn fast_config() -> ScraperConfig {
        ScraperConfig {
            wait_timeout_ms: 40,
            poll_interval_ms: 5,
            scroll_settle_ms: 0,
            detail_settle_ms: 0,
            max_scroll_rounds: 3,
            ..ScraperConfig::default()
        }
    }

    #[test]
    fn test_search_url_encodes_query() {
        assert_eq!(
            search_url("restaurants", "Buffalo"),
            "https://www.google.com/maps/search/restaurants+in+Buffalo?hl=en"
        );
        assert_eq!(
            search_url("coffee shops", "New York"),
            "https://www.google.com/maps/search/coffee+shops+in+New+York?hl=en"
        );
        assert_eq!(
            search_url("bars & pubs", "Austin, TX"),
            "https://www.google.com/maps/search/bars+%26+pubs+in+Austin%2C+TX?hl=en"
        );
    }

    #[tokio::test]
    async fn test_load_results_scrolls_every_round_and_keeps_order() {
        let cards = (0..4).map(|_| FakeCard::with_detail("<h1>x</h1>")).collect();
        let session = FakeSession::new(vec![FakePlace::with_cards("Buffalo", cards)]);

        let handles = load_results(&session, "Buffalo", "restaurants", &fast_config())
            .await
            .unwrap();

        assert_eq!(session.scrolls(), 3);
        assert_eq!(
            handles,
            vec![
                FakeHandle::Card(0),
                FakeHandle::Card(1),
                FakeHandle::Card(2),
                FakeHandle::Card(3)
            ]
        );
        assert_eq!(
            session.navigations(),
            vec!["https://www.google.com/maps/search/restaurants+in+Buffalo?hl=en"]
        );
    }

    #[tokio::test]
    async fn test_load_results_missing_container() {
        let session = FakeSession::new(vec![FakePlace::without_container("Yonkers")]);

        let err = load_results(&session, "Yonkers", "cafes", &fast_config())
            .await
            .unwrap_err();

        assert!(matches!(err, LoadError::ContainerNotFound { ref place, .. } if place == "Yonkers"));
        assert_eq!(session.scrolls(), 0);
    }

    #[tokio::test]
    async fn test_load_results_empty_feed() {
        let session = FakeSession::new(vec![FakePlace::with_cards("Albany", vec![])]);
        let handles = load_results(&session, "Albany", "schools", &fast_config())
            .await
            .unwrap();
        assert!(handles.is_empty());
    }
}
