//! Google Maps detail pane extractor.
//!
//! Clicking a result card opens its detail pane in place. Extraction runs
//! through these stages:
//!
//! ```text
//! Idle -> Activated -> DetailLoaded -> Parsed -> Done
//!   \________\______________\__________-> Failed
//! ```
//!
//! - **Activated**: the card is scrolled into view and clicked with pointer
//!   events; an obscured card falls back to a direct script click.
//! - **DetailLoaded**: the pane's `h1` heading is present.
//! - **Parsed**: the rendered markup is read and every field is looked up
//!   independently. A missing field becomes `"N/A"`; it never fails the record.
//!
//! Any failure drops the record only. [`extract_details`] is the boundary
//! where an [`ExtractError`] turns into `None`.

use crate::browser::{BrowserSession, wait_for};
use crate::config::ScraperConfig;
use crate::error::{ExtractError, ExtractStage, SessionError};
use crate::models::{Lead, RawLead};
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Heading whose presence signals that the detail pane has rendered.
pub const DETAIL_HEADING: &str = "h1";

static NAME: Lazy<Selector> = Lazy::new(|| selector("h1.DUwDvf"));
static ADDRESS: Lazy<Selector> = Lazy::new(|| selector(r#"button[data-item-id="address"]"#));
static PHONE: Lazy<Selector> = Lazy::new(|| selector(r#"button[data-item-id^="phone"]"#));
static WEBSITE: Lazy<Selector> = Lazy::new(|| selector(r#"a[data-item-id="authority"]"#));
static RATING_BLOCK: Lazy<Selector> = Lazy::new(|| selector("div.F7nice"));
static RATING: Lazy<Selector> = Lazy::new(|| selector(r#"span[aria-hidden="true"]"#));
static REVIEWS: Lazy<Selector> = Lazy::new(|| selector(r#"span[aria-label*="reviews"]"#));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Extract one lead, dropping the record on any failure.
///
/// Failures are logged with the place and the reason; the caller only sees
/// `None`.
#[instrument(level = "info", skip(session, handle, config))]
pub async fn extract_details<S: BrowserSession>(
    session: &S,
    handle: &S::Handle,
    place: &str,
    config: &ScraperConfig,
) -> Option<Lead> {
    match try_extract_details(session, handle, place, config).await {
        Ok(lead) => {
            info!(
                place = lead.place(),
                name = lead.name(),
                rating = lead.rating(),
                reviews = lead.review_count(),
                address = lead.address(),
                zip = lead.zip_code(),
                phone = lead.phone(),
                website = lead.website(),
                "Extracted lead"
            );
            Some(lead)
        }
        Err(e) => {
            warn!(%place, error = %e, "Detail fetch failed; skipping card");
            None
        }
    }
}

/// Activate a result card, wait for its detail pane and parse it.
///
/// # Errors
///
/// - [`ExtractError::ActivationFailed`] if both click strategies fail
/// - [`ExtractError::DetailTimeout`] if the heading never appears
/// - [`ExtractError::Session`] for any other browser failure
pub async fn try_extract_details<S: BrowserSession>(
    session: &S,
    handle: &S::Handle,
    place: &str,
    config: &ScraperConfig,
) -> Result<Lead, ExtractError> {
    activate(session, handle).await?;

    let settle = config.detail_settle();
    if !settle.is_zero() {
        sleep(settle).await;
    }

    wait_for(
        session,
        DETAIL_HEADING,
        config.wait_timeout(),
        config.poll_interval(),
    )
    .await
    .map_err(|e| match e {
        SessionError::Timeout { timeout, .. } => ExtractError::DetailTimeout { timeout },
        source => ExtractError::Session {
            stage: ExtractStage::DetailLoad,
            source,
        },
    })?;

    let html = session
        .page_source()
        .await
        .map_err(|source| ExtractError::Session {
            stage: ExtractStage::Parse,
            source,
        })?;
    debug!(bytes = html.len(), preview = %truncate_for_log(&html, 200), "Read detail markup");

    Ok(parse_detail(&html, place))
}

/// Scroll the card into view and click it, falling back to a direct click.
async fn activate<S: BrowserSession>(session: &S, handle: &S::Handle) -> Result<(), ExtractError> {
    if let Err(e) = session.scroll_into_view(handle).await {
        debug!(error = %e, "Could not scroll card into view");
    }

    match session.pointer_click(handle).await {
        Ok(()) => Ok(()),
        Err(pointer) => {
            debug!(error = %pointer, "Pointer click rejected; using direct click");
            session
                .direct_click(handle)
                .await
                .map_err(|direct| ExtractError::ActivationFailed {
                    pointer: pointer.to_string(),
                    direct: direct.to_string(),
                })
        }
    }
}

/// Parse a rendered detail pane into a [`Lead`].
///
/// Every field is looked up on its own. Rating and review count both come
/// from the `F7nice` summary block; without it both are `"N/A"`.
pub fn parse_detail(html: &str, place: &str) -> Lead {
    let document = Html::parse_document(html);

    let (rating, review_count) = match document.select(&RATING_BLOCK).next() {
        Some(block) => (
            block.select(&RATING).next().map(element_text),
            block
                .select(&REVIEWS)
                .next()
                .and_then(|span| span.value().attr("aria-label"))
                .and_then(|label| label.split_whitespace().next())
                .map(str::to_string),
        ),
        None => (None, None),
    };

    Lead::from_raw(RawLead {
        place: place.to_string(),
        name: first_text(&document, &NAME),
        rating,
        review_count,
        address: first_text(&document, &ADDRESS),
        phone: first_text(&document, &PHONE),
        website: document
            .select(&WEBSITE)
            .next()
            .and_then(|link| link.value().attr("href"))
            .map(str::to_string),
    })
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(element_text)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{FakeCard, FakeHandle, FakePlace, FakeSession};
    use crate::normalize::NOT_AVAILABLE;

    const FULL_PANE: &str = r#"
        <html><body>
          <div role="main">
            <h1 class="DUwDvf lfPIob">Anchor Bar ★</h1>
            <div class="F7nice">
              <span><span aria-hidden="true">4.3</span></span>
              <span><span role="img" aria-label="9,120 reviews">(9,120)</span></span>
            </div>
            <button data-item-id="address"><div>&#xe0c8;</div><div>1047 Main St, Buffalo, NY 14209</div></button>
            <a data-item-id="authority" href="https://www.google.com/url?q=https://anchorbar.com/?utm_source=gmb&amp;opi=1">anchorbar.com</a>
            <button data-item-id="phone:tel:+17168831134"><div>(716) 883-1134</div></button>
          </div>
        </body></html>
    "#;

    fn fast_config() -> ScraperConfig {
        ScraperConfig {
            wait_timeout_ms: 30,
            poll_interval_ms: 5,
            scroll_settle_ms: 0,
            detail_settle_ms: 0,
            ..ScraperConfig::default()
        }
    }

    async fn session_with(card: FakeCard) -> FakeSession {
        let session = FakeSession::new(vec![FakePlace::with_cards("Buffalo", vec![card])]);
        session.navigate("https://maps.example/Buffalo").await.unwrap();
        session
    }

    #[test]
    fn test_parse_detail_full_pane() {
        let lead = parse_detail(FULL_PANE, "Buffalo");
        assert_eq!(lead.place(), "Buffalo");
        assert_eq!(lead.name(), "Anchor Bar");
        assert_eq!(lead.rating(), "4.3");
        assert_eq!(lead.review_count(), "9,120");
        assert_eq!(lead.address(), "1047 Main St, Buffalo, NY 14209");
        assert_eq!(lead.zip_code(), Some("14209"));
        assert_eq!(lead.phone(), "(716) 883-1134");
        assert_eq!(lead.website(), "https://anchorbar.com/");
    }

    #[test]
    fn test_parse_detail_without_rating_block() {
        let html = r#"<h1 class="DUwDvf">Quiet Cafe</h1>
            <button data-item-id="address">9 Elm St, Yonkers, NY 10701</button>"#;
        let lead = parse_detail(html, "Yonkers");
        assert_eq!(lead.name(), "Quiet Cafe");
        assert_eq!(lead.rating(), NOT_AVAILABLE);
        assert_eq!(lead.review_count(), NOT_AVAILABLE);
        assert_eq!(lead.phone(), NOT_AVAILABLE);
        assert_eq!(lead.website(), NOT_AVAILABLE);
        assert_eq!(lead.zip_code(), Some("10701"));
    }

    #[test]
    fn test_parse_detail_rating_without_reviews() {
        let html = r#"<h1 class="DUwDvf">New Spot</h1>
            <div class="F7nice"><span aria-hidden="true">5.0</span></div>"#;
        let lead = parse_detail(html, "Buffalo");
        assert_eq!(lead.rating(), "5.0");
        assert_eq!(lead.review_count(), NOT_AVAILABLE);
    }

    #[test]
    fn test_parse_detail_unrelated_heading() {
        let lead = parse_detail("<h1>Results</h1>", "Buffalo");
        assert_eq!(lead.name(), NOT_AVAILABLE);
        assert_eq!(lead.address(), NOT_AVAILABLE);
        assert_eq!(lead.zip_code(), None);
    }

    #[tokio::test]
    async fn test_extract_details_success() {
        let session = session_with(FakeCard::with_detail(FULL_PANE)).await;
        let lead = extract_details(&session, &FakeHandle::Card(0), "Buffalo", &fast_config()).await;
        assert_eq!(lead.unwrap().name(), "Anchor Bar");
        assert_eq!(session.direct_clicks(), 0);
    }

    #[tokio::test]
    async fn test_obscured_card_falls_back_to_direct_click() {
        let session = session_with(FakeCard::obscured(FULL_PANE)).await;
        let lead = try_extract_details(&session, &FakeHandle::Card(0), "Buffalo", &fast_config())
            .await
            .unwrap();
        assert_eq!(lead.phone(), "(716) 883-1134");
        assert_eq!(session.direct_clicks(), 1);
    }

    #[tokio::test]
    async fn test_unclickable_card_is_activation_failure() {
        let session = session_with(FakeCard::unclickable()).await;
        let err = try_extract_details(&session, &FakeHandle::Card(0), "Buffalo", &fast_config())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::ActivationFailed { .. }));

        let lead = extract_details(&session, &FakeHandle::Card(0), "Buffalo", &fast_config()).await;
        assert!(lead.is_none());
    }

    #[tokio::test]
    async fn test_missing_heading_is_detail_timeout() {
        let session = session_with(FakeCard::with_detail("<div>still loading</div>")).await;
        let err = try_extract_details(&session, &FakeHandle::Card(0), "Buffalo", &fast_config())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::DetailTimeout { .. }));
    }

    #[tokio::test]
    async fn test_stale_handle_yields_none() {
        let session = session_with(FakeCard::with_detail(FULL_PANE)).await;
        let lead = extract_details(&session, &FakeHandle::Card(7), "Buffalo", &fast_config()).await;
        assert!(lead.is_none());
    }
}
