//! Browser automation seam.
//!
//! The scrapers never talk to Chromium directly. They drive a
//! [`BrowserSession`], which exposes only the operations the pipeline needs:
//!
//! | Operation | Used by |
//! |-----------|---------|
//! | [`navigate`](BrowserSession::navigate) | result loader |
//! | [`find`](BrowserSession::find) / [`find_all`](BrowserSession::find_all) | loader, detail extractor |
//! | [`scroll_to_bottom`](BrowserSession::scroll_to_bottom) | loader (virtualized list) |
//! | [`scroll_into_view`](BrowserSession::scroll_into_view) | detail extractor |
//! | [`pointer_click`](BrowserSession::pointer_click) / [`direct_click`](BrowserSession::direct_click) | detail extractor |
//! | [`page_source`](BrowserSession::page_source) | detail extractor |
//!
//! One session is launched per run and passed down by reference. Handles
//! returned by a session are only meaningful until the next navigation.

pub mod chrome;
#[cfg(test)]
pub mod fake;

pub use chrome::ChromeSession;

use crate::error::SessionError;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, instrument};

/// A live browser tab that can be navigated and inspected.
///
/// Selectors are CSS selectors.
pub trait BrowserSession {
    /// Reference to one element on the current page.
    type Handle;

    /// Load `url` in the tab.
    async fn navigate(&self, url: &str) -> Result<(), SessionError>;

    /// First element matching `selector`, if any is present right now.
    async fn find(&self, selector: &str) -> Result<Option<Self::Handle>, SessionError>;

    /// Every element matching `selector`, in document order.
    async fn find_all(&self, selector: &str) -> Result<Vec<Self::Handle>, SessionError>;

    /// Scroll a scrollable element to its bottom edge by script.
    async fn scroll_to_bottom(&self, element: &Self::Handle) -> Result<(), SessionError>;

    async fn scroll_into_view(&self, element: &Self::Handle) -> Result<(), SessionError>;

    /// Click by dispatching pointer events at the element's position.
    ///
    /// Fails when the element is obscured or has no box.
    async fn pointer_click(&self, element: &Self::Handle) -> Result<(), SessionError>;

    /// Click by invoking the element's own `click()` in page script.
    async fn direct_click(&self, element: &Self::Handle) -> Result<(), SessionError>;

    /// The currently rendered markup of the page.
    async fn page_source(&self) -> Result<String, SessionError>;
}

/// Poll until an element matching `selector` is present.
///
/// Lookup errors count as "not present yet". Gives up with
/// [`SessionError::Timeout`] once `timeout` has elapsed.
#[instrument(level = "debug", skip(session))]
pub async fn wait_for<S: BrowserSession>(
    session: &S,
    selector: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<S::Handle, SessionError> {
    let deadline = Instant::now() + timeout;
    let mut polls = 0u32;

    loop {
        polls += 1;
        match session.find(selector).await {
            Ok(Some(handle)) => {
                debug!(polls, "Element present");
                return Ok(handle);
            }
            Ok(None) => {}
            Err(e) => debug!(error = %e, "Lookup failed while waiting"),
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(SessionError::Timeout {
                selector: selector.to_string(),
                timeout,
            });
        }
        sleep(poll_interval.min(deadline - now)).await;
    }
}
