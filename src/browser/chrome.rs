//! Chromium-backed [`BrowserSession`] built on `chromiumoxide`.
//!
//! The browser is launched once per run with the configured user agent and
//! with Blink's `AutomationControlled` feature disabled. All commands go to a
//! single tab. The CDP event handler runs on its own task for the lifetime of
//! the session.

use super::BrowserSession;
use crate::config::ScraperConfig;
use crate::error::SessionError;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

const SCROLL_TO_BOTTOM_JS: &str = "function() { this.scrollTop = this.scrollHeight; }";
const DIRECT_CLICK_JS: &str = "function() { this.click(); }";

/// An owned Chromium process with one open tab.
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl std::fmt::Debug for ChromeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromeSession").finish_non_exhaustive()
    }
}

impl ChromeSession {
    /// Launch Chromium and open a blank tab.
    ///
    /// # Errors
    ///
    /// [`SessionError::Launch`] if the browser cannot be started or the tab
    /// cannot be opened.
    #[instrument(level = "info", skip_all, fields(headless = config.headless))]
    pub async fn launch(config: &ScraperConfig) -> Result<Self, SessionError> {
        let mut builder = BrowserConfig::builder()
            .arg("--disable-blink-features=AutomationControlled")
            .arg(format!("--user-agent={}", config.user_agent))
            .window_size(config.window_width, config.window_height);
        if !config.headless {
            builder = builder.with_head();
        }
        let browser_config = builder.build().map_err(SessionError::Launch)?;

        let (browser, mut events) = Browser::launch(browser_config)
            .await
            .map_err(|e| SessionError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "CDP handler event error");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| SessionError::Launch(e.to_string()))?;

        info!(user_agent = %config.user_agent, "Browser session launched");
        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    /// Close the browser and stop the event handler.
    #[instrument(level = "info", skip_all)]
    pub async fn close(mut self) -> Result<(), SessionError> {
        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| SessionError::command("close", e));
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "Browser process did not exit cleanly");
        }
        self.handler.abort();
        info!("Browser session closed");
        closed
    }
}

impl BrowserSession for ChromeSession {
    type Handle = Element;

    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.page
            .goto(url)
            .await
            .map(|_| ())
            .map_err(|e| SessionError::command("navigate", e))
    }

    async fn find(&self, selector: &str) -> Result<Option<Element>, SessionError> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Element>, SessionError> {
        self.page
            .find_elements(selector)
            .await
            .map_err(|e| SessionError::command("find elements", e))
    }

    async fn scroll_to_bottom(&self, element: &Element) -> Result<(), SessionError> {
        element
            .call_js_fn(SCROLL_TO_BOTTOM_JS, false)
            .await
            .map(|_| ())
            .map_err(|e| SessionError::command("scroll to bottom", e))
    }

    async fn scroll_into_view(&self, element: &Element) -> Result<(), SessionError> {
        element
            .scroll_into_view()
            .await
            .map(|_| ())
            .map_err(|e| SessionError::command("scroll into view", e))
    }

    async fn pointer_click(&self, element: &Element) -> Result<(), SessionError> {
        element
            .click()
            .await
            .map(|_| ())
            .map_err(|e| SessionError::command("pointer click", e))
    }

    async fn direct_click(&self, element: &Element) -> Result<(), SessionError> {
        element
            .call_js_fn(DIRECT_CLICK_JS, false)
            .await
            .map(|_| ())
            .map_err(|e| SessionError::command("direct click", e))
    }

    async fn page_source(&self) -> Result<String, SessionError> {
        self.page
            .content()
            .await
            .map_err(|e| SessionError::command("read page source", e))
    }
}
