//! Google Maps scrapers.
//!
//! Scraping a place follows a two-phase pattern:
//!
//! 1. **Loading**: [`results::load_results`] searches and scrolls the result
//!    feed, returning one handle per result card
//! 2. **Extracting**: [`details::extract_details`] opens each card and parses
//!    its detail pane into a [`crate::models::Lead`]
//!
//! | Module | Phase | Failure scope |
//! |--------|-------|---------------|
//! | [`results`] | loading | the whole place (zero leads) |
//! | [`details`] | extracting | one card (record dropped) |
//!
//! Both phases drive the same [`crate::browser::BrowserSession`] one command
//! at a time.

pub mod details;
pub mod results;
