//! Data models for scraped business listings.
//!
//! - [`RawLead`]: field values as read from a detail pane, before cleanup
//! - [`Lead`]: the normalized, immutable record written to the lead sheet
//!
//! A [`Lead`] can only be built through [`Lead::from_raw`], which sanitizes
//! the text fields, unwraps and canonicalizes the website and derives the
//! ZIP code from the address.

use crate::normalize::{NOT_AVAILABLE, canonicalize, extract_zip, sanitize, unwrap_redirect};

/// Column headers of the lead sheet, in output order.
///
/// `Zip Code` sits directly after `Address`, the same placement the batch
/// cleaner enforces on imported tables.
pub const LEAD_COLUMNS: [&str; 8] = [
    "Place", "Name", "Rating", "Reviews", "Address", "Zip Code", "Phone", "Website",
];

/// Field values exactly as found on a detail pane.
///
/// `None` means the element was not present in the markup.
#[derive(Debug, Default, Clone)]
pub struct RawLead {
    /// The search locality the card was found under.
    pub place: String,
    pub name: Option<String>,
    pub rating: Option<String>,
    pub review_count: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// The `href` of the website link, possibly a Google redirect.
    pub website: Option<String>,
}

/// One normalized business listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    place: String,
    name: String,
    rating: String,
    review_count: String,
    address: String,
    zip_code: Option<String>,
    phone: String,
    website: String,
}

impl Lead {
    /// Normalize a [`RawLead`] into a [`Lead`].
    ///
    /// Missing text fields become `"N/A"`. The website is redirect-unwrapped
    /// and stripped of query and fragment. The ZIP code is derived from the
    /// sanitized address and is `None` when no ZIP pattern is present.
    pub fn from_raw(raw: RawLead) -> Self {
        let address = sanitize(raw.address.as_deref());
        let zip_code = extract_zip(Some(&address));
        let website = raw
            .website
            .as_deref()
            .filter(|href| !href.trim().is_empty())
            .map(|href| canonicalize(&unwrap_redirect(href)))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Lead {
            place: sanitize(Some(&raw.place)),
            name: sanitize(raw.name.as_deref()),
            rating: present_or_na(raw.rating),
            review_count: present_or_na(raw.review_count),
            address,
            zip_code,
            phone: sanitize(raw.phone.as_deref()),
            website,
        }
    }

    pub fn place(&self) -> &str {
        &self.place
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rating(&self) -> &str {
        &self.rating
    }

    pub fn review_count(&self) -> &str {
        &self.review_count
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn zip_code(&self) -> Option<&str> {
        self.zip_code.as_deref()
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn website(&self) -> &str {
        &self.website
    }

    /// Cell values in [`LEAD_COLUMNS`] order. An absent ZIP is an empty cell.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.place.clone(),
            self.name.clone(),
            self.rating.clone(),
            self.review_count.clone(),
            self.address.clone(),
            self.zip_code.clone().unwrap_or_default(),
            self.phone.clone(),
            self.website.clone(),
        ]
    }
}

fn present_or_na(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}
