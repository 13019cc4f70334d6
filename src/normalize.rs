//! Field normalizers applied to scraped and imported lead data.
//!
//! All functions here are pure. The only side effect is a `warn!` event when
//! a URL that looks like a link cannot be parsed; the original value is then
//! returned untouched so normalization never fails a record.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;
use url::Url;

/// Placeholder for a text field the detail pane did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Five digits, optionally `-` and four more, followed by a non-digit or the
/// end of the input.
static ZIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{5}(?:-\d{4})?)(?:\D|$)").expect("static ZIP pattern"));

/// Base used to resolve relative redirect links such as `/url?q=...`.
static REDIRECT_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("https://www.google.com").expect("static base URL"));

/// Extract the first US ZIP or ZIP+4 code from an address.
///
/// A candidate only counts when it is followed by a non-digit or the end of
/// the string. There is no leading boundary, so inside a longer digit run
/// the last five digits are the first position that qualifies.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(extract_zip(Some("123 Main St, Buffalo, NY 14202")), Some("14202".into()));
/// assert_eq!(extract_zip(Some("NY 14202-12345")), Some("14202".into()));
/// assert_eq!(extract_zip(None), None);
/// ```
pub fn extract_zip(address: Option<&str>) -> Option<String> {
    let address = address?;
    ZIP_RE
        .captures(address)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Reduce a link to scheme, authority and path.
///
/// Query strings and fragments are dropped, which removes tracking
/// parameters. Values that do not start with `http` or `www` (after trimming)
/// are returned unchanged, as is anything that fails to parse. Links without
/// an `http://` or `https://` scheme come back with `https://`.
///
/// The kept part is cut from the input as written: host case, ports and
/// path encoding are not rewritten. Idempotent for valid `http(s)` URLs.
pub fn canonicalize(url: &str) -> String {
    let trimmed = url.trim();
    if !(trimmed.starts_with("http") || trimmed.starts_with("www")) {
        return url.to_string();
    }

    let candidate = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed.trim_start_matches('/'))
    };
    if let Err(e) = Url::parse(&candidate) {
        warn!(%url, error = %e, "Could not parse URL; keeping original value");
        return url.to_string();
    }

    let end = candidate
        .find(|c: char| c == '?' || c == '#')
        .unwrap_or(candidate.len());
    candidate[..end].to_string()
}

fn has_http_scheme(text: &str) -> bool {
    let head = text.get(..8).unwrap_or(text).to_ascii_lowercase();
    head.starts_with("http://") || head.starts_with("https://")
}

/// Follow a redirect link to its destination.
///
/// Returns the decoded value of the first non-empty `q` query parameter,
/// otherwise the input. Relative links resolve against `www.google.com`.
pub fn unwrap_redirect(url: &str) -> String {
    let parsed = match Url::parse(url).or_else(|_| REDIRECT_BASE.join(url)) {
        Ok(parsed) => parsed,
        Err(_) => return url.to_string(),
    };

    parsed
        .query_pairs()
        .find(|(key, value)| key == "q" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
        .unwrap_or_else(|| url.to_string())
}

/// Strip non-ASCII characters and surrounding whitespace.
///
/// Missing or empty input becomes [`NOT_AVAILABLE`].
pub fn sanitize(text: Option<&str>) -> String {
    match text {
        Some(text) if !text.is_empty() => text
            .chars()
            .filter(char::is_ascii)
            .collect::<String>()
            .trim()
            .to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}
