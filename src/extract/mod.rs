//! Pure extraction of card data from page markup
//!
//! Nothing in here touches the network: every function takes markup (or an
//! already-parsed element) and returns a typed value or a `ScrapeError`.

pub mod card;
pub mod color;
pub mod identity;
pub mod search;

use scraper::{ElementRef, Selector};
use url::Url;

use crate::error::ScrapeError;

pub use card::extract_card;
pub use color::infer_color;
pub use identity::{CardIdentity, resolve_identity};
pub use search::extract_search_page;

/// Collapse embedded line breaks and the whitespace around them.
///
/// Each line is trimmed, blank lines are dropped and the rest are joined
/// with a single space.
pub fn normalize_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized text content of an element and all its descendants
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    normalize_text(&element.text().collect::<String>())
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{e:?}"),
    })
}

/// Resolve a possibly relative link against `base`
pub(crate) fn resolve_url(base: &str, href: &str) -> Result<String, ScrapeError> {
    let base_url = Url::parse(base).map_err(|_| ScrapeError::MalformedUrl {
        url: base.to_string(),
    })?;

    base_url
        .join(href.trim())
        .map(String::from)
        .map_err(|_| ScrapeError::MalformedUrl {
            url: href.to_string(),
        })
}
