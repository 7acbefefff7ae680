use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use super::{element_text, parse_selector, resolve_identity, resolve_url};
use crate::error::ScrapeError;
use crate::models::{CardReference, SearchPageResult};
use crate::traits::ScraperConfig;

/// Parse one result-listing page.
///
/// Links and thumbnails are resolved against the site base URL and cards are
/// returned in document order. A missing or unreadable `X of Y` indicator
/// yields `total_pages == 0`, which is how the site renders an empty search.
///
/// # Errors
/// `Extraction` when the results container itself is missing, or when a
/// result item has no link or image. `MalformedUrl` when a card link does not
/// resolve to an identity.
pub fn extract_search_page(
    markup: &str,
    page_url: &str,
    config: &ScraperConfig,
) -> Result<SearchPageResult, ScrapeError> {
    let selectors = &config.selectors;
    let container_selector = parse_selector(&selectors.results_container)?;
    let item_selector = parse_selector(&selectors.result_item)?;
    let link_selector = parse_selector(&selectors.link)?;
    let image_selector = parse_selector(&selectors.image)?;
    let page_count_selector = parse_selector(&selectors.page_count)?;

    let document = Html::parse_document(markup);

    if document.select(&container_selector).next().is_none() {
        return Err(ScrapeError::extraction(
            page_url,
            format!("no results container matching '{}'", selectors.results_container),
        ));
    }

    let mut cards = Vec::new();
    for item in document.select(&item_selector) {
        let href = item
            .select(&link_selector)
            .find_map(|link| link.value().attr("href"))
            .ok_or_else(|| ScrapeError::extraction(page_url, "result item without a link"))?;

        let src = item
            .select(&image_selector)
            .find_map(|img| img.value().attr("src"))
            .ok_or_else(|| ScrapeError::extraction(page_url, "result item without an image"))?;

        let identity = resolve_identity(&resolve_url(&config.base_url, href)?)?;

        cards.push(CardReference {
            id: identity.id,
            url: identity.detail_url,
            image: resolve_url(&config.base_url, src)?,
        });
    }

    let total_pages = document
        .select(&page_count_selector)
        .next()
        .and_then(|indicator| parse_page_count(&element_text(indicator)))
        .unwrap_or(0);

    Ok(SearchPageResult { cards, total_pages })
}

static PAGE_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d of (\d+)").unwrap_or_else(|_| unreachable!()));

/// `Y` out of an `X of Y` indicator
fn parse_page_count(text: &str) -> Option<u32> {
    PAGE_COUNT.captures(text)?.get(1)?.as_str().parse().ok()
}
