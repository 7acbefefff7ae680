//! Traits and configuration shared by the fetcher and the scraper

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScrapeError;

/// Configuration for the card database scraper
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Base URL that relative links are resolved against
    pub base_url: String,
    /// Path of the card search listing, with trailing slash
    pub search_path: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Pause between two sequential fetches
    pub page_delay: Duration,
    /// Stop after this many search pages, if set
    pub max_pages: Option<u32>,
    /// CSS selectors for the result listing
    pub selectors: SearchSelectors,
}

/// CSS selectors for the search-result listing
#[derive(Debug, Clone)]
pub struct SearchSelectors {
    /// Container that holds the result items; absent means a layout change
    pub results_container: String,
    /// One result item within the container
    pub result_item: String,
    /// Detail page link within a result item
    pub link: String,
    /// Thumbnail within a result item
    pub image: String,
    /// Element holding the `X of Y` page indicator
    pub page_count: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.pokemon.com".to_string(),
            search_path: "/us/pokemon-tcg/pokemon-cards/".to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36"
                .to_string(),
            request_timeout: Duration::from_secs(30),
            page_delay: Duration::from_millis(500),
            max_pages: None,
            selectors: SearchSelectors::default(),
        }
    }
}

impl Default for SearchSelectors {
    fn default() -> Self {
        Self {
            results_container: "#cardResults".to_string(),
            result_item: "#cardResults li".to_string(),
            link: "a".to_string(),
            image: "img".to_string(),
            page_count: "#cards-load-more span".to_string(),
        }
    }
}

impl ScraperConfig {
    /// Search URL for a 1-based page number
    ///
    /// Page 1 is the bare search path; later pages append the page number.
    pub fn search_url(&self, query_string: &str, page: u32) -> String {
        let base = self.base_url.trim_end_matches('/');
        let mut url = if page <= 1 {
            format!("{base}{}", self.search_path)
        } else {
            format!("{base}{}{page}", self.search_path)
        };

        if !query_string.is_empty() {
            url.push('?');
            url.push_str(query_string);
        }

        url
    }
}

/// Source of raw page markup
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the markup at `url`
    ///
    /// # Errors
    /// `ScrapeError::Fetch` on transport failure or a non-success status.
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}
