//! Sequential pagination driver over the card database
//!
//! Every fetch completes before the next one starts, in page order and then
//! document order, so the output order always equals discovery order.

use tracing::{info, warn};

use crate::error::ScrapeError;
use crate::extract::{extract_card, extract_search_page};
use crate::fetcher::HttpFetcher;
use crate::models::{Card, CardRecord, CardReference, SearchPageResult, SearchQuery};
use crate::traits::{DocumentFetcher, ScraperConfig};

/// Outcome of a scrape that keeps going past failing detail pages
#[derive(Debug, Default)]
pub struct ScrapeReport {
    /// One entry per discovered card, in discovery order. Cards whose detail
    /// page failed are kept as their search-page reference.
    pub records: Vec<CardRecord>,
    pub failures: Vec<ScrapeError>,
}

#[derive(Clone)]
pub struct CardScraper<F = HttpFetcher> {
    fetcher: F,
    config: ScraperConfig,
}

impl CardScraper<HttpFetcher> {
    pub fn new(config: ScraperConfig) -> Result<Self, ScrapeError> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self { fetcher, config })
    }
}

impl<F: DocumentFetcher> CardScraper<F> {
    pub fn with_fetcher(fetcher: F, config: ScraperConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Fetch and parse one search-result page
    pub async fn scrape_search_page(&self, url: &str) -> Result<SearchPageResult, ScrapeError> {
        let markup = self.fetcher.fetch(url).await?;
        extract_search_page(&markup, url, &self.config)
    }

    /// Fetch and parse one card detail page
    pub async fn scrape_card(&self, url: &str) -> Result<Card, ScrapeError> {
        let markup = self.fetcher.fetch(url).await?;
        extract_card(&markup, url)
    }

    /// Walk every search page for `query` and collect the card references.
    ///
    /// Returns an empty list without further requests when page 1 reports
    /// zero pages.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<CardReference>, ScrapeError> {
        let query_string = query.to_query_string();
        let first_url = self.config.search_url(&query_string, 1);

        info!("Fetching search page 1: {}", first_url);
        let first = self.scrape_search_page(&first_url).await?;

        if first.total_pages == 0 {
            info!("No cards match {}", first_url);
            return Ok(Vec::new());
        }

        // A cap below 1 still returns page 1, so it counts as 1.
        let last_page = match self.config.max_pages.map(|max| max.max(1)) {
            Some(max) if max < first.total_pages => {
                info!(
                    "Reached maximum page limit ({}) of {} pages for {}",
                    max, first.total_pages, first_url
                );
                max
            }
            _ => first.total_pages,
        };

        let mut cards = first.cards;
        for page in 2..=last_page {
            self.pause().await;

            let url = self.config.search_url(&query_string, page);
            info!("Fetching search page {} of {}: {}", page, last_page, url);

            let result = self.scrape_search_page(&url).await?;
            cards.extend(result.cards);
        }

        info!("Found {} cards across {} pages", cards.len(), last_page);
        Ok(cards)
    }

    /// Collect every card matching `query`, optionally with full details.
    ///
    /// The first failure of any fetch or extraction aborts the whole call.
    pub async fn scrape_all(
        &self,
        query: &SearchQuery,
        fetch_details: bool,
    ) -> Result<Vec<CardRecord>, ScrapeError> {
        let references = self.search(query).await?;

        if !fetch_details {
            return Ok(references.into_iter().map(CardRecord::Reference).collect());
        }

        let total = references.len();
        let mut records = Vec::with_capacity(total);
        for (index, reference) in references.into_iter().enumerate() {
            self.pause().await;

            info!("Fetching card {} of {}: {}", index + 1, total, reference.id);
            let card = self.scrape_card(&reference.url).await?;
            records.push(CardRecord::Card(Box::new(reference.merge(card)?)));
        }

        Ok(records)
    }

    /// Like [`scrape_all`](Self::scrape_all), but a failing detail page is
    /// recorded and its reference kept instead of aborting the run.
    ///
    /// Search page failures still abort, since the card list would be
    /// incomplete.
    pub async fn scrape_all_collecting(
        &self,
        query: &SearchQuery,
        fetch_details: bool,
    ) -> Result<ScrapeReport, ScrapeError> {
        let references = self.search(query).await?;

        if !fetch_details {
            return Ok(ScrapeReport {
                records: references.into_iter().map(CardRecord::Reference).collect(),
                failures: Vec::new(),
            });
        }

        let total = references.len();
        let mut report = ScrapeReport::default();
        for (index, reference) in references.into_iter().enumerate() {
            self.pause().await;

            info!("Fetching card {} of {}: {}", index + 1, total, reference.id);
            let detailed = match self.scrape_card(&reference.url).await {
                Ok(card) => reference.clone().merge(card),
                Err(e) => Err(e),
            };

            match detailed {
                Ok(card) => report.records.push(CardRecord::Card(Box::new(card))),
                Err(e) => {
                    warn!("Keeping reference for {}: {}", reference.id, e);
                    report.failures.push(e);
                    report.records.push(CardRecord::Reference(reference));
                }
            }
        }

        info!(
            "Scraped {} cards with {} failures",
            report.records.len() - report.failures.len(),
            report.failures.len()
        );
        Ok(report)
    }

    async fn pause(&self) {
        if !self.config.page_delay.is_zero() {
            tokio::time::sleep(self.config.page_delay).await;
        }
    }
}
