use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::database::CardStore;
use crate::fetcher::HttpFetcher;
use crate::models::SearchQuery;
use crate::scraper::CardScraper;
use crate::traits::DocumentFetcher;

/// Scrapes one query and records the cards the store has not seen yet
#[derive(Clone)]
pub struct CardWatcher<F = HttpFetcher> {
    scraper: CardScraper<F>,
    store: CardStore,
    query: SearchQuery,
    fetch_details: bool,
    output: Option<PathBuf>,
}

impl<F: DocumentFetcher> CardWatcher<F> {
    pub fn new(
        scraper: CardScraper<F>,
        store: CardStore,
        query: SearchQuery,
        fetch_details: bool,
    ) -> Self {
        Self {
            scraper,
            store,
            query,
            fetch_details,
            output: None,
        }
    }

    /// Also write every scraped record as JSON to `path` after each check
    #[must_use]
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn store(&self) -> &CardStore {
        &self.store
    }

    /// Returns the number of cards saved for the first time.
    pub async fn check_for_new_cards(&self) -> Result<usize> {
        let records = self
            .scraper
            .scrape_all(&self.query, self.fetch_details)
            .await?;
        let existing_ids = self.store.existing_card_ids().await?;
        let scraped_at = Utc::now();

        let mut new_cards = 0;

        for record in &records {
            if !existing_ids.contains(record.id()) {
                info!("New card found: {} - {}", record.id(), record.url());

                self.store.save_card(record, scraped_at).await?;

                new_cards += 1;
            }
        }

        if new_cards > 0 {
            info!("Found {} new cards", new_cards);
        } else {
            info!("No new cards found");
        }

        if let Some(path) = &self.output {
            tokio::fs::write(path, serde_json::to_vec_pretty(&records)?).await?;
            info!("Wrote {} cards to {}", records.len(), path.display());
        }

        Ok(new_cards)
    }
}
