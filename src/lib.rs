//! Scraper for the public Pokémon TCG card database
//!
//! Walks the paginated search listing to collect card references, then
//! optionally visits each card's detail page and extracts a typed [`Card`].

pub mod card_watcher;
pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod models;
pub mod scraper;
pub mod traits;

pub use crate::error::ScrapeError;
pub use crate::models::{Card, CardRecord, CardReference, SearchPageResult, SearchQuery};
pub use crate::scraper::{CardScraper, ScrapeReport};
pub use crate::traits::{DocumentFetcher, ScraperConfig};
