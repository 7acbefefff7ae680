//! Environment-driven application configuration
//!
//! Read after `dotenvy::dotenv()`, so a `.env` file works as well:
//!
//! | Variable            | Default                    |
//! |---------------------|----------------------------|
//! | `TCG_BASE_URL`      | `https://www.pokemon.com`  |
//! | `TCG_QUERY`         | empty (all cards)          |
//! | `TCG_FETCH_DETAILS` | `false`                    |
//! | `TCG_DATABASE_URL`  | `sqlite:database/cards.db` |
//! | `TCG_SCHEDULE`      | unset (run once)           |
//! | `TCG_PAGE_DELAY_MS` | `500`                      |
//! | `TCG_MAX_PAGES`     | unset (no limit)           |
//! | `TCG_OUTPUT`        | unset (no JSON file)       |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use crate::models::SearchQuery;
use crate::traits::ScraperConfig;

const DEFAULT_DATABASE_URL: &str = "sqlite:database/cards.db";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub query: SearchQuery,
    pub fetch_details: bool,
    pub database_url: String,
    /// Cron expression (with seconds) for repeated checks
    pub schedule: Option<String>,
    pub output: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut scraper = ScraperConfig::default();
        if let Some(base_url) = get("TCG_BASE_URL") {
            url::Url::parse(&base_url)
                .with_context(|| format!("TCG_BASE_URL is not a valid URL: {base_url}"))?;
            scraper.base_url = base_url;
        }
        if let Some(delay) = get("TCG_PAGE_DELAY_MS") {
            scraper.page_delay = Duration::from_millis(parse_var("TCG_PAGE_DELAY_MS", &delay)?);
        }
        if let Some(max_pages) = get("TCG_MAX_PAGES") {
            let max_pages: u32 = parse_var("TCG_MAX_PAGES", &max_pages)?;
            if max_pages == 0 {
                return Err(anyhow!("TCG_MAX_PAGES must be at least 1"));
            }
            scraper.max_pages = Some(max_pages);
        }

        let fetch_details = match get("TCG_FETCH_DETAILS") {
            Some(value) => parse_bool("TCG_FETCH_DETAILS", &value)?,
            None => false,
        };

        Ok(Self {
            scraper,
            query: get("TCG_QUERY")
                .map(|raw| SearchQuery::parse(&raw))
                .unwrap_or_default(),
            fetch_details,
            database_url: get("TCG_DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            schedule: get("TCG_SCHEDULE"),
            output: get("TCG_OUTPUT").map(PathBuf::from),
        })
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("{key} has an invalid value: {value}"))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("{key} must be true or false, got: {value}")),
    }
}
