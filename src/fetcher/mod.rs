use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::ScrapeError;
use crate::traits::{DocumentFetcher, ScraperConfig};

/// HTTP document fetcher backed by a shared `reqwest` client
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ScrapeError::Fetch {
                url: config.base_url.clone(),
                status_code: None,
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Fetch {
                url: url.to_string(),
                status_code: Some(status.as_u16()),
                message: status.to_string(),
            });
        }

        response.text().await.map_err(|e| transport_error(url, &e))
    }
}

fn transport_error(url: &str, err: &reqwest::Error) -> ScrapeError {
    ScrapeError::Fetch {
        url: url.to_string(),
        status_code: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
    }
}
