//! Error taxonomy for fetching and extraction

use thiserror::Error;

/// Every failure carries the URL being processed and the assumption that broke.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to fetch {url}: {message}")]
    Fetch {
        url: String,
        status_code: Option<u16>,
        message: String,
    },

    #[error("malformed card url '{url}': expected .../<series>/<set>/<number>/")]
    MalformedUrl { url: String },

    #[error("unknown card type '{label}' at {url}")]
    UnknownCardType { url: String, label: String },

    #[error("no HP found at {url} (hp text: '{text}')")]
    MissingHp { url: String, text: String },

    #[error("extraction failed at {url}: {reason}")]
    Extraction { url: String, reason: String },

    #[error("invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("card id mismatch for {url}: search page gave '{reference_id}', detail page gave '{detail_id}'")]
    IdentityMismatch {
        url: String,
        reference_id: String,
        detail_id: String,
    },
}

impl ScrapeError {
    pub(crate) fn extraction(url: &str, reason: impl Into<String>) -> Self {
        Self::Extraction {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    /// HTTP status of a failed fetch, if the server answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Fetch { status_code, .. } => *status_code,
            _ => None,
        }
    }
}
