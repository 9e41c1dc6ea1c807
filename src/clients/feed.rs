use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::models::sale::SaleRecord;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("feed returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("feed body is not a list of sale records: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Fetches the seed feed: a JSON array of sale records.
#[derive(Clone)]
pub struct FeedClient {
    client: Client,
    url: String,
}

impl FeedClient {
    pub fn with_shared_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch_records(&self) -> Result<Vec<SaleRecord>, FeedError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        debug!(url = %self.url, bytes = bytes.len(), "Fetched seed feed");

        Ok(serde_json::from_slice(&bytes)?)
    }
}
