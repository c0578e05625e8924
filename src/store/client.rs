// REST client for the backing store's abandoned-cart table.
//
// The store exposes a PostgREST-style endpoint. One logical fetch is a full
// table scan: pages of `page_size` rows ordered by creation time descending,
// requested until a short page signals exhaustion. Both the `apikey` header
// and a bearer token carry the service key.

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::store::record::CartRecord;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store returned status {status}")]
    Status { status: StatusCode },

    #[error("store service key not configured")]
    Unconfigured,
}

// ---------------------------------------------------------------------------
// RestClient
// ---------------------------------------------------------------------------

/// Low-level client for the store's REST endpoint.
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    table: String,
    service_key: String,
    page_size: usize,
}

impl RestClient {
    pub fn new(base_url: String, table: String, service_key: String, page_size: usize) -> Self {
        Self {
            http: reqwest::Client::new(),
            // Trailing slashes would produce `//rest` paths.
            base_url: base_url.trim_end_matches('/').to_string(),
            table,
            service_key,
            page_size,
        }
    }

    /// Fetch every row of the cart table, newest first.
    ///
    /// Pages through the table in fixed chunks until a page comes back with
    /// fewer rows than requested. Any non-2xx status or transport failure
    /// aborts the whole scan; partial results are never returned.
    pub async fn fetch_all(&self) -> Result<Vec<CartRecord>, StoreError> {
        let url = format!("{}/rest/v1/{}", self.base_url, self.table);
        let mut all: Vec<CartRecord> = Vec::new();
        let mut page: usize = 0;

        let limit = self.page_size.to_string();
        loop {
            let offset = (page * self.page_size).to_string();
            let response = self
                .http
                .get(&url)
                .query(&[
                    ("select", "*"),
                    ("order", "created_at.desc"),
                    ("limit", limit.as_str()),
                    ("offset", offset.as_str()),
                ])
                .header("apikey", &self.service_key)
                .bearer_auth(&self.service_key)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(StoreError::Status { status });
            }

            let batch: Vec<CartRecord> = response.json().await?;
            let batch_len = batch.len();
            debug!(page, batch_len, "fetched store page");
            all.extend(batch);

            if batch_len < self.page_size {
                break;
            }
            page += 1;
        }

        info!("store scan complete: {} rows in {} page(s)", all.len(), page + 1);
        Ok(all)
    }
}

// ---------------------------------------------------------------------------
// StoreClient wrapper
// ---------------------------------------------------------------------------

/// High-level handle that is either a configured client or a stub.
///
/// Without a service key there is nothing useful to request, so fetches fail
/// fast with `Unconfigured` instead of hitting the network and bouncing off
/// the store's auth layer.
pub enum StoreClient {
    Active(RestClient),
    Unconfigured,
}

impl StoreClient {
    /// Build a `StoreClient` from the application config.
    pub fn from_config(config: &Config) -> Self {
        match &config.credentials.service_key {
            Some(key) if !key.is_empty() => StoreClient::Active(RestClient::new(
                config.store.url.clone(),
                config.store.table.clone(),
                key.clone(),
                config.store.page_size,
            )),
            _ => StoreClient::Unconfigured,
        }
    }

    /// Run a full table scan, or fail immediately when unconfigured.
    pub async fn fetch_all(&self) -> Result<Vec<CartRecord>, StoreError> {
        match self {
            StoreClient::Active(client) => client.fetch_all().await,
            StoreClient::Unconfigured => Err(StoreError::Unconfigured),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
