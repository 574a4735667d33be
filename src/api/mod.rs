use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::record::{OrderRecord, ProductionRecord, StockRecord, TeamRecord};

/// The four collections the dashboard reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Productions,
    Orders,
    Stocks,
    Teams,
}

impl Collection {
    /// Path relative to the base url.
    pub fn path(self) -> &'static str {
        match self {
            Collection::Productions => "productions/flat",
            Collection::Orders => "commandes",
            Collection::Stocks => "stocks",
            Collection::Teams => "equipes",
        }
    }
}

/// Productions with their order nested under `commande`.
const JOINED_PRODUCTIONS_PATH: &str = "productions";

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// No timeout is applied unless one is given.
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let base_url = parse_base_url(base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(FetchError::ClientBuild)?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub async fn fetch_productions(&self) -> Result<Vec<ProductionRecord>, FetchError> {
        self.fetch_collection(Collection::Productions.path()).await
    }

    pub async fn fetch_joined_productions(&self) -> Result<Vec<ProductionRecord>, FetchError> {
        self.fetch_collection(JOINED_PRODUCTIONS_PATH).await
    }

    pub async fn fetch_orders(&self) -> Result<Vec<OrderRecord>, FetchError> {
        self.fetch_collection(Collection::Orders.path()).await
    }

    pub async fn fetch_stocks(&self) -> Result<Vec<StockRecord>, FetchError> {
        self.fetch_collection(Collection::Stocks.path()).await
    }

    pub async fn fetch_teams(&self) -> Result<Vec<TeamRecord>, FetchError> {
        self.fetch_collection(Collection::Teams.path()).await
    }

    async fn fetch_collection<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, FetchError> {
        let endpoint = format!("/{path}");
        let url = self
            .base_url
            .join(path)
            .map_err(|error| FetchError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: error.to_string(),
            })?;

        debug!(%url, "fetching collection");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %endpoint, status = status.as_u16(), "backend rejected request");
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;
        let items: Vec<Value> =
            serde_json::from_slice(&body).map_err(|error| FetchError::Decode {
                endpoint: endpoint.clone(),
                reason: error.to_string(),
            })?;

        Ok(decode_items(&endpoint, items))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, FetchError> {
    let invalid = |reason: String| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    // join() drops the last path segment unless it ends with a slash
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }

    let url = Url::parse(&normalized).map_err(|error| invalid(error.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(url)
}

/// Decodes every element on its own; elements that are not records are
/// logged and skipped.
fn decode_items<T: DeserializeOwned>(
    endpoint: &str,
    items: Vec<Value>,
) -> Vec<T> {
    let received = items.len();
    let records: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(endpoint, index, %error, "skipping malformed record");
                None
            }
        })
        .collect();

    info!(
        endpoint,
        records = records.len(),
        skipped = received - records.len(),
        "fetched collection"
    );
    records
}
