use std::time::Duration;

use url::Url;

use crate::filters::SearchFilters;
use crate::types::{FetchError, FetchFailureKind, ListingsPage};

/// Asynchronous fetch contract the coordinator drives.
///
/// Implementations must tolerate repeated calls with equal criteria and
/// abandonment mid-flight: a superseded fetch is cancelled and its
/// outcome discarded.
#[async_trait::async_trait]
pub trait SearchFetcher<C, R>: Send + Sync {
    async fn fetch(&self, criteria: &C) -> Result<R, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Fetcher for the listings HTTP API.
///
/// Builds `{base}/listings` with the filter snapshot encoded as query
/// parameters and decodes the JSON response body. The base URL should end
/// with `/` when the API is mounted below the host root.
#[derive(Debug, Clone)]
pub struct HttpListingsFetcher {
    base: Url,
    client: reqwest::Client,
}

impl HttpListingsFetcher {
    pub fn new(base_url: &str, settings: ClientSettings) -> Result<Self, FetchError> {
        let base = Url::parse(base_url)
            .map_err(|err| FetchError::new(FetchFailureKind::InvalidRequest, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FetchFailureKind::Network, err.to_string()))?;
        Ok(Self { base, client })
    }

    fn listings_url(&self, filters: &SearchFilters) -> Result<Url, FetchError> {
        let mut url = self
            .base
            .join("listings")
            .map_err(|err| FetchError::new(FetchFailureKind::InvalidRequest, err.to_string()))?;
        let pairs = filters.query_pairs();
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in &pairs {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl SearchFetcher<SearchFilters, ListingsPage> for HttpListingsFetcher {
    async fn fetch(&self, criteria: &SearchFilters) -> Result<ListingsPage, FetchError> {
        let url = self.listings_url(criteria)?;

        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FetchFailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| FetchError::new(FetchFailureKind::Decode, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FetchFailureKind::Timeout, err.to_string());
    }
    FetchError::new(FetchFailureKind::Network, err.to_string())
}
