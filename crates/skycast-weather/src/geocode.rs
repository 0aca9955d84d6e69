//! Forward geocoding: resolve a typed place name to candidate coordinates.
//! Uses the Open-Meteo geocoding API - free, no API key required.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::types::{PlaceCandidate, Service, WeatherError};

const USER_AGENT: &str = concat!("SkyCast/", env!("CARGO_PKG_VERSION"));

/// Place lookups used by autocomplete and by the primary search.
pub trait PlaceLookup: Send + Sync + 'static {
    /// Up to `max_results` candidates for a partial name, in provider
    /// relevance order. Fails with [`WeatherError::Cancelled`] once `cancel`
    /// fires; an empty result set is `Ok(vec![])`.
    fn suggest(
        &self,
        query: &str,
        max_results: usize,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Vec<PlaceCandidate>, WeatherError>> + Send;

    /// The single best match for an explicit search.
    /// Fails with [`WeatherError::NotFound`] when nothing matches.
    fn locate(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<PlaceCandidate, WeatherError>> + Send;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    // Omitted entirely by the API when nothing matches
    results: Option<Vec<PlaceCandidate>>,
}

/// Cancellable client for the geocoding search endpoint.
///
/// Never retries: a failed lookup is reported once and the caller decides.
#[derive(Debug, Clone)]
pub struct GeoSuggestClient {
    client: Arc<Client>,
    search_url: String,
    language: String,
}

impl GeoSuggestClient {
    pub fn new(base_url: &str, language: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            search_url: format!("{}/v1/search", base_url.trim_end_matches('/')),
            language: language.to_string(),
        })
    }

    async fn search(&self, name: &str, count: usize) -> Result<Vec<PlaceCandidate>, WeatherError> {
        let count = count.to_string();
        let response = self
            .client
            .get(&self.search_url)
            .query(&[
                ("name", name),
                ("count", count.as_str()),
                ("language", self.language.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Geocoding returned status {}", status);
            return Err(WeatherError::ServiceUnavailable {
                service: Service::Geocoding,
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.results.unwrap_or_default())
    }
}

impl PlaceLookup for GeoSuggestClient {
    async fn suggest(
        &self,
        query: &str,
        max_results: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<PlaceCandidate>, WeatherError> {
        // Dropping the search future aborts the underlying connection.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Suggestion lookup for {:?} cancelled", query);
                Err(WeatherError::Cancelled)
            }
            result = self.search(query, max_results) => result,
        }
    }

    async fn locate(&self, name: &str) -> Result<PlaceCandidate, WeatherError> {
        let place = self
            .search(name, 1)
            .await?
            .into_iter()
            .next()
            .ok_or(WeatherError::NotFound)?;

        tracing::info!(
            "Located {:?} at {}, {}",
            place.name,
            place.latitude,
            place.longitude
        );
        Ok(place)
    }
}
