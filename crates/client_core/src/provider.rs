//! The remote data provider the dashboard reads from.
//!
//! Four read-only queries, each keyed by location. Implementations report any
//! failure as a [`FetchError`]; deciding what a failure means for the screen is
//! the orchestrator's job.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::LocationId,
    error::{FetchError, ProviderErrorBody},
    protocol::{Alert, ForecastPoint, HistoricalPoint, Reading},
};
use tracing::debug;
use url::Url;

use crate::config::ProviderConfig;

#[async_trait]
pub trait AirQualityProvider: Send + Sync {
    async fn current_reading(&self, location: &LocationId) -> Result<Reading, FetchError>;
    async fn historical(&self, location: &LocationId) -> Result<Vec<HistoricalPoint>, FetchError>;
    async fn forecast(&self, location: &LocationId) -> Result<Vec<ForecastPoint>, FetchError>;
    async fn alerts(&self, location: &LocationId) -> Result<Vec<Alert>, FetchError>;
}

/// Provider used when no backend is configured; every query fails.
pub struct MissingProvider;

#[async_trait]
impl AirQualityProvider for MissingProvider {
    async fn current_reading(&self, location: &LocationId) -> Result<Reading, FetchError> {
        Err(unavailable(location))
    }

    async fn historical(&self, location: &LocationId) -> Result<Vec<HistoricalPoint>, FetchError> {
        Err(unavailable(location))
    }

    async fn forecast(&self, location: &LocationId) -> Result<Vec<ForecastPoint>, FetchError> {
        Err(unavailable(location))
    }

    async fn alerts(&self, location: &LocationId) -> Result<Vec<Alert>, FetchError> {
        Err(unavailable(location))
    }
}

fn unavailable(location: &LocationId) -> FetchError {
    FetchError::transport(format!("no data provider configured for '{location}'"))
}

/// JSON-over-HTTP provider speaking the dashboard backend's API.
pub struct HttpProvider {
    http: Client,
    base_url: Url,
    history_hours: u32,
}

impl HttpProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| FetchError::transport(format!("failed to build http client: {err}")))?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: Client, config: ProviderConfig) -> Self {
        Self {
            http,
            base_url: config.base_url,
            history_hours: config.history_hours,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, resource: &str) -> String {
        format!(
            "{}/{resource}/",
            self.base_url.as_str().trim_end_matches('/')
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = self.endpoint(resource);
        debug!(%url, ?query, "provider request");
        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|err| FetchError::transport(err.to_string()))?;

        let status = res.status();
        let body = res
            .bytes()
            .await
            .map_err(|err| FetchError::transport(err.to_string()))?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        serde_json::from_slice(&body).map_err(|err| FetchError::decode(err.to_string()))
    }
}

fn status_error(status: StatusCode, body: &[u8]) -> FetchError {
    let message = serde_json::from_slice::<ProviderErrorBody>(body)
        .map(|body| body.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });
    FetchError::Status {
        status: status.as_u16(),
        message,
    }
}

fn city_query(location: &LocationId) -> Vec<(&'static str, String)> {
    vec![("city", location.as_str().to_string())]
}

#[async_trait]
impl AirQualityProvider for HttpProvider {
    async fn current_reading(&self, location: &LocationId) -> Result<Reading, FetchError> {
        let reading: Reading = self.get_json("aqi", &city_query(location)).await?;
        if !reading.index.is_finite() || reading.index < 0.0 {
            return Err(FetchError::decode(format!(
                "reading index {} is not a non-negative number",
                reading.index
            )));
        }
        Ok(reading)
    }

    async fn historical(&self, location: &LocationId) -> Result<Vec<HistoricalPoint>, FetchError> {
        let mut query = city_query(location);
        query.push(("hours", self.history_hours.to_string()));
        self.get_json("historical", &query).await
    }

    async fn forecast(&self, location: &LocationId) -> Result<Vec<ForecastPoint>, FetchError> {
        self.get_json("forecast", &city_query(location)).await
    }

    async fn alerts(&self, location: &LocationId) -> Result<Vec<Alert>, FetchError> {
        self.get_json("alerts", &city_query(location)).await
    }
}

#[cfg(test)]
#[path = "tests/provider_tests.rs"]
mod tests;
