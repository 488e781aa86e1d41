use reqwest::header::ACCEPT;

use super::departure::{Departure, find_departure};
use super::error::LookupError;
use crate::config::LookupConfig;

/// HTTP client for the airport's real-time departure board.
#[derive(Debug, Clone)]
pub struct DepartureClient {
    url: String,
    client: reqwest::Client,
}

impl DepartureClient {
    /// Builds a client for the endpoint, airport and ordering in `config`.
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            url: config.departures_url(),
            client,
        })
    }

    /// Fetches today's departures, ordered by scheduled departure time.
    pub async fn fetch_departures(&self) -> Result<Vec<Departure>, LookupError> {
        tracing::debug!(url = %self.url, "fetching departures");
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Status { status, body });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetches the board and returns the departure matching `flight`, if any.
    pub async fn lookup_flight(&self, flight: &str) -> Result<Option<Departure>, LookupError> {
        let departures = self.fetch_departures().await?;
        let found = find_departure(&departures, flight).cloned();
        tracing::info!(
            flight,
            departures = departures.len(),
            matched = found.is_some(),
            "flight lookup finished"
        );
        Ok(found)
    }
}
