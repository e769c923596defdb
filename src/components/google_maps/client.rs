use super::models::{DirectionsResponse, GeocodeResponse, GeocodeResult, Origin, Route, TravelMode};
use crate::components::RoutingProvider;
use crate::error::{google_maps_error, CommuteResult};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Google Maps web services root
pub const GOOGLE_MAPS_API: &str = "https://maps.googleapis.com/maps/api";

/// Google Maps geocoding and directions client
#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl GoogleMapsClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            client: Client::new(),
            base_url: GOOGLE_MAPS_API.to_string(),
        }
    }

    /// Point the client at a different API root
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// GET a JSON web service endpoint with the API key attached
    async fn get_json<T: DeserializeOwned>(&self, service: &str, params: &[(&str, String)]) -> CommuteResult<T> {
        let mut url = Url::parse(&format!("{}/{}/json", self.base_url.trim_end_matches('/'), service))
            .map_err(|e| google_maps_error(&format!("Failed to parse URL: {}", e)))?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair("key", &self.api_key);
        }

        debug!("Google Maps {} request", service);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| google_maps_error(&format!("Failed to call {} API: {}", service, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_maps_error(&format!(
                "{} API request failed: HTTP {} - {}",
                service, status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| google_maps_error(&format!("Failed to parse {} response: {}", service, e)))
    }
}

fn status_error(service: &str, status: &str, message: Option<String>) -> crate::error::Error {
    match message {
        Some(message) => google_maps_error(&format!("{} API returned {}: {}", service, status, message)),
        None => google_maps_error(&format!("{} API returned {}", service, status)),
    }
}

#[async_trait]
impl RoutingProvider for GoogleMapsClient {
    async fn geocode(&self, address: &str) -> CommuteResult<Vec<GeocodeResult>> {
        let response: GeocodeResponse = self
            .get_json("geocode", &[("address", address.to_string())])
            .await?;

        match response.status.as_str() {
            "OK" => Ok(response.results),
            "ZERO_RESULTS" => Ok(Vec::new()),
            status => Err(status_error("Geocoding", status, response.error_message)),
        }
    }

    async fn directions(
        &self,
        origin: &Origin,
        destination: &str,
        mode: TravelMode,
        arrival: DateTime<FixedOffset>,
    ) -> CommuteResult<Option<Route>> {
        let params = [
            ("origin", origin.as_param()),
            ("destination", destination.to_string()),
            ("mode", mode.as_str().to_string()),
            ("arrival_time", arrival.timestamp().to_string()),
        ];
        let response: DirectionsResponse = self.get_json("directions", &params).await?;

        match response.status.as_str() {
            "OK" => Ok(response.routes.into_iter().next()),
            "ZERO_RESULTS" | "NOT_FOUND" => Ok(None),
            status => Err(status_error("Directions", status, response.error_message)),
        }
    }
}
