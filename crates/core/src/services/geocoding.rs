//! Address geocoding collaborator.
//!
//! Disabled unless configured; hotels are stored without coordinates in
//! that case.

use serde::Deserialize;
use stayhub_common::{AppError, AppResult, config::GeocodingConfig};

/// Resolved coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Geocoding service over a Nominatim-style search endpoint.
#[derive(Clone)]
pub struct GeocodingService {
    config: GeocodingConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    lat: String,
    lon: String,
}

impl GeocodingService {
    /// Create a new geocoding service.
    #[must_use]
    pub fn new(config: GeocodingConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Resolve address fields to coordinates.
    pub async fn resolve(
        &self,
        address: &str,
        city: &str,
        state: &str,
        country: &str,
        zip_code: Option<&str>,
    ) -> AppResult<Coordinates> {
        let query = [Some(address), Some(city), Some(state), Some(country), zip_code]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        let mut request = self
            .http_client
            .get(&self.config.endpoint)
            .query(&[("q", query.as_str()), ("format", "json"), ("limit", "1")]);

        if let Some(ref key) = self.config.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Geocoding request failed");
            AppError::ExternalService(
                "Failed to geocode address. Please check the address and try again.".to_string(),
            )
        })?;

        let hits: Vec<GeocodeHit> = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "Geocoding response malformed");
            AppError::ExternalService(
                "Failed to geocode address. Please check the address and try again.".to_string(),
            )
        })?;

        let hit = hits.first().ok_or_else(|| {
            AppError::ExternalService("No results found for the provided address".to_string())
        })?;

        let latitude = hit.lat.parse::<f64>();
        let longitude = hit.lon.parse::<f64>();
        match (latitude, longitude) {
            (Ok(latitude), Ok(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(AppError::ExternalService(
                "Failed to geocode address. Please check the address and try again.".to_string(),
            )),
        }
    }
}
