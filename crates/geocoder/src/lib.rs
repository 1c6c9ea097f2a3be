//! Location intake geocoding adapter.
//!
//! Implements the [`pipeline::Geocoder`] trait on top of the OpenStreetMap
//! Nominatim search API. Another provider is added as a new type implementing
//! the same trait without any changes to the `pipeline` crate.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, query construction, and response
//! parsing live here. The [`pipeline`] crate sees only
//! [`pipeline::Geocoder`].
//!
//! ## Behaviour
//!
//! - Queries are scoped to the United Kingdom twice over: the free-text query
//!   is suffixed with `, UK` and results are restricted to `countrycodes=gb`.
//! - Only the best match is requested (`limit=1`).
//! - No match and a request timeout both yield `Ok(None)`. Every other
//!   failure is a [`pipeline::GeocodeError`].
//! - One attempt per call; nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use pipeline::{Coordinates, GeocodeError, Geocoder, LocationName};

/// Settings for [`NominatimGeocoder`].
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Service base, e.g. `https://nominatim.openstreetmap.org`.
    pub base_url: String,
    /// Total time allowed for one search, including reading the response.
    pub timeout: Duration,
    /// Sent as `User-Agent`; the Nominatim usage policy requires one that
    /// identifies the application.
    pub user_agent: String,
}

/// Errors raised while constructing a [`NominatimGeocoder`].
#[derive(Debug, thiserror::Error)]
pub enum GeocoderClientError {
    #[error("Failed to build geocoder HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// One entry of a `jsonv2` search response.
#[derive(Debug, Deserialize)]
struct Place {
    /// Decimal degrees, as a string.
    lat: String,
    /// Decimal degrees, as a string.
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// [`Geocoder`] backed by Nominatim.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    http: reqwest::Client,
    search_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: NominatimConfig) -> Result<Self, GeocoderClientError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            search_url: format!("{}/search", config.base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[tracing::instrument(skip(self), err)]
    async fn locate(&self, name: &LocationName) -> Result<Option<Coordinates>, GeocodeError> {
        let query = format!("{name}, UK");
        let request = self.http.get(&self.search_url).query(&[
            ("q", query.as_str()),
            ("format", "jsonv2"),
            ("limit", "1"),
            ("countrycodes", "gb"),
        ]);

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) if err.is_timeout() => {
                warn!(error = %err, "Geocoding timed out; treating as no result");
                return Ok(None);
            }
            Err(err) => {
                return Err(GeocodeError::Transport {
                    message: err.to_string(),
                })
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Rejected {
                status: status.as_u16(),
                message: if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("no response body").to_string()
                } else {
                    body
                },
            });
        }

        let places: Vec<Place> = match response.json().await {
            Ok(places) => places,
            Err(err) if err.is_timeout() => {
                warn!(error = %err, "Geocoding timed out; treating as no result");
                return Ok(None);
            }
            Err(err) => {
                return Err(GeocodeError::InvalidResponse {
                    message: err.to_string(),
                })
            }
        };

        let Some(place) = places.into_iter().next() else {
            info!("No geocoding match");
            return Ok(None);
        };

        let coordinates = parse_coordinates(&place)?;
        info!(
            %coordinates,
            matched = place.display_name.as_deref().unwrap_or_default(),
            "Geocoding match"
        );
        Ok(Some(coordinates))
    }
}

fn parse_coordinates(place: &Place) -> Result<Coordinates, GeocodeError> {
    let degrees = |field: &str, value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|err| GeocodeError::InvalidResponse {
                message: format!("{field} '{value}' is not a number: {err}"),
            })
    };
    let latitude = degrees("lat", &place.lat)?;
    let longitude = degrees("lon", &place.lon)?;
    Coordinates::new(latitude, longitude).ok_or_else(|| GeocodeError::InvalidResponse {
        message: format!("coordinates ({latitude}, {longitude}) are out of range"),
    })
}
