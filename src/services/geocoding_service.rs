//! Geocoding via the Google Maps Geocoding API.
//!
//! Activity locations arrive as free text from the booking form. When the
//! caller does not supply coordinates they are resolved here once, at
//! vacation creation.
//!
//! ## Setup
//! Set `GOOGLE_MAPS_API_KEY` and enable the Geocoding API on the key. Without
//! a key every lookup fails and callers must send coordinates themselves.

use reqwest;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::geo::GeoPoint;

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("no geocoder configured; coordinates are required for '{0}'")]
    NotConfigured(String),
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("geocoder returned {status} for '{address}'")]
    Api { status: String, address: String },
    #[error("no result for '{0}'")]
    NotFound(String),
    #[error("geocoder returned an invalid coordinate for '{0}'")]
    InvalidCoordinate(String),
}

#[allow(async_fn_in_trait)]
pub trait Geocoder {
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodingError>;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: GeocodeGeometry,
}

#[derive(Debug, Deserialize)]
struct GeocodeGeometry {
    location: GeocodeLocation,
}

#[derive(Debug, Deserialize)]
struct GeocodeLocation {
    lat: f64,
    lng: f64,
}

pub struct GoogleGeocoder {
    http_client: reqwest::Client,
    api_key: Option<String>,
}

impl GoogleGeocoder {
    pub fn new(api_key: Option<String>) -> Result<Self, GeocodingError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
        })
    }
}

impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodingError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GeocodingError::NotConfigured(address.to_string()))?;

        log::info!("Geocoding '{}'", address);

        let response: GeocodeResponse = self
            .http_client
            .get(GEOCODE_URL)
            .query(&[("address", address), ("key", api_key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match response.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Err(GeocodingError::NotFound(address.to_string())),
            _ => {
                return Err(GeocodingError::Api {
                    status: response.status,
                    address: address.to_string(),
                })
            }
        }

        let location = response
            .results
            .into_iter()
            .next()
            .map(|result| result.geometry.location)
            .ok_or_else(|| GeocodingError::NotFound(address.to_string()))?;

        GeoPoint::new(location.lat, location.lng)
            .map_err(|_| GeocodingError::InvalidCoordinate(address.to_string()))
    }
}
