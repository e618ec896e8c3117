//! Hand-off of ride-request intents to the external ride-booking service.
//!
//! The booking side owns driver matching and timeouts. It answers with a
//! ride id and later reports completion or cancellation back to
//! `/api/vacations/{id}/rides/{ride_id}/...`.

use reqwest;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::vacation::RideRequestIntent;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("booking rejected: {0}")]
    Rejected(String),
}

#[allow(async_fn_in_trait)]
pub trait RideBooking {
    /// Places one ride and returns the collaborator's ride id.
    async fn book(&self, intent: &RideRequestIntent) -> Result<String, BookingError>;
}

#[derive(Debug, Deserialize)]
struct BookingResponse {
    id: serde_json::Value,
}

pub struct HttpRideBooking {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpRideBooking {
    pub fn new(base_url: impl Into<String>) -> Result<Self, BookingError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl RideBooking for HttpRideBooking {
    async fn book(&self, intent: &RideRequestIntent) -> Result<String, BookingError> {
        let url = format!("{}/rides", self.base_url);
        log::info!(
            "Booking ride for vacation {} leg {}",
            intent.vacation_id,
            intent.leg_index
        );

        let response = self.http_client.post(&url).json(intent).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BookingError::Rejected(format!("{}: {}", status, body)));
        }

        let booking: BookingResponse = response.json().await?;
        ride_id_from(booking.id)
    }
}

// Ride services hand back numeric or string ids
fn ride_id_from(id: serde_json::Value) -> Result<String, BookingError> {
    match id {
        serde_json::Value::String(id) if !id.is_empty() => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        other => Err(BookingError::Rejected(format!("unusable ride id {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ride_id_accepts_numbers_and_strings() {
        assert_eq!(ride_id_from(json!(42)).unwrap(), "42");
        assert_eq!(ride_id_from(json!("r-17")).unwrap(), "r-17");
        assert!(ride_id_from(json!("")).is_err());
        assert!(ride_id_from(json!(null)).is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let booking = HttpRideBooking::new("http://rides.local/api/").unwrap();
        assert_eq!(booking.base_url, "http://rides.local/api");
    }
}
