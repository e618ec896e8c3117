use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::config::AppConfig;
use crate::db::{LoyaltyStore, VacationStore};
use crate::services::geocoding_service::Geocoder;
use crate::services::ride_booking_service::RideBooking;
use crate::services::vacation_service::VacationService;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

impl ServiceStatus {
    fn ok(details: Option<String>) -> Self {
        Self {
            status: "ok".to_string(),
            details,
        }
    }

    fn degraded(details: String) -> Self {
        Self {
            status: "degraded".to_string(),
            details: Some(details),
        }
    }
}

pub async fn health_check<S, B, G>(
    service: web::Data<VacationService<S, B, G>>,
    config: Option<web::Data<AppConfig>>,
) -> impl Responder
where
    S: VacationStore + LoyaltyStore + 'static,
    B: RideBooking + 'static,
    G: Geocoder + 'static,
{
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let store = match service.store().ping().await {
        Ok(()) => ServiceStatus::ok(None),
        Err(e) => ServiceStatus::degraded(e.to_string()),
    };
    health.services.insert("store".to_string(), store);

    if let Some(config) = config {
        health.services.insert(
            "ride_booking".to_string(),
            match &config.ride_booking_url {
                Some(url) => ServiceStatus::ok(Some(url.clone())),
                None => ServiceStatus::degraded("RIDE_BOOKING_URL not set".to_string()),
            },
        );
        health.services.insert(
            "geocoding".to_string(),
            match config.google_maps_api_key {
                Some(_) => ServiceStatus::ok(None),
                None => ServiceStatus::degraded(
                    "GOOGLE_MAPS_API_KEY not set, activities need coordinates".to_string(),
                ),
            },
        );
    }

    if health.services.values().any(|s| s.status != "ok") {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}
