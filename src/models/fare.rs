use serde::{Deserialize, Serialize};

use super::geo::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    #[default]
    Economy,
    Suv,
    Luxury,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
    pub base_fare: f64,
    pub per_km_rate: f64,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 3] = [VehicleClass::Economy, VehicleClass::Suv, VehicleClass::Luxury];

    pub fn rates(&self) -> Rates {
        match self {
            VehicleClass::Economy => Rates {
                base_fare: 50.0,
                per_km_rate: 10.0,
            },
            VehicleClass::Suv => Rates {
                base_fare: 120.0,
                per_km_rate: 18.0,
            },
            VehicleClass::Luxury => Rates {
                base_fare: 200.0,
                per_km_rate: 25.0,
            },
        }
    }
}

/// Full-precision estimate. Recomputed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FareQuote {
    pub distance_km: f64,
    pub duration_minutes: u32,
    pub fare: f64,
    pub vehicle_class: VehicleClass,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FareEstimateRequest {
    pub pickup: GeoPoint,
    pub destination: GeoPoint,
    #[serde(default)]
    pub vehicle_class: VehicleClass,
}

/// Boundary representation of a quote with money and distance fixed to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareQuoteView {
    pub distance_km: String,
    pub duration_minutes: u32,
    pub fare: String,
    pub vehicle_class: VehicleClass,
}

impl From<FareQuote> for FareQuoteView {
    fn from(quote: FareQuote) -> Self {
        Self {
            distance_km: format!("{:.2}", quote.distance_km),
            duration_minutes: quote.duration_minutes,
            fare: format_money(quote.fare),
            vehicle_class: quote.vehicle_class,
        }
    }
}

pub fn format_money(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Rounds to cents for amounts handed to other systems.
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
