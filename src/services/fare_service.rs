use crate::models::{
    fare::{FareQuote, VehicleClass},
    geo::GeoPoint,
};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Planning-time average speed; not a live traffic figure.
const AVERAGE_SPEED_KMH: f64 = 40.0;

/// Great-circle distance in kilometres (Haversine).
///
/// Inputs are not range checked here; `GeoPoint` construction does that.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lng = (b.longitude() - a.longitude()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Floating error can push h a hair past 1 for antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

pub struct FareEstimator;

impl FareEstimator {
    /// Price, distance and duration for one ride. Full precision; callers
    /// round at presentation time.
    pub fn estimate(pickup: GeoPoint, destination: GeoPoint, vehicle_class: VehicleClass) -> FareQuote {
        let distance_km = distance_km(pickup, destination);
        let rates = vehicle_class.rates();

        FareQuote {
            distance_km,
            duration_minutes: Self::duration_minutes(distance_km),
            fare: rates.base_fare + distance_km * rates.per_km_rate,
            vehicle_class,
        }
    }

    pub fn duration_minutes(distance_km: f64) -> u32 {
        (distance_km / AVERAGE_SPEED_KMH * 60.0).round() as u32
    }
}
