use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::fare::VehicleClass;
use super::geo::{GeoPoint, Place};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightDetails {
    pub flight_number: String,
    #[serde(default)]
    pub departure_city: String,
    #[serde(default)]
    pub arrival_city: String,
    #[serde(default)]
    pub departure_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub arrival_time: Option<NaiveDateTime>,
}

impl FlightDetails {
    /// A form submitted without a flight number carries no travel leg.
    pub fn is_present(&self) -> bool {
        !self.flight_number.trim().is_empty()
    }
}

/// Activity as submitted by the caller. Coordinates are optional and get
/// resolved through the geocoder when missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityInput {
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub coordinates: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDetails {
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    pub location: String,
    pub description: String,
    pub point: GeoPoint,
}

impl ActivityDetails {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Leg {
    HomeToAirport,
    Travel(FlightDetails),
    Activity(ActivityDetails),
    AirportToHome,
}

impl Leg {
    /// Travel legs stand for the flight or train itself and never need a ride.
    pub fn is_ride_worthy(&self) -> bool {
        match self {
            Leg::HomeToAirport | Leg::Activity(_) | Leg::AirportToHome => true,
            Leg::Travel(_) => false,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Leg::HomeToAirport => "Home to Airport".to_string(),
            Leg::Travel(flight) if flight.departure_city.is_empty() => {
                format!("Travel ({})", flight.flight_number)
            }
            Leg::Travel(flight) => format!(
                "{} to {} ({})",
                flight.departure_city, flight.arrival_city, flight.flight_number
            ),
            Leg::Activity(activity) => format!("{}: {}", activity.location, activity.description),
            Leg::AirportToHome => "Airport to Home".to_string(),
        }
    }
}

/// Ordered legs of one vacation, bookended by the home/airport rides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Itinerary {
    legs: Vec<Leg>,
}

impl Itinerary {
    pub(crate) fn from_legs(legs: Vec<Leg>) -> Self {
        Self { legs }
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Leg> {
        self.legs.get(index)
    }

    pub fn flight(&self) -> Option<&FlightDetails> {
        self.legs.iter().find_map(|leg| match leg {
            Leg::Travel(flight) => Some(flight),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlaces {
    pub home: Place,
    pub airport: Place,
    #[serde(default)]
    pub lodging: Option<Place>,
}

impl TripPlaces {
    /// Where activity rides start from.
    pub fn base(&self) -> &Place {
        self.lodging.as_ref().unwrap_or(&self.airport)
    }
}

/// Itinerary data accepted once at vacation creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacationInput {
    pub traveler_id: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub vehicle_class: VehicleClass,
    #[serde(default = "super::vacation::default_passengers")]
    pub passengers: u32,
    /// Off means the traveler arranges their own transport.
    #[serde(default = "super::vacation::default_ride_included")]
    pub ride_included: bool,
    #[serde(flatten)]
    pub places: TripPlaces,
    #[serde(default)]
    pub flight: Option<FlightDetails>,
    #[serde(default)]
    pub activities: Vec<ActivityInput>,
}

/// `HH:MM` wall-clock times as entered in the booking form; seconds are accepted on input.
mod clock_time {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(|e| D::Error::custom(format!("invalid time '{}': {}", raw, e)))
    }
}
