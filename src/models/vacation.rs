use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fare::{FareQuote, FareQuoteView, VehicleClass};
use super::geo::Place;
use super::itinerary::{Itinerary, Leg, TripPlaces};

/// Mutable cursor over a vacation's itinerary.
///
/// `current_leg_index` counts completed legs and only ever grows.
/// `has_active_ride` without an `active_ride_id` is the provisional
/// state between claiming a leg and the booking collaborator confirming it.
/// Each claim carries a fresh `claim_id`, so two claims on the same leg never
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VacationProgress {
    pub current_leg_index: u32,
    pub has_active_ride: bool,
    #[serde(default)]
    pub active_ride_id: Option<String>,
    #[serde(default)]
    pub claim_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacationState {
    NotStarted,
    LegPending,
    RideRequested,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vacation {
    #[serde(rename = "_id")]
    pub id: String,
    pub traveler_id: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub vehicle_class: VehicleClass,
    #[serde(default = "default_passengers")]
    pub passengers: u32,
    #[serde(default = "default_ride_included")]
    pub ride_included: bool,
    pub places: TripPlaces,
    pub itinerary: Itinerary,
    pub progress: VacationProgress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What gets handed to the ride-booking collaborator to place one ride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideRequestIntent {
    pub vacation_id: String,
    pub leg_index: u32,
    pub pickup: Place,
    pub destination: Place,
    pub vehicle_class: VehicleClass,
    pub passengers: u32,
    /// Quoted price, rounded to cents.
    pub estimated_fare: f64,
    pub scheduled_time: Option<NaiveDateTime>,
}

pub(crate) fn default_passengers() -> u32 {
    1
}

pub(crate) fn default_ride_included() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq)]
pub enum NextLeg {
    RideRequested {
        ride_id: String,
        intent: RideRequestIntent,
        quote: FareQuote,
    },
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RideClosed {
    pub progress: VacationProgress,
    pub state: VacationState,
    pub points_awarded: u64,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NextLegView {
    RideRequested {
        ride_id: String,
        intent: RideRequestIntent,
        quote: FareQuoteView,
    },
    Completed,
}

impl From<NextLeg> for NextLegView {
    fn from(next: NextLeg) -> Self {
        match next {
            NextLeg::RideRequested {
                ride_id,
                intent,
                quote,
            } => NextLegView::RideRequested {
                ride_id,
                intent,
                quote: quote.into(),
            },
            NextLeg::Completed => NextLegView::Completed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChecklistItem {
    pub label: String,
    #[serde(flatten)]
    pub leg: Leg,
    pub ride_worthy: bool,
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct VacationView {
    pub id: String,
    pub traveler_id: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub vehicle_class: VehicleClass,
    pub passengers: u32,
    pub ride_included: bool,
    pub state: VacationState,
    pub progress: VacationProgress,
    pub checklist: Vec<ChecklistItem>,
}

impl From<&Vacation> for VacationView {
    fn from(vacation: &Vacation) -> Self {
        let completed_legs = vacation.progress.current_leg_index as usize;
        let checklist = vacation
            .itinerary
            .legs()
            .iter()
            .enumerate()
            .map(|(index, leg)| ChecklistItem {
                label: leg.label(),
                leg: leg.clone(),
                ride_worthy: leg.is_ride_worthy(),
                completed: index < completed_legs,
            })
            .collect();

        Self {
            id: vacation.id.clone(),
            traveler_id: vacation.traveler_id.clone(),
            destination: vacation.destination.clone(),
            start_date: vacation.start_date,
            end_date: vacation.end_date,
            vehicle_class: vacation.vehicle_class,
            passengers: vacation.passengers,
            ride_included: vacation.ride_included,
            state: crate::services::leg_sequencer::state(
                &vacation.progress,
                vacation.itinerary.len(),
            ),
            progress: vacation.progress.clone(),
            checklist,
        }
    }
}
