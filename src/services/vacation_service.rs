//! Vacation orchestration: creates vacations, starts the next leg's ride,
//! and closes rides when the booking side reports back.
//!
//! Progress writes go through `VacationStore::swap_progress`. A write that
//! loses the compare-and-set reloads the vacation and re-evaluates, so
//! concurrent calls for one vacation behave as if they ran one at a time.
//! The booking call itself runs outside that critical section.

use chrono::{Duration, NaiveDateTime, Utc};
use log::{error, info, warn};
use uuid::Uuid;

use crate::config::PointAwards;
use crate::db::{LoyaltyStore, VacationStore};
use crate::error::VacationError;
use crate::models::{
    fare::{round_money, FareQuote},
    geo::Place,
    itinerary::{ActivityDetails, Itinerary, Leg, VacationInput},
    loyalty::{LoyaltyAccount, LoyaltyView},
    vacation::{NextLeg, RideClosed, RideRequestIntent, Vacation, VacationProgress, VacationState},
};
use crate::services::{
    fare_service::FareEstimator,
    geocoding_service::Geocoder,
    leg_sequencer::{self, Closing},
    loyalty_service::LoyaltyService,
    ride_booking_service::RideBooking,
};

/// Rides to an activity are booked this long before it starts.
const ACTIVITY_PICKUP_LEAD_MINUTES: i64 = 30;
/// Airport drop-offs are booked this long before the flight departs.
const AIRPORT_PICKUP_LEAD_MINUTES: i64 = 120;

pub struct VacationService<S, B, G> {
    store: S,
    booking: B,
    geocoder: G,
    awards: PointAwards,
}

impl<S, B, G> VacationService<S, B, G>
where
    S: VacationStore + LoyaltyStore,
    B: RideBooking,
    G: Geocoder,
{
    pub fn new(store: S, booking: B, geocoder: G, awards: PointAwards) -> Self {
        Self {
            store,
            booking,
            geocoder,
            awards,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn create_vacation(&self, input: VacationInput) -> Result<Vacation, VacationError> {
        if input.traveler_id.trim().is_empty() {
            return Err(VacationError::InvalidInput("traveler_id is required".to_string()));
        }
        if input.destination.trim().is_empty() {
            return Err(VacationError::InvalidInput("destination is required".to_string()));
        }
        if input.passengers == 0 {
            return Err(VacationError::InvalidInput(
                "passengers must be at least 1".to_string(),
            ));
        }
        if input.end_date < input.start_date {
            return Err(VacationError::InvalidInput(format!(
                "end_date {} is before start_date {}",
                input.end_date, input.start_date
            )));
        }

        let mut activities = Vec::with_capacity(input.activities.len());
        for activity in input.activities {
            let point = match activity.coordinates {
                Some(point) => point,
                None => self.geocoder.geocode(&activity.location).await?,
            };
            activities.push(ActivityDetails {
                date: activity.date,
                time: activity.time,
                location: activity.location,
                description: activity.description,
                point,
            });
        }

        let itinerary = leg_sequencer::build_itinerary(input.flight, activities);
        let now = Utc::now();
        let vacation = Vacation {
            id: Uuid::new_v4().to_string(),
            traveler_id: input.traveler_id,
            destination: input.destination,
            start_date: input.start_date,
            end_date: input.end_date,
            vehicle_class: input.vehicle_class,
            passengers: input.passengers,
            ride_included: input.ride_included,
            places: input.places,
            itinerary,
            progress: VacationProgress::default(),
            created_at: now,
            updated_at: now,
        };

        self.store.insert_vacation(&vacation).await?;
        info!(
            "Created vacation {} to {} with {} legs",
            vacation.id,
            vacation.destination,
            vacation.itinerary.len()
        );

        Ok(vacation)
    }

    pub async fn get_vacation(&self, id: &str) -> Result<Vacation, VacationError> {
        self.store
            .get_vacation(id)
            .await?
            .ok_or_else(|| VacationError::NotFound(id.to_string()))
    }

    pub async fn list_vacations(&self, traveler_id: &str) -> Result<Vec<Vacation>, VacationError> {
        Ok(self.store.list_vacations(traveler_id).await?)
    }

    /// Requests the ride for the next pending leg, passing over legs that
    /// need no ride. Completed vacations answer `Completed` every time.
    /// Vacations booked without rides are rejected with `RidesNotIncluded`.
    pub async fn start_next_leg(&self, id: &str) -> Result<NextLeg, VacationError> {
        loop {
            let vacation = self.get_vacation(id).await?;
            let progress = &vacation.progress;
            let len = vacation.itinerary.len();

            let leg = match leg_sequencer::current_leg(progress, &vacation.itinerary)? {
                Some(leg) => leg,
                None => return Ok(NextLeg::Completed),
            };
            if !vacation.ride_included {
                return Err(VacationError::RidesNotIncluded(id.to_string()));
            }
            if progress.has_active_ride {
                return Err(VacationError::RideAlreadyActive);
            }

            let (intent, quote) = match ride_intent(&vacation, progress.current_leg_index, leg) {
                Some(priced) => priced,
                None => {
                    let next = leg_sequencer::advance(progress, len, Closing::Milestone)?;
                    if self.store.swap_progress(id, progress, &next).await? {
                        info!("Vacation {}: passed milestone '{}'", id, leg.label());
                    }
                    continue;
                }
            };

            let claim_id = Uuid::new_v4().to_string();
            let claimed = leg_sequencer::request_ride(progress, len, &claim_id)?;
            if !self.store.swap_progress(id, progress, &claimed).await? {
                continue;
            }

            return self.book_claimed(id, claimed, intent, quote).await;
        }
    }

    async fn book_claimed(
        &self,
        id: &str,
        claimed: VacationProgress,
        intent: RideRequestIntent,
        quote: FareQuote,
    ) -> Result<NextLeg, VacationError> {
        let ride_id = match self.booking.book(&intent).await {
            Ok(ride_id) => ride_id,
            Err(e) => {
                error!(
                    "Vacation {}: booking leg {} failed: {}",
                    id, intent.leg_index, e
                );
                let released = leg_sequencer::release_ride(&claimed)?;
                if !self.store.swap_progress(id, &claimed, &released).await? {
                    warn!("Vacation {}: claim changed before rollback", id);
                }
                return Err(VacationError::BookingFailed(e.to_string()));
            }
        };

        let confirmed = leg_sequencer::confirm_ride(&claimed, &ride_id)?;
        if !self.store.swap_progress(id, &claimed, &confirmed).await? {
            warn!(
                "Vacation {}: ride {} booked but the leg claim was withdrawn",
                id, ride_id
            );
            return Err(VacationError::ClaimLost(ride_id));
        }

        info!(
            "Vacation {}: ride {} requested for leg {} ({:.2} km)",
            id, ride_id, intent.leg_index, quote.distance_km
        );

        Ok(NextLeg::RideRequested {
            ride_id,
            intent,
            quote,
        })
    }

    /// Completion notification for the active ride.
    pub async fn complete_ride(&self, id: &str, ride_id: &str) -> Result<RideClosed, VacationError> {
        loop {
            let vacation = self.get_vacation(id).await?;
            let progress = &vacation.progress;
            let len = vacation.itinerary.len();

            if progress.has_active_ride && progress.active_ride_id.as_deref() != Some(ride_id) {
                return Err(VacationError::NoActiveRide);
            }
            let next = leg_sequencer::advance(progress, len, Closing::Ride)?;
            if !self.store.swap_progress(id, progress, &next).await? {
                continue;
            }

            let state = leg_sequencer::state(&next, len);
            info!(
                "Vacation {}: ride {} completed, {}/{} legs done",
                id, ride_id, next.current_leg_index, len
            );

            let mut points_awarded = self
                .award_best_effort(&vacation.traveler_id, self.awards.ride_completion)
                .await;
            if state == VacationState::Completed {
                info!("Vacation {} completed", id);
                points_awarded += self
                    .award_best_effort(&vacation.traveler_id, self.awards.vacation_completion)
                    .await;
            }

            return Ok(RideClosed {
                progress: next,
                state,
                points_awarded,
            });
        }
    }

    /// Cancellation notification: the same leg becomes pending again.
    pub async fn cancel_ride(&self, id: &str, ride_id: &str) -> Result<VacationProgress, VacationError> {
        self.release_where(id, |progress| {
            progress.active_ride_id.as_deref() == Some(ride_id)
        })
        .await
    }

    /// Withdraws a claim whose booking has not been confirmed yet.
    pub async fn cancel_pending(&self, id: &str) -> Result<VacationProgress, VacationError> {
        self.release_where(id, |progress| progress.active_ride_id.is_none())
            .await
    }

    async fn release_where<F>(&self, id: &str, matches: F) -> Result<VacationProgress, VacationError>
    where
        F: Fn(&VacationProgress) -> bool,
    {
        loop {
            let vacation = self.get_vacation(id).await?;
            let progress = &vacation.progress;
            leg_sequencer::current_leg(progress, &vacation.itinerary)?;

            if !progress.has_active_ride || !matches(progress) {
                return Err(VacationError::NoActiveRide);
            }
            let released = leg_sequencer::release_ride(progress)?;
            if self.store.swap_progress(id, progress, &released).await? {
                info!(
                    "Vacation {}: leg {} back to pending",
                    id, released.current_leg_index
                );
                return Ok(released);
            }
        }
    }

    pub async fn award_points(&self, traveler_id: &str, delta: i64) -> Result<LoyaltyAccount, VacationError> {
        loop {
            let current = self.store.get_account(traveler_id).await?;
            let updated = LoyaltyService::award_points(&current, delta)?;
            if self.store.swap_account(traveler_id, &current, &updated).await? {
                return Ok(updated);
            }
        }
    }

    async fn award_best_effort(&self, traveler_id: &str, delta: i64) -> u64 {
        if delta <= 0 {
            return 0;
        }
        match self.award_points(traveler_id, delta).await {
            Ok(_) => delta as u64,
            Err(e) => {
                // Progress has already moved on; the award is reported as missing
                error!("Failed to award {} points to {}: {}", delta, traveler_id, e);
                0
            }
        }
    }

    pub async fn loyalty(&self, traveler_id: &str) -> Result<LoyaltyView, VacationError> {
        let account = self.store.get_account(traveler_id).await?;
        Ok(LoyaltyService::view(&account))
    }
}

/// Priced ride request for a leg, or `None` for legs that need no ride.
fn ride_intent(
    vacation: &Vacation,
    leg_index: u32,
    leg: &Leg,
) -> Option<(RideRequestIntent, FareQuote)> {
    let places = &vacation.places;
    let (pickup, destination, scheduled_time) = match leg {
        Leg::HomeToAirport => (
            places.home.clone(),
            places.airport.clone(),
            departure_pickup_time(&vacation.itinerary),
        ),
        Leg::Travel(_) => return None,
        Leg::Activity(activity) => (
            places.base().clone(),
            Place {
                address: activity.location.clone(),
                point: activity.point,
            },
            Some(activity.starts_at() - Duration::minutes(ACTIVITY_PICKUP_LEAD_MINUTES)),
        ),
        Leg::AirportToHome => (places.airport.clone(), places.home.clone(), None),
    };

    let quote = FareEstimator::estimate(pickup.point, destination.point, vacation.vehicle_class);
    let intent = RideRequestIntent {
        vacation_id: vacation.id.clone(),
        leg_index,
        pickup,
        destination,
        vehicle_class: vacation.vehicle_class,
        passengers: vacation.passengers,
        estimated_fare: round_money(quote.fare),
        scheduled_time,
    };
    Some((intent, quote))
}

fn departure_pickup_time(itinerary: &Itinerary) -> Option<NaiveDateTime> {
    itinerary
        .flight()
        .and_then(|flight| flight.departure_time)
        .map(|departure| departure - Duration::minutes(AIRPORT_PICKUP_LEAD_MINUTES))
}
