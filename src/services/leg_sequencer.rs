//! Builds the ordered leg list for a vacation and moves its progress cursor.
//!
//! Every function here is pure: it takes the current `VacationProgress` and
//! returns the next one. Persisting the result atomically is the store's job.

use thiserror::Error;

use crate::models::{
    itinerary::{ActivityDetails, FlightDetails, Itinerary, Leg},
    vacation::{VacationProgress, VacationState},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LegError {
    #[error("a ride is already active for this vacation")]
    RideAlreadyActive,
    #[error("no active ride to close")]
    NoActiveRide,
    #[error("vacation is already completed")]
    AlreadyCompleted,
    #[error("progress index {index} is outside itinerary of {len} legs")]
    CorruptProgress { index: u32, len: usize },
}

/// What an `advance` call is closing out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closing {
    /// The in-flight ride for the current leg finished.
    Ride,
    /// The current leg needs no ride and is passed over.
    Milestone,
}

pub fn build_itinerary(flight: Option<FlightDetails>, activities: Vec<ActivityDetails>) -> Itinerary {
    let mut legs = Vec::with_capacity(activities.len() + 3);

    legs.push(Leg::HomeToAirport);
    if let Some(flight) = flight.filter(FlightDetails::is_present) {
        legs.push(Leg::Travel(flight));
    }
    // Caller order is authoritative, no re-sorting by date
    legs.extend(activities.into_iter().map(Leg::Activity));
    legs.push(Leg::AirportToHome);

    Itinerary::from_legs(legs)
}

fn check_bounds(progress: &VacationProgress, len: usize) -> Result<usize, LegError> {
    let index = progress.current_leg_index as usize;
    if index > len {
        return Err(LegError::CorruptProgress {
            index: progress.current_leg_index,
            len,
        });
    }
    Ok(index)
}

/// The next leg to work on, or `None` once every leg is done.
pub fn current_leg<'a>(
    progress: &VacationProgress,
    itinerary: &'a Itinerary,
) -> Result<Option<&'a Leg>, LegError> {
    let index = check_bounds(progress, itinerary.len())?;
    Ok(itinerary.get(index))
}

pub fn state(progress: &VacationProgress, len: usize) -> VacationState {
    if progress.current_leg_index as usize >= len {
        VacationState::Completed
    } else if progress.has_active_ride {
        VacationState::RideRequested
    } else if progress.current_leg_index == 0 {
        VacationState::NotStarted
    } else {
        VacationState::LegPending
    }
}

/// LegPending -> RideRequested (provisional until `confirm_ride`).
///
/// `claim_id` must be unique per call; it is what later confirm and rollback
/// writes match against.
pub fn request_ride(
    progress: &VacationProgress,
    len: usize,
    claim_id: &str,
) -> Result<VacationProgress, LegError> {
    let index = check_bounds(progress, len)?;
    if index == len {
        return Err(LegError::AlreadyCompleted);
    }
    if progress.has_active_ride {
        return Err(LegError::RideAlreadyActive);
    }

    Ok(VacationProgress {
        current_leg_index: progress.current_leg_index,
        has_active_ride: true,
        active_ride_id: None,
        claim_id: Some(claim_id.to_string()),
    })
}

/// Attaches the collaborator's ride id to a provisional claim.
pub fn confirm_ride(progress: &VacationProgress, ride_id: &str) -> Result<VacationProgress, LegError> {
    if !progress.has_active_ride {
        return Err(LegError::NoActiveRide);
    }
    if progress.active_ride_id.is_some() {
        return Err(LegError::RideAlreadyActive);
    }

    Ok(VacationProgress {
        current_leg_index: progress.current_leg_index,
        has_active_ride: true,
        active_ride_id: Some(ride_id.to_string()),
        claim_id: progress.claim_id.clone(),
    })
}

/// RideRequested -> LegPending without moving the cursor, so the same leg
/// is offered again.
pub fn release_ride(progress: &VacationProgress) -> Result<VacationProgress, LegError> {
    if !progress.has_active_ride {
        return Err(LegError::NoActiveRide);
    }

    Ok(VacationProgress {
        current_leg_index: progress.current_leg_index,
        has_active_ride: false,
        active_ride_id: None,
        claim_id: None,
    })
}

/// Moves the cursor forward by exactly one leg and clears the active ride.
pub fn advance(
    progress: &VacationProgress,
    len: usize,
    closing: Closing,
) -> Result<VacationProgress, LegError> {
    let index = check_bounds(progress, len)?;
    if index == len {
        return Err(LegError::AlreadyCompleted);
    }

    match closing {
        Closing::Ride if !progress.has_active_ride => return Err(LegError::NoActiveRide),
        Closing::Milestone if progress.has_active_ride => return Err(LegError::RideAlreadyActive),
        Closing::Ride | Closing::Milestone => {}
    }

    Ok(VacationProgress {
        current_leg_index: progress.current_leg_index + 1,
        has_active_ride: false,
        active_ride_id: None,
        claim_id: None,
    })
}
