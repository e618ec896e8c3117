use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;
use crate::services::{
    geocoding_service::GeocodingError, leg_sequencer::LegError, loyalty_service::LoyaltyError,
};

#[derive(Debug, Error)]
pub enum VacationError {
    #[error("vacation {0} not found")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("a ride is already active for this vacation")]
    RideAlreadyActive,
    #[error("no active ride to close")]
    NoActiveRide,
    #[error("vacation is already completed")]
    AlreadyCompleted,
    #[error("progress index {index} is outside itinerary of {len} legs")]
    CorruptProgress { index: u32, len: usize },
    #[error("ride booking failed: {0}")]
    BookingFailed(String),
    #[error("ride {0} was booked after its leg claim was withdrawn")]
    ClaimLost(String),
    #[error("vacation {0} was booked without rides")]
    RidesNotIncluded(String),
    #[error("geocoding failed: {0}")]
    Geocoding(#[from] GeocodingError),
    #[error("points delta must be positive, got {0}")]
    InvalidPointsDelta(i64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<LegError> for VacationError {
    fn from(err: LegError) -> Self {
        match err {
            LegError::RideAlreadyActive => VacationError::RideAlreadyActive,
            LegError::NoActiveRide => VacationError::NoActiveRide,
            LegError::AlreadyCompleted => VacationError::AlreadyCompleted,
            LegError::CorruptProgress { index, len } => VacationError::CorruptProgress { index, len },
        }
    }
}

impl From<LoyaltyError> for VacationError {
    fn from(err: LoyaltyError) -> Self {
        match err {
            LoyaltyError::InvalidPointsDelta(delta) => VacationError::InvalidPointsDelta(delta),
        }
    }
}

impl VacationError {
    /// Idempotency signals: the request was a no-op, nothing is broken.
    pub fn is_benign(&self) -> bool {
        matches!(self, VacationError::NoActiveRide | VacationError::AlreadyCompleted)
    }

    fn code(&self) -> &'static str {
        match self {
            VacationError::NotFound(_) => "not_found",
            VacationError::InvalidInput(_) => "invalid_input",
            VacationError::RideAlreadyActive => "ride_already_active",
            VacationError::NoActiveRide => "no_active_ride",
            VacationError::AlreadyCompleted => "already_completed",
            VacationError::CorruptProgress { .. } => "corrupt_progress",
            VacationError::BookingFailed(_) => "booking_failed",
            VacationError::ClaimLost(_) => "claim_lost",
            VacationError::RidesNotIncluded(_) => "rides_not_included",
            VacationError::Geocoding(_) => "geocoding_failed",
            VacationError::InvalidPointsDelta(_) => "invalid_points_delta",
            VacationError::Store(_) => "store_error",
        }
    }
}

impl ResponseError for VacationError {
    fn status_code(&self) -> StatusCode {
        match self {
            VacationError::NoActiveRide | VacationError::AlreadyCompleted => StatusCode::OK,
            VacationError::NotFound(_) => StatusCode::NOT_FOUND,
            VacationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            VacationError::RideAlreadyActive
            | VacationError::ClaimLost(_)
            | VacationError::RidesNotIncluded(_) => StatusCode::CONFLICT,
            VacationError::BookingFailed(_) => StatusCode::BAD_GATEWAY,
            VacationError::Geocoding(_) => StatusCode::UNPROCESSABLE_ENTITY,
            VacationError::CorruptProgress { .. }
            | VacationError::InvalidPointsDelta(_)
            | VacationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = if self.is_benign() {
            json!({ "status": "no_op", "reason": self.code(), "message": self.to_string() })
        } else {
            json!({ "status": "error", "error": self.code(), "message": self.to_string() })
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
