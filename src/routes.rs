use actix_web::web;

use crate::db::{LoyaltyStore, VacationStore};
use crate::services::{geocoding_service::Geocoder, ride_booking_service::RideBooking};

pub mod fare;
pub mod health;
pub mod loyalty;
pub mod vacation;

/// Registers every route against a `VacationService<S, B, G>` held in app data.
pub fn configure<S, B, G>(cfg: &mut web::ServiceConfig)
where
    S: VacationStore + LoyaltyStore + 'static,
    B: RideBooking + 'static,
    G: Geocoder + 'static,
{
    cfg.route("/health", web::get().to(health::health_check::<S, B, G>))
        .service(
            web::scope("/api")
                .route("/fares/estimate", web::post().to(fare::estimate))
                .service(
                    web::scope("/vacations")
                        .route("", web::post().to(vacation::create::<S, B, G>))
                        .route("/{id}", web::get().to(vacation::get_by_id::<S, B, G>))
                        .route(
                            "/{id}/next-leg",
                            web::post().to(vacation::start_next_leg::<S, B, G>),
                        )
                        .route(
                            "/{id}/next-leg/cancel",
                            web::post().to(vacation::cancel_pending::<S, B, G>),
                        )
                        .route(
                            "/{id}/rides/{ride_id}/complete",
                            web::post().to(vacation::complete_ride::<S, B, G>),
                        )
                        .route(
                            "/{id}/rides/{ride_id}/cancel",
                            web::post().to(vacation::cancel_ride::<S, B, G>),
                        ),
                )
                .service(
                    web::scope("/travelers/{traveler_id}")
                        .route(
                            "/vacations",
                            web::get().to(vacation::list_for_traveler::<S, B, G>),
                        )
                        .route("/loyalty", web::get().to(loyalty::get_loyalty::<S, B, G>)),
                ),
        );
}
