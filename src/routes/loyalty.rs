use actix_web::{web, HttpResponse};

use crate::db::{LoyaltyStore, VacationStore};
use crate::error::VacationError;
use crate::services::{
    geocoding_service::Geocoder, ride_booking_service::RideBooking,
    vacation_service::VacationService,
};

/*
    /api/travelers/{traveler_id}/loyalty
*/
pub async fn get_loyalty<S, B, G>(
    path: web::Path<String>,
    service: web::Data<VacationService<S, B, G>>,
) -> Result<HttpResponse, VacationError>
where
    S: VacationStore + LoyaltyStore + 'static,
    B: RideBooking + 'static,
    G: Geocoder + 'static,
{
    let view = service.loyalty(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(view))
}
