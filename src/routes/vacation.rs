use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::db::{LoyaltyStore, VacationStore};
use crate::error::VacationError;
use crate::models::{
    itinerary::VacationInput,
    vacation::{NextLegView, VacationView},
};
use crate::services::{
    geocoding_service::Geocoder, ride_booking_service::RideBooking,
    vacation_service::VacationService,
};

/*
    POST /api/vacations
*/
pub async fn create<S, B, G>(
    input: web::Json<VacationInput>,
    service: web::Data<VacationService<S, B, G>>,
) -> Result<HttpResponse, VacationError>
where
    S: VacationStore + LoyaltyStore + 'static,
    B: RideBooking + 'static,
    G: Geocoder + 'static,
{
    let vacation = service.create_vacation(input.into_inner()).await?;
    Ok(HttpResponse::Created().json(VacationView::from(&vacation)))
}

/*
    GET /api/vacations/{id}
*/
pub async fn get_by_id<S, B, G>(
    path: web::Path<String>,
    service: web::Data<VacationService<S, B, G>>,
) -> Result<HttpResponse, VacationError>
where
    S: VacationStore + LoyaltyStore + 'static,
    B: RideBooking + 'static,
    G: Geocoder + 'static,
{
    let vacation = service.get_vacation(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(VacationView::from(&vacation)))
}

/*
    GET /api/travelers/{traveler_id}/vacations
*/
pub async fn list_for_traveler<S, B, G>(
    path: web::Path<String>,
    service: web::Data<VacationService<S, B, G>>,
) -> Result<HttpResponse, VacationError>
where
    S: VacationStore + LoyaltyStore + 'static,
    B: RideBooking + 'static,
    G: Geocoder + 'static,
{
    let vacations = service.list_vacations(&path.into_inner()).await?;
    let views: Vec<VacationView> = vacations.iter().map(VacationView::from).collect();
    Ok(HttpResponse::Ok().json(views))
}

/*
    POST /api/vacations/{id}/next-leg
*/
pub async fn start_next_leg<S, B, G>(
    path: web::Path<String>,
    service: web::Data<VacationService<S, B, G>>,
) -> Result<HttpResponse, VacationError>
where
    S: VacationStore + LoyaltyStore + 'static,
    B: RideBooking + 'static,
    G: Geocoder + 'static,
{
    let next = service.start_next_leg(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(NextLegView::from(next)))
}

/*
    POST /api/vacations/{id}/next-leg/cancel
*/
pub async fn cancel_pending<S, B, G>(
    path: web::Path<String>,
    service: web::Data<VacationService<S, B, G>>,
) -> Result<HttpResponse, VacationError>
where
    S: VacationStore + LoyaltyStore + 'static,
    B: RideBooking + 'static,
    G: Geocoder + 'static,
{
    let progress = service.cancel_pending(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "released", "progress": progress })))
}

/*
    POST /api/vacations/{id}/rides/{ride_id}/complete
*/
pub async fn complete_ride<S, B, G>(
    path: web::Path<(String, String)>,
    service: web::Data<VacationService<S, B, G>>,
) -> Result<HttpResponse, VacationError>
where
    S: VacationStore + LoyaltyStore + 'static,
    B: RideBooking + 'static,
    G: Geocoder + 'static,
{
    let (id, ride_id) = path.into_inner();
    let closed = service.complete_ride(&id, &ride_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "advanced",
        "state": closed.state,
        "progress": closed.progress,
        "points_awarded": closed.points_awarded,
    })))
}

/*
    POST /api/vacations/{id}/rides/{ride_id}/cancel
*/
pub async fn cancel_ride<S, B, G>(
    path: web::Path<(String, String)>,
    service: web::Data<VacationService<S, B, G>>,
) -> Result<HttpResponse, VacationError>
where
    S: VacationStore + LoyaltyStore + 'static,
    B: RideBooking + 'static,
    G: Geocoder + 'static,
{
    let (id, ride_id) = path.into_inner();
    let progress = service.cancel_ride(&id, &ride_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "released", "progress": progress })))
}
