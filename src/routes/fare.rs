use actix_web::{web, HttpResponse, Responder};

use crate::models::fare::{FareEstimateRequest, FareQuoteView};
use crate::services::fare_service::FareEstimator;

/*
    /api/fares/estimate
*/
pub async fn estimate(input: web::Json<FareEstimateRequest>) -> impl Responder {
    let input = input.into_inner();
    let quote = FareEstimator::estimate(input.pickup, input.destination, input.vehicle_class);

    HttpResponse::Ok().json(FareQuoteView::from(quote))
}
