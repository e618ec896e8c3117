use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info, warn};

use vacation_rides_api::{
    config::AppConfig,
    db::{self, LoyaltyStore, MemoryStore, MongoStore, VacationStore},
    routes,
    services::{
        geocoding_service::{Geocoder, GoogleGeocoder},
        ride_booking_service::{HttpRideBooking, RideBooking},
        vacation_service::VacationService,
    },
};

const LOCAL_RIDE_BOOKING_URL: &str = "http://localhost:8000/api";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Application starting...");

    let config = AppConfig::from_env().map_err(to_io)?;

    let booking_url = config.ride_booking_url.clone().unwrap_or_else(|| {
        warn!(
            "RIDE_BOOKING_URL not set, using {}",
            LOCAL_RIDE_BOOKING_URL
        );
        LOCAL_RIDE_BOOKING_URL.to_string()
    });
    let booking = HttpRideBooking::new(booking_url).map_err(to_io)?;
    let geocoder = GoogleGeocoder::new(config.google_maps_api_key.clone()).map_err(to_io)?;

    match config.mongodb_uri.clone() {
        Some(uri) => {
            let client = db::mongo::create_mongo_client(&uri).await.map_err(to_io)?;
            let store = MongoStore::new(client, config.mongodb_database.clone());
            if let Err(e) = store.ensure_indexes().await {
                error!("Failed to create indexes: {}", e);
            }
            serve(config, store, booking, geocoder).await
        }
        None => {
            warn!("MONGODB_URI not set, vacations are kept in memory only");
            serve(config, MemoryStore::new(), booking, geocoder).await
        }
    }
}

async fn serve<S, B, G>(config: AppConfig, store: S, booking: B, geocoder: G) -> std::io::Result<()>
where
    S: VacationStore + LoyaltyStore + Send + Sync + 'static,
    B: RideBooking + Send + Sync + 'static,
    G: Geocoder + Send + Sync + 'static,
{
    let host = config.host.clone();
    let port = config.port;
    let service = web::Data::new(VacationService::new(store, booking, geocoder, config.awards));
    let config = web::Data::new(config);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(service.clone())
            .app_data(config.clone())
            .configure(routes::configure::<S, B, G>)
    })
    .bind((host, port))?
    .run()
    .await
}

fn to_io<E: std::fmt::Display>(err: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}
