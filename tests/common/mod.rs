#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use actix_web::{web, App};
use futures::channel::oneshot;
use serde_json::{json, Value};

use vacation_rides_api::{
    config::PointAwards,
    db::MemoryStore,
    models::{
        geo::GeoPoint,
        itinerary::VacationInput,
        vacation::RideRequestIntent,
    },
    routes,
    services::{
        geocoding_service::{Geocoder, GeocodingError},
        ride_booking_service::{BookingError, RideBooking},
        vacation_service::VacationService,
    },
};

pub type TestService = VacationService<MemoryStore, MockBooking, StaticGeocoder>;

/// Returns `Pending` once so concurrent callers get a chance to interleave.
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

#[derive(Default)]
struct BookingState {
    intents: Mutex<Vec<RideRequestIntent>>,
    failures_left: AtomicUsize,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
}

#[derive(Clone, Default)]
pub struct MockBooking {
    state: Arc<BookingState>,
}

impl MockBooking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, count: usize) {
        self.state.failures_left.store(count, Ordering::SeqCst);
    }

    /// Queues a gate; bookings take gates in call order and wait until the
    /// matching sender fires.
    pub fn gate(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn intents(&self) -> Vec<RideRequestIntent> {
        self.state.intents.lock().unwrap().clone()
    }
}

impl RideBooking for MockBooking {
    async fn book(&self, intent: &RideRequestIntent) -> Result<String, BookingError> {
        YieldOnce(false).await;

        let gate = self.state.gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let failed = self
            .state
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failed {
            return Err(BookingError::Rejected("no drivers available".to_string()));
        }

        let mut intents = self.state.intents.lock().unwrap();
        intents.push(intent.clone());
        Ok(format!("ride-{}", intents.len()))
    }
}

#[derive(Clone, Default)]
pub struct StaticGeocoder {
    known: HashMap<String, GeoPoint>,
}

impl StaticGeocoder {
    pub fn with(mut self, address: &str, lat: f64, lng: f64) -> Self {
        self.known
            .insert(address.to_string(), GeoPoint::new(lat, lng).unwrap());
        self
    }
}

impl Geocoder for StaticGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodingError> {
        self.known
            .get(address)
            .copied()
            .ok_or_else(|| GeocodingError::NotFound(address.to_string()))
    }
}

pub fn test_service(booking: MockBooking) -> TestService {
    let geocoder = StaticGeocoder::default().with("Old Goa Church", 15.5009, 73.9116);
    VacationService::new(MemoryStore::new(), booking, geocoder, PointAwards::default())
}

pub fn create_app(
    service: web::Data<TestService>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(service)
        .configure(routes::configure::<MemoryStore, MockBooking, StaticGeocoder>)
}

pub fn beach_activity() -> Value {
    json!({
        "date": "2024-03-01",
        "time": "10:00",
        "location": "Beach",
        "description": "Snorkeling",
        "coordinates": { "latitude": 15.5553, "longitude": 73.7517 }
    })
}

pub fn vacation_json(flight: Option<Value>, activities: Vec<Value>) -> Value {
    json!({
        "traveler_id": "traveler-1",
        "destination": "Goa",
        "start_date": "2024-03-01",
        "end_date": "2024-03-05",
        "vehicle_class": "economy",
        "home": {
            "address": "MG Road, Bengaluru",
            "point": { "latitude": 12.9781, "longitude": 77.5697 }
        },
        "airport": {
            "address": "Kempegowda International Airport",
            "point": { "latitude": 13.1986, "longitude": 77.7066 }
        },
        "flight": flight,
        "activities": activities
    })
}

pub fn vacation_input(flight: Option<Value>, activities: Vec<Value>) -> VacationInput {
    serde_json::from_value(vacation_json(flight, activities)).unwrap()
}

pub fn flight_json() -> Value {
    json!({
        "flight_number": "6E 455",
        "departure_city": "Bengaluru",
        "arrival_city": "Goa",
        "departure_time": "2024-03-01T07:30:00"
    })
}
