pub mod fare_service;
pub mod geocoding_service;
pub mod leg_sequencer;
pub mod loyalty_service;
pub mod ride_booking_service;
pub mod vacation_service;
