pub mod fare;
pub mod geo;
pub mod itinerary;
pub mod loyalty;
pub mod vacation;
