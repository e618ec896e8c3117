use std::env;
use std::str::FromStr;

use thiserror::Error;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DATABASE: &str = "Vacations";
const RIDE_COMPLETION_POINTS: i64 = 50;
const VACATION_COMPLETION_POINTS: i64 = 500;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Loyalty points granted on ride and vacation completion. Zero disables an award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointAwards {
    pub ride_completion: i64,
    pub vacation_completion: i64,
}

impl Default for PointAwards {
    fn default() -> Self {
        Self {
            ride_completion: RIDE_COMPLETION_POINTS,
            vacation_completion: VACATION_COMPLETION_POINTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,
    pub ride_booking_url: Option<String>,
    pub google_maps_api_key: Option<String>,
    pub awards: PointAwards,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| HOST.to_string()),
            port: parse_var("PORT", PORT)?,
            mongodb_uri: optional_var("MONGODB_URI"),
            mongodb_database: env::var("MONGODB_DATABASE").unwrap_or_else(|_| DATABASE.to_string()),
            ride_booking_url: optional_var("RIDE_BOOKING_URL"),
            google_maps_api_key: optional_var("GOOGLE_MAPS_API_KEY"),
            awards: PointAwards {
                ride_completion: non_negative(parse_var(
                    "RIDE_COMPLETION_POINTS",
                    RIDE_COMPLETION_POINTS,
                )?, "RIDE_COMPLETION_POINTS")?,
                vacation_completion: non_negative(parse_var(
                    "VACATION_COMPLETION_POINTS",
                    VACATION_COMPLETION_POINTS,
                )?, "VACATION_COMPLETION_POINTS")?,
            },
        })
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional_var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

fn non_negative(points: i64, name: &'static str) -> Result<i64, ConfigError> {
    if points < 0 {
        return Err(ConfigError::Invalid {
            name,
            value: points.to_string(),
        });
    }
    Ok(points)
}
