use crate::error::{config_error, Error};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Starting point of a route
#[derive(Debug, Clone, PartialEq)]
pub enum Origin {
    /// Configured home coordinates
    Home(Coordinates),
    /// Free-text address of an earlier event
    Address(String),
}

impl Origin {
    /// Value for the `origin` query parameter
    pub fn as_param(&self) -> String {
        match self {
            Origin::Home(coords) => coords.to_string(),
            Origin::Address(address) => address.clone(),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Home(coords) => write!(f, "home ({})", coords),
            Origin::Address(address) => f.write_str(address),
        }
    }
}

/// Routing mode understood by the Directions API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }
}

impl FromStr for TravelMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" => Ok(TravelMode::Driving),
            "walking" => Ok(TravelMode::Walking),
            "bicycling" => Ok(TravelMode::Bicycling),
            "transit" => Ok(TravelMode::Transit),
            other => Err(config_error(&format!(
                "Unknown TRAVEL_MODE '{}', expected driving, walking, bicycling or transit",
                other
            ))),
        }
    }
}

/// One geocoding candidate
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: Option<String>,
}

/// Numeric part of a Maps API value/text pair
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextValue {
    pub value: i64,
}

/// One segment of a route
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Leg {
    pub duration: TextValue,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub summary: String,
    pub legs: Vec<Leg>,
}

impl Route {
    /// Total travel time over all legs, in seconds
    pub fn total_duration_secs(&self) -> i64 {
        self.legs.iter().map(|leg| leg.duration.value).sum()
    }
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub routes: Vec<Route>,
    pub error_message: Option<String>,
}
