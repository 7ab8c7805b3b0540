use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::SaveTag;

#[derive(Debug, Clone)]
pub struct WeatherRequest {
    pub address: String,
}

impl WeatherRequest {
    pub fn new(address: impl Into<String>) -> Self {
        Self { address: address.into() }
    }
}

/// Device or user supplied position, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A single current-conditions reading for one location.
///
/// `condition` is free text and may be prose produced by a describer rather
/// than a terse provider code, so classifiers match it by keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherObservation {
    /// Celsius.
    pub temperature: f64,
    /// Celsius.
    pub feels_like: f64,
    pub condition: String,
    /// Relative humidity percentage.
    pub humidity: i32,
    /// km/h.
    pub wind_speed: f64,
    /// Intensity proxy, roughly 0..100.
    pub precipitation: f64,
    #[serde(default)]
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub day: String,
    pub temperature: f64,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitRecommendation {
    pub base_layers: String,
    pub mid_layers: String,
    pub outer_layers: String,
    /// Empty when no accessory rule matched.
    pub wildcard: String,
    pub flourish: String,
}

/// A bookmarked recommendation.
///
/// Identity is `location + condition`: two observations at the same place
/// with identical condition text map to the same record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedOutfit {
    pub id: String,
    pub location: String,
    pub weather_summary: String,
    pub weather_type: SaveTag,
    pub base_layers: String,
    pub mid_layers: String,
    pub outer_layers: String,
    pub wildcard: String,
    pub temperature: f64,
    pub saved_at: DateTime<Utc>,
}

impl SavedOutfit {
    pub fn outfit_id(location: &str, condition: &str) -> String {
        format!("{location}{condition}")
    }
}
