//! Keyword and threshold classifiers shared by the dialect and outfit rules.
//!
//! Condition text is matched by case-insensitive substring, so prose such as
//! "a light drizzle over the hills" still lands in the rain rules. Negations
//! ("not raining") are not understood.

use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

use crate::model::WeatherObservation;

pub const RAIN_WORDS: &[&str] = &["rain", "drizzle", "shower"];
pub const WET_WORDS: &[&str] = &["rain", "drizzle"];
pub const SUN_WORDS: &[&str] = &["clear", "sunny"];
pub const CLOUD_WORDS: &[&str] = &["cloud", "overcast"];
pub const SNOW_WORDS: &[&str] = &["snow"];

/// Dialect bucket below this temperature (°C) is always `cold`.
pub const COLD_BUCKET_BELOW: f64 = 8.0;
/// Wind speed (km/h) above which weather counts as windy.
pub const WINDY_ABOVE: f64 = 20.0;

/// Lower-cased condition text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition(String);

impl Condition {
    pub fn new(raw: &str) -> Self {
        Self(raw.to_lowercase())
    }

    pub fn mentions(&self, keyword: &str) -> bool {
        self.0.contains(keyword)
    }

    pub fn mentions_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.mentions(k))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&WeatherObservation> for Condition {
    fn from(weather: &WeatherObservation) -> Self {
        Self::new(&weather.condition)
    }
}

/// Weather category used to select dialect phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherBucket {
    Rain,
    Cloud,
    Sun,
    Cold,
    Wind,
}

impl WeatherBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherBucket::Rain => "rain",
            WeatherBucket::Cloud => "cloud",
            WeatherBucket::Sun => "sun",
            WeatherBucket::Cold => "cold",
            WeatherBucket::Wind => "wind",
        }
    }

    pub const fn all() -> &'static [WeatherBucket] {
        &[
            WeatherBucket::Rain,
            WeatherBucket::Cloud,
            WeatherBucket::Sun,
            WeatherBucket::Cold,
            WeatherBucket::Wind,
        ]
    }
}

impl fmt::Display for WeatherBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reduce an observation to exactly one dialect bucket.
///
/// Cold (below 8°C) overrides everything, then wind above 20 km/h, then the
/// condition keywords. Text with no known keyword is `cloud`.
pub fn weather_bucket(weather: &WeatherObservation) -> WeatherBucket {
    let condition = Condition::from(weather);

    let by_condition = if condition.mentions_any(RAIN_WORDS) {
        WeatherBucket::Rain
    } else if condition.mentions_any(SUN_WORDS) {
        WeatherBucket::Sun
    } else {
        // Covers both cloud/overcast and no keyword at all.
        WeatherBucket::Cloud
    };

    if weather.temperature < COLD_BUCKET_BELOW {
        WeatherBucket::Cold
    } else if weather.wind_speed > WINDY_ABOVE {
        WeatherBucket::Wind
    } else {
        by_condition
    }
}

/// Wardrobe category stored on a saved outfit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveTag {
    Rainy,
    Sunny,
    Cold,
    Warm,
    Windy,
    Other,
}

impl SaveTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveTag::Rainy => "rainy",
            SaveTag::Sunny => "sunny",
            SaveTag::Cold => "cold",
            SaveTag::Warm => "warm",
            SaveTag::Windy => "windy",
            SaveTag::Other => "other",
        }
    }

    pub const fn all() -> &'static [SaveTag] {
        &[
            SaveTag::Rainy,
            SaveTag::Sunny,
            SaveTag::Cold,
            SaveTag::Warm,
            SaveTag::Windy,
            SaveTag::Other,
        ]
    }
}

impl fmt::Display for SaveTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SaveTag {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        SaveTag::all()
            .iter()
            .copied()
            .find(|tag| tag.as_str() == lower)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown category '{value}'. Supported categories: rainy, sunny, cold, warm, windy, other."
                )
            })
    }
}

/// Tag an observation for the saved-outfit wardrobe.
///
/// Deliberately separate from [`weather_bucket`]: the thresholds (10/20°C)
/// and labels differ, so a calm 9°C overcast day is `cold` here but `cloud`
/// for dialect selection.
pub fn save_tag(weather: &WeatherObservation) -> SaveTag {
    let condition = Condition::from(weather);

    if condition.mentions_any(WET_WORDS) {
        SaveTag::Rainy
    } else if condition.mentions_any(SUN_WORDS) {
        SaveTag::Sunny
    } else if weather.temperature < 10.0 {
        SaveTag::Cold
    } else if weather.temperature > 20.0 {
        SaveTag::Warm
    } else if weather.wind_speed > WINDY_ABOVE {
        SaveTag::Windy
    } else {
        SaveTag::Other
    }
}

/// Temperature bands shared by the layer rules. Each band is `< boundary`,
/// so a boundary value belongs to the warmer band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempBand {
    /// Below 5°C.
    Freezing,
    /// 5..10°C.
    Cold,
    /// 10..15°C.
    Cool,
    /// 15..20°C.
    Mild,
    /// 20°C and above.
    Warm,
}

impl TempBand {
    pub fn of(temperature: f64) -> Self {
        if temperature < 5.0 {
            TempBand::Freezing
        } else if temperature < 10.0 {
            TempBand::Cold
        } else if temperature < 15.0 {
            TempBand::Cool
        } else if temperature < 20.0 {
            TempBand::Mild
        } else {
            TempBand::Warm
        }
    }
}

#[cfg(test)]
pub(crate) fn observation(
    condition: &str,
    temperature: f64,
    wind_speed: f64,
) -> WeatherObservation {
    WeatherObservation {
        temperature,
        feels_like: temperature,
        condition: condition.to_string(),
        humidity: 50,
        wind_speed,
        precipitation: 0.0,
        forecast: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_matching_is_case_insensitive() {
        let c = Condition::new("Light RAIN Showers");
        assert!(c.mentions("rain"));
        assert!(c.mentions_any(&["fog", "shower"]));
        assert!(!c.mentions_any(SUN_WORDS));
    }

    #[test]
    fn bucket_follows_condition_keywords_when_mild_and_calm() {
        assert_eq!(weather_bucket(&observation("patchy drizzle", 12.0, 5.0)), WeatherBucket::Rain);
        assert_eq!(
            weather_bucket(&observation("Scattered showers", 12.0, 5.0)),
            WeatherBucket::Rain
        );
        assert_eq!(weather_bucket(&observation("Clear sky", 12.0, 5.0)), WeatherBucket::Sun);
        assert_eq!(weather_bucket(&observation("Sunny", 12.0, 5.0)), WeatherBucket::Sun);
        assert_eq!(weather_bucket(&observation("Overcast", 12.0, 5.0)), WeatherBucket::Cloud);
    }

    #[test]
    fn bucket_defaults_to_cloud() {
        assert_eq!(weather_bucket(&observation("fog", 12.0, 5.0)), WeatherBucket::Cloud);
        assert_eq!(weather_bucket(&observation("", 12.0, 5.0)), WeatherBucket::Cloud);
    }

    #[test]
    fn rain_beats_sun_when_both_mentioned() {
        let w = observation("sunny spells with rain later", 15.0, 0.0);
        assert_eq!(weather_bucket(&w), WeatherBucket::Rain);
    }

    #[test]
    fn cold_override_wins_over_wind_and_sun() {
        let w = observation("sunny", 2.0, 30.0);
        assert_eq!(weather_bucket(&w), WeatherBucket::Cold);
    }

    #[test]
    fn wind_override_applies_when_not_cold() {
        let w = observation("heavy rain", 12.0, 25.0);
        assert_eq!(weather_bucket(&w), WeatherBucket::Wind);
    }

    #[test]
    fn bucket_thresholds_are_strict() {
        assert_eq!(weather_bucket(&observation("clear", 8.0, 5.0)), WeatherBucket::Sun);
        assert_eq!(weather_bucket(&observation("clear", 7.99, 5.0)), WeatherBucket::Cold);
        assert_eq!(weather_bucket(&observation("clear", 12.0, 20.0)), WeatherBucket::Sun);
        assert_eq!(weather_bucket(&observation("clear", 12.0, 20.1)), WeatherBucket::Wind);
    }

    #[test]
    fn save_tag_rules() {
        assert_eq!(save_tag(&observation("drizzle", 25.0, 30.0)), SaveTag::Rainy);
        assert_eq!(save_tag(&observation("clear", 2.0, 30.0)), SaveTag::Sunny);
        assert_eq!(save_tag(&observation("overcast", 9.0, 0.0)), SaveTag::Cold);
        assert_eq!(save_tag(&observation("overcast", 21.0, 30.0)), SaveTag::Warm);
        assert_eq!(save_tag(&observation("overcast", 15.0, 25.0)), SaveTag::Windy);
        assert_eq!(save_tag(&observation("overcast", 15.0, 5.0)), SaveTag::Other);
    }

    #[test]
    fn save_tag_ignores_showers() {
        // "shower" is a rain word for dialect buckets but not for save tags.
        let w = observation("showers", 15.0, 5.0);
        assert_eq!(weather_bucket(&w), WeatherBucket::Rain);
        assert_eq!(save_tag(&w), SaveTag::Other);
    }

    #[test]
    fn classifiers_disagree_on_borderline_cold() {
        let w = observation("overcast", 9.0, 0.0);
        assert_eq!(weather_bucket(&w), WeatherBucket::Cloud);
        assert_eq!(save_tag(&w), SaveTag::Cold);
    }

    #[test]
    fn save_tag_parses_case_insensitively() {
        for tag in SaveTag::all() {
            let parsed = SaveTag::try_from(tag.as_str().to_uppercase().as_str())
                .expect("roundtrip should succeed");
            assert_eq!(*tag, parsed);
        }

        let err = SaveTag::try_from("balmy").unwrap_err();
        assert!(err.to_string().contains("Unknown category"));
    }

    #[test]
    fn temp_band_boundaries_belong_to_upper_band() {
        assert_eq!(TempBand::of(4.99), TempBand::Freezing);
        assert_eq!(TempBand::of(5.0), TempBand::Cold);
        assert_eq!(TempBand::of(10.0), TempBand::Cool);
        assert_eq!(TempBand::of(15.0), TempBand::Mild);
        assert_eq!(TempBand::of(20.0), TempBand::Warm);
        assert_eq!(TempBand::of(-40.0), TempBand::Freezing);
    }
}
