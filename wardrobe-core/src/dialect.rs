use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path, sync::Arc};

use crate::{
    classify::{WeatherBucket, weather_bucket},
    error::AdvisorError,
    model::WeatherObservation,
    phrases::{PhrasePicker, ThreadRngPicker, choose},
};

const BUILTIN_BANK: &str = include_str!("../data/dialects.toml");
const DEFAULT_KEY: &str = "default";

/// Candidate phrases for one city, per weather bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CityPhrases {
    #[serde(default)]
    pub rain: Vec<String>,
    #[serde(default)]
    pub cloud: Vec<String>,
    #[serde(default)]
    pub sun: Vec<String>,
    #[serde(default)]
    pub cold: Vec<String>,
    #[serde(default)]
    pub wind: Vec<String>,
}

impl CityPhrases {
    pub fn get(&self, bucket: WeatherBucket) -> &[String] {
        match bucket {
            WeatherBucket::Rain => &self.rain,
            WeatherBucket::Cloud => &self.cloud,
            WeatherBucket::Sun => &self.sun,
            WeatherBucket::Cold => &self.cold,
            WeatherBucket::Wind => &self.wind,
        }
    }

    fn missing_buckets(&self) -> Vec<WeatherBucket> {
        WeatherBucket::all()
            .iter()
            .copied()
            .filter(|b| self.get(*b).is_empty())
            .collect()
    }
}

/// Location-keyed phrase table with a complete `default` entry.
///
/// Immutable once built. Cities can be added by editing the TOML source.
#[derive(Debug, Clone)]
pub struct PhraseBank {
    cities: BTreeMap<String, CityPhrases>,
    default: CityPhrases,
}

impl PhraseBank {
    /// Validate and build a bank.
    ///
    /// `default` must have phrases for every bucket. Incomplete cities are
    /// accepted; their gaps are served from `default`.
    pub fn new(
        cities: BTreeMap<String, CityPhrases>,
        default: CityPhrases,
    ) -> Result<Self, AdvisorError> {
        let missing = default.missing_buckets();
        if !missing.is_empty() {
            let names: Vec<_> = missing.iter().map(WeatherBucket::as_str).collect();
            return Err(AdvisorError::PhraseBank(format!(
                "'default' entry has no phrases for: {}",
                names.join(", ")
            )));
        }

        for (city, phrases) in &cities {
            let missing = phrases.missing_buckets();
            if !missing.is_empty() {
                tracing::warn!(
                    city = %city,
                    ?missing,
                    "Phrase bank city is incomplete; falling back to default phrases"
                );
            }
        }

        Ok(Self { cities, default })
    }

    /// The bank compiled into the binary.
    pub fn builtin() -> Result<Self, AdvisorError> {
        Self::from_toml(BUILTIN_BANK)
    }

    pub fn from_toml(source: &str) -> Result<Self, AdvisorError> {
        let mut cities: BTreeMap<String, CityPhrases> =
            toml::from_str(source).map_err(|e| AdvisorError::PhraseBank(e.to_string()))?;

        let default = cities.remove(DEFAULT_KEY).ok_or_else(|| {
            AdvisorError::PhraseBank(format!("missing '{DEFAULT_KEY}' entry"))
        })?;

        Self::new(cities, default)
    }

    pub fn load(path: &Path) -> Result<Self, AdvisorError> {
        let source = fs::read_to_string(path).map_err(|e| {
            AdvisorError::PhraseBank(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&source)
    }

    /// Cities with their own phrases, in sorted order.
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.cities.keys().map(String::as_str)
    }

    /// Phrases for `city` and `bucket`. Unknown cities, and buckets a city
    /// leaves empty, resolve to the default entry.
    pub fn phrases(&self, city: &str, bucket: WeatherBucket) -> &[String] {
        match self.cities.get(city).map(|c| c.get(bucket)) {
            Some(list) if !list.is_empty() => list,
            _ => self.default.get(bucket),
        }
    }
}

/// City part of a location string: everything before the first comma.
pub fn city_of(location: &str) -> &str {
    location.split(',').next().unwrap_or(location).trim()
}

/// Picks a regional one-line weather description.
#[derive(Debug, Clone)]
pub struct DialectSummarizer {
    bank: Arc<PhraseBank>,
    picker: Arc<dyn PhrasePicker>,
}

impl DialectSummarizer {
    pub fn new(bank: Arc<PhraseBank>, picker: Arc<dyn PhrasePicker>) -> Self {
        Self { bank, picker }
    }

    /// Built-in bank with thread-local randomness.
    pub fn builtin() -> Result<Self, AdvisorError> {
        Ok(Self::new(Arc::new(PhraseBank::builtin()?), Arc::new(ThreadRngPicker)))
    }

    /// Each call picks afresh, so identical inputs may yield different lines.
    pub fn summarize(&self, weather: &WeatherObservation, location: &str) -> String {
        let city = city_of(location);
        let bucket = weather_bucket(weather);
        let phrases = self.bank.phrases(city, bucket);

        tracing::debug!(city, %bucket, candidates = phrases.len(), "Selecting dialect phrase");

        choose(self.picker.as_ref(), phrases).unwrap_or_default().to_string()
    }
}
