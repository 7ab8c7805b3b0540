//! Core library for the `wardrobe` CLI.
//!
//! This crate defines:
//! - The advice engine: dialect summaries and layered outfit recommendations
//! - Shared classifiers over free-text weather conditions
//! - Collaborators around the engine (weather providers, condition describer,
//!   reverse geocoding, key-value persistence) and the orchestration tying them together
//! - Configuration & credentials handling
//!
//! It is used by `wardrobe-cli`, but the engine itself is synchronous and has no
//! I/O, so it can be embedded anywhere.

pub mod advisor;
pub mod classify;
pub mod config;
pub mod describe;
pub mod dialect;
pub mod error;
pub mod location;
pub mod model;
pub mod outfit;
pub mod phrases;
pub mod provider;
pub mod store;

pub use advisor::{Advice, Advisor, DetectedLocation, detect_location};
pub use classify::{SaveTag, WeatherBucket, save_tag, weather_bucket};
pub use config::{Config, DescriberConfig, ProviderConfig};
pub use dialect::{DialectSummarizer, PhraseBank};
pub use error::AdvisorError;
pub use model::{
    Coordinates, ForecastDay, OutfitRecommendation, SavedOutfit, WeatherObservation,
    WeatherRequest,
};
pub use outfit::OutfitAdvisor;
pub use phrases::{PhrasePicker, SeededPicker, ThreadRngPicker};
pub use provider::{ProviderId, WeatherProvider};
