use chrono::Utc;

use crate::{
    classify::{SaveTag, save_tag},
    config::Config,
    describe::{ConditionDescriber, OpenAiDescriber},
    dialect::DialectSummarizer,
    error::AdvisorError,
    location::LocationResolver,
    model::{Coordinates, OutfitRecommendation, SavedOutfit, WeatherObservation, WeatherRequest},
    outfit::OutfitAdvisor,
    provider::{WeatherProvider, default_provider_from_config},
};

/// Everything shown for one location at one moment.
#[derive(Debug, Clone)]
pub struct Advice {
    pub location: String,
    pub weather: WeatherObservation,
    pub summary: String,
    pub outfit: OutfitRecommendation,
}

impl Advice {
    pub fn outfit_id(&self) -> String {
        SavedOutfit::outfit_id(&self.location, &self.weather.condition)
    }

    pub fn weather_type(&self) -> SaveTag {
        save_tag(&self.weather)
    }

    pub fn to_saved_outfit(&self) -> SavedOutfit {
        SavedOutfit {
            id: self.outfit_id(),
            location: self.location.clone(),
            weather_summary: self.summary.clone(),
            weather_type: self.weather_type(),
            base_layers: self.outfit.base_layers.clone(),
            mid_layers: self.outfit.mid_layers.clone(),
            outer_layers: self.outfit.outer_layers.clone(),
            wildcard: self.outfit.wildcard.clone(),
            temperature: self.weather.temperature,
            saved_at: Utc::now(),
        }
    }
}

/// Fetches weather, optionally rewrites the condition, then runs both
/// classifiers.
#[derive(Debug)]
pub struct Advisor {
    provider: Box<dyn WeatherProvider>,
    describer: Option<Box<dyn ConditionDescriber>>,
    summarizer: DialectSummarizer,
    outfits: OutfitAdvisor,
}

impl Advisor {
    pub fn new(
        provider: Box<dyn WeatherProvider>,
        summarizer: DialectSummarizer,
        outfits: OutfitAdvisor,
    ) -> Self {
        Self { provider, describer: None, summarizer, outfits }
    }

    pub fn with_describer(mut self, describer: Box<dyn ConditionDescriber>) -> Self {
        self.describer = Some(describer);
        self
    }

    /// Default provider, configured phrase bank, and the describer if one
    /// has credentials.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = default_provider_from_config(config)?;
        let advisor = Self::new(provider, config.summarizer()?, OutfitAdvisor::default());

        Ok(match &config.describer {
            Some(cfg) => advisor.with_describer(Box::new(OpenAiDescriber::new(cfg)?)),
            None => advisor,
        })
    }

    /// Classify an observation that is already in hand.
    pub fn advise_weather(&self, location: &str, weather: WeatherObservation) -> Advice {
        let summary = self.summarizer.summarize(&weather, location);
        let outfit = self.outfits.recommend(&weather);

        Advice { location: location.to_string(), weather, summary, outfit }
    }

    pub async fn advise(&self, location: &str) -> Result<Advice, AdvisorError> {
        let mut weather = self.provider.get_weather(&WeatherRequest::new(location)).await?;

        if let Some(describer) = &self.describer {
            enhance_condition(describer.as_ref(), location, &mut weather).await;
        }

        Ok(self.advise_weather(location, weather))
    }
}

/// Replace `condition` with the describer's prose, keeping the raw text on
/// any failure.
pub async fn enhance_condition(
    describer: &dyn ConditionDescriber,
    location: &str,
    weather: &mut WeatherObservation,
) {
    match describer.describe(location, weather).await {
        Ok(text) => weather.condition = text,
        Err(e) => {
            tracing::warn!(error = %e, "Description enhancement failed, using raw condition");
        }
    }
}

/// Outcome of location detection. `error` is set when the fallback was used.
#[derive(Debug)]
pub struct DetectedLocation {
    pub location: String,
    pub error: Option<AdvisorError>,
}

/// Resolve device coordinates, falling back to `fallback`.
///
/// `None` coordinates mean the device would not share a position.
pub async fn detect_location(
    resolver: &dyn LocationResolver,
    coords: Option<Coordinates>,
    fallback: &str,
) -> DetectedLocation {
    let result = match coords {
        Some(coords) => resolver.resolve(coords).await,
        None => Err(AdvisorError::PermissionDenied),
    };

    match result {
        Ok(location) => DetectedLocation { location, error: None },
        Err(e) => {
            tracing::warn!(error = %e, fallback, "Could not determine location");
            DetectedLocation { location: fallback.to_string(), error: Some(e) }
        }
    }
}
