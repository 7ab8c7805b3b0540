//! Optional rewriting of terse provider conditions into local-flavoured prose.
//!
//! The rewritten text replaces `condition` before classification, which is
//! why the classifiers only rely on keyword substrings.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::instrument;

use crate::{
    config::DescriberConfig,
    error::AdvisorError,
    model::WeatherObservation,
    provider::{http_client, parse_json, read_body},
};

const OPENAI_BASE: &str = "https://api.openai.com";

#[async_trait]
pub trait ConditionDescriber: Send + Sync + Debug {
    async fn describe(
        &self,
        location: &str,
        weather: &WeatherObservation,
    ) -> Result<String, AdvisorError>;
}

pub fn describe_prompt(location: &str, weather: &WeatherObservation) -> String {
    format!(
        "Given the weather conditions in {location}: {}, temperature {}°C, humidity {}%, \
         wind speed {} km/h. Provide a brief, natural description of the weather using local \
         dialect and expressions. Keep it concise and weather-focused.",
        weather.condition,
        weather.temperature.round(),
        weather.humidity,
        weather.wind_speed.round(),
    )
}

/// Chat-completions backed describer.
#[derive(Debug, Clone)]
pub struct OpenAiDescriber {
    api_key: String,
    model: String,
    http: Client,
    base_url: String,
}

impl OpenAiDescriber {
    pub fn new(config: &DescriberConfig) -> Result<Self, AdvisorError> {
        Self::with_base_url(config, OPENAI_BASE)
    }

    pub fn with_base_url(config: &DescriberConfig, base_url: &str) -> Result<Self, AdvisorError> {
        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model().to_string(),
            http: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[async_trait]
impl ConditionDescriber for OpenAiDescriber {
    #[instrument(skip(self, weather), level = "debug")]
    async fn describe(
        &self,
        location: &str,
        weather: &WeatherObservation,
    ) -> Result<String, AdvisorError> {
        let prompt = describe_prompt(location, weather);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "system", content: &prompt }],
        };

        let res = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let body = read_body(res, "OpenAI chat completion").await?;
        let parsed: ChatResponse = parse_json(&body, "OpenAI chat completion")?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AdvisorError::ProviderUnavailable("empty completion".to_string()))
    }
}
