use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    error::AdvisorError,
    model::{ForecastDay, WeatherObservation, WeatherRequest},
    provider::{http_client, parse_json, read_body},
};

use super::WeatherProvider;

const WEATHERAPI_BASE: &str = "http://api.weatherapi.com";
const FORECAST_DAYS: &str = "3";
/// WeatherAPI.com error code for "No matching location found."
const NO_MATCHING_LOCATION: i32 = 1006;

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    http: Client,
    base_url: String,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Result<Self, AdvisorError> {
        Self::with_base_url(api_key, WEATHERAPI_BASE)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self, AdvisorError> {
        Ok(Self {
            api_key,
            http: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    feelslike_c: f64,
    humidity: i32,
    wind_kph: f64,
    #[serde(default)]
    precip_mm: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    avgtemp_c: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: String,
    day: WaDay,
}

#[derive(Debug, Deserialize, Default)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    current: WaCurrent,
    #[serde(default)]
    forecast: WaForecast,
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    error: WaErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    code: i32,
}

/// "2024-02-01" -> "Thu". Unparseable dates are shown as given.
fn weekday_label(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%a").to_string())
        .unwrap_or_else(|_| date.to_string())
}

impl From<WaResponse> for WeatherObservation {
    fn from(parsed: WaResponse) -> Self {
        let forecast = parsed
            .forecast
            .forecastday
            .into_iter()
            .map(|fd| ForecastDay {
                day: weekday_label(&fd.date),
                temperature: fd.day.avgtemp_c,
                condition: fd.day.condition.text,
            })
            .collect();

        WeatherObservation {
            temperature: parsed.current.temp_c,
            feels_like: parsed.current.feelslike_c,
            condition: parsed.current.condition.text,
            humidity: parsed.current.humidity,
            wind_speed: parsed.current.wind_kph,
            precipitation: parsed.current.precip_mm * 100.0,
            forecast,
        }
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    #[instrument(skip(self), fields(address = %request.address), level = "info")]
    async fn get_weather(
        &self,
        request: &WeatherRequest,
    ) -> Result<WeatherObservation, AdvisorError> {
        let url = format!("{}/v1/forecast.json", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", request.address.as_str()),
                ("days", FORECAST_DAYS),
            ])
            .send()
            .await?;

        if res.status() == StatusCode::BAD_REQUEST {
            let body = res.text().await?;
            let not_found = serde_json::from_str::<WaErrorBody>(&body)
                .is_ok_and(|e| e.error.code == NO_MATCHING_LOCATION);

            return Err(if not_found {
                AdvisorError::LocationNotFound(request.address.clone())
            } else {
                AdvisorError::ProviderUnavailable(format!(
                    "WeatherAPI forecast request failed with status 400: {}",
                    super::truncate_body(&body)
                ))
            });
        }

        let body = read_body(res, "WeatherAPI forecast").await?;
        let parsed: WaResponse = parse_json(&body, "WeatherAPI forecast")?;

        Ok(parsed.into())
    }
}
