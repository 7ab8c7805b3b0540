use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    error::AdvisorError,
    model::{WeatherObservation, WeatherRequest},
    provider::{http_client, parse_json, read_body},
};

use super::WeatherProvider;

const OPENWEATHER_BASE: &str = "https://api.openweathermap.org";

/// OpenWeather: direct geocoding followed by a current-weather lookup.
///
/// The free tier has no daily forecast here, so `forecast` stays empty.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
    base_url: String,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self, AdvisorError> {
        Self::with_base_url(api_key, OPENWEATHER_BASE)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self, AdvisorError> {
        Ok(Self {
            api_key,
            http: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn geocode(&self, address: &str) -> Result<OwGeocode, AdvisorError> {
        let url = format!("{}/geo/1.0/direct", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", address), ("limit", "1"), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let body = read_body(res, "OpenWeather geocode").await?;
        let places: Vec<OwGeocode> = parse_json(&body, "OpenWeather geocode")?;

        places
            .into_iter()
            .next()
            .ok_or_else(|| AdvisorError::LocationNotFound(address.to_string()))
    }

    async fn fetch_current(&self, place: &OwGeocode) -> Result<OwCurrentResponse, AdvisorError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let (lat, lon) = (place.lat.to_string(), place.lon.to_string());

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let body = read_body(res, "OpenWeather current").await?;
        parse_json(&body, "OpenWeather current")
    }
}

#[derive(Debug, Deserialize)]
struct OwGeocode {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: i32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    /// m/s
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    rain: Option<OwRain>,
}

impl From<OwCurrentResponse> for WeatherObservation {
    fn from(parsed: OwCurrentResponse) -> Self {
        let condition = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .unwrap_or_else(|| "Unknown".to_string());

        let precipitation = parsed.rain.and_then(|r| r.one_hour).map_or(0.0, |mm| mm * 100.0);

        WeatherObservation {
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            condition,
            humidity: parsed.main.humidity,
            wind_speed: (parsed.wind.speed * 3.6).round(),
            precipitation,
            forecast: Vec::new(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self), fields(address = %request.address), level = "info")]
    async fn get_weather(
        &self,
        request: &WeatherRequest,
    ) -> Result<WeatherObservation, AdvisorError> {
        let place = self.geocode(&request.address).await?;
        tracing::debug!(lat = place.lat, lon = place.lon, "Geocoded location");

        let current = self.fetch_current(&place).await?;
        Ok(current.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_geocode(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("appid", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_current_weather_conversion() {
        let server = MockServer::start().await;
        mount_geocode(&server, serde_json::json!([{"lat": 55.95, "lon": -3.19}])).await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": {"temp": 9.5, "feels_like": 6.1, "humidity": 81},
                "weather": [{"description": "light rain"}],
                "wind": {"speed": 5.0},
                "rain": {"1h": 0.6}
            })))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::with_base_url("test_key".into(), &server.uri())
            .expect("client builds");
        let obs = provider
            .get_weather(&WeatherRequest::new("Edinburgh, UK"))
            .await
            .unwrap();

        assert_eq!(obs.condition, "light rain");
        assert_eq!(obs.humidity, 81);
        assert_eq!(obs.wind_speed, 18.0);
        assert!((obs.precipitation - 60.0).abs() < 1e-9);
        assert!(obs.forecast.is_empty());
    }

    #[tokio::test]
    async fn test_missing_rain_means_no_precipitation() {
        let server = MockServer::start().await;
        mount_geocode(&server, serde_json::json!([{"lat": 51.5, "lon": -0.12}])).await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": {"temp": 21.0, "feels_like": 21.0, "humidity": 40},
                "weather": [],
                "wind": {"speed": 1.2}
            })))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::with_base_url("test_key".into(), &server.uri())
            .expect("client builds");
        let obs = provider.get_weather(&WeatherRequest::new("London, UK")).await.unwrap();

        assert_eq!(obs.precipitation, 0.0);
        assert_eq!(obs.condition, "Unknown");
        assert_eq!(obs.wind_speed, 4.0);
    }

    #[tokio::test]
    async fn test_empty_geocode_is_location_not_found() {
        let server = MockServer::start().await;
        mount_geocode(&server, serde_json::json!([])).await;

        let provider = OpenWeatherProvider::with_base_url("test_key".into(), &server.uri())
            .expect("client builds");
        let err = provider
            .get_weather(&WeatherRequest::new("Nowhereville, XX"))
            .await
            .unwrap_err();

        assert!(
            matches!(err, AdvisorError::LocationNotFound(ref loc) if loc == "Nowhereville, XX")
        );
    }

    #[tokio::test]
    async fn test_server_error_is_provider_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::with_base_url("bad".into(), &server.uri())
            .expect("client builds");
        let err = provider.get_weather(&WeatherRequest::new("York")).await.unwrap_err();

        assert!(matches!(err, AdvisorError::ProviderUnavailable(_)));
        assert!(err.to_string().contains("401"));
    }
}
