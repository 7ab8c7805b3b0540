//! Reverse geocoding of device coordinates to a "City, Country" string.
//! Uses Nominatim (OpenStreetMap), no API key required.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use tracing::instrument;

use crate::{
    error::AdvisorError,
    model::Coordinates,
    provider::{http_client, parse_json, read_body},
};

const NOMINATIM_BASE: &str = "https://nominatim.openstreetmap.org";

#[async_trait]
pub trait LocationResolver: Send + Sync + Debug {
    async fn resolve(&self, coords: Coordinates) -> Result<String, AdvisorError>;
}

#[derive(Debug, Clone)]
pub struct NominatimResolver {
    http: Client,
    base_url: String,
}

impl NominatimResolver {
    pub fn new() -> Result<Self, AdvisorError> {
        Self::with_base_url(NOMINATIM_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, AdvisorError> {
        Ok(Self { http: http_client()?, base_url: base_url.trim_end_matches('/').to_string() })
    }
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    country: Option<String>,
}

impl NominatimAddress {
    /// Both a place and a country are required, matching what the
    /// dialect lookup expects ("Glasgow, United Kingdom").
    fn city_and_country(self) -> Option<String> {
        let place = self.city.or(self.town).or(self.village).or(self.municipality)?;
        let country = self.country.filter(|c| !c.is_empty())?;
        Some(format!("{place}, {country}"))
    }
}

#[async_trait]
impl LocationResolver for NominatimResolver {
    #[instrument(skip(self), level = "info")]
    async fn resolve(&self, coords: Coordinates) -> Result<String, AdvisorError> {
        let url = format!("{}/reverse", self.base_url);
        let (lat, lon) = (coords.latitude.to_string(), coords.longitude.to_string());

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("format", "json"),
                ("addressdetails", "1"),
                ("zoom", "10"),
            ])
            .send()
            .await?;

        let body = read_body(res, "Nominatim reverse").await?;
        let parsed: NominatimResponse = parse_json(&body, "Nominatim reverse")?;

        let name = parsed
            .address
            .and_then(NominatimAddress::city_and_country)
            .ok_or_else(|| AdvisorError::LocationNotFound(format!("{lat},{lon}")))?;

        tracing::info!("Reverse geocoded to: {}", name);
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GLASGOW: Coordinates = Coordinates { latitude: 55.86, longitude: -4.25 };

    #[tokio::test]
    async fn test_resolve_city_and_country() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "address": {"city": "Glasgow", "state": "Scotland", "country": "United Kingdom"},
                "display_name": "Glasgow, Scotland, United Kingdom"
            })))
            .mount(&server)
            .await;

        let resolver = NominatimResolver::with_base_url(&server.uri()).expect("client builds");
        let name = resolver.resolve(GLASGOW).await.unwrap();
        assert_eq!(name, "Glasgow, United Kingdom");
    }

    #[tokio::test]
    async fn test_town_is_used_when_no_city() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "address": {"town": "Pitlochry", "country": "United Kingdom"}
            })))
            .mount(&server)
            .await;

        let resolver = NominatimResolver::with_base_url(&server.uri()).expect("client builds");
        assert_eq!(resolver.resolve(GLASGOW).await.unwrap(), "Pitlochry, United Kingdom");
    }

    #[tokio::test]
    async fn test_missing_country_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "address": {"city": "Nowhere"}
            })))
            .mount(&server)
            .await;

        let resolver = NominatimResolver::with_base_url(&server.uri()).expect("client builds");
        let err = resolver.resolve(GLASGOW).await.unwrap_err();
        assert!(matches!(err, AdvisorError::LocationNotFound(_)));
    }
}
