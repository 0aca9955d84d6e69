use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::types::{CurrentConditions, Service, WeatherCode, WeatherError};

/// Variables requested in the `current` block of a forecast call
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,precipitation,weather_code,wind_speed_10m";

/// Source of current conditions for a coordinate pair.
pub trait ForecastSource: Send + Sync + 'static {
    fn current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<CurrentConditions, WeatherError>> + Send;
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    is_day: u8,
    precipitation: f64,
    weather_code: i32,
    wind_speed_10m: f64,
}

impl From<CurrentBlock> for CurrentConditions {
    fn from(block: CurrentBlock) -> Self {
        Self {
            temperature: block.temperature_2m,
            apparent_temperature: block.apparent_temperature,
            relative_humidity: block.relative_humidity_2m,
            wind_speed: block.wind_speed_10m,
            weather_code: WeatherCode(block.weather_code),
            is_day: block.is_day != 0,
            precipitation: block.precipitation,
        }
    }
}

/// Open-Meteo forecast client
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    forecast_url: String,
}

impl WeatherProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            forecast_url: format!("{}/v1/forecast", base_url.trim_end_matches('/')),
        })
    }
}

impl ForecastSource for WeatherProvider {
    async fn current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, WeatherError> {
        let latitude = latitude.to_string();
        let longitude = longitude.to_string();
        let response = self
            .client
            .get(&self.forecast_url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", CURRENT_FIELDS),
                ("timezone", "auto"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Forecast returned status {}", status);
            return Err(WeatherError::ServiceUnavailable {
                service: Service::Weather,
                status: status.as_u16(),
            });
        }

        let body: ForecastResponse = response.json().await?;
        Ok(body.current.into())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_current_block_conversion() {
        let json = r#"{
            "latitude": 52.52,
            "longitude": 13.419998,
            "timezone": "Europe/Berlin",
            "current": {
                "time": "2026-10-19T14:00",
                "interval": 900,
                "temperature_2m": 21.4,
                "relative_humidity_2m": 55,
                "apparent_temperature": 20.6,
                "is_day": 1,
                "precipitation": 0.2,
                "weather_code": 95,
                "wind_speed_10m": 12.3
            }
        }"#;
        let body: ForecastResponse = serde_json::from_str(json).unwrap();
        let current: CurrentConditions = body.current.into();

        assert_eq!(current.temperature, 21.4);
        assert_eq!(current.relative_humidity, 55.0);
        assert_eq!(current.weather_code, WeatherCode(95));
        assert!(current.is_day);
        assert_eq!(current.precipitation, 0.2);
    }

    #[test]
    fn test_night_flag() {
        let block = CurrentBlock {
            temperature_2m: 3.0,
            relative_humidity_2m: 90.0,
            apparent_temperature: 0.5,
            is_day: 0,
            precipitation: 0.0,
            weather_code: 3,
            wind_speed_10m: 4.0,
        };
        assert!(!CurrentConditions::from(block).is_day);
    }
}
