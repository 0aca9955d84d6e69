use serde::{Deserialize, Serialize};

/// WMO weather interpretation code as reported by Open-Meteo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherCode(pub i32);

impl WeatherCode {
    /// Human-readable label for the code.
    /// See: <https://open-meteo.com/en/docs#weathervariables>
    pub fn description(self) -> &'static str {
        match self.0 {
            0 => "Clear sky",
            1 => "Mainly clear",
            2 => "Partly cloudy",
            3 => "Overcast",
            45 => "Fog",
            48 => "Depositing rime fog",
            51 => "Light drizzle",
            53 => "Moderate drizzle",
            55 => "Dense drizzle",
            61 => "Slight rain",
            63 => "Moderate rain",
            65 => "Heavy rain",
            71 => "Slight snow fall",
            73 => "Moderate snow fall",
            75 => "Heavy snow fall",
            77 => "Snow grains",
            80 => "Slight rain showers",
            81 => "Moderate rain showers",
            82 => "Violent rain showers",
            85 => "Slight snow showers",
            86 => "Heavy snow showers",
            95 => "Thunderstorm",
            96 => "Thunderstorm with slight hail",
            99 => "Thunderstorm with heavy hail",
            _ => "Unknown",
        }
    }
}

/// A geocoding match: one place the typed name may refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    /// First-level administrative region (state, province, ...)
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl PlaceCandidate {
    /// `"Name, AdminRegion, Country"`, skipping parts that are absent or empty.
    pub fn label(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        parts.extend(
            [self.admin1.as_deref(), self.country.as_deref()]
                .into_iter()
                .flatten()
                .filter(|s| !s.is_empty()),
        );
        parts.join(", ")
    }
}

/// Current conditions snapshot for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Air temperature at 2 m, °C
    pub temperature: f64,
    /// Apparent ("feels like") temperature, °C
    pub apparent_temperature: f64,
    /// Relative humidity at 2 m, %
    pub relative_humidity: f64,
    /// Wind speed at 10 m, km/h
    pub wind_speed: f64,
    pub weather_code: WeatherCode,
    pub is_day: bool,
    /// Precipitation sum of the current interval, mm
    pub precipitation: f64,
}

/// Which upstream service a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Geocoding,
    Weather,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::Geocoding => write!(f, "Geocoding"),
            Service::Weather => write!(f, "Weather"),
        }
    }
}

/// Lookup and weather fetch errors.
///
/// The display text is what the error banner shows for a primary search.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// The caller's cancellation token fired before the request settled
    #[error("Request cancelled")]
    Cancelled,
    /// An explicit search matched no place
    #[error("City not found. Please try again.")]
    NotFound,
    #[error("{service} service unavailable")]
    ServiceUnavailable { service: Service, status: u16 },
    /// DNS, connect, timeout, reset or an unreadable body
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl WeatherError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WeatherError::Cancelled)
    }
}
