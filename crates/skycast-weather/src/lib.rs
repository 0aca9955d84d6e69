//! Weather lookups for SkyCast
//!
//! Forward geocoding with cancellable suggestions and current conditions,
//! both backed by the Open-Meteo APIs.

pub mod geocode;
pub mod provider;
pub mod types;

pub use geocode::{GeoSuggestClient, PlaceLookup};
pub use provider::{ForecastSource, WeatherProvider};
pub use types::*;
