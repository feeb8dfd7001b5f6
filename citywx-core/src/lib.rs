//! Core library for the `citywx` weather lookup.
//!
//! This crate defines:
//! - The lookup session state machine and its controller
//! - The OpenWeather fetcher behind a provider trait
//! - Display derivation (units, rounding, background, date label)
//! - Persistence of the last searched city
//! - Configuration & credentials handling
//!
//! It is used by `citywx-cli`, but carries no terminal concerns itself.

pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod provider;
pub mod session;
pub mod store;

pub use app::{CompletedFetch, PendingFetch, WeatherApp};
pub use config::Config;
pub use display::{Background, UnitPreference, WeatherView};
pub use error::FetchError;
pub use model::{Condition, OriginalReadings, WeatherSnapshot};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config, provider_from_key};
pub use session::{Applied, Session, SessionState, Ticket};
pub use store::{FileCityStore, LastCityStore, MemoryCityStore};
