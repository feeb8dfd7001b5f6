use crate::{Config, WeatherSnapshot, error::FetchError, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for `city`. One call, one request.
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    provider_from_key(config.api_key(), config)
}

/// Construct the OpenWeather provider from an already resolved key.
pub fn provider_from_key(
    api_key: Option<String>,
    config: &Config,
) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = api_key.ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
                 Hint: run `citywx configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;
    Ok(Arc::new(OpenWeatherProvider::new(api_key, config)?))
}
