use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::{
    Config,
    error::FetchError,
    model::{Condition, WeatherSnapshot},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, config: &Config) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

/// `cod` arrives as a number on success and as a string on most errors.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCode {
    Number(i64),
    Text(String),
}

impl OwCode {
    fn as_number(&self) -> Option<i64> {
        match self {
            OwCode::Number(n) => Some(*n),
            OwCode::Text(s) => s.trim().parse().ok(),
        }
    }

    fn describe(&self) -> String {
        match self {
            OwCode::Number(n) => n.to_string(),
            OwCode::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwEnvelope {
    cod: Option<OwCode>,
    message: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    sys: Option<OwSys>,
}

impl From<OwCurrentResponse> for WeatherSnapshot {
    fn from(parsed: OwCurrentResponse) -> Self {
        let primary = parsed.weather.into_iter().next();
        let (condition, description, icon) = match primary {
            Some(w) => (Condition::from_keyword(&w.main), w.description, w.icon),
            None => (Condition::Other, String::new(), String::new()),
        };

        WeatherSnapshot {
            location: parsed.name,
            country: parsed
                .sys
                .and_then(|sys| sys.country)
                .filter(|c| !c.is_empty()),
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.and_then(|wind| wind.speed),
            pressure_hpa: parsed.main.pressure,
            condition,
            description,
            icon,
        }
    }
}

/// Map a response body onto a snapshot or an error.
///
/// The body's `cod` decides, not the HTTP status line.
pub(crate) fn interpret_body(body: &str) -> Result<WeatherSnapshot, FetchError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        FetchError::Transport(format!(
            "response is not JSON ({e}): {}",
            truncate_body(body)
        ))
    })?;

    let envelope: OwEnvelope = serde_json::from_value(value.clone())
        .map_err(|e| FetchError::Transport(format!("unexpected response shape: {e}")))?;

    let Some(code) = envelope.cod else {
        return Err(FetchError::BadStatus("missing".to_string()));
    };

    match code.as_number() {
        Some(200) => {
            let parsed: OwCurrentResponse = serde_json::from_value(value).map_err(|e| {
                FetchError::Transport(format!("failed to parse OpenWeather current JSON: {e}"))
            })?;
            Ok(parsed.into())
        }
        Some(404) => Err(FetchError::NotFound),
        Some(401) => Err(FetchError::Transport(format!(
            "API key rejected: {}",
            envelope
                .message
                .map(|m| m.to_string())
                .unwrap_or_default()
        ))),
        _ => Err(FetchError::BadStatus(code.describe())),
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        let url = format!("{}/weather", self.base_url);
        debug!(url = %url, "Fetching current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%status, bytes = body.len(), "OpenWeather responded");

        match interpret_body(&body) {
            Ok(snapshot) => {
                info!(location = %snapshot.location, temp = snapshot.temperature_c, "weather loaded");
                Ok(snapshot)
            }
            Err(err) => {
                warn!(%status, error = %err, "weather lookup failed");
                Err(err)
            }
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
