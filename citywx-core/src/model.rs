use serde::{Deserialize, Serialize};

/// Primary weather condition, as far as background selection cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Clear,
    Rain,
    Snow,
    Other,
}

impl Condition {
    /// Classify a provider keyword such as `"Clear"` or `"Rain"`, ignoring case.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.trim().to_lowercase().as_str() {
            "clear" => Condition::Clear,
            "rain" => Condition::Rain,
            "snow" => Condition::Snow,
            _ => Condition::Other,
        }
    }
}

/// Result of the last successful lookup. Temperatures are in Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: String,
    pub country: Option<String>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_mps: Option<f64>,
    pub pressure_hpa: f64,
    pub condition: Condition,
    pub description: String,
    pub icon: String,
}

/// Celsius readings captured at fetch time.
///
/// Every unit conversion starts from here, so toggling units back and forth
/// never accumulates error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OriginalReadings {
    pub temperature_c: f64,
    pub feels_like_c: f64,
}

impl From<&WeatherSnapshot> for OriginalReadings {
    fn from(snapshot: &WeatherSnapshot) -> Self {
        Self {
            temperature_c: snapshot.temperature_c,
            feels_like_c: snapshot.feels_like_c,
        }
    }
}
