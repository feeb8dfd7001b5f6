//! Presentation values derived from a snapshot.
//!
//! Everything here is a pure function of the stored snapshot, its original
//! Celsius readings and the selected unit. Nothing is cached; callers derive
//! a fresh [`WeatherView`] per render.

use chrono::Datelike;
use serde::Serialize;

use crate::model::{Condition, OriginalReadings, WeatherSnapshot};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Shown in place of optional fields the service did not send.
pub const PLACEHOLDER: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Metric,
    Imperial,
}

impl UnitPreference {
    pub fn toggled(self) -> Self {
        match self {
            UnitPreference::Metric => UnitPreference::Imperial,
            UnitPreference::Imperial => UnitPreference::Metric,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnitPreference::Metric => "°C",
            UnitPreference::Imperial => "°F",
        }
    }
}

/// Convert a Celsius reading into the requested unit.
pub fn to_unit(celsius: f64, unit: UnitPreference) -> f64 {
    match unit {
        UnitPreference::Metric => celsius,
        UnitPreference::Imperial => celsius * 9.0 / 5.0 + 32.0,
    }
}

/// Round to the nearest integer, halves towards positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Background picked for a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    Clear,
    Rain,
    Snow,
    Hot,
    Cold,
}

impl Background {
    /// Condition keyword wins over temperature; first match applies.
    pub fn select(condition: Condition, temperature_c: f64) -> Self {
        match condition {
            Condition::Clear => Background::Clear,
            Condition::Rain => Background::Rain,
            Condition::Snow => Background::Snow,
            Condition::Other if temperature_c > 30.0 => Background::Hot,
            Condition::Other if temperature_c < 0.0 => Background::Cold,
            Condition::Other => Background::Clear,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Background::Clear => "clear",
            Background::Rain => "rain",
            Background::Snow => "snow",
            Background::Hot => "hot",
            Background::Cold => "cold",
        }
    }

    /// Image file backing this category.
    pub fn asset(self) -> &'static str {
        match self {
            Background::Clear => "warm-bg.jpg",
            Background::Rain => "rainy-bg.png",
            Background::Snow => "snowy-bg.png",
            Background::Hot => "hot-bg.png",
            Background::Cold => "cold-bg.jpg",
        }
    }
}

impl std::fmt::Display for Background {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Wed 5 Jun 2024`
pub fn date_label<D: Datelike>(date: &D) -> String {
    let weekday = WEEKDAYS[date.weekday().num_days_from_sunday() as usize];
    let month = MONTHS[date.month0() as usize];
    format!("{weekday} {} {month} {}", date.day(), date.year())
}

pub fn icon_url(host: &str, icon: &str) -> String {
    format!("{}/img/wn/{icon}@2x.png", host.trim_end_matches('/'))
}

/// Display-ready strings for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    pub location: String,
    pub date: String,
    pub temperature: String,
    pub feels_like: String,
    pub description: String,
    pub icon_url: String,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
    pub background: Background,
    pub unit: UnitPreference,
    pub toggle_label: String,
}

impl WeatherView {
    pub fn derive<D: Datelike>(
        snapshot: &WeatherSnapshot,
        readings: &OriginalReadings,
        background: Background,
        unit: UnitPreference,
        today: &D,
        icon_host: &str,
    ) -> Self {
        let symbol = unit.symbol();
        let temperature = round_half_up(to_unit(readings.temperature_c, unit));
        let feels_like = round_half_up(to_unit(readings.feels_like_c, unit));

        let country = snapshot.country.as_deref().unwrap_or(PLACEHOLDER);
        let wind = snapshot
            .wind_speed_mps
            .map(|speed| format!("{} m/s", round_half_up(speed)))
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        Self {
            location: format!("{}, {country}", snapshot.location),
            date: date_label(today),
            temperature: format!("{temperature}{symbol}"),
            feels_like: format!("{feels_like}{symbol}"),
            description: snapshot.description.clone(),
            icon_url: icon_url(icon_host, &snapshot.icon),
            humidity: format!("{}%", snapshot.humidity_pct),
            wind,
            pressure: format!("{} hPa", snapshot.pressure_hpa),
            background,
            unit,
            toggle_label: format!("Switch to {}", unit.toggled().symbol()),
        }
    }
}
