use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A place the provider can resolve. Always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LocationQuery(String);

impl LocationQuery {
    pub(crate) fn new_unchecked(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// The `lat,lon` form the provider accepts as a query.
    pub fn as_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: String,
    pub country: String,
    pub region: Option<String>,
    pub localtime: Option<String>,
}

impl LocationInfo {
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub humidity: Option<u8>,
    pub wind_speed: Option<f64>,
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: LocationInfo,
    pub observation: Observation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub time: Option<String>,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub humidity: Option<u8>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDay {
    pub avg_temp: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub condition: Option<String>,
    pub hourly: Vec<HourlyRecord>,
}

impl HistoricalDay {
    /// First hourly description, falling back to the day's own condition.
    pub fn description(&self) -> Option<&str> {
        self.hourly
            .first()
            .and_then(|h| h.description.as_deref())
            .or(self.condition.as_deref())
    }

    /// Midnight wind, else midday wind.
    pub fn wind_speed(&self) -> Option<f64> {
        self.hourly
            .first()
            .and_then(|h| h.wind_speed)
            .or_else(|| self.hourly.get(12).and_then(|h| h.wind_speed))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalReport {
    pub location: Option<LocationInfo>,
    pub date: NaiveDate,
    /// `None` when the provider has nothing for this date.
    pub day: Option<HistoricalDay>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarineSnapshot {
    pub wave_height: Option<f64>,
    pub water_temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub visibility: Option<f64>,
    pub description: Option<String>,
}

impl MarineSnapshot {
    pub fn is_empty(&self) -> bool {
        self == &MarineSnapshot::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarineReport {
    pub coordinates: Coordinates,
    pub observation: Option<MarineSnapshot>,
}

/// What a displayed metric should be decorated with. Resolving this to a
/// glyph is up to whoever renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconKey {
    Thermometer,
    Humidity,
    Wind,
    Pressure,
    Waves,
    Visibility,
    Condition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
    pub icon: IconKey,
}

impl Metric {
    fn new(label: &'static str, value: String, icon: IconKey) -> Self {
        Self { label, value, icon }
    }
}

const MISSING: &str = "--";

fn with_unit<T: fmt::Display>(value: Option<T>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v}{unit}"),
        None => format!("{MISSING}{unit}"),
    }
}

fn or_missing(value: Option<&str>) -> String {
    value.unwrap_or(MISSING).to_string()
}

impl WeatherSnapshot {
    pub fn metrics(&self) -> Vec<Metric> {
        let obs = &self.observation;
        vec![
            Metric::new("Temperature", format!("{}°C", obs.temperature), IconKey::Thermometer),
            Metric::new("Conditions", or_missing(obs.description.as_deref()), IconKey::Condition),
            Metric::new("Humidity", with_unit(obs.humidity, "%"), IconKey::Humidity),
            Metric::new("Wind Speed", with_unit(obs.wind_speed, " km/h"), IconKey::Wind),
            Metric::new("Pressure", with_unit(obs.pressure, " mb"), IconKey::Pressure),
        ]
    }
}

impl HistoricalReport {
    pub fn metrics(&self) -> Vec<Metric> {
        let Some(day) = &self.day else {
            return Vec::new();
        };
        vec![
            Metric::new("Avg Temperature", format!("{}°C", day.avg_temp), IconKey::Thermometer),
            Metric::new("Min Temperature", format!("{}°C", day.min_temp), IconKey::Thermometer),
            Metric::new("Max Temperature", format!("{}°C", day.max_temp), IconKey::Thermometer),
            Metric::new("Description", or_missing(day.description()), IconKey::Condition),
            Metric::new("Wind Speed", with_unit(day.wind_speed(), " km/h"), IconKey::Wind),
        ]
    }
}

impl MarineReport {
    pub fn metrics(&self) -> Vec<Metric> {
        let Some(obs) = &self.observation else {
            return Vec::new();
        };
        vec![
            Metric::new("Wave Height", with_unit(obs.wave_height, " m"), IconKey::Waves),
            Metric::new(
                "Water Temperature",
                with_unit(obs.water_temperature, "°C"),
                IconKey::Thermometer,
            ),
            Metric::new("Wind Speed", with_unit(obs.wind_speed, " km/h"), IconKey::Wind),
            Metric::new("Visibility", with_unit(obs.visibility, " km"), IconKey::Visibility),
            Metric::new(
                "Weather Description",
                or_missing(obs.description.as_deref()),
                IconKey::Condition,
            ),
        ]
    }
}
