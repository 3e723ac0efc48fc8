use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use std::{fmt, time::Duration};
use tracing::{debug, warn};

use crate::{
    error::ProviderError,
    model::{
        Coordinates, HistoricalDay, HistoricalReport, HourlyRecord, LocationInfo, LocationQuery,
        MarineReport, MarineSnapshot, Observation, WeatherSnapshot,
    },
    validate::DATE_FORMAT,
};

use super::WeatherProvider;

#[derive(Clone)]
pub struct WeatherstackProvider {
    access_key: String,
    base_url: String,
    http: Client,
}

impl fmt::Debug for WeatherstackProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherstackProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Current,
    Historical,
    Marine,
}

impl Route {
    fn path(self) -> &'static str {
        match self {
            Route::Current => "current",
            Route::Historical => "historical",
            Route::Marine => "marine",
        }
    }

    fn fallback_message(self) -> &'static str {
        match self {
            Route::Current => "Failed to fetch weather",
            Route::Historical => "Failed to fetch historical data",
            Route::Marine => "Failed to fetch marine data",
        }
    }
}

impl WeatherstackProvider {
    pub fn new(
        access_key: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { access_key, base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    async fn get(&self, route: Route, params: &[(&str, &str)]) -> Result<Value, ProviderError> {
        let url = format!("{}/{}", self.base_url, route.path());
        debug!(route = route.path(), "sending weatherstack request");

        let res = self
            .http
            .get(&url)
            .query(&[("access_key", self.access_key.as_str())])
            .query(params)
            .send()
            .await
            .inspect_err(|e| {
                warn!(
                    route = route.path(),
                    timeout = e.is_timeout(),
                    "weatherstack request failed"
                )
            })?;

        let status = res.status();
        let body = res.text().await?;

        read_envelope(route, status, &body).inspect_err(|e| {
            warn!(route = route.path(), error = %e, "weatherstack returned an error")
        })
    }
}

#[async_trait]
impl WeatherProvider for WeatherstackProvider {
    async fn fetch_current(&self, query: &LocationQuery) -> Result<WeatherSnapshot, ProviderError> {
        let body = self.get(Route::Current, &[("query", query.as_str())]).await?;
        parse_current(body)
    }

    async fn fetch_historical(
        &self,
        query: &LocationQuery,
        date: NaiveDate,
    ) -> Result<HistoricalReport, ProviderError> {
        let date_param = date.format(DATE_FORMAT).to_string();
        let params = [("query", query.as_str()), ("historical_date", date_param.as_str())];
        let body = self.get(Route::Historical, &params).await?;
        parse_historical(body, date)
    }

    async fn fetch_marine(&self, coords: Coordinates) -> Result<MarineReport, ProviderError> {
        let query = coords.as_query();
        let body = self.get(Route::Marine, &[("query", query.as_str())]).await?;
        parse_marine(body, coords)
    }
}

/// Turns a raw response into JSON, surfacing in-band `error` objects regardless
/// of the HTTP status the provider chose to send them with.
fn read_envelope(route: Route, status: StatusCode, body: &str) -> Result<Value, ProviderError> {
    let json = serde_json::from_str::<Value>(body).ok();

    if let Some(error) = json.as_ref().and_then(|j| j.get("error")).filter(|e| is_truthy(e)) {
        let message = error
            .get("info")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(route.fallback_message())
            .to_string();
        let code = error.get("code").and_then(Value::as_i64);
        return Err(ProviderError::Api { code, message });
    }

    if !status.is_success() {
        return Err(ProviderError::Http {
            status: status.as_u16(),
            message: route.fallback_message().to_string(),
        });
    }

    json.ok_or_else(|| ProviderError::Decode(format!("{} payload is not JSON", route.path())))
}

fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

fn decode<T: DeserializeOwned>(route: Route, value: Value) -> Result<T, ProviderError> {
    serde_json::from_value(value)
        .map_err(|e| ProviderError::Decode(format!("{} payload: {e}", route.path())))
}

fn has_fields(value: &Value) -> bool {
    value.as_object().is_some_and(|m| !m.is_empty())
}

#[derive(Debug, Deserialize)]
struct WsLocation {
    name: String,
    country: String,
    region: Option<String>,
    localtime: Option<String>,
}

impl From<WsLocation> for LocationInfo {
    fn from(l: WsLocation) -> Self {
        LocationInfo { name: l.name, country: l.country, region: l.region, localtime: l.localtime }
    }
}

#[derive(Debug, Deserialize)]
struct WsCurrent {
    temperature: f64,
    feelslike: Option<f64>,
    weather_descriptions: Option<Vec<String>>,
    weather_icons: Option<Vec<String>>,
    humidity: Option<u8>,
    wind_speed: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WsCurrentResponse {
    location: WsLocation,
    current: WsCurrent,
}

#[derive(Debug, Deserialize)]
struct WsHistoricalResponse {
    location: Option<WsHistoricalLocation>,
    historical: Option<Value>,
}

/// Display-only on the historical route, so nothing in it is required.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WsHistoricalLocation {
    name: Option<String>,
    country: Option<String>,
    region: Option<String>,
    localtime: Option<String>,
}

impl WsHistoricalLocation {
    fn into_info(self) -> Option<LocationInfo> {
        let name = self.name.filter(|n| !n.trim().is_empty())?;
        Some(LocationInfo {
            name,
            country: self.country.unwrap_or_default(),
            region: self.region,
            localtime: self.localtime,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WsHistoricalDay {
    avgtemp: f64,
    mintemp: f64,
    maxtemp: f64,
    condition: Option<String>,
    #[serde(default)]
    hourly: Vec<WsHourly>,
}

#[derive(Debug, Deserialize)]
struct WsHourly {
    #[serde(default, deserialize_with = "lenient_string")]
    time: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    windspeed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u8")]
    humidity: Option<u8>,
    weather_descriptions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct WsMarineResponse {
    marine: Option<WsMarine>,
}

#[derive(Debug, Deserialize)]
struct WsMarine {
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct WsMarineEntry {
    #[serde(default, deserialize_with = "lenient_f64")]
    swell_height_m: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    swell_height: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    water_temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    visibility: Option<f64>,
    weather_description: Option<String>,
}

fn first(list: Option<Vec<String>>) -> Option<String> {
    list.and_then(|l| l.into_iter().next()).filter(|s| !s.trim().is_empty())
}

fn parse_current(body: Value) -> Result<WeatherSnapshot, ProviderError> {
    let parsed: WsCurrentResponse = decode(Route::Current, body)?;
    let current = parsed.current;

    Ok(WeatherSnapshot {
        location: parsed.location.into(),
        observation: Observation {
            temperature: current.temperature,
            feels_like: current.feelslike,
            description: first(current.weather_descriptions),
            icon_url: first(current.weather_icons),
            humidity: current.humidity,
            wind_speed: current.wind_speed,
            pressure: current.pressure,
        },
    })
}

fn parse_historical(body: Value, date: NaiveDate) -> Result<HistoricalReport, ProviderError> {
    let parsed: WsHistoricalResponse = decode(Route::Historical, body)?;
    let key = date.format(DATE_FORMAT).to_string();

    let day = parsed
        .historical
        .and_then(|mut h| h.get_mut(&key).map(Value::take))
        .filter(has_fields)
        .map(|raw| decode::<WsHistoricalDay>(Route::Historical, raw))
        .transpose()?
        .map(|d| HistoricalDay {
            avg_temp: d.avgtemp,
            min_temp: d.mintemp,
            max_temp: d.maxtemp,
            condition: d.condition,
            hourly: d
                .hourly
                .into_iter()
                .map(|h| HourlyRecord {
                    time: h.time,
                    temperature: h.temperature,
                    wind_speed: h.wind_speed.or(h.windspeed),
                    humidity: h.humidity,
                    description: first(h.weather_descriptions),
                })
                .collect(),
        });

    let location = parsed.location.and_then(WsHistoricalLocation::into_info);
    Ok(HistoricalReport { location, date, day })
}

fn parse_marine(body: Value, coordinates: Coordinates) -> Result<MarineReport, ProviderError> {
    let parsed: WsMarineResponse = decode(Route::Marine, body)?;

    let observation = parsed
        .marine
        .and_then(|m| m.data.into_iter().next())
        .filter(has_fields)
        .map(|raw| decode::<WsMarineEntry>(Route::Marine, raw))
        .transpose()?
        .map(|e| MarineSnapshot {
            wave_height: e.swell_height_m.or(e.swell_height),
            water_temperature: e.water_temp,
            wind_speed: e.wind_speed,
            visibility: e.visibility,
            description: e.weather_description.filter(|d| !d.trim().is_empty()),
        })
        .filter(|snapshot| !snapshot.is_empty());

    Ok(MarineReport { coordinates, observation })
}

/// Accepts a number, a numeric string, or null.
fn lenient_f64<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Percentages; anything outside 0..=255 is dropped rather than wrapped.
fn lenient_u8<'de, D: Deserializer<'de>>(de: D) -> Result<Option<u8>, D::Error> {
    Ok(lenient_f64(de)?
        .filter(|v| v.is_finite() && (0.0..=255.0).contains(v))
        .map(|v| v.round() as u8))
}

fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
