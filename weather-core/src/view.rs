//! The three weather views and what each one validates, fetches and treats as "no data".

use chrono::NaiveDate;
use std::{fmt::Debug, future::Future};

use crate::{
    error::{ProviderError, ValidationError},
    model::{Coordinates, HistoricalReport, LocationQuery, MarineReport, WeatherSnapshot},
    provider::WeatherProvider,
    validate::{validate_coordinates, validate_date, validate_location},
};

/// Ties a view's raw input to the provider call it results in.
pub trait WeatherKind {
    const NAME: &'static str;

    type Input: ?Sized;
    type Request: Send + Sync + Debug;
    type Payload: Send + Debug;

    fn validate(input: &Self::Input, today: NaiveDate) -> Result<Self::Request, ValidationError>;

    fn fetch<'a>(
        provider: &'a dyn WeatherProvider,
        request: &'a Self::Request,
    ) -> impl Future<Output = Result<Self::Payload, ProviderError>> + Send + 'a;

    /// `false` for a well-formed payload that carries nothing worth showing.
    fn has_data(payload: &Self::Payload) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Current,
    Historical,
    Marine,
}

impl View {
    pub const fn all() -> &'static [View] {
        &[View::Current, View::Historical, View::Marine]
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Current => "Current Weather",
            View::Historical => "Historical Weather",
            View::Marine => "Marine Weather",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentWeather;

#[derive(Debug, Clone, Copy, Default)]
pub struct HistoricalWeather;

#[derive(Debug, Clone, Copy, Default)]
pub struct MarineWeather;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoricalInput {
    pub location: String,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalRequest {
    pub query: LocationQuery,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarineInput {
    pub latitude: String,
    pub longitude: String,
}

impl WeatherKind for CurrentWeather {
    const NAME: &'static str = "current";

    type Input = str;
    type Request = LocationQuery;
    type Payload = WeatherSnapshot;

    fn validate(input: &str, _today: NaiveDate) -> Result<LocationQuery, ValidationError> {
        validate_location(input)
    }

    fn fetch<'a>(
        provider: &'a dyn WeatherProvider,
        request: &'a LocationQuery,
    ) -> impl Future<Output = Result<WeatherSnapshot, ProviderError>> + Send + 'a {
        provider.fetch_current(request)
    }

    fn has_data(_payload: &WeatherSnapshot) -> bool {
        true
    }
}

impl WeatherKind for HistoricalWeather {
    const NAME: &'static str = "historical";

    type Input = HistoricalInput;
    type Request = HistoricalRequest;
    type Payload = HistoricalReport;

    fn validate(
        input: &HistoricalInput,
        today: NaiveDate,
    ) -> Result<HistoricalRequest, ValidationError> {
        let query = validate_location(&input.location)?;
        let date = validate_date(input.date.as_deref(), today)?;
        Ok(HistoricalRequest { query, date })
    }

    fn fetch<'a>(
        provider: &'a dyn WeatherProvider,
        request: &'a HistoricalRequest,
    ) -> impl Future<Output = Result<HistoricalReport, ProviderError>> + Send + 'a {
        provider.fetch_historical(&request.query, request.date)
    }

    fn has_data(payload: &HistoricalReport) -> bool {
        payload.day.is_some()
    }
}

impl WeatherKind for MarineWeather {
    const NAME: &'static str = "marine";

    type Input = MarineInput;
    type Request = Coordinates;
    type Payload = MarineReport;

    fn validate(input: &MarineInput, _today: NaiveDate) -> Result<Coordinates, ValidationError> {
        validate_coordinates(&input.latitude, &input.longitude)
    }

    fn fetch<'a>(
        provider: &'a dyn WeatherProvider,
        request: &'a Coordinates,
    ) -> impl Future<Output = Result<MarineReport, ProviderError>> + Send + 'a {
        provider.fetch_marine(*request)
    }

    fn has_data(payload: &MarineReport) -> bool {
        payload.observation.is_some()
    }
}
