//! In-memory provider for unit tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    error::ProviderError,
    model::{
        Coordinates, HistoricalDay, HistoricalReport, LocationInfo, LocationQuery, MarineReport,
        MarineSnapshot, Observation, WeatherSnapshot,
    },
    provider::WeatherProvider,
};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
}

pub fn london_snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        location: LocationInfo {
            name: "London".into(),
            country: "UK".into(),
            region: None,
            localtime: None,
        },
        observation: Observation {
            temperature: 15.0,
            feels_like: None,
            description: None,
            icon_url: None,
            humidity: None,
            wind_speed: None,
            pressure: None,
        },
    }
}

#[derive(Debug, Default)]
pub struct StubProvider {
    failure: Option<ProviderError>,
    empty_history: bool,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn failing(error: ProviderError) -> Self {
        Self { failure: Some(error), ..Self::default() }
    }

    pub fn with_empty_history(mut self) -> Self {
        self.empty_history = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl WeatherProvider for StubProvider {
    async fn fetch_current(&self, query: &LocationQuery) -> Result<WeatherSnapshot, ProviderError> {
        self.record()?;
        let mut snapshot = london_snapshot();
        snapshot.location.name = query.to_string();
        Ok(snapshot)
    }

    async fn fetch_historical(
        &self,
        query: &LocationQuery,
        date: NaiveDate,
    ) -> Result<HistoricalReport, ProviderError> {
        self.record()?;
        let day = (!self.empty_history).then(|| HistoricalDay {
            avg_temp: 5.0,
            min_temp: 2.0,
            max_temp: 8.0,
            condition: Some("Cloudy".into()),
            hourly: Vec::new(),
        });
        let location = LocationInfo {
            name: query.to_string(),
            country: String::new(),
            region: None,
            localtime: None,
        };
        Ok(HistoricalReport { location: Some(location), date, day })
    }

    async fn fetch_marine(&self, coords: Coordinates) -> Result<MarineReport, ProviderError> {
        self.record()?;
        let observation = MarineSnapshot {
            wave_height: Some(1.1),
            water_temperature: Some(14.0),
            ..MarineSnapshot::default()
        };
        Ok(MarineReport { coordinates: coords, observation: Some(observation) })
    }
}
