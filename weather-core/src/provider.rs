use crate::{
    Config,
    error::ProviderError,
    model::{Coordinates, HistoricalReport, LocationQuery, MarineReport, WeatherSnapshot},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;

pub mod weatherstack;

pub use weatherstack::WeatherstackProvider;

/// One external weather service. Every call is a single request with no retry.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, query: &LocationQuery) -> Result<WeatherSnapshot, ProviderError>;

    async fn fetch_historical(
        &self,
        query: &LocationQuery,
        date: NaiveDate,
    ) -> Result<HistoricalReport, ProviderError>;

    async fn fetch_marine(&self, coords: Coordinates) -> Result<MarineReport, ProviderError>;
}

/// Construct the provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let access_key = config.require_access_key()?;
    let provider =
        WeatherstackProvider::new(access_key.to_owned(), &config.base_url, config.timeout())?;
    Ok(Box::new(provider))
}
