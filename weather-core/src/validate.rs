//! Input checks that run before anything is sent to the provider.

use chrono::NaiveDate;

use crate::{
    error::ValidationError,
    model::{Coordinates, LocationQuery},
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn validate_location(text: &str) -> Result<LocationQuery, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::LocationRequired);
    }
    Ok(LocationQuery::new_unchecked(trimmed.to_string()))
}

/// Any date up to and including `today` is accepted; there is no lower bound.
pub fn validate_date(text: Option<&str>, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let text = text.map(str::trim).filter(|t| !t.is_empty()).ok_or(ValidationError::DateRequired)?;

    let date = NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(text.to_string()))?;

    if date > today {
        return Err(ValidationError::FutureDate(date));
    }
    Ok(date)
}

/// Latitude is checked first; the first failure wins.
pub fn validate_coordinates(lat: &str, lon: &str) -> Result<Coordinates, ValidationError> {
    let latitude = parse_in_range(lat, 90.0).ok_or(ValidationError::InvalidLatitude)?;
    let longitude = parse_in_range(lon, 180.0).ok_or(ValidationError::InvalidLongitude)?;
    Ok(Coordinates { latitude, longitude })
}

fn parse_in_range(text: &str, bound: f64) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && (-bound..=bound).contains(v))
}
