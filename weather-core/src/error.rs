use chrono::NaiveDate;
use thiserror::Error;

/// Local input failures. These never reach the network.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a location first")]
    LocationRequired,
    #[error("Please select a date")]
    DateRequired,
    #[error("'{0}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("{0} is in the future; pick today or an earlier date")]
    FutureDate(NaiveDate),
    #[error("Enter a valid latitude (-90 to 90)")]
    InvalidLatitude,
    #[error("Enter a valid longitude (-180 to 180)")]
    InvalidLongitude,
}

/// Anything that went wrong between sending a request and holding a typed payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("http error ({status}): {message}")]
    Http { status: u16, message: String },
    /// In-band failure: the provider answered, but the body carries an `error` object.
    #[error("provider error: {message}")]
    Api { code: Option<i64>, message: String },
    #[error("invalid provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Text suitable for showing to an end user. Transport details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            ProviderError::Api { message, .. } | ProviderError::Http { message, .. } => {
                message.clone()
            }
            ProviderError::Timeout => "The weather service did not respond in time".to_string(),
            ProviderError::Transport(_) => "Could not reach the weather service".to_string(),
            ProviderError::Decode(_) => {
                "The weather service returned an unexpected response".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return ProviderError::Timeout;
        }
        // The request URL carries the access key; never let it into a message.
        ProviderError::Transport(error.without_url().to_string())
    }
}
