//! Request lifecycle for a single weather view.
//!
//! `submit` validates and moves the view to `Loading`, handing back a
//! [`Dispatch`] that performs the provider call. Its [`Completion`] is fed back
//! through `complete`, which only applies it if no newer submission happened in
//! the meantime.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::{error::ProviderError, provider::WeatherProvider, view::WeatherKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(String),
}

/// What the presentation layer should show. `Empty` is a successful response
/// with nothing in it, which is neither an error nor data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayMode<'a, T> {
    Idle,
    Loading,
    Error(&'a str),
    Empty,
    Ready(&'a T),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct Dispatch<K: WeatherKind> {
    ticket: Ticket,
    request: K::Request,
}

impl<K: WeatherKind> Dispatch<K> {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn request(&self) -> &K::Request {
        &self.request
    }

    pub async fn run(self, provider: &dyn WeatherProvider) -> Completion<K> {
        let result = K::fetch(provider, &self.request).await;
        Completion { ticket: self.ticket, result }
    }
}

#[derive(Debug)]
pub struct Completion<K: WeatherKind> {
    ticket: Ticket,
    result: Result<K::Payload, ProviderError>,
}

impl<K: WeatherKind> Completion<K> {
    pub fn new(ticket: Ticket, result: Result<K::Payload, ProviderError>) -> Self {
        Self { ticket, result }
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }
}

#[derive(Debug)]
pub struct ViewMachine<K: WeatherKind> {
    state: RequestState<K::Payload>,
    latest: u64,
}

impl<K: WeatherKind> Default for ViewMachine<K> {
    fn default() -> Self {
        Self { state: RequestState::Idle, latest: 0 }
    }
}

impl<K: WeatherKind> ViewMachine<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState<K::Payload> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading)
    }

    pub fn payload(&self) -> Option<&K::Payload> {
        match &self.state {
            RequestState::Success(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn display(&self) -> DisplayMode<'_, K::Payload> {
        match &self.state {
            RequestState::Idle => DisplayMode::Idle,
            RequestState::Loading => DisplayMode::Loading,
            RequestState::Error(message) => DisplayMode::Error(message),
            RequestState::Success(payload) if K::has_data(payload) => DisplayMode::Ready(payload),
            RequestState::Success(_) => DisplayMode::Empty,
        }
    }

    /// Every submission supersedes whatever was in flight before it, including
    /// one that fails validation.
    pub fn submit(&mut self, input: &K::Input, today: NaiveDate) -> Option<Dispatch<K>> {
        self.latest += 1;

        match K::validate(input, today) {
            Ok(request) => {
                debug!(view = K::NAME, seq = self.latest, ?request, "dispatching request");
                self.state = RequestState::Loading;
                Some(Dispatch { ticket: Ticket(self.latest), request })
            }
            Err(e) => {
                debug!(view = K::NAME, error = %e, "rejected input");
                self.state = RequestState::Error(e.to_string());
                None
            }
        }
    }

    /// Returns `false` when the completion was stale and has been dropped.
    pub fn complete(&mut self, completion: Completion<K>) -> bool {
        let Completion { ticket, result } = completion;

        if ticket.0 != self.latest {
            debug!(
                view = K::NAME,
                seq = ticket.0,
                latest = self.latest,
                "discarding stale response"
            );
            return false;
        }

        self.state = match result {
            Ok(payload) => RequestState::Success(payload),
            Err(e) => {
                warn!(view = K::NAME, error = %e, "request failed");
                RequestState::Error(e.user_message())
            }
        };
        true
    }

    /// Submit and wait for the outcome in one go.
    pub async fn refresh(
        &mut self,
        provider: &dyn WeatherProvider,
        input: &K::Input,
        today: NaiveDate,
    ) -> &RequestState<K::Payload> {
        if let Some(dispatch) = self.submit(input, today) {
            let completion = dispatch.run(provider).await;
            self.complete(completion);
        }
        &self.state
    }
}
