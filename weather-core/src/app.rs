use chrono::NaiveDate;

use crate::{
    Config,
    search::LocationSearch,
    state::{Dispatch, ViewMachine},
    view::{CurrentWeather, HistoricalInput, HistoricalWeather, MarineInput, MarineWeather, View},
};

/// Single owner of all UI-facing state: the location search, which view is
/// showing, and each view's request state.
///
/// Methods that start a request return the [`Dispatch`]; the caller runs it and
/// hands the completion back to the matching machine.
#[derive(Debug)]
pub struct WeatherApp {
    search: LocationSearch,
    active: View,
    current: ViewMachine<CurrentWeather>,
    historical: ViewMachine<HistoricalWeather>,
    marine: ViewMachine<MarineWeather>,
}

impl WeatherApp {
    pub fn new(initial_location: &str) -> Self {
        Self {
            search: LocationSearch::new(initial_location),
            active: View::Current,
            current: ViewMachine::new(),
            historical: ViewMachine::new(),
            marine: ViewMachine::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.default_location)
    }

    pub fn search(&self) -> &LocationSearch {
        &self.search
    }

    pub fn active_view(&self) -> View {
        self.active
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search.set_text(text);
    }

    /// Commits a location. The current view refetches if it is the one showing.
    #[must_use = "a returned dispatch leaves the current view loading until it is completed"]
    pub fn commit_location(
        &mut self,
        text: &str,
        today: NaiveDate,
    ) -> Option<Dispatch<CurrentWeather>> {
        self.search.commit(text);
        match self.active {
            View::Current => self.submit_current(today),
            View::Historical | View::Marine => None,
        }
    }

    /// Switching to the current view refreshes it.
    pub fn select_view(
        &mut self,
        view: View,
        today: NaiveDate,
    ) -> Option<Dispatch<CurrentWeather>> {
        let changed = self.active != view;
        self.active = view;
        match view {
            View::Current if changed => self.submit_current(today),
            _ => None,
        }
    }

    pub fn submit_current(&mut self, today: NaiveDate) -> Option<Dispatch<CurrentWeather>> {
        self.current.submit(self.search.committed(), today)
    }

    pub fn submit_historical(
        &mut self,
        date: Option<&str>,
        today: NaiveDate,
    ) -> Option<Dispatch<HistoricalWeather>> {
        let input = HistoricalInput {
            location: self.search.committed().to_string(),
            date: date.map(str::to_string),
        };
        self.historical.submit(&input, today)
    }

    pub fn submit_marine(
        &mut self,
        latitude: &str,
        longitude: &str,
        today: NaiveDate,
    ) -> Option<Dispatch<MarineWeather>> {
        let input =
            MarineInput { latitude: latitude.to_string(), longitude: longitude.to_string() };
        self.marine.submit(&input, today)
    }

    pub fn current(&self) -> &ViewMachine<CurrentWeather> {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut ViewMachine<CurrentWeather> {
        &mut self.current
    }

    pub fn historical(&self) -> &ViewMachine<HistoricalWeather> {
        &self.historical
    }

    pub fn historical_mut(&mut self) -> &mut ViewMachine<HistoricalWeather> {
        &mut self.historical
    }

    pub fn marine(&self) -> &ViewMachine<MarineWeather> {
        &self.marine
    }

    pub fn marine_mut(&mut self) -> &mut ViewMachine<MarineWeather> {
        &mut self.marine
    }
}

impl Default for WeatherApp {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        state::{DisplayMode, RequestState},
        testing::{StubProvider, today},
    };

    #[test]
    fn starts_on_current_view_with_configured_location() {
        let mut cfg = Config::default();
        cfg.default_location = "Berlin".into();
        let app = WeatherApp::from_config(&cfg);

        assert_eq!(app.active_view(), View::Current);
        assert_eq!(app.search().committed(), "Berlin");
        assert_eq!(app.current().state(), &RequestState::Idle);
    }

    #[test]
    fn commit_refreshes_current_only_when_it_is_showing() {
        let mut app = WeatherApp::default();
        assert!(app.commit_location("Paris", today()).is_some());
        assert!(app.current().is_loading());

        app.select_view(View::Marine, today());
        assert!(app.commit_location("Tokyo", today()).is_none());
        assert_eq!(app.search().committed(), "Tokyo");
        assert_eq!(app.marine().state(), &RequestState::Idle);
    }

    #[test]
    fn committing_from_historical_leaves_current_idle() {
        let mut app = WeatherApp::default();
        app.select_view(View::Historical, today());

        assert!(app.commit_location("Sydney", today()).is_none());
        assert_eq!(app.current().state(), &RequestState::Idle);
        assert!(!app.current().is_loading());
    }

    #[test]
    fn switching_back_to_current_refreshes_it() {
        let mut app = WeatherApp::default();
        assert!(app.select_view(View::Current, today()).is_none());

        app.select_view(View::Historical, today());
        let dispatch = app.select_view(View::Current, today()).expect("refresh");
        assert_eq!(dispatch.request().as_str(), "London");
    }

    #[tokio::test]
    async fn historical_reads_the_committed_location() {
        let provider = StubProvider::default();
        let mut app = WeatherApp::default();
        app.select_view(View::Historical, today());
        assert!(app.commit_location("Sydney", today()).is_none());

        let dispatch = app.submit_historical(Some("2024-01-01"), today()).expect("valid");
        assert_eq!(dispatch.request().query.as_str(), "Sydney");

        let completion = dispatch.run(&provider).await;
        assert!(app.historical_mut().complete(completion));
        assert!(matches!(app.historical().display(), DisplayMode::Ready(_)));
    }

    #[tokio::test]
    async fn views_keep_independent_state() {
        let provider = StubProvider::default();
        let mut app = WeatherApp::default();

        let dispatch = app.submit_current(today()).expect("valid");
        let completion = dispatch.run(&provider).await;
        app.current_mut().complete(completion);

        assert!(app.submit_marine("abc", "0", today()).is_none());

        assert!(matches!(app.current().display(), DisplayMode::Ready(_)));
        assert_eq!(
            app.marine().display(),
            DisplayMode::Error("Enter a valid latitude (-90 to 90)")
        );
        assert_eq!(app.historical().state(), &RequestState::Idle);
    }

    #[test]
    fn typing_only_updates_suggestions() {
        let mut app = WeatherApp::default();
        app.set_search_text("new");

        assert_eq!(app.search().suggestions(), ["New York"]);
        assert_eq!(app.search().committed(), "London");
        assert_eq!(app.current().state(), &RequestState::Idle);
    }
}
