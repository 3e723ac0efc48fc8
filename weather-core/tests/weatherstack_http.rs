use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;
use weather_core::{
    CurrentWeather, DisplayMode, HistoricalWeather, MarineWeather, ProviderError, RequestState,
    ViewMachine, WeatherProvider, WeatherstackProvider,
    validate::{validate_coordinates, validate_location},
    view::{HistoricalInput, MarineInput},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const KEY: &str = "TEST_KEY";

fn provider(server: &MockServer) -> WeatherstackProvider {
    WeatherstackProvider::new(KEY.to_string(), &server.uri(), Duration::from_secs(2))
        .expect("client")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
}

#[tokio::test]
async fn current_success_populates_view() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current"))
        .and(query_param("access_key", KEY))
        .and(query_param("query", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": {"name": "London", "country": "UK"},
            "current": {"temperature": 15}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut machine = ViewMachine::<CurrentWeather>::new();
    let state = machine.refresh(&provider(&server), "  London ", today()).await;

    let RequestState::Success(snapshot) = state else {
        panic!("expected success, got {state:?}");
    };
    assert_eq!(snapshot.location.name, "London");
    assert_eq!(snapshot.location.country, "UK");
    assert_eq!(snapshot.observation.temperature, 15.0);
}

#[tokio::test]
async fn in_band_error_with_ok_status_becomes_error_state() {
    let server = MockServer::start().await;
    Mock::given(path("/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": {"code": 615, "info": "invalid query"}
        })))
        .mount(&server)
        .await;

    let mut machine = ViewMachine::<CurrentWeather>::new();
    machine.refresh(&provider(&server), "Nowhere", today()).await;

    assert_eq!(machine.state(), &RequestState::Error("invalid query".into()));
}

#[tokio::test]
async fn http_failure_without_body_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(path("/current"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let query = validate_location("London").expect("valid");
    let err = provider(&server).fetch_current(&query).await.unwrap_err();

    assert_eq!(err, ProviderError::Http { status: 503, message: "Failed to fetch weather".into() });
}

#[tokio::test]
async fn historical_sends_date_and_reports_empty_day() {
    let server = MockServer::start().await;
    Mock::given(path("/historical"))
        .and(query_param("query", "London"))
        .and(query_param("historical_date", "2024-01-01"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"historical": {"2024-01-01": {}}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut machine = ViewMachine::<HistoricalWeather>::new();
    let input = HistoricalInput { location: "London".into(), date: Some("2024-01-01".into()) };
    machine.refresh(&provider(&server), &input, today()).await;

    assert!(matches!(machine.state(), RequestState::Success(_)));
    assert_eq!(machine.display(), DisplayMode::Empty);
}

#[tokio::test]
async fn historical_populated_day_is_ready() {
    let server = MockServer::start().await;
    Mock::given(path("/historical"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": {"name": "London", "country": "United Kingdom"},
            "historical": {"2024-01-01": {
                "avgtemp": 6, "mintemp": 3, "maxtemp": 9,
                "hourly": [{"time": "0", "wind_speed": 14, "weather_descriptions": ["Mist"]}]
            }}
        })))
        .mount(&server)
        .await;

    let mut machine = ViewMachine::<HistoricalWeather>::new();
    let input = HistoricalInput { location: "London".into(), date: Some("2024-01-01".into()) };
    machine.refresh(&provider(&server), &input, today()).await;

    let DisplayMode::Ready(report) = machine.display() else {
        panic!("expected data, got {:?}", machine.state());
    };
    let day = report.day.as_ref().expect("day");
    assert_eq!(day.description(), Some("Mist"));
    assert_eq!(day.wind_speed(), Some(14.0));
}

#[tokio::test]
async fn marine_sends_lat_lon_query() {
    let server = MockServer::start().await;
    Mock::given(path("/marine"))
        .and(query_param("query", "51.5,-0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "marine": {"data": [{"swell_height_m": 0.8, "water_temp": 11, "visibility": 10}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut machine = ViewMachine::<MarineWeather>::new();
    let input = MarineInput { latitude: "51.5".into(), longitude: "-0.1".into() };
    machine.refresh(&provider(&server), &input, today()).await;

    let DisplayMode::Ready(report) = machine.display() else {
        panic!("expected data, got {:?}", machine.state());
    };
    assert_eq!(report.observation.as_ref().and_then(|o| o.wave_height), Some(0.8));
}

#[tokio::test]
async fn slow_provider_times_out() {
    let server = MockServer::start().await;
    Mock::given(path("/marine"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"marine": {"data": []}}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = WeatherstackProvider::new(KEY.into(), &server.uri(), Duration::from_millis(200))
        .expect("client");
    let coords = validate_coordinates("0", "0").expect("valid");

    let err = client.fetch_marine(coords).await.unwrap_err();
    assert_eq!(err, ProviderError::Timeout);
}

#[tokio::test]
async fn malformed_payload_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(path("/current"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"location": {"name": "London"}})),
        )
        .mount(&server)
        .await;

    let mut machine = ViewMachine::<CurrentWeather>::new();
    machine.refresh(&provider(&server), "London", today()).await;

    assert_eq!(
        machine.display(),
        DisplayMode::Error("The weather service returned an unexpected response")
    );
}

#[tokio::test]
async fn transport_errors_do_not_leak_the_access_key() {
    // Nothing listens on the discard port.
    let client =
        WeatherstackProvider::new(KEY.into(), "http://127.0.0.1:9", Duration::from_secs(2))
            .expect("client");
    let query = validate_location("London").expect("valid");

    let err = client.fetch_current(&query).await.unwrap_err();

    assert!(matches!(err, ProviderError::Transport(_)));
    assert!(!err.to_string().contains(KEY));
    assert!(!format!("{client:?}").contains(KEY));
}
