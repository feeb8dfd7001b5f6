//! Integration tests for the OpenWeather fetcher using wiremock
//!
//! The provider and the controller are exercised against a mock HTTP server
//! so the status-code handling can be checked end to end.

use std::{sync::Arc, time::Duration};

use citywx_core::{
    Applied, Background, Config, FetchError, LastCityStore, MemoryCityStore,
    OpenWeatherProvider, WeatherApp, WeatherProvider,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn paris_response() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 2.3488, "lat": 48.8534 },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "base": "stations",
        "main": { "temp": 18, "feels_like": 17, "humidity": 60, "pressure": 1012 },
        "wind": { "speed": 3 },
        "sys": { "country": "FR" },
        "name": "Paris",
        "cod": 200
    })
}

fn test_config(mock_server: &MockServer) -> Config {
    Config {
        api_key: Some("TEST_KEY".to_string()),
        base_url: mock_server.uri(),
        timeout_secs: 1,
        ..Default::default()
    }
}

fn create_test_provider(mock_server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::new("TEST_KEY".to_string(), &test_config(mock_server))
        .expect("Failed to create provider")
}

async fn setup_weather_mock(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

// ============================================================================
// Success scenarios
// ============================================================================

#[tokio::test]
async fn sends_metric_units_and_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Paris"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server);
    let snapshot = provider.current_weather("Paris").await.unwrap();

    assert_eq!(snapshot.location, "Paris");
    assert_eq!(snapshot.temperature_c, 18.0);
}

#[tokio::test]
async fn city_name_is_percent_encoded() {
    let mock_server = MockServer::start().await;

    let mut body = paris_response();
    body["name"] = "São Paulo".into();

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "São Paulo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server);
    let snapshot = provider.current_weather("São Paulo").await.unwrap();

    assert_eq!(snapshot.location, "São Paulo");
}

#[tokio::test]
async fn paris_end_to_end() {
    let mock_server = MockServer::start().await;
    setup_weather_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(paris_response()),
    )
    .await;

    let provider: Arc<dyn WeatherProvider> = Arc::new(create_test_provider(&mock_server));
    let mut app = WeatherApp::new(provider, MemoryCityStore::new(), "https://openweathermap.org");

    app.set_query("Paris");
    let pending = app.submit().unwrap();
    let done = pending.run().await;
    assert_eq!(app.complete(done), Applied::Success);

    let view = app.view().unwrap();
    assert_eq!(view.temperature, "18°C");
    assert_eq!(view.location, "Paris, FR");
    assert_eq!(view.background, Background::Clear);
    assert_eq!(
        view.icon_url,
        "https://openweathermap.org/img/wn/01d@2x.png"
    );
    assert_eq!(
        app.store().read_last_city().unwrap().as_deref(),
        Some("Paris")
    );
}

// ============================================================================
// Error scenarios
// ============================================================================

#[tokio::test]
async fn not_found_with_string_code() {
    let mock_server = MockServer::start().await;
    setup_weather_mock(
        &mock_server,
        ResponseTemplate::new(404)
            .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
    )
    .await;

    let provider: Arc<dyn WeatherProvider> = Arc::new(create_test_provider(&mock_server));
    let mut app = WeatherApp::new(
        provider,
        MemoryCityStore::with_city("Paris"),
        "https://openweathermap.org",
    );

    assert_eq!(app.lookup("Zzyx").await, Some(Applied::Failed));
    assert_eq!(app.session().visible_error(), Some(&FetchError::NotFound));
    assert!(app.view().is_none());
    assert_eq!(
        app.store().read_last_city().unwrap().as_deref(),
        Some("Paris")
    );
}

#[tokio::test]
async fn not_found_with_numeric_code() {
    let mock_server = MockServer::start().await;
    setup_weather_mock(
        &mock_server,
        ResponseTemplate::new(404).set_body_json(serde_json::json!({ "cod": 404 })),
    )
    .await;

    let provider = create_test_provider(&mock_server);
    let err = provider.current_weather("Zzyx").await.unwrap_err();

    assert_eq!(err, FetchError::NotFound);
}

#[tokio::test]
async fn server_error_is_bad_status() {
    let mock_server = MockServer::start().await;
    setup_weather_mock(
        &mock_server,
        ResponseTemplate::new(500)
            .set_body_json(serde_json::json!({ "cod": "500", "message": "internal error" })),
    )
    .await;

    let provider = create_test_provider(&mock_server);
    let err = provider.current_weather("Paris").await.unwrap_err();

    assert_eq!(err, FetchError::BadStatus("500".to_string()));
    assert_eq!(
        err.user_message(),
        "Failed to fetch data. Please check your connection."
    );
}

#[tokio::test]
async fn rejected_key_is_transport_error() {
    let mock_server = MockServer::start().await;
    setup_weather_mock(
        &mock_server,
        ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key."
        })),
    )
    .await;

    let provider = create_test_provider(&mock_server);
    let err = provider.current_weather("Paris").await.unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn malformed_body_is_transport_error() {
    let mock_server = MockServer::start().await;
    setup_weather_mock(
        &mock_server,
        ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"),
    )
    .await;

    let provider = create_test_provider(&mock_server);
    let err = provider.current_weather("Paris").await.unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
    assert_eq!(
        err.user_message(),
        "An error occurred while fetching the weather data."
    );
}

#[tokio::test]
async fn slow_response_times_out() {
    let mock_server = MockServer::start().await;
    setup_weather_mock(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(paris_response())
            .set_delay(Duration::from_millis(1500)),
    )
    .await;

    let provider = create_test_provider(&mock_server);
    let err = provider.current_weather("Paris").await.unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn missing_optional_blocks_still_succeed() {
    let mock_server = MockServer::start().await;
    setup_weather_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cod": 200,
            "name": "Atlantis",
            "main": { "temp": -3.2, "feels_like": -8.0, "humidity": 90, "pressure": 990 },
            "weather": [{ "main": "Mist", "description": "mist", "icon": "50n" }]
        })),
    )
    .await;

    let provider: Arc<dyn WeatherProvider> = Arc::new(create_test_provider(&mock_server));
    let mut app = WeatherApp::new(provider, MemoryCityStore::new(), "https://openweathermap.org");

    assert_eq!(app.lookup("Atlantis").await, Some(Applied::Success));

    let view = app.view().unwrap();
    assert_eq!(view.location, "Atlantis, N/A");
    assert_eq!(view.wind, "N/A");
    assert_eq!(view.temperature, "-3°C");
    assert_eq!(view.background, Background::Cold);
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let config = Config {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 1,
        ..Default::default()
    };
    let provider = OpenWeatherProvider::new("TEST_KEY".to_string(), &config).unwrap();

    let err = provider.current_weather("Paris").await.unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
}
