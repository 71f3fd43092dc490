//! Integration tests for the Nominatim client using wiremock

use std::time::{Duration, Instant};

use integration_geocoding::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

fn seattle_response() -> serde_json::Value {
    serde_json::json!([{
        "place_id": 1,
        "lat": "47.6038321",
        "lon": "-122.330062",
        "display_name": "Seattle, King County, Washington, United States"
    }])
}

fn create_test_client(mock_server: &MockServer) -> NominatimGeocodingClient {
    #[allow(clippy::expect_used)]
    NominatimGeocodingClient::new(&NominatimConfig::for_testing(mock_server.uri()))
        .expect("Failed to create client")
}

#[tokio::test]
async fn test_geocode_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Seattle, WA"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seattle_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let location = client.geocode("Seattle, WA").await.unwrap();

    assert!((location.latitude() - 47.603_832_1).abs() < 1e-9);
    assert!((location.longitude() + 122.330_062).abs() < 1e-9);
}

#[tokio::test]
async fn test_geocode_sends_user_agent() {
    let mock_server = MockServer::start().await;

    let config = NominatimConfig {
        user_agent: "exporter-test/1.0".to_string(),
        ..NominatimConfig::for_testing(mock_server.uri())
    };

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(header("user-agent", "exporter-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seattle_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = NominatimGeocodingClient::new(&config).unwrap();
    assert!(client.geocode("Seattle, WA").await.is_ok());
}

#[tokio::test]
async fn test_geocode_trims_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Seattle, WA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seattle_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    assert!(client.geocode("  Seattle, WA ").await.is_ok());
}

#[tokio::test]
async fn test_geocode_no_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.geocode("Atlantis").await;

    assert!(
        matches!(&result, Err(GeocodingError::NotFound(name)) if name == "Atlantis"),
        "Expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn test_geocode_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.geocode("Seattle, WA").await;

    assert!(matches!(
        &result,
        Err(GeocodingError::Status(status)) if status == "503 Service Unavailable"
    ));
}

#[tokio::test]
async fn test_geocode_invalid_coordinates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"lat": "north", "lon": "-122.3"}
        ])))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.geocode("Seattle, WA").await;

    assert!(matches!(result, Err(GeocodingError::Parse(_))));
}

#[tokio::test]
async fn test_geocode_out_of_range_coordinates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"lat": "147.6", "lon": "-122.3"}
        ])))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.geocode("Seattle, WA").await;

    assert!(
        matches!(&result, Err(GeocodingError::Parse(reason)) if reason.contains("latitude")),
        "Expected Parse error naming the latitude, got: {result:?}"
    );
}

#[tokio::test]
async fn test_geocode_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.geocode("Seattle, WA").await;

    assert!(matches!(result, Err(GeocodingError::Parse(_))));
}

#[tokio::test]
async fn test_consecutive_requests_are_spaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seattle_response()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = NominatimConfig {
        min_interval_ms: 300,
        ..NominatimConfig::for_testing(mock_server.uri())
    };
    let client = NominatimGeocodingClient::new(&config).unwrap();

    let started = Instant::now();
    client.geocode("Seattle, WA").await.unwrap();
    client.geocode("Seattle, WA").await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(300));
}
