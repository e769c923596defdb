use chrono::DateTime;
use commutecal::components::google_maps::models::{Coordinates, Origin, TravelMode};
use commutecal::components::{GoogleMapsClient, RoutingProvider};
use mockito::{Matcher, Server};
use serde_json::json;

#[tokio::test]
async fn test_geocode_returns_candidates() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/geocode/json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("address".into(), "123 Main St".into()),
            Matcher::UrlEncoded("key".into(), "maps-key".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "status": "OK",
                "results": [{
                    "formatted_address": "123 Main St, Springfield, USA",
                    "place_id": "abc123",
                    "geometry": { "location": { "lat": 39.78, "lng": -89.65 } }
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = GoogleMapsClient::new("maps-key").with_base_url(&server.url());
    let results = client.geocode("123 Main St").await.unwrap();

    mock.assert_async().await;
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].formatted_address.as_deref(),
        Some("123 Main St, Springfield, USA")
    );
}

#[tokio::test]
async fn test_geocode_zero_results_is_empty() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/geocode/json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "status": "ZERO_RESULTS", "results": [] }).to_string())
        .create_async()
        .await;

    let client = GoogleMapsClient::new("maps-key").with_base_url(&server.url());
    assert!(client.geocode("nowhere at all").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_geocode_denied_is_an_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/geocode/json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "status": "REQUEST_DENIED",
                "results": [],
                "error_message": "The provided API key is invalid."
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = GoogleMapsClient::new("bad-key").with_base_url(&server.url());
    match client.geocode("123 Main St").await {
        Err(commutecal::error::Error::GoogleMaps(message)) => {
            assert!(message.contains("REQUEST_DENIED"));
            assert!(message.contains("API key is invalid"));
        }
        other => panic!("expected a maps error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_directions_sums_legs() {
    let arrival = DateTime::parse_from_rfc3339("2024-05-02T09:00:00-04:00").unwrap();

    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/directions/json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("origin".into(), "40.7128,-74.006".into()),
            Matcher::UrlEncoded("destination".into(), "123 Main St".into()),
            Matcher::UrlEncoded("mode".into(), "transit".into()),
            Matcher::UrlEncoded("arrival_time".into(), arrival.timestamp().to_string()),
            Matcher::UrlEncoded("key".into(), "maps-key".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "status": "OK",
                "routes": [{
                    "summary": "Route 9",
                    "legs": [
                        { "duration": { "value": 600, "text": "10 mins" } },
                        { "duration": { "value": 1200, "text": "20 mins" }, "distance": { "value": 8000, "text": "8 km" } }
                    ]
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = GoogleMapsClient::new("maps-key").with_base_url(&server.url());
    let origin = Origin::Home(Coordinates { lat: 40.7128, lng: -74.006 });
    let route = client
        .directions(&origin, "123 Main St", TravelMode::Transit, arrival)
        .await
        .unwrap()
        .expect("a route");

    mock.assert_async().await;
    assert_eq!(route.legs.len(), 2);
    assert_eq!(route.total_duration_secs(), 1800);
}

#[tokio::test]
async fn test_directions_without_route() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/directions/json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "status": "ZERO_RESULTS", "routes": [] }).to_string())
        .create_async()
        .await;

    let client = GoogleMapsClient::new("maps-key").with_base_url(&server.url());
    let arrival = DateTime::parse_from_rfc3339("2024-05-02T09:00:00Z").unwrap();
    let route = client
        .directions(&Origin::Address("Office".to_string()), "Island", TravelMode::Driving, arrival)
        .await
        .unwrap();

    assert!(route.is_none());
}

#[tokio::test]
async fn test_directions_http_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/directions/json")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let client = GoogleMapsClient::new("maps-key").with_base_url(&server.url());
    let arrival = DateTime::parse_from_rfc3339("2024-05-02T09:00:00Z").unwrap();
    let result = client
        .directions(&Origin::Address("Office".to_string()), "Gym", TravelMode::Driving, arrival)
        .await;

    assert!(matches!(result, Err(commutecal::error::Error::GoogleMaps(_))));
}
