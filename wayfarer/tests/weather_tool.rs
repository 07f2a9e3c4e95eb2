//! Weather tool against a local OpenWeatherMap stand-in.


use serde_json::json;
use wayfarer::{Tool, WeatherForecastTool};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn reading(temp: f64, description: &str) -> serde_json::Value {
    json!({
        "main": {"temp": temp, "feels_like": temp - 1.0, "humidity": 60, "pressure": 1015},
        "weather": [{"description": description}],
        "wind": {"speed": 4.2},
        "clouds": {"all": 75}
    })
}

async fn server_with(cities: &[(&str, serde_json::Value)]) -> MockServer {
    let server = MockServer::start().await;
    for (city, body) in cities {
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", *city))
            .and(query_param("appid", "test-key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
    }
    server
}

fn tool(server: &MockServer) -> WeatherForecastTool {
    WeatherForecastTool::new(Some("test-key".into()))
        .with_base_url(format!("{}/weather", server.uri()))
}

#[tokio::test]
async fn formats_both_cities() {
    let server = server_with(&[
        ("Paris", reading(12.0, "light rain")),
        ("Tokyo", reading(24.5, "clear sky")),
    ])
    .await;

    let out = tool(&server)
        .call(json!({"user_departure": "Paris", "user_destination": "Tokyo"}))
        .await
        .unwrap();

    let text = out.text;
    assert!(text.starts_with("Weather Information:\n"));
    let paris = text.find("📍 Departure: Paris").expect("departure first");
    let tokyo = text.find("📍 Destination: Tokyo").expect("destination second");
    assert!(paris < tokyo);
    for needle in [
        "Temperature: 12°C (feels like 11°C)",
        "Condition: Light rain",
        "Temperature: 24.5°C (feels like 23.5°C)",
        "Condition: Clear sky",
        "Humidity: 60%",
        "Pressure: 1015 hPa",
        "Wind Speed: 4.2 m/s",
        "Cloud Coverage: 75%",
    ] {
        assert!(text.contains(needle), "missing {needle:?} in\n{text}");
    }
    assert!(text.ends_with(&"=".repeat(50)));
}

/// **Scenario**: An unknown departure city yields the per-city error line while the
/// destination still reports readings.
#[tokio::test]
async fn failed_city_is_reported_inline() {
    let server = server_with(&[("Tokyo", reading(24.5, "clear sky"))]).await;
    Mock::given(method("GET"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "city not found"})))
        .mount(&server)
        .await;

    let out = tool(&server)
        .call(json!({"user_departure": "Atlantis", "user_destination": "Tokyo"}))
        .await
        .unwrap();

    assert!(out
        .text
        .contains("📍 Departure: Error fetching weather for Atlantis:"));
    assert!(out.text.contains("📍 Destination: Tokyo"));
    assert!(out.text.contains("Condition: Clear sky"));
}

#[tokio::test]
async fn unreachable_service_still_returns_text() {
    let server = MockServer::start().await;
    let base = format!("{}/weather", server.uri());
    drop(server);

    let out = WeatherForecastTool::new(Some("test-key".into()))
        .with_base_url(base)
        .call(json!({"user_departure": "Paris", "user_destination": "Tokyo"}))
        .await
        .unwrap();

    assert!(out.text.contains("Error fetching weather for Paris"));
    assert!(out.text.contains("Error fetching weather for Tokyo"));
}

#[tokio::test]
async fn malformed_body_is_a_city_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let out = tool(&server)
        .call(json!({"user_departure": "Paris", "user_destination": "Tokyo"}))
        .await
        .unwrap();

    assert_eq!(out.text.matches("Error fetching weather for").count(), 2);
}
