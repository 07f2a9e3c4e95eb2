//! Current weather for the departure and destination cities (OpenWeatherMap).
//!
//! The tool never fails because of a city lookup: each city gets either its readings or an
//! `Error fetching weather for ...` line, and a missing API key is reported the same way.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{required_str, Tool, ToolCallContent, ToolError, ToolSpec};

/// Tool name for the weather lookup; the tool node also keys `weather_info` on it.
pub const TOOL_WEATHER_FORECAST: &str = "weather_forecast";

/// OpenWeatherMap current-weather endpoint.
pub const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

const MISSING_KEY: &str = "Error: OPENWEATHER_API_KEY not found in environment variables";
const RULE_WIDTH: usize = 50;

pub struct WeatherForecastTool {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherForecastTool {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: OPENWEATHER_URL.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Key from `OPENWEATHER_API_KEY`.
    pub fn from_env() -> Self {
        Self::new(std::env::var("OPENWEATHER_API_KEY").ok())
    }

    /// Points the tool at another endpoint (a proxy or a test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    async fn fetch(&self, city: &str, api_key: &str) -> Result<CityWeather, reqwest::Error> {
        let reading = self
            .client
            .get(&self.base_url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await?
            .error_for_status()?
            .json::<OwmResponse>()
            .await?;
        Ok(CityWeather::from_response(city, reading))
    }

    async fn city_section(&self, label: &str, city: &str, api_key: &str) -> String {
        match self.fetch(city, api_key).await {
            Ok(w) => w.render(label),
            Err(e) => {
                tracing::warn!(city, error = %e, "weather lookup failed");
                format!("\n📍 {label}: Error fetching weather for {city}: {e}\n")
            }
        }
    }
}

#[async_trait]
impl Tool for WeatherForecastTool {
    fn name(&self) -> &str {
        TOOL_WEATHER_FORECAST
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            TOOL_WEATHER_FORECAST,
            "Fetch the current weather for the departure and destination cities. Returns \
             temperature, feels-like temperature, condition, humidity, pressure, wind speed \
             and cloud coverage for each city.",
            json!({
                "type": "object",
                "properties": {
                    "user_destination": {
                        "type": "string",
                        "description": "Name of the destination city"
                    },
                    "user_departure": {
                        "type": "string",
                        "description": "Name of the departure city"
                    }
                },
                "required": ["user_destination", "user_departure"]
            }),
        )
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolError> {
        let destination = required_str(&args, "user_destination")?;
        let departure = required_str(&args, "user_departure")?;
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(ToolCallContent::new(MISSING_KEY));
        };

        let rule = "=".repeat(RULE_WIDTH);
        let mut text = format!("Weather Information:\n{rule}\n");
        text.push_str(&self.city_section("Departure", departure, api_key).await);
        text.push_str(&self.city_section("Destination", destination, api_key).await);
        text.push('\n');
        text.push_str(&rule);
        Ok(ToolCallContent::new(text))
    }
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
    wind: OwmWind,
    clouds: OwmClouds,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwmClouds {
    all: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct CityWeather {
    city: String,
    temperature: f64,
    feels_like: f64,
    humidity: f64,
    pressure: f64,
    condition: String,
    wind_speed: f64,
    clouds: f64,
}

impl CityWeather {
    fn from_response(city: &str, r: OwmResponse) -> Self {
        Self {
            city: city.to_string(),
            temperature: r.main.temp,
            feels_like: r.main.feels_like,
            humidity: r.main.humidity,
            pressure: r.main.pressure,
            condition: r
                .weather
                .into_iter()
                .next()
                .map(|c| c.description)
                .unwrap_or_default(),
            wind_speed: r.wind.speed,
            clouds: r.clouds.all,
        }
    }

    fn render(&self, label: &str) -> String {
        format!(
            "\n📍 {label}: {city}\n   Temperature: {t}°C (feels like {f}°C)\n   Condition: {c}\n   \
             Humidity: {h}%\n   Pressure: {p} hPa\n   Wind Speed: {w} m/s\n   Cloud Coverage: {cl}%\n",
            city = self.city,
            t = self.temperature,
            f = self.feels_like,
            c = capitalize(&self.condition),
            h = self.humidity,
            p = self.pressure,
            w = self.wind_speed,
            cl = self.clouds,
        )
    }
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
