//! Shared fakes for integration tests: an offline weather tool, a counting tool, and
//! helpers to build states with pending tool calls.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use wayfarer::{
    Message, Tool, ToolCall, ToolCallContent, ToolError, ToolRegistry, ToolSpec, TripRequest,
    TripState,
};

pub const WEATHER: &str = "weather_forecast";

/// Offline stand-in for the weather tool. Cities in `failing` get the lookup-error line
/// instead of readings, the same shape the real tool produces.
#[derive(Default)]
pub struct FakeWeather {
    failing: HashSet<String>,
    calls: Arc<AtomicUsize>,
}

impl FakeWeather {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(city: &str) -> Self {
        Self {
            failing: [city.to_string()].into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    fn section(&self, label: &str, city: &str) -> String {
        if self.failing.contains(city) {
            format!("\n📍 {label}: Error fetching weather for {city}: 404 Not Found\n")
        } else {
            format!("\n📍 {label}: {city}\n   Temperature: 18.0°C (feels like 17.0°C)\n")
        }
    }
}

#[async_trait]
impl Tool for FakeWeather {
    fn name(&self) -> &str {
        WEATHER
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            WEATHER,
            "Fake weather for tests",
            json!({
                "type": "object",
                "properties": {
                    "user_departure": {"type": "string"},
                    "user_destination": {"type": "string"}
                }
            }),
        )
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let dep = args["user_departure"].as_str().unwrap_or_default();
        let dest = args["user_destination"].as_str().unwrap_or_default();
        Ok(ToolCallContent::new(format!(
            "Weather Information:{}{}",
            self.section("Departure", dep),
            self.section("Destination", dest)
        )))
    }
}

/// Returns `"{name} ok"` and counts its calls.
pub struct CountingTool {
    name: String,
    calls: Arc<AtomicUsize>,
}

impl CountingTool {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Tool for CountingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::new(&self.name, "Counting tool", json!({"type": "object"}))
    }

    async fn call(&self, _args: Value) -> Result<ToolCallContent, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ToolCallContent::new(format!("{} ok", self.name)))
    }
}

/// Always fails with `ToolError::Execution`.
pub struct FailingTool(pub &'static str);

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        self.0
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::new(self.0, "Always fails", json!({"type": "object"}))
    }

    async fn call(&self, _args: Value) -> Result<ToolCallContent, ToolError> {
        Err(ToolError::Execution("service unavailable".into()))
    }
}

/// Sleeps before answering.
pub struct SlowTool(pub Duration);

#[async_trait]
impl Tool for SlowTool {
    fn name(&self) -> &str {
        "slow"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec::new("slow", "Sleeps", json!({"type": "object"}))
    }

    async fn call(&self, _args: Value) -> Result<ToolCallContent, ToolError> {
        tokio::time::sleep(self.0).await;
        Ok(ToolCallContent::new("finally"))
    }
}

pub fn registry(tools: Vec<Box<dyn Tool>>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for tool in tools {
        registry.register(tool).expect("unique tool names");
    }
    registry
}

pub fn paris_tokyo() -> TripRequest {
    TripRequest::new("Paris", "Tokyo", "Tourism")
}

pub fn weather_call(id: &str, departure: &str, destination: &str) -> ToolCall {
    let args = json!({"user_departure": departure, "user_destination": destination});
    ToolCall::new(id, WEATHER, args.to_string())
}

/// Fresh trip state whose last message is an assistant turn requesting `calls`.
pub fn state_with_calls(calls: Vec<ToolCall>) -> TripState {
    let mut state = TripState::for_request(&paris_tokyo(), "sys");
    state
        .messages
        .push(Message::assistant_with_tool_calls("", calls));
    state
}

/// Tool messages after index `from`, as `(call_id, content, is_error)`.
pub fn tool_results(state: &TripState, from: usize) -> Vec<(String, String, bool)> {
    state.messages[from..]
        .iter()
        .filter_map(|m| match m {
            Message::Tool(t) => Some((t.call_id.clone(), t.content.clone(), t.is_error)),
            _ => None,
        })
        .collect()
}
