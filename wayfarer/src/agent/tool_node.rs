//! Tool node: run every tool the last assistant message requested.
//!
//! Calls run one at a time in the order the model emitted them, and each produces exactly
//! one tool message carrying the request's id. Failures (unknown tool, malformed arguments,
//! tool errors, timeouts) become error-text results so the model can react on its next
//! turn; nothing here aborts the trip.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::message::{Message, ToolCall};
use crate::state::TripState;
use crate::tools::{ToolCallContent, ToolError, ToolRegistry, TOOL_WEATHER_FORECAST};

/// Node id of the tool step.
pub const TOOL_NODE: &str = "tools";

/// Error text template for a tool that ran and failed.
pub const EXECUTION_ERROR_TEMPLATE: &str =
    "Error executing tool '{tool_name}' with kwargs {tool_kwargs} with error:\n {error}\n Please fix the error and try again.";

pub struct ToolNode {
    tools: Arc<ToolRegistry>,
    timeout: Duration,
    weather_tool: String,
}

impl ToolNode {
    pub fn new(tools: Arc<ToolRegistry>, timeout: Duration) -> Self {
        Self {
            tools,
            timeout,
            weather_tool: TOOL_WEATHER_FORECAST.to_string(),
        }
    }

    /// Name of the tool whose result is copied into `weather_info`.
    pub fn with_weather_tool(mut self, name: impl Into<String>) -> Self {
        self.weather_tool = name.into();
        self
    }

    async fn execute(&self, call: &ToolCall) -> Outcome {
        let tool = match self.tools.lookup(&call.name) {
            Ok(tool) => tool,
            Err(e) => return Outcome::Rejected(e),
        };
        let args = match parse_arguments(&call.arguments) {
            Ok(args) => args,
            Err(e) => return Outcome::Rejected(e),
        };
        tracing::debug!(tool = %call.name, call_id = %call.id, "calling tool");
        let result = tokio::time::timeout(self.timeout, tool.call(args))
            .await
            .unwrap_or(Err(ToolError::Timeout(self.timeout)));
        Outcome::Invoked(result)
    }

    fn error_text(&self, call: &ToolCall, error: &ToolError) -> String {
        match error {
            ToolError::NotFound(name) => format!(
                "Error: {name} is not a valid tool, try one of [{}].",
                self.tools.names().join(", ")
            ),
            _ => EXECUTION_ERROR_TEMPLATE
                .replace("{tool_name}", &call.name)
                .replace("{tool_kwargs}", &call.arguments)
                .replace("{error}", &error.to_string()),
        }
    }
}

/// What happened to one tool call.
enum Outcome {
    /// The tool was called; its result or failure (including the deadline) is final.
    Invoked(Result<ToolCallContent, ToolError>),
    /// The call never reached the tool: unknown name, bad arguments or a repeated id.
    Rejected(ToolError),
}

/// Empty arguments mean `{}`; anything else must be a JSON object.
fn parse_arguments(raw: &str) -> Result<Value, ToolError> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(v @ Value::Object(_)) => Ok(v),
        Ok(other) => Err(ToolError::InvalidInput(format!(
            "arguments must be a JSON object, got {other}"
        ))),
        Err(e) => Err(ToolError::InvalidInput(format!("malformed JSON arguments: {e}"))),
    }
}

#[async_trait]
impl Node<TripState> for ToolNode {
    fn id(&self) -> &str {
        TOOL_NODE
    }

    /// No-op unless the last message is an assistant message with tool calls.
    async fn run(&self, mut state: TripState) -> Result<(TripState, Next), AgentError> {
        let calls: Vec<ToolCall> = state
            .last_message()
            .map(Message::tool_calls)
            .unwrap_or_default()
            .to_vec();
        if calls.is_empty() {
            return Ok((state, Next::Continue));
        }

        let mut seen = HashSet::new();
        for call in &calls {
            let outcome = if seen.insert(call.id.as_str()) {
                self.execute(call).await
            } else {
                Outcome::Rejected(ToolError::InvalidInput(format!(
                    "duplicate tool call id `{}`",
                    call.id
                )))
            };
            let (invoked, result) = match outcome {
                Outcome::Invoked(result) => (true, result),
                Outcome::Rejected(e) => (false, Err(e)),
            };
            let message = match result {
                Ok(content) => Message::tool_result(&call.id, &call.name, content.text),
                Err(e) => {
                    tracing::warn!(tool = %call.name, call_id = %call.id, error = %e, "tool call failed");
                    Message::tool_error(&call.id, &call.name, self.error_text(call, &e))
                }
            };
            // Only a call that reached the weather tool replaces the known weather.
            if invoked && call.name == self.weather_tool {
                state.weather_info = message.content().to_string();
            }
            state.messages.push(message);
        }
        state.turn_count += 1;
        tracing::debug!(turn = state.turn_count, calls = calls.len(), "tool turn complete");
        Ok((state, Next::Continue))
    }
}
