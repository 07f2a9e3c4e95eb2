//! Tools the model can call, and the registry that names them.
//!
//! Every tool implements [`Tool`]: a name, a [`ToolSpec`] advertised to the model, and an
//! async `call` taking the model's JSON arguments. Failures are [`ToolError`]s; the tool
//! node turns them into error-text tool results instead of aborting the trip.

mod env_file;
mod registry;
mod repo;
mod r#trait;
mod weather;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use env_file::{EnvContentTool, TOOL_ENV_CONTENT};
pub use r#trait::Tool;
pub use registry::{RegistryError, ToolRegistry};
pub use repo::{DownloadRepoTool, TOOL_DOWNLOAD_REPO};
pub use weather::{WeatherForecastTool, OPENWEATHER_URL, TOOL_WEATHER_FORECAST};

/// What the model is told about a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Registry key and the name the model calls.
    pub name: String,
    /// Human-readable description for the model and the operator.
    pub description: String,
    /// JSON Schema for the arguments object.
    pub input_schema: Value,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Result of a single tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallContent {
    pub text: String,
}

impl ToolCallContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Errors from looking up or calling a tool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// The model asked for a tool the registry does not hold.
    #[error("tool not found: {0}")]
    NotFound(String),
    /// Arguments missing, of the wrong type, or not valid JSON.
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
    /// The tool ran and failed.
    #[error("execution failed: {0}")]
    Execution(String),
    /// HTTP or network failure.
    #[error("transport error: {0}")]
    Transport(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Required string argument `key` from the model's arguments object.
pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::InvalidInput(format!("missing {key}")))
}
