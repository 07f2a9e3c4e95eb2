use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use super::{Tool, ToolCallContent, ToolError, ToolSpec};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("a tool named `{0}` is already registered")]
    DuplicateName(String),
}

/// Tools by name. Built once at startup and read-only while trips run.
///
/// # Examples
///
/// ```no_run
/// use wayfarer::tools::{ToolRegistry, WeatherForecastTool};
///
/// let mut registry = ToolRegistry::new();
/// registry.register(Box::new(WeatherForecastTool::from_env())).unwrap();
/// assert_eq!(registry.names(), vec!["weather_forecast"]);
/// ```
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Adds a tool; fails if its name is taken.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&dyn Tool, ToolError> {
        self.tools
            .get(name)
            .map(|t| t.as_ref())
            .ok_or_else(|| ToolError::NotFound(name.to_string()))
    }

    /// Specs of every tool, sorted by name so the model sees a stable list.
    pub fn list_all(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self.tools.values().map(|t| t.spec()).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Looks up `name` and calls it with `args`.
    pub async fn call(&self, name: &str, args: Value) -> Result<ToolCallContent, ToolError> {
        self.lookup(name)?.call(args).await
    }
}
