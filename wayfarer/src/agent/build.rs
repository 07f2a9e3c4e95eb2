//! Builds a [`TravelAgent`] from loaded [`Settings`]: two OpenAI-compatible clients and the
//! tool registry.

use std::sync::Arc;

use async_openai::config::OpenAIConfig;
use env_config::Settings;

use crate::graph::CompilationError;
use crate::llm::{ChatOpenAI, LlmClient};
use crate::prompts::SYSTEM_PROMPT;
use crate::tools::{
    DownloadRepoTool, EnvContentTool, RegistryError, ToolRegistry, WeatherForecastTool,
};

use super::runner::{TravelAgent, TravelAgentConfig};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("tool registration failed: {0}")]
    Registry(#[from] RegistryError),
    #[error("graph compilation failed: {0}")]
    Compilation(#[from] CompilationError),
}

fn openai_config(settings: &Settings) -> OpenAIConfig {
    OpenAIConfig::new()
        .with_api_key(settings.api_key.as_str())
        .with_api_base(settings.api_base.trim_end_matches('/'))
}

/// Registry with the weather tool, plus the repository tools when `repo_tools` is set.
pub fn build_registry(settings: &Settings, repo_tools: bool) -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(WeatherForecastTool::new(
        settings.openweather_api_key.clone(),
    )))?;
    if repo_tools {
        registry.register(Box::new(DownloadRepoTool::new(settings.data_dir.clone())))?;
        registry.register(Box::new(EnvContentTool::new()))?;
    }
    Ok(registry)
}

/// Decide and recommend clients share endpoint and model; only the temperature differs.
pub fn build_travel_agent(settings: &Settings, repo_tools: bool) -> Result<TravelAgent, BuildError> {
    let decide: Arc<dyn LlmClient> = Arc::new(
        ChatOpenAI::with_config(openai_config(settings), settings.model.as_str())
            .with_temperature(settings.decide_temperature),
    );
    let recommend: Arc<dyn LlmClient> = Arc::new(
        ChatOpenAI::with_config(openai_config(settings), settings.model.as_str())
            .with_temperature(settings.recommend_temperature),
    );
    let config = TravelAgentConfig {
        max_turns: settings.max_turns,
        llm_timeout: settings.llm_timeout,
        tool_timeout: settings.tool_timeout,
        system_prompt: SYSTEM_PROMPT.to_string(),
    };
    tracing::debug!(
        model = %settings.model,
        api_base = %settings.api_base,
        repo_tools,
        "building travel agent"
    );
    Ok(TravelAgent::new(
        decide,
        recommend,
        build_registry(settings, repo_tools)?,
        config,
    )?)
}
