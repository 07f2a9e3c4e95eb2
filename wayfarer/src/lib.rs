//! # Wayfarer
//!
//! A weather-aware travel assistant built as a small **state-in, state-out** agent graph.
//! One [`TripState`] flows through three nodes:
//!
//! - `llm` ([`DecideNode`]): the model either asks for tools or answers with travel options.
//! - `tools` ([`ToolNode`]): runs every requested tool through the [`ToolRegistry`] and
//!   appends one tool result per request; failures become error-text results.
//! - `recommender` ([`RecommendNode`]): a second, lower-temperature model call that picks
//!   the single best travel mode.
//!
//! Routing after `llm` is [`route_with_turn_limit`]: `tools` while the model keeps asking
//! and the turn budget lasts, `recommender` otherwise.
//!
//! ## Main modules
//!
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Node`], [`Next`].
//! - [`agent`]: the trip nodes, [`TravelAgent`], [`build_travel_agent`].
//! - [`llm`]: [`LlmClient`] trait, [`MockLlm`], [`ChatOpenAI`].
//! - [`tools`]: [`Tool`] trait, [`ToolRegistry`], weather and repository tools.
//! - [`state`] / [`message`]: [`TripState`], [`Message`], [`ToolCall`].
//! - [`prompts`]: system, trip and recommendation prompts.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wayfarer::{MockLlm, ToolRegistry, TravelAgent, TravelAgentConfig, TripRequest};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let agent = TravelAgent::new(
//!     Arc::new(MockLlm::with_no_tool_calls("Take the train.")),
//!     Arc::new(MockLlm::with_no_tool_calls("**Recommended Travel Mode:** Train")),
//!     ToolRegistry::new(),
//!     TravelAgentConfig::default(),
//! )?;
//! let state = agent.run(&TripRequest::new("Paris", "Lyon", "Business")).await?;
//! println!("{}", state.last_assistant_reply().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod prompts;
pub mod state;
pub mod tools;

pub use agent::{
    build_registry, build_travel_agent, route_after_decide, route_with_turn_limit, run_trip,
    travel_options, BuildError, DecideNode, RecommendNode, Route, RunError, ToolNode,
    TravelAgent, TravelAgentConfig, DECIDE_NODE, RECOMMEND_NODE, TOOL_NODE,
};
pub use error::AgentError;
pub use graph::{
    CompilationError, CompiledStateGraph, Next, Node, StateGraph, DEFAULT_STEP_LIMIT, END, START,
};
pub use llm::{ChatOpenAI, LlmClient, LlmResponse, LlmUsage, MockLlm};
pub use message::{AssistantBody, AssistantKind, AssistantMessage, Message, ToolCall, ToolMessage};
pub use state::{ProtocolViolation, StopReason, TripRequest, TripState};
pub use tools::{
    DownloadRepoTool, EnvContentTool, RegistryError, Tool, ToolCallContent, ToolError,
    ToolRegistry, ToolSpec, WeatherForecastTool,
};
