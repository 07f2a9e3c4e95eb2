//! Travel agent runner: wires the decide / tools / recommend graph and runs trips on it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::AgentError;
use crate::graph::{CompilationError, CompiledStateGraph, StateGraph, DEFAULT_STEP_LIMIT, END, START};
use crate::llm::LlmClient;
use crate::prompts::SYSTEM_PROMPT;
use crate::state::{TripRequest, TripState};
use crate::tools::ToolRegistry;

use super::decide_node::{DecideNode, DECIDE_NODE};
use super::recommend_node::{RecommendNode, RECOMMEND_NODE};
use super::route::{route_with_turn_limit, Route};
use super::tool_node::{ToolNode, TOOL_NODE};

/// Knobs of the trip workflow.
#[derive(Debug, Clone)]
pub struct TravelAgentConfig {
    /// Tool turns allowed before a pending tool request is overridden by the recommendation.
    pub max_turns: u32,
    /// Deadline for each model call.
    pub llm_timeout: Duration,
    /// Deadline for each tool call.
    pub tool_timeout: Duration,
    pub system_prompt: String,
}

impl Default for TravelAgentConfig {
    fn default() -> Self {
        Self {
            max_turns: 8,
            llm_timeout: Duration::from_secs(60),
            tool_timeout: Duration::from_secs(30),
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Error from [`run_trip`].
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("compilation failed: {0}")]
    Compilation(#[from] CompilationError),
    #[error("execution failed: {0}")]
    Execution(#[from] AgentError),
}

/// The compiled trip workflow plus the tools it advertises.
///
/// Control flow: `llm` → (`tools` → `llm`)* → `recommender` → END. The two model clients
/// are separate so the recommendation can run at its own temperature.
pub struct TravelAgent {
    graph: CompiledStateGraph<TripState>,
    tools: Arc<ToolRegistry>,
    config: TravelAgentConfig,
}

impl TravelAgent {
    pub fn new(
        decide_llm: Arc<dyn LlmClient>,
        recommend_llm: Arc<dyn LlmClient>,
        tools: ToolRegistry,
        config: TravelAgentConfig,
    ) -> Result<Self, CompilationError> {
        let tools = Arc::new(tools);

        let mut graph = StateGraph::<TripState>::new();
        graph.add_node(
            DECIDE_NODE,
            Arc::new(DecideNode::new(
                decide_llm,
                Arc::clone(&tools),
                config.llm_timeout,
            )),
        );
        graph.add_node(
            TOOL_NODE,
            Arc::new(ToolNode::new(Arc::clone(&tools), config.tool_timeout)),
        );
        graph.add_node(
            RECOMMEND_NODE,
            Arc::new(RecommendNode::new(recommend_llm, config.llm_timeout)),
        );
        graph.add_edge(START, DECIDE_NODE);
        graph.add_edge(TOOL_NODE, DECIDE_NODE);
        graph.add_edge(RECOMMEND_NODE, END);

        let max_turns = config.max_turns;
        let path_map: HashMap<String, String> = [
            (Route::Tools.as_str().to_string(), TOOL_NODE.to_string()),
            (Route::End.as_str().to_string(), RECOMMEND_NODE.to_string()),
        ]
        .into_iter()
        .collect();
        graph.add_conditional_edges(
            DECIDE_NODE,
            Arc::new(move |s: &TripState| route_with_turn_limit(s, max_turns).as_str().to_string()),
            Some(path_map),
        );

        // Each tool turn costs two node runs, plus the final decide and the recommendation.
        let needed = (config.max_turns as usize).saturating_mul(2).saturating_add(2);
        let graph = graph
            .compile()?
            .with_step_limit(needed.max(DEFAULT_STEP_LIMIT));

        Ok(Self {
            graph,
            tools,
            config,
        })
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn config(&self) -> &TravelAgentConfig {
        &self.config
    }

    /// Fresh state for `request`: system prompt then the trip prompt.
    pub fn initial_state(&self, request: &TripRequest) -> TripState {
        TripState::for_request(request, &self.config.system_prompt)
    }

    /// Runs one trip from a fresh state and returns the final state; the recommendation is
    /// its last message.
    pub async fn run(&self, request: &TripRequest) -> Result<TripState, AgentError> {
        tracing::info!(
            departure = %request.departure,
            destination = %request.destination,
            purpose = %request.purpose,
            "planning trip"
        );
        self.invoke(self.initial_state(request)).await
    }

    /// Runs the graph from an arbitrary state.
    pub async fn invoke(&self, state: TripState) -> Result<TripState, AgentError> {
        let state = self.graph.invoke(state).await?;
        tracing::info!(
            turns = state.turn_count,
            stop_reason = ?state.stop_reason,
            messages = state.messages.len(),
            "trip complete"
        );
        Ok(state)
    }
}

/// One-shot helper: builds a [`TravelAgent`] and runs a single trip.
pub async fn run_trip(
    request: &TripRequest,
    decide_llm: Arc<dyn LlmClient>,
    recommend_llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    config: TravelAgentConfig,
) -> Result<TripState, RunError> {
    let agent = TravelAgent::new(decide_llm, recommend_llm, tools, config)?;
    Ok(agent.run(request).await?)
}
