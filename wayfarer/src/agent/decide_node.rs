//! Decide node: the model reads the conversation and either answers or requests tools.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::message::{AssistantBody, AssistantKind, AssistantMessage, Message};
use crate::state::TripState;
use crate::tools::ToolRegistry;

/// Node id of the decide step.
pub const DECIDE_NODE: &str = "llm";

/// Calls the decide-phase model with the full history and every registered tool spec,
/// then appends exactly one assistant message.
///
/// A reply with prose and no tool calls is tagged [`AssistantKind::TravelOptions`]; that is
/// what the recommendation step later picks up. Model failures and deadline expiry
/// propagate unchanged.
pub struct DecideNode {
    llm: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    timeout: Duration,
}

impl DecideNode {
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<ToolRegistry>, timeout: Duration) -> Self {
        Self {
            llm,
            tools,
            timeout,
        }
    }
}

#[async_trait]
impl Node<TripState> for DecideNode {
    fn id(&self) -> &str {
        DECIDE_NODE
    }

    async fn run(&self, mut state: TripState) -> Result<(TripState, Next), AgentError> {
        let specs = self.tools.list_all();
        let response = tokio::time::timeout(self.timeout, self.llm.invoke(&state.messages, &specs))
            .await
            .map_err(|_| AgentError::Timeout {
                what: "decide model call".into(),
                after: self.timeout,
            })??;

        let mut tool_calls = response.tool_calls;
        for (i, call) in tool_calls.iter_mut().enumerate() {
            if call.id.is_empty() {
                call.id = format!("call_{}_{}", state.turn_count, i);
            }
        }
        let kind = if tool_calls.is_empty() && !response.content.trim().is_empty() {
            AssistantKind::TravelOptions
        } else {
            AssistantKind::Reasoning
        };
        tracing::debug!(
            tool_calls = tool_calls.len(),
            content_len = response.content.len(),
            ?kind,
            "decide reply"
        );

        state.add_usage(response.usage.as_ref());
        state.messages.push(Message::Assistant(AssistantMessage {
            body: AssistantBody::from_parts(response.content, tool_calls),
            kind,
        }));
        Ok((state, Next::Continue))
    }
}
