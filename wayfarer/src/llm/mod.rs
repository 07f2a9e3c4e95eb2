//! LLM client abstraction for the decide and recommend phases.
//!
//! Both phases call [`LlmClient::invoke`] with the conversation so far and the tool specs
//! the model may call (empty for the recommendation call). Implementations: [`MockLlm`]
//! (scripted responses for tests) and [`ChatOpenAI`] (any OpenAI-compatible endpoint).

mod mock;
mod openai;

pub use mock::{MockLlm, RecordedCall};
pub use openai::ChatOpenAI;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::message::{Message, ToolCall};
use crate::tools::ToolSpec;

/// Token usage for one LLM call (prompt + completion).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Model reply: text and the tool calls it requested, in emission order.
#[derive(Clone, Debug, Default)]
pub struct LlmResponse {
    /// Assistant text; empty when the model only requested tools.
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    /// Token usage for this call, when the provider reports it.
    pub usage: Option<LlmUsage>,
}

impl LlmResponse {
    /// Prose-only reply.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Reply requesting tools, optionally with accompanying text.
    pub fn tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
            usage: None,
        }
    }
}

/// LLM client: given messages and the callable tools, returns one assistant reply.
///
/// Failures (network, auth, quota, malformed reply) are `AgentError::ModelInvocation`;
/// retry policy, if any, belongs to the implementation, never to the caller.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(&self, messages: &[Message], tools: &[ToolSpec])
        -> Result<LlmResponse, AgentError>;
}
