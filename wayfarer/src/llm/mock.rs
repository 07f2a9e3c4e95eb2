//! Scripted LLM for tests.
//!
//! Returns its responses in order and repeats the last one once the script runs out.
//! Every call is recorded so tests can assert what the model was shown.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::{Message, ToolCall};
use crate::tools::ToolSpec;

/// One recorded `invoke` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub tool_names: Vec<String>,
}

pub struct MockLlm {
    script: Vec<LlmResponse>,
    /// When set, every call fails with `ModelInvocation(msg)`.
    failure: Option<String>,
    /// Sleep before answering; lets tests trip the model-call deadline.
    delay: Option<Duration>,
    calls: AtomicUsize,
    recorded: Mutex<Vec<RecordedCall>>,
}

impl MockLlm {
    /// Responses returned in order; the last repeats.
    pub fn scripted(script: Vec<LlmResponse>) -> Self {
        Self {
            script,
            failure: None,
            delay: None,
            calls: AtomicUsize::new(0),
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with `content` and no tool calls.
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self::scripted(vec![LlmResponse::text(content)])
    }

    /// First call requests the weather tool for `departure`/`destination`, later calls answer
    /// with `options`.
    pub fn first_weather_then_end(
        departure: &str,
        destination: &str,
        options: impl Into<String>,
    ) -> Self {
        let args = serde_json::json!({
            "user_departure": departure,
            "user_destination": destination,
        });
        Self::scripted(vec![
            LlmResponse::tool_calls(
                "",
                vec![ToolCall::new("call-1", "weather_forecast", args.to_string())],
            ),
            LlmResponse::text(options),
        ])
    }

    /// Every call fails with `AgentError::ModelInvocation(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::scripted(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `invoke` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Snapshot of every recorded call.
    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.recorded
            .lock()
            .map(|r| r.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, AgentError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let call = RecordedCall {
            messages: messages.to_vec(),
            tool_names: tools.iter().map(|t| t.name.clone()).collect(),
        };
        match self.recorded.lock() {
            Ok(mut r) => r.push(call),
            Err(poisoned) => poisoned.into_inner().push(call),
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(ref msg) = self.failure {
            return Err(AgentError::ModelInvocation(msg.clone()));
        }
        self.script
            .get(n)
            .or_else(|| self.script.last())
            .cloned()
            .ok_or_else(|| AgentError::ModelInvocation("mock script is empty".into()))
    }
}
