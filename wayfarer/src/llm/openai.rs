//! OpenAI Chat Completions client implementing `LlmClient`.
//!
//! Talks to any OpenAI-compatible endpoint (OpenAI itself, Groq, a local proxy); the base
//! URL and key come from the `OpenAIConfig` passed to [`ChatOpenAI::with_config`].
//! Tool specs passed to `invoke` are advertised as function tools; tool calls in the reply
//! come back as [`ToolCall`]s in the order the model emitted them.

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, trace};

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse, LlmUsage};
use crate::message::{AssistantMessage, Message, ToolCall};
use crate::tools::ToolSpec;

use async_openai::{
    config::{Config, OpenAIConfig},
    types::chat::{
        ChatCompletionMessageToolCalls, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage, ChatCompletionTool,
        ChatCompletionToolChoiceOption, ChatCompletionTools, CreateChatCompletionRequestArgs,
        FunctionObject, ToolChoiceOptions,
    },
    Client,
};

/// Chat Completions client.
///
/// Key and base URL come from the `OpenAIConfig`; when tools are supplied the model is left
/// to choose between answering and calling them.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    /// Chat completions URL, for logs.
    url: String,
    model: String,
    temperature: Option<f32>,
}

impl ChatOpenAI {
    /// Build client with custom config (e.g. Groq key and base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            url: config.url("/chat/completions"),
            client: Client::with_config(config),
            model: model.into(),
            temperature: None,
        }
    }

    /// Set temperature (0–2). Lower values are more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Converts the conversation into chat request messages.
    ///
    /// Assistant turns with tool calls and tool results are built from their wire JSON so
    /// ids and arguments go out exactly as the model produced them.
    fn messages_to_request(
        messages: &[Message],
    ) -> Result<Vec<ChatCompletionRequestMessage>, AgentError> {
        messages
            .iter()
            .map(|m| match m {
                Message::System(s) => Ok(ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage::from(s.as_str()),
                )),
                Message::User(s) => Ok(ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(s.as_str()),
                )),
                Message::Assistant(a) if !a.has_tool_calls() => {
                    Ok(ChatCompletionRequestMessage::Assistant(a.text().into()))
                }
                Message::Assistant(a) => from_wire(assistant_wire(a)),
                Message::Tool(t) => from_wire(json!({
                    "role": "tool",
                    "content": t.content,
                    "tool_call_id": t.call_id,
                })),
            })
            .collect()
    }

    fn tools_to_request(tools: &[ToolSpec]) -> Vec<ChatCompletionTools> {
        tools
            .iter()
            .map(|t| {
                ChatCompletionTools::Function(ChatCompletionTool {
                    function: FunctionObject {
                        name: t.name.clone(),
                        description: Some(t.description.clone()),
                        parameters: Some(t.input_schema.clone()),
                        ..Default::default()
                    },
                })
            })
            .collect()
    }
}

fn assistant_wire(a: &AssistantMessage) -> serde_json::Value {
    let tool_calls: Vec<serde_json::Value> = a
        .tool_calls()
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "type": "function",
                "function": { "name": c.name, "arguments": c.arguments },
            })
        })
        .collect();
    let content = if a.text().is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::Value::String(a.text().to_string())
    };
    json!({ "role": "assistant", "content": content, "tool_calls": tool_calls })
}

fn from_wire(value: serde_json::Value) -> Result<ChatCompletionRequestMessage, AgentError> {
    serde_json::from_value(value).map_err(|e| {
        AgentError::ExecutionFailed(format!("cannot encode message for OpenAI request: {}", e))
    })
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, AgentError> {
        let trace_id = uuid::Uuid::new_v4().to_string();
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(Self::messages_to_request(messages)?);

        if !tools.is_empty() {
            args.tools(Self::tools_to_request(tools));
            args.tool_choice(ChatCompletionToolChoiceOption::Mode(ToolChoiceOptions::Auto));
        }

        if let Some(t) = self.temperature {
            args.temperature(t);
        }

        let request = args.build().map_err(|e| {
            AgentError::ExecutionFailed(format!("OpenAI request build failed: {}", e))
        })?;

        debug!(
            trace_id = %trace_id,
            url = %self.url,
            model = %self.model,
            message_count = messages.len(),
            tools_count = tools.len(),
            temperature = ?self.temperature,
            "OpenAI chat create"
        );
        if let Ok(js) = serde_json::to_string_pretty(&request) {
            trace!(trace_id = %trace_id, request = %js, "OpenAI request body");
        }

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::ModelInvocation(format!("OpenAI API error: {}", e)))?;

        if let Ok(js) = serde_json::to_string_pretty(&response) {
            trace!(trace_id = %trace_id, response = %js, "OpenAI response body");
        }

        let usage = response.usage.map(|u| LlmUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            AgentError::ModelInvocation("OpenAI returned no choices".to_string())
        })?;

        let msg = choice.message;
        let content = msg.content.unwrap_or_default();
        let tool_calls: Vec<ToolCall> = msg
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tc| match tc {
                ChatCompletionMessageToolCalls::Function(f) => {
                    Some(ToolCall::new(f.id, f.function.name, f.function.arguments))
                }
                _ => None,
            })
            .collect();

        debug!(
            trace_id = %trace_id,
            content_len = content.len(),
            tool_calls = tool_calls.len(),
            "OpenAI chat reply"
        );
        Ok(LlmResponse {
            content,
            tool_calls,
            usage,
        })
    }
}
