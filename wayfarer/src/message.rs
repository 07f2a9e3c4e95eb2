//! Message types for the trip conversation.
//!
//! Roles: System (first in the list), User, Assistant, Tool. Order in
//! `TripState::messages` is the model's context, so it is append-only.
//!
//! An assistant reply is prose, tool calls, or both ([`AssistantBody`]); a tool message
//! answers exactly one [`ToolCall`] through `call_id`.

use serde::{Deserialize, Serialize};

/// A single tool invocation requested by the model.
///
/// `arguments` is the raw JSON text the model produced; the tool node parses it and
/// reports malformed JSON back to the model instead of calling the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique within the assistant message that carries it.
    pub id: String,
    /// Tool name as registered in the `ToolRegistry`.
    pub name: String,
    /// Arguments as a JSON string.
    pub arguments: String,
}

impl ToolCall {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// What an assistant turn carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssistantBody {
    /// Prose only (possibly empty for a degenerate model reply).
    Text(String),
    /// Tool calls only; content is null on the wire.
    ToolCalls(Vec<ToolCall>),
    /// Prose alongside tool calls.
    TextWithToolCalls {
        text: String,
        tool_calls: Vec<ToolCall>,
    },
}

impl AssistantBody {
    /// Picks the variant from raw model output.
    pub fn from_parts(text: String, tool_calls: Vec<ToolCall>) -> Self {
        match (text.is_empty(), tool_calls.is_empty()) {
            (_, true) => Self::Text(text),
            (true, false) => Self::ToolCalls(tool_calls),
            (false, false) => Self::TextWithToolCalls { text, tool_calls },
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Text(t) | Self::TextWithToolCalls { text: t, .. } => t.as_str(),
            Self::ToolCalls(_) => "",
        }
    }

    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Text(_) => &[],
            Self::ToolCalls(calls) | Self::TextWithToolCalls { tool_calls: calls, .. } => {
                calls.as_slice()
            }
        }
    }
}

/// Role an assistant message plays in the trip workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssistantKind {
    /// Intermediate turn (tool requests, partial reasoning).
    #[default]
    Reasoning,
    /// Final prose of the decide loop: the candidate travel options.
    TravelOptions,
    /// Output of the recommendation step.
    Recommendation,
}

/// Assistant turn: body plus the role it plays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub body: AssistantBody,
    #[serde(default)]
    pub kind: AssistantKind,
}

impl AssistantMessage {
    pub fn text(&self) -> &str {
        self.body.text()
    }

    pub fn tool_calls(&self) -> &[ToolCall] {
        self.body.tool_calls()
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.body.tool_calls().is_empty()
    }
}

/// Outcome of one tool call, fed back to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMessage {
    /// Id of the `ToolCall` this answers.
    pub call_id: String,
    /// Tool name the model asked for (may be unknown to the registry).
    pub name: String,
    pub content: String,
    /// True when `content` describes a failure rather than a tool result.
    #[serde(default)]
    pub is_error: bool,
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    /// System prompt; typically placed first in the message list.
    System(String),
    /// User input.
    User(String),
    /// Model reply.
    Assistant(AssistantMessage),
    /// Result of one requested tool call.
    Tool(ToolMessage),
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System(content.into())
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User(content.into())
    }

    /// Creates a prose-only assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant(AssistantMessage {
            body: AssistantBody::Text(content.into()),
            kind: AssistantKind::Reasoning,
        })
    }

    /// Creates an assistant message from model output.
    pub fn assistant_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self::Assistant(AssistantMessage {
            body: AssistantBody::from_parts(content.into(), tool_calls),
            kind: AssistantKind::Reasoning,
        })
    }

    /// Creates a tool-result message answering `call_id`.
    pub fn tool_result(
        call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::Tool(ToolMessage {
            call_id: call_id.into(),
            name: name.into(),
            content: content.into(),
            is_error: false,
        })
    }

    /// Creates a tool message reporting that `call_id` failed; `content` is shown to the model.
    pub fn tool_error(
        call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::Tool(ToolMessage {
            call_id: call_id.into(),
            name: name.into(),
            content: content.into(),
            is_error: true,
        })
    }

    /// Text content; empty for tool-call-only assistant turns.
    pub fn content(&self) -> &str {
        match self {
            Self::System(s) | Self::User(s) => s.as_str(),
            Self::Assistant(a) => a.text(),
            Self::Tool(t) => t.content.as_str(),
        }
    }

    /// Tool calls carried by an assistant message; empty for every other role.
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Assistant(a) => a.tool_calls(),
            _ => &[],
        }
    }

    /// True for an assistant message that requests at least one tool.
    pub fn requests_tools(&self) -> bool {
        !self.tool_calls().is_empty()
    }

    pub fn as_assistant(&self) -> Option<&AssistantMessage> {
        match self {
            Self::Assistant(a) => Some(a),
            _ => None,
        }
    }
}
