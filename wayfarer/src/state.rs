//! Trip state threaded through the workflow graph.
//!
//! `TripState` owns the ordered message history plus the trip scalars (purpose, departure,
//! destination, last weather text). Every node takes it by value and returns it updated;
//! nothing else mutates it during a run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::LlmUsage;
use crate::message::{AssistantMessage, Message, ToolCall};
use crate::prompts;

/// What the user asked for: one trip between two cities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    pub departure: String,
    pub destination: String,
    pub purpose: String,
}

impl TripRequest {
    pub fn new(
        departure: impl Into<String>,
        destination: impl Into<String>,
        purpose: impl Into<String>,
    ) -> Self {
        Self {
            departure: departure.into(),
            destination: destination.into(),
            purpose: purpose.into(),
        }
    }
}

/// Why the workflow reached the recommendation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The model stopped requesting tools on its own.
    Completed,
    /// The turn guard cut the decide/execute loop short; the last assistant turn still had
    /// unanswered tool calls.
    TurnLimitExceeded { turns: u32 },
}

/// Conversation state for a single trip request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripState {
    /// Conversation history; insertion order is the model's context.
    pub messages: Vec<Message>,
    pub user_purpose: String,
    pub user_departure: String,
    pub user_destination: String,
    /// Text of the most recent weather tool result; empty until one completes.
    pub weather_info: String,
    /// Number of tool-execution turns completed.
    #[serde(default)]
    pub turn_count: u32,
    /// Set by the recommendation step.
    #[serde(default)]
    pub stop_reason: Option<StopReason>,
    /// Token usage summed over every model call of the run, when the provider reports it.
    #[serde(default)]
    pub total_usage: Option<LlmUsage>,
}

impl TripState {
    /// Builds the initial state: system prompt followed by the trip request prompt.
    pub fn for_request(request: &TripRequest, system_prompt: &str) -> Self {
        Self {
            messages: vec![
                Message::system(system_prompt),
                Message::user(prompts::trip_prompt(request)),
            ],
            user_purpose: request.purpose.clone(),
            user_departure: request.departure.clone(),
            user_destination: request.destination.clone(),
            ..Self::default()
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The most recent assistant message, if any.
    pub fn last_assistant(&self) -> Option<&AssistantMessage> {
        self.messages.iter().rev().find_map(Message::as_assistant)
    }

    /// Text of the final assistant message (the recommendation once the graph finished).
    ///
    /// Returns `None` only when there is no assistant message at all.
    pub fn last_assistant_reply(&self) -> Option<&str> {
        self.last_assistant().map(AssistantMessage::text)
    }

    /// Adds one model call's usage to the running total.
    pub fn add_usage(&mut self, usage: Option<&LlmUsage>) {
        let Some(u) = usage else {
            return;
        };
        let total = self.total_usage.get_or_insert_with(LlmUsage::default);
        total.prompt_tokens += u.prompt_tokens;
        total.completion_tokens += u.completion_tokens;
        total.total_tokens += u.total_tokens;
    }

    /// Checks that every tool message answers a request of the immediately preceding
    /// assistant message, one result per request, in request order.
    ///
    /// An assistant turn whose calls were never answered (turn guard) is not a violation;
    /// only results without a matching request are.
    pub fn check_tool_protocol(&self) -> Result<(), ProtocolViolation> {
        let mut pending: Option<(&[ToolCall], usize)> = None;
        for (index, message) in self.messages.iter().enumerate() {
            match message {
                Message::Assistant(a) => pending = Some((a.tool_calls(), 0)),
                Message::System(_) | Message::User(_) => pending = None,
                Message::Tool(t) => {
                    let (calls, next) = match pending {
                        Some((calls, next)) if !calls.is_empty() => (calls, next),
                        _ => {
                            return Err(ProtocolViolation::Orphan {
                                index,
                                call_id: t.call_id.clone(),
                            })
                        }
                    };
                    let Some(expected) = calls.get(next) else {
                        return Err(ProtocolViolation::Surplus {
                            index,
                            call_id: t.call_id.clone(),
                        });
                    };
                    if expected.id != t.call_id {
                        return Err(ProtocolViolation::Mismatch {
                            index,
                            expected: expected.id.clone(),
                            found: t.call_id.clone(),
                        });
                    }
                    pending = Some((calls, next + 1));
                }
            }
        }
        Ok(())
    }
}

/// A tool message that does not line up with the requests it claims to answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    #[error("tool result at index {index} (call `{call_id}`) has no preceding tool request")]
    Orphan { index: usize, call_id: String },
    #[error("tool result at index {index} answers `{found}`, expected `{expected}`")]
    Mismatch {
        index: usize,
        expected: String,
        found: String,
    },
    #[error("tool result at index {index} (call `{call_id}`) arrives after every request was answered")]
    Surplus { index: usize, call_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris_tokyo() -> TripRequest {
        TripRequest::new("Paris", "Tokyo", "Tourism")
    }

    #[test]
    fn for_request_seeds_prompts_and_scalars() {
        let state = TripState::for_request(&paris_tokyo(), "be helpful");
        assert_eq!(state.messages.len(), 2);
        assert!(matches!(&state.messages[0], Message::System(s) if s == "be helpful"));
        assert!(state.messages[1]
            .content()
            .starts_with(prompts::TRIP_PROMPT_MARKER));
        assert_eq!(state.user_departure, "Paris");
        assert_eq!(state.user_destination, "Tokyo");
        assert_eq!(state.user_purpose, "Tourism");
        assert!(state.weather_info.is_empty());
        assert_eq!(state.turn_count, 0);
        assert!(state.stop_reason.is_none());
    }

    #[test]
    fn last_assistant_reply_skips_tool_messages() {
        let mut state = TripState::for_request(&paris_tokyo(), "sys");
        assert_eq!(state.last_assistant_reply(), None);
        state.messages.push(Message::assistant("options"));
        state
            .messages
            .push(Message::tool_result("c1", "weather_forecast", "sunny"));
        assert_eq!(state.last_assistant_reply(), Some("options"));
    }

    #[test]
    fn add_usage_accumulates() {
        let mut state = TripState::default();
        state.add_usage(None);
        assert!(state.total_usage.is_none());
        let u = LlmUsage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        };
        state.add_usage(Some(&u));
        state.add_usage(Some(&u));
        let total = state.total_usage.expect("usage");
        assert_eq!(total.total_tokens, 30);
        assert_eq!(total.prompt_tokens, 20);
    }

    #[test]
    fn check_tool_protocol_accepts_matching_results() {
        let mut state = TripState::for_request(&paris_tokyo(), "sys");
        state.messages.push(Message::assistant_with_tool_calls(
            "",
            vec![
                ToolCall::new("a", "weather_forecast", "{}"),
                ToolCall::new("b", "env_content", "{}"),
            ],
        ));
        state.messages.push(Message::tool_result("a", "weather_forecast", "x"));
        state.messages.push(Message::tool_result("b", "env_content", "y"));
        state.messages.push(Message::assistant("done"));
        assert_eq!(state.check_tool_protocol(), Ok(()));
    }

    #[test]
    fn check_tool_protocol_rejects_orphan_result() {
        let mut state = TripState::for_request(&paris_tokyo(), "sys");
        state.messages.push(Message::tool_result("zz", "weather_forecast", "x"));
        assert!(matches!(
            state.check_tool_protocol(),
            Err(ProtocolViolation::Orphan { index: 2, .. })
        ));
    }

    #[test]
    fn check_tool_protocol_rejects_out_of_order_and_surplus() {
        let mut state = TripState::default();
        state.messages.push(Message::assistant_with_tool_calls(
            "",
            vec![ToolCall::new("a", "t", "{}"), ToolCall::new("b", "t", "{}")],
        ));
        state.messages.push(Message::tool_result("b", "t", "x"));
        assert!(matches!(
            state.check_tool_protocol(),
            Err(ProtocolViolation::Mismatch { ref expected, .. }) if expected == "a"
        ));

        let mut state = TripState::default();
        state.messages.push(Message::assistant_with_tool_calls(
            "",
            vec![ToolCall::new("a", "t", "{}")],
        ));
        state.messages.push(Message::tool_result("a", "t", "x"));
        state.messages.push(Message::tool_result("a", "t", "x"));
        assert!(matches!(
            state.check_tool_protocol(),
            Err(ProtocolViolation::Surplus { index: 2, .. })
        ));
    }

    /// **Scenario**: An unanswered tool request followed by a new assistant turn is allowed.
    #[test]
    fn check_tool_protocol_allows_unanswered_requests() {
        let mut state = TripState::default();
        state.messages.push(Message::assistant_with_tool_calls(
            "",
            vec![ToolCall::new("a", "t", "{}")],
        ));
        state.messages.push(Message::assistant("forced recommendation"));
        assert_eq!(state.check_tool_protocol(), Ok(()));
    }
}
