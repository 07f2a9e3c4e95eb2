//! Recommendation node: one low-temperature model call that picks a single travel mode.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::message::{AssistantBody, AssistantKind, AssistantMessage, Message};
use crate::prompts::{
    recommendation_prompt, RecommendationInput, RECOMMENDER_SYSTEM_PROMPT, TRIP_PROMPT_MARKER,
};
use crate::state::{StopReason, TripState};

/// Node id of the recommendation step.
pub const RECOMMEND_NODE: &str = "recommender";

/// Candidate travel-options text for the recommendation prompt.
///
/// The most recent assistant message tagged [`AssistantKind::TravelOptions`] wins. Without
/// one, the newest message with non-empty content that does not start with the trip-prompt
/// marker is used; with nothing at all, the empty string.
pub fn travel_options(messages: &[Message]) -> &str {
    messages
        .iter()
        .rev()
        .filter_map(Message::as_assistant)
        .find(|a| a.kind == AssistantKind::TravelOptions)
        .map(AssistantMessage::text)
        .or_else(|| {
            messages
                .iter()
                .rev()
                .map(Message::content)
                .find(|c| !c.trim().is_empty() && !c.trim_start().starts_with(TRIP_PROMPT_MARKER))
        })
        .unwrap_or("")
}

/// Terminal step. Builds the fixed recommendation prompt from the trip scalars, weather
/// and candidate options, calls the recommendation model without tools, appends its reply
/// tagged [`AssistantKind::Recommendation`] and records the [`StopReason`].
pub struct RecommendNode {
    llm: Arc<dyn LlmClient>,
    timeout: Duration,
}

impl RecommendNode {
    pub fn new(llm: Arc<dyn LlmClient>, timeout: Duration) -> Self {
        Self { llm, timeout }
    }
}

#[async_trait]
impl Node<TripState> for RecommendNode {
    fn id(&self) -> &str {
        RECOMMEND_NODE
    }

    async fn run(&self, mut state: TripState) -> Result<(TripState, Next), AgentError> {
        let stop_reason = match state.last_assistant() {
            Some(a) if a.has_tool_calls() => {
                tracing::warn!(
                    turns = state.turn_count,
                    "turn limit reached with tool calls pending; recommending from what we have"
                );
                StopReason::TurnLimitExceeded {
                    turns: state.turn_count,
                }
            }
            _ => StopReason::Completed,
        };

        let prompt = recommendation_prompt(&RecommendationInput {
            departure: &state.user_departure,
            destination: &state.user_destination,
            purpose: &state.user_purpose,
            weather_info: &state.weather_info,
            travel_options: travel_options(&state.messages),
        });
        let request = [
            Message::system(RECOMMENDER_SYSTEM_PROMPT),
            Message::user(prompt),
        ];
        let response = tokio::time::timeout(self.timeout, self.llm.invoke(&request, &[]))
            .await
            .map_err(|_| AgentError::Timeout {
                what: "recommendation model call".into(),
                after: self.timeout,
            })??;

        state.add_usage(response.usage.as_ref());
        state.stop_reason = Some(stop_reason);
        state.messages.push(Message::Assistant(AssistantMessage {
            body: AssistantBody::Text(response.content),
            kind: AssistantKind::Recommendation,
        }));
        Ok((state, Next::End))
    }
}
