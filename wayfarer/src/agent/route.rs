//! Routing after the decide step.

use crate::state::TripState;

/// Where the workflow goes after the decide node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The last assistant message requested tools.
    Tools,
    /// Anything else, including a degenerate empty reply.
    End,
}

impl Route {
    /// Routing key used in the graph's path map.
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Tools => "tools",
            Route::End => "end",
        }
    }
}

/// Looks only at the last message: `Tools` when it is an assistant message with at least
/// one tool call, `End` otherwise.
pub fn route_after_decide(state: &TripState) -> Route {
    match state.last_message() {
        Some(m) if m.requests_tools() => Route::Tools,
        _ => Route::End,
    }
}

/// [`route_after_decide`] with the turn guard: once `max_turns` tool turns have run, a
/// further tool request goes to the recommendation step instead.
pub fn route_with_turn_limit(state: &TripState, max_turns: u32) -> Route {
    match route_after_decide(state) {
        Route::Tools if state.turn_count >= max_turns => Route::End,
        route => route,
    }
}
