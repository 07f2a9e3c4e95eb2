//! End-to-end trips through the compiled workflow with scripted models and fake tools.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{paris_tokyo, registry, weather_call, CountingTool, FakeWeather};
use wayfarer::{
    AgentError, AssistantKind, LlmResponse, LlmUsage, Message, MockLlm, StopReason, ToolCall,
    TravelAgent, TravelAgentConfig, TripState,
};

const OPTIONS: &str = "Travel options:\n- Flight: 12h, $900\n- Train + ferry: 3 days";
const RECOMMENDATION: &str =
    "**Recommended Travel Mode:** Flight\n\n**Why:** Fastest across continents.";

fn agent_with(
    decide: Arc<MockLlm>,
    recommend: Arc<MockLlm>,
    tools: wayfarer::ToolRegistry,
    config: TravelAgentConfig,
) -> TravelAgent {
    TravelAgent::new(decide, recommend, tools, config).expect("graph compiles")
}

fn kinds(state: &TripState) -> Vec<Option<AssistantKind>> {
    state
        .messages
        .iter()
        .map(|m| m.as_assistant().map(|a| a.kind))
        .collect()
}

/// **Scenario**: Weather for both cities succeeds, the model answers with options, and the
/// recommendation carries exactly one "Recommended Travel Mode:" heading.
#[tokio::test]
async fn paris_to_tokyo_completes_with_single_recommendation() {
    let decide = Arc::new(MockLlm::first_weather_then_end("Paris", "Tokyo", OPTIONS));
    let recommend = Arc::new(MockLlm::with_no_tool_calls(RECOMMENDATION));
    let weather = FakeWeather::new();
    let weather_calls = weather.counter();
    let agent = agent_with(
        decide.clone(),
        recommend.clone(),
        registry(vec![Box::new(weather)]),
        TravelAgentConfig::default(),
    );

    let state = agent.run(&paris_tokyo()).await.unwrap();

    assert_eq!(weather_calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.messages.len(), 6);
    assert_eq!(
        kinds(&state)[3..],
        [
            None,
            Some(AssistantKind::TravelOptions),
            Some(AssistantKind::Recommendation)
        ]
    );
    let reply = state.last_assistant_reply().unwrap();
    assert_eq!(reply.matches("Recommended Travel Mode:").count(), 1);
    assert_eq!(state.stop_reason, Some(StopReason::Completed));
    assert_eq!(state.turn_count, 1);
    assert!(state.weather_info.contains("Departure: Paris"));
    assert!(state.weather_info.contains("Destination: Tokyo"));
    assert_eq!(state.check_tool_protocol(), Ok(()));

    let decide_calls = decide.recorded();
    assert_eq!(decide_calls.len(), 2);
    assert_eq!(decide_calls[0].tool_names, vec!["weather_forecast"]);
    // The second decide call sees the tool result.
    assert!(matches!(
        decide_calls[1].messages.last(),
        Some(Message::Tool(t)) if t.call_id == "call-1"
    ));

    let rec_calls = recommend.recorded();
    assert_eq!(rec_calls.len(), 1);
    assert!(rec_calls[0].tool_names.is_empty());
    let prompt = rec_calls[0].messages[1].content();
    assert!(prompt.contains("- From: Paris"));
    assert!(prompt.contains("- Purpose: Tourism"));
    assert!(prompt.contains(OPTIONS));
    assert!(prompt.contains(&state.weather_info));
}

/// **Scenario**: The departure lookup fails; the trip still completes and weather_info
/// carries the error for Paris next to valid data for Tokyo.
#[tokio::test]
async fn departure_weather_failure_does_not_abort() {
    let decide = Arc::new(MockLlm::first_weather_then_end("Paris", "Tokyo", OPTIONS));
    let recommend = Arc::new(MockLlm::with_no_tool_calls(RECOMMENDATION));
    let agent = agent_with(
        decide,
        recommend,
        registry(vec![Box::new(FakeWeather::failing_for("Paris"))]),
        TravelAgentConfig::default(),
    );

    let state = agent.run(&paris_tokyo()).await.unwrap();

    assert!(state
        .weather_info
        .contains("Error fetching weather for Paris"));
    assert!(state.weather_info.contains("Destination: Tokyo\n   Temperature"));
    assert!(matches!(&state.messages[3], Message::Tool(t) if !t.is_error));
    assert_eq!(state.stop_reason, Some(StopReason::Completed));
}

/// **Scenario**: An unknown tool name becomes an error-text result and control returns to
/// the decide step.
#[tokio::test]
async fn unknown_tool_is_reported_back_to_model() {
    let decide = Arc::new(MockLlm::scripted(vec![
        LlmResponse::tool_calls("", vec![ToolCall::new("c1", "flight_search", "{}")]),
        LlmResponse::text(OPTIONS),
    ]));
    let recommend = Arc::new(MockLlm::with_no_tool_calls(RECOMMENDATION));
    let agent = agent_with(
        decide.clone(),
        recommend,
        registry(vec![Box::new(FakeWeather::new())]),
        TravelAgentConfig::default(),
    );

    let state = agent.run(&paris_tokyo()).await.unwrap();

    assert_eq!(decide.calls(), 2);
    match &state.messages[3] {
        Message::Tool(t) => {
            assert!(t.is_error);
            assert_eq!(t.call_id, "c1");
            assert_eq!(
                t.content,
                "Error: flight_search is not a valid tool, try one of [weather_forecast]."
            );
        }
        other => panic!("expected tool message, got {other:?}"),
    }
    assert!(state.weather_info.is_empty());
    assert_eq!(state.check_tool_protocol(), Ok(()));
}

/// **Scenario**: A model that never stops asking for tools is cut off at `max_turns` and
/// the recommendation still runs.
#[tokio::test]
async fn turn_limit_forces_recommendation() {
    let decide = Arc::new(MockLlm::scripted(vec![LlmResponse::tool_calls(
        "",
        vec![weather_call("w", "Paris", "Tokyo")],
    )]));
    let recommend = Arc::new(MockLlm::with_no_tool_calls(RECOMMENDATION));
    let agent = agent_with(
        decide.clone(),
        recommend.clone(),
        registry(vec![Box::new(FakeWeather::new())]),
        TravelAgentConfig {
            max_turns: 2,
            ..TravelAgentConfig::default()
        },
    );

    let state = agent.run(&paris_tokyo()).await.unwrap();

    assert_eq!(decide.calls(), 3);
    assert_eq!(recommend.calls(), 1);
    assert_eq!(state.turn_count, 2);
    assert_eq!(
        state.stop_reason,
        Some(StopReason::TurnLimitExceeded { turns: 2 })
    );
    assert_eq!(state.check_tool_protocol(), Ok(()));
    assert!(!state.weather_info.is_empty());
}

#[tokio::test]
async fn decide_model_failure_aborts_trip() {
    let recommend = Arc::new(MockLlm::with_no_tool_calls(RECOMMENDATION));
    let agent = agent_with(
        Arc::new(MockLlm::failing("401 Unauthorized")),
        recommend.clone(),
        registry(vec![Box::new(FakeWeather::new())]),
        TravelAgentConfig::default(),
    );

    let err = agent.run(&paris_tokyo()).await.unwrap_err();
    assert!(matches!(err, AgentError::ModelInvocation(ref m) if m.contains("401")));
    assert_eq!(recommend.calls(), 0);
}

#[tokio::test]
async fn recommend_model_failure_aborts_trip() {
    let agent = agent_with(
        Arc::new(MockLlm::with_no_tool_calls(OPTIONS)),
        Arc::new(MockLlm::failing("quota")),
        registry(vec![]),
        TravelAgentConfig::default(),
    );
    assert!(matches!(
        agent.run(&paris_tokyo()).await,
        Err(AgentError::ModelInvocation(_))
    ));
}

#[tokio::test]
async fn slow_model_hits_deadline() {
    let agent = agent_with(
        Arc::new(MockLlm::with_no_tool_calls(OPTIONS).with_delay(Duration::from_millis(500))),
        Arc::new(MockLlm::with_no_tool_calls(RECOMMENDATION)),
        registry(vec![]),
        TravelAgentConfig {
            llm_timeout: Duration::from_millis(50),
            ..TravelAgentConfig::default()
        },
    );
    let err = agent.run(&paris_tokyo()).await.unwrap_err();
    assert!(matches!(err, AgentError::Timeout { .. }), "{err:?}");
}

/// **Scenario**: Without any tool call the options come straight from the first decide
/// reply; no weather is gathered.
#[tokio::test]
async fn answer_without_tools_goes_straight_to_recommendation() {
    let recommend = Arc::new(MockLlm::with_no_tool_calls(RECOMMENDATION));
    let agent = agent_with(
        Arc::new(MockLlm::with_no_tool_calls(OPTIONS)),
        recommend.clone(),
        registry(vec![Box::new(FakeWeather::new())]),
        TravelAgentConfig::default(),
    );

    let state = agent.run(&paris_tokyo()).await.unwrap();

    assert_eq!(state.turn_count, 0);
    assert!(state.weather_info.is_empty());
    assert_eq!(state.messages.len(), 4);
    let prompt = recommend.recorded()[0].messages[1].content().to_string();
    assert!(prompt.contains(OPTIONS));
}

/// **Scenario**: Mixed weather and non-weather calls in one turn; every call gets a result.
#[tokio::test]
async fn multiple_tools_in_one_turn() {
    let env_tool = CountingTool::new("env_content");
    let env_calls = env_tool.counter();
    let decide = Arc::new(MockLlm::scripted(vec![
        LlmResponse::tool_calls(
            "Let me check a few things.",
            vec![
                weather_call("w1", "Paris", "Tokyo"),
                ToolCall::new("e1", "env_content", r#"{"dir_path":"."}"#),
            ],
        ),
        LlmResponse::text(OPTIONS),
    ]));
    let agent = agent_with(
        decide,
        Arc::new(MockLlm::with_no_tool_calls(RECOMMENDATION)),
        registry(vec![Box::new(FakeWeather::new()), Box::new(env_tool)]),
        TravelAgentConfig::default(),
    );

    let state = agent.run(&paris_tokyo()).await.unwrap();

    assert_eq!(env_calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.check_tool_protocol(), Ok(()));
    assert_eq!(state.messages[2].content(), "Let me check a few things.");
    assert!(state.weather_info.starts_with("Weather Information:"));
}

#[tokio::test]
async fn usage_is_summed_across_model_calls() {
    let usage = LlmUsage {
        prompt_tokens: 100,
        completion_tokens: 20,
        total_tokens: 120,
    };
    let with_usage = |r: LlmResponse| LlmResponse {
        usage: Some(usage.clone()),
        ..r
    };
    let agent = agent_with(
        Arc::new(MockLlm::scripted(vec![with_usage(LlmResponse::text(OPTIONS))])),
        Arc::new(MockLlm::scripted(vec![with_usage(LlmResponse::text(
            RECOMMENDATION,
        ))])),
        registry(vec![]),
        TravelAgentConfig::default(),
    );

    let state = agent.run(&paris_tokyo()).await.unwrap();
    let total = state.total_usage.expect("usage recorded");
    assert_eq!(total.total_tokens, 240);
    assert_eq!(total.completion_tokens, 40);
}

/// **Scenario**: The same agent runs consecutive trips from fresh state.
#[tokio::test]
async fn agent_is_reusable_across_trips() {
    let decide = Arc::new(MockLlm::with_no_tool_calls(OPTIONS));
    let agent = agent_with(
        decide.clone(),
        Arc::new(MockLlm::with_no_tool_calls(RECOMMENDATION)),
        registry(vec![]),
        TravelAgentConfig::default(),
    );
    let first = agent.run(&paris_tokyo()).await.unwrap();
    let second = agent
        .run(&wayfarer::TripRequest::new("Lyon", "Nice", "Business"))
        .await
        .unwrap();
    assert_eq!(first.messages.len(), second.messages.len());
    assert_eq!(second.user_departure, "Lyon");
    assert_eq!(decide.calls(), 2);
}
