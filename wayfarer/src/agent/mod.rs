//! The trip workflow: decide, execute tools, recommend.

mod build;
mod decide_node;
mod recommend_node;
mod route;
mod runner;
mod tool_node;

pub use build::{build_registry, build_travel_agent, BuildError};
pub use decide_node::{DecideNode, DECIDE_NODE};
pub use recommend_node::{travel_options, RecommendNode, RECOMMEND_NODE};
pub use route::{route_after_decide, route_with_turn_limit, Route};
pub use runner::{run_trip, RunError, TravelAgent, TravelAgentConfig};
pub use tool_node::{ToolNode, EXECUTION_ERROR_TEMPLATE, TOOL_NODE};
