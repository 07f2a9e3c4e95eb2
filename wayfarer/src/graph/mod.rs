//! Minimal state-graph executor.
//!
//! Build a [`StateGraph`] from [`Node`]s, plain edges and conditional edges, `compile` it,
//! then `invoke` the resulting [`CompiledStateGraph`]. The run loop is an explicit loop
//! bounded by a step limit.

mod compile_error;
mod compiled;
mod conditional;
mod logging;
mod next;
mod node;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::{CompiledStateGraph, DEFAULT_STEP_LIMIT};
pub use conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
pub use next::Next;
pub use node::Node;
pub use state_graph::{StateGraph, END, START};
