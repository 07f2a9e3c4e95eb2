//! Agent execution error types.
//!
//! Returned by graph nodes and by `CompiledStateGraph::invoke`. Tool failures never
//! show up here: the tool node narrates them back into the conversation instead.

use std::time::Duration;

use thiserror::Error;

/// Agent execution error.
///
/// Any of these aborts the current trip; the caller of the graph decides what to do next
/// (the CLI prints it and moves on to the next trip).
#[derive(Debug, Error)]
pub enum AgentError {
    /// Graph-level failure (e.g. unknown node at runtime, step ceiling reached).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// Network, auth, quota or malformed-response failure while calling the language model.
    #[error("model invocation failed: {0}")]
    ModelInvocation(String),

    /// A model call did not finish before its deadline.
    #[error("{what} timed out after {after:?}")]
    Timeout { what: String, after: Duration },
}
