//! Compiled state graph: immutable, supports invoke only.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::AgentError;

use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_node_state,
};
use super::state_graph::END;
use super::{Next, NextEntry, Node};

/// Node executions allowed per `invoke` before the run is aborted.
pub const DEFAULT_STEP_LIMIT: usize = 100;

/// Executable graph produced by `StateGraph::compile`.
///
/// Runs from the START node; after each node the conditional router (when the node has
/// one) or the node's returned `Next` picks the successor.
#[derive(Clone)]
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) first_node_id: String,
    pub(super) next_map: HashMap<String, NextEntry<S>>,
    pub(super) step_limit: usize,
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Overrides the node-execution ceiling ([`DEFAULT_STEP_LIMIT`]).
    ///
    /// This is a last-resort guard; workflows with their own loop bound should keep it well
    /// above that bound.
    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    pub fn step_limit(&self) -> usize {
        self.step_limit
    }

    /// Runs the graph to completion and returns the final state.
    ///
    /// The first node error aborts the run and is returned unchanged.
    pub async fn invoke(&self, state: S) -> Result<S, AgentError> {
        log_graph_start();
        match self.run_loop(state).await {
            Ok((state, steps)) => {
                log_graph_complete(steps);
                Ok(state)
            }
            Err(e) => {
                log_graph_error(&e);
                Err(e)
            }
        }
    }

    async fn run_loop(&self, mut state: S) -> Result<(S, usize), AgentError> {
        if !self.nodes.contains_key(&self.first_node_id) {
            return Err(AgentError::ExecutionFailed("empty graph".into()));
        }
        let mut current_id = self.first_node_id.clone();
        let mut steps = 0usize;
        loop {
            if steps >= self.step_limit {
                return Err(AgentError::ExecutionFailed(format!(
                    "step limit of {} exceeded at node {}",
                    self.step_limit, current_id
                )));
            }
            let node = self.nodes.get(&current_id).cloned().ok_or_else(|| {
                AgentError::ExecutionFailed(format!("node not found: {current_id}"))
            })?;

            log_node_start(&current_id);
            log_node_state(&current_id, &state);
            let (new_state, next) = node.run(state).await?;
            state = new_state;
            steps += 1;
            log_node_complete(&current_id, &next);

            match self.resolve_next(&current_id, &state, next) {
                Some(id) if id != END => current_id = id,
                _ => return Ok((state, steps)),
            }
        }
    }

    /// Successor of `current_id`, or `None` to stop.
    fn resolve_next(&self, current_id: &str, state: &S, next: Next) -> Option<String> {
        match self.next_map.get(current_id) {
            Some(NextEntry::Conditional(router)) => {
                let target = router.resolve_next(state);
                tracing::debug!(from = %current_id, to = %target, "conditional routing");
                Some(target)
            }
            entry => match next {
                Next::End => None,
                Next::Node(id) => Some(id),
                Next::Continue => match entry {
                    Some(NextEntry::Unconditional(id)) => Some(id.clone()),
                    _ => None,
                },
            },
        }
    }
}
