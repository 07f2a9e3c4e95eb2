//! State graph builder: nodes, explicit edges, and conditional edges.
//!
//! Add nodes with `add_node`, wire them with `add_edge(from, to)` using [`START`] and
//! [`END`], route on state with `add_conditional_edges`, then `compile`.
//!
//! A node has either one outgoing `add_edge` or conditional edges, never both. Cycles are
//! allowed only through conditional edges, so every loop has a state-dependent exit.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use super::compile_error::CompilationError;
use super::compiled::{CompiledStateGraph, DEFAULT_STEP_LIMIT};
use super::conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
use super::node::Node;

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to_id` in `add_edge(last_node_id, END)`.
pub const END: &str = "__end__";

/// Mutable graph under construction, generic over the state type.
pub struct StateGraph<S> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    edges: Vec<(String, String)>,
    conditional_edges: HashMap<String, ConditionalRouter<S>>,
}

impl<S> Default for StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            conditional_edges: HashMap::new(),
        }
    }

    /// Adds a node; replaces any node with the same id.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Adds an edge from `from_id` to `to_id`. Use `START` / `END` for entry and exit.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges.push((from_id.into(), to_id.into()));
        self
    }

    /// Adds conditional edges from `source`: after it runs, `path(state)` picks the next
    /// node, through `path_map` when given.
    ///
    /// ```rust,ignore
    /// graph.add_conditional_edges(
    ///     "llm",
    ///     Arc::new(|s: &TripState| route_after_decide(s).as_str().to_string()),
    ///     Some([("tools".into(), "tools".into()), ("end".into(), "recommender".into())]
    ///         .into_iter()
    ///         .collect()),
    /// );
    /// ```
    pub fn add_conditional_edges(
        &mut self,
        source: impl Into<String>,
        path: ConditionalRouterFn<S>,
        path_map: Option<HashMap<String, String>>,
    ) -> &mut Self {
        self.conditional_edges
            .insert(source.into(), ConditionalRouter::new(path, path_map));
        self
    }

    /// Validates the wiring and builds the executable graph.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        for (from, to) in &self.edges {
            if from != START && !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            if to != END && !self.nodes.contains_key(to) {
                return Err(CompilationError::NodeNotFound(to.clone()));
            }
        }
        for (source, router) in &self.conditional_edges {
            if !self.nodes.contains_key(source) {
                return Err(CompilationError::NodeNotFound(source.clone()));
            }
            if let Some(ref path_map) = router.path_map {
                for target in path_map.values() {
                    if target != END && !self.nodes.contains_key(target) {
                        return Err(CompilationError::InvalidConditionalPathMap(target.clone()));
                    }
                }
            }
        }

        let mut start_edges = self
            .edges
            .iter()
            .filter(|(f, _)| f == START)
            .map(|(_, t)| t.clone());
        let first = match (start_edges.next(), start_edges.next()) {
            (None, _) => return Err(CompilationError::MissingStart),
            (Some(first), None) => first,
            (Some(_), Some(_)) => {
                return Err(CompilationError::InvalidChain(
                    "multiple edges from START (branch)".into(),
                ))
            }
        };

        let has_end = self.edges.iter().any(|(_, t)| t == END)
            || self.conditional_edges.values().any(|r| {
                r.path_map
                    .as_ref()
                    .map_or(true, |m| m.values().any(|v| v == END))
            });
        if !has_end {
            return Err(CompilationError::MissingEnd);
        }

        let mut next_map: HashMap<String, NextEntry<S>> = HashMap::new();
        for (from, to) in self.edges.iter().filter(|(f, _)| f != START) {
            if next_map
                .insert(from.clone(), NextEntry::Unconditional(to.clone()))
                .is_some()
            {
                return Err(CompilationError::InvalidChain(format!(
                    "duplicate edge from {from} (branch)"
                )));
            }
        }
        for (source, router) in self.conditional_edges {
            if next_map.contains_key(&source) {
                return Err(CompilationError::NodeHasBothEdgeAndConditional(source));
            }
            next_map.insert(source, NextEntry::Conditional(router));
        }

        if !next_map
            .values()
            .any(|e| matches!(e, NextEntry::Conditional(_)))
        {
            check_acyclic(&first, &next_map)?;
        }

        Ok(CompiledStateGraph {
            nodes: self.nodes,
            first_node_id: first,
            next_map,
            step_limit: DEFAULT_STEP_LIMIT,
        })
    }
}

/// Follows unconditional edges from `first`; a revisit means the run could never end.
fn check_acyclic<S>(
    first: &str,
    next_map: &HashMap<String, NextEntry<S>>,
) -> Result<(), CompilationError> {
    let mut visited = HashSet::new();
    let mut current = first.to_string();
    loop {
        if !visited.insert(current.clone()) {
            return Err(CompilationError::InvalidChain("cycle detected".into()));
        }
        match next_map.get(&current) {
            Some(NextEntry::Unconditional(next)) if next != END => current = next.clone(),
            _ => return Ok(()),
        }
    }
}
