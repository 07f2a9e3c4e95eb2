//! Conditional edges: pick the next node from state.
//!
//! A router returns a key; the key is looked up in the optional path map, and used
//! directly as the node id when the map has no entry for it.

use std::collections::HashMap;
use std::sync::Arc;

/// Router function: state in, routing key out. Must not have side effects.
pub type ConditionalRouterFn<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

/// Routing function plus optional key → node id map.
#[derive(Clone)]
pub struct ConditionalRouter<S> {
    pub(super) path: ConditionalRouterFn<S>,
    pub(super) path_map: Option<HashMap<String, String>>,
}

impl<S> ConditionalRouter<S> {
    pub fn new(path: ConditionalRouterFn<S>, path_map: Option<HashMap<String, String>>) -> Self {
        Self { path, path_map }
    }

    /// Node id (or END) to run after the source node.
    pub fn resolve_next(&self, state: &S) -> String {
        let key = (self.path)(state);
        self.path_map
            .as_ref()
            .and_then(|m| m.get(&key))
            .cloned()
            .unwrap_or(key)
    }
}

/// How the compiled graph finds the successor of a node.
#[derive(Clone)]
pub enum NextEntry<S> {
    /// Fixed successor (or END); the node's own `Next` still wins when it is `Node` or `End`.
    Unconditional(String),
    /// Successor chosen by the router from the node's output state.
    Conditional(ConditionalRouter<S>),
}
