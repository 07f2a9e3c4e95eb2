//! What a node asks the runner to do after it finishes.

/// Next step after running a node.
///
/// Ignored for nodes with conditional edges; the router decides instead.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Next {
    /// Follow the node's outgoing edge; with no edge this ends the run.
    Continue,
    /// Run the node with the given id next.
    Node(String),
    /// Stop and return the current state.
    End,
}
