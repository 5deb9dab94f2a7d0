use crate::canvas::{CanvasState, Edge, Node};
use crate::error::ConnectionError;
use ahash::AHashSet;

/// Ids of every transitive ancestor of a node, in no particular order.
///
/// Walks parent edges upward with an explicit stack and a visited set, so the
/// traversal terminates even on malformed graphs (cycles introduced by hand-
/// edited stores, duplicate edges). Dangling edges are followed by id only;
/// whether a node for that id still exists is the caller's concern.
pub fn ancestor_ids(edges: &[Edge], node_id: &str) -> AHashSet<String> {
    let mut seen: AHashSet<String> = AHashSet::new();
    let mut stack = vec![node_id.to_string()];

    while let Some(current) = stack.pop() {
        for edge in edges.iter().filter(|e| e.target == current) {
            if seen.insert(edge.source.clone()) {
                stack.push(edge.source.clone());
            }
        }
    }

    seen
}

/// Every transitive ancestor node, in discovery order. Edges referencing
/// removed nodes are silently skipped.
pub fn ancestors<'a>(state: &'a CanvasState, node_id: &str) -> Vec<&'a Node> {
    let mut seen: AHashSet<&str> = AHashSet::new();
    let mut stack: Vec<&str> = vec![node_id];
    let mut found = Vec::new();

    while let Some(current) = stack.pop() {
        for edge in state.edges.iter().filter(|e| e.target == current) {
            if seen.insert(&edge.source) {
                stack.push(&edge.source);
                if let Some(node) = state.node(&edge.source) {
                    found.push(node);
                }
            }
        }
    }

    found
}

/// The ancestor chain of a node ordered root-first, the order context is fed
/// to the answer service.
///
/// In a well-formed flow every node has at most one parent, so the chain is
/// the unique path to the root. On malformed graphs the walk follows the first
/// parent edge found and the visited set bounds it.
pub fn ancestor_chain<'a>(state: &'a CanvasState, node_id: &str) -> Vec<&'a Node> {
    let mut seen: AHashSet<&str> = AHashSet::new();
    seen.insert(node_id);
    let mut chain = Vec::new();
    let mut current = node_id;

    while let Some(edge) = state.edges.iter().find(|e| e.target == current) {
        if !seen.insert(&edge.source) {
            break;
        }
        match state.node(&edge.source) {
            Some(parent) => chain.push(parent),
            // Dangling edge: the recorded parent no longer exists.
            None => break,
        }
        current = &edge.source;
    }

    chain.reverse();
    chain
}

/// Decides whether an edge from `source` to `target` may be added.
///
/// Rejects missing endpoints, self loops, edges whose target is already an
/// ancestor of the source (which would close a cycle), and edges across
/// different flows.
pub fn validate_connection(
    state: &CanvasState,
    source: &str,
    target: &str,
) -> Result<(), ConnectionError> {
    let source_node = state
        .node(source)
        .ok_or_else(|| ConnectionError::MissingEndpoint(source.to_string()))?;
    let target_node = state
        .node(target)
        .ok_or_else(|| ConnectionError::MissingEndpoint(target.to_string()))?;

    if source == target {
        return Err(ConnectionError::SelfLoop(source.to_string()));
    }

    if ancestor_ids(&state.edges, source).contains(target) {
        return Err(ConnectionError::WouldCycle {
            source: source.to_string(),
            target: target.to_string(),
        });
    }

    if source_node.flow_id != target_node.flow_id {
        return Err(ConnectionError::FlowMismatch {
            source: source.to_string(),
            target: target.to_string(),
        });
    }

    Ok(())
}

/// Boolean form of [`validate_connection`], for connection previews.
pub fn is_valid_connection(state: &CanvasState, source: &str, target: &str) -> bool {
    validate_connection(state, source, target).is_ok()
}
