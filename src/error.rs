use thiserror::Error;
use uuid::Uuid;

/// Reasons a prospective connection between two nodes is rejected.
//
// Display/Error are implemented by hand rather than via `#[derive(Error)]`
// because `thiserror` special-cases any field literally named `source` as the
// error's underlying source (requiring `String: std::error::Error`). Here
// `source`/`target` are graph node ids, not error sources, so the derive cannot
// be used while keeping those public field names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    MissingEndpoint(String),

    SelfLoop(String),

    WouldCycle { source: String, target: String },

    FlowMismatch { source: String, target: String },
}

impl std::fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionError::MissingEndpoint(id) => {
                write!(f, "connection endpoint '{id}' does not exist on the canvas")
            }
            ConnectionError::SelfLoop(id) => {
                write!(f, "node '{id}' cannot be connected to itself")
            }
            ConnectionError::WouldCycle { source, target } => {
                write!(f, "connecting '{source}' to '{target}' would create a cycle")
            }
            ConnectionError::FlowMismatch { source, target } => {
                write!(f, "nodes '{source}' and '{target}' belong to different flows")
            }
        }
    }
}

impl std::error::Error for ConnectionError {}

/// Reasons a node deletion is refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeleteError {
    #[error("node '{node_id}' still has {children} child node(s)")]
    HasChildren { node_id: String, children: usize },
}

/// Errors raised by a canvas store while loading or saving application state.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("could not access the canvas store: {0}")]
    Io(String),

    #[error("stored canvas data is malformed: {0}")]
    Format(String),
}

/// Errors raised by session-level canvas management operations.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("canvas '{0}' not found")]
    CanvasNotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}
