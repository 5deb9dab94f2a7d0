//! Prelude module for convenient imports
//!
//! Re-exports the types needed to drive a canvas end to end: the data model,
//! the engine, the session controller, the store implementations, and the
//! service traits a host application implements.

// Engine and session
pub use crate::engine::{CanvasEngine, EngineBuilder, FALLBACK_ANSWER};
pub use crate::session::{CanvasSession, InteractionMode};

// Data model
pub use crate::canvas::{
    AppState, CanvasState, Edge, Node, NodeKind, NodePayload, NoteData, QuestionData,
    QuestionState, TweetData, TweetState, Viewport,
};

// Geometry and placement
pub use crate::geometry::{
    CHILD_OFFSETS, DimensionLookup, PlacementConfig, Point, Rect, Size, child_desired_position,
    find_free_position, is_position_free,
};

// Graph invariants
pub use crate::graph::{
    ancestor_chain, ancestor_ids, ancestors, is_valid_connection, validate_connection,
};

// Context formatting
pub use crate::context::ContextFormatter;

// External services
pub use crate::services::{
    AnswerError, AnswerRequest, AnswerService, FetchError, TweetService, TweetSnapshot,
};

// Persistence
pub use crate::store::{CanvasStore, JsonFileStore, MemoryStore};

// Error types
pub use crate::error::{ConnectionError, DeleteError, SessionError, StoreError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
