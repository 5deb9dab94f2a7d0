//! Durable storage of the application state.
//!
//! A store holds the whole [`AppState`] and replaces it wholesale on every
//! save: a crash between a graph mutation and its write loses at most that one
//! mutation and never corrupts what was already stored.

pub mod json;
pub mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::canvas::AppState;
use crate::error::StoreError;

/// Whole-state persistence.
pub trait CanvasStore: Send + Sync {
    /// Loads the stored state. A store with no prior data returns the default
    /// empty state rather than an error.
    fn load(&self) -> Result<AppState, StoreError>;

    /// Replaces the stored state with `state`.
    fn save(&self, state: &AppState) -> Result<(), StoreError>;
}
