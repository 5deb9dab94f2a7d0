use crate::canvas::AppState;
use crate::error::StoreError;
use crate::store::CanvasStore;
use std::sync::{Mutex, PoisonError};

/// An in-process store, used by tests and as a default for sessions that do
/// not persist to disk.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<AppState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently saved state.
    pub fn snapshot(&self) -> AppState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CanvasStore for MemoryStore {
    fn load(&self) -> Result<AppState, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, state: &AppState) -> Result<(), StoreError> {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state.clone();
        Ok(())
    }
}
