use crate::canvas::AppState;
use crate::error::StoreError;
use crate::store::CanvasStore;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores the application state as a single JSON document on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CanvasStore for JsonFileStore {
    fn load(&self) -> Result<AppState, StoreError> {
        if !self.path.exists() {
            return Ok(AppState::default());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::Io(format!("could not read '{}': {}", self.path.display(), e)))?;
        serde_json::from_str(&content).map_err(|e| StoreError::Format(e.to_string()))
    }

    fn save(&self, state: &AppState) -> Result<(), StoreError> {
        let content =
            serde_json::to_string_pretty(state).map_err(|e| StoreError::Format(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::Io(format!("could not create '{}': {}", parent.display(), e))
            })?;
        }
        fs::write(&self.path, content)
            .map_err(|e| StoreError::Io(format!("could not write '{}': {}", self.path.display(), e)))
    }
}
