use crate::canvas::{Edge, Node};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The visible window onto the infinite canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// One named canvas: its nodes, edges, and viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasState {
    pub id: Uuid,
    pub name: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub viewport: Viewport,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CanvasState {
    /// Creates an empty canvas with the viewport at the origin.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            viewport: Viewport::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Number of outgoing edges (children) of a node.
    pub fn child_count(&self, id: &str) -> usize {
        self.edges.iter().filter(|e| e.source == id).count()
    }

    pub fn has_children(&self, id: &str) -> bool {
        self.edges.iter().any(|e| e.source == id)
    }
}

/// Everything the application persists: the canvas collection and which canvas
/// is open.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppState {
    pub canvases: Vec<CanvasState>,
    pub active_canvas_id: Option<Uuid>,
}

/// The canvas-collection helpers are pure value transforms: each consumes the
/// state and returns the updated one, leaving the effectful write to the
/// store. This keeps persistence a value-in/value-out concern.
impl AppState {
    /// Adds an empty canvas and returns the new state together with its id.
    pub fn add_canvas(mut self, name: impl Into<String>) -> (Self, Uuid) {
        let canvas = CanvasState::new(name);
        let id = canvas.id;
        self.canvases.push(canvas);
        (self, id)
    }

    /// Removes a canvas. If it was active, the first remaining canvas becomes
    /// active (or none, when the collection is empty).
    pub fn remove_canvas(mut self, id: Uuid) -> Self {
        self.canvases.retain(|c| c.id != id);
        if self.active_canvas_id == Some(id) {
            self.active_canvas_id = self.canvases.first().map(|c| c.id);
        }
        self
    }

    /// Applies an update to one canvas and refreshes its `updated_at` stamp.
    /// Unknown ids leave the state unchanged.
    pub fn update_canvas(mut self, id: Uuid, update: impl FnOnce(&mut CanvasState)) -> Self {
        if let Some(canvas) = self.canvases.iter_mut().find(|c| c.id == id) {
            update(canvas);
            canvas.updated_at = Utc::now();
        }
        self
    }

    pub fn get_canvas(&self, id: Uuid) -> Option<&CanvasState> {
        self.canvases.iter().find(|c| c.id == id)
    }

    pub fn set_active_canvas(mut self, id: Option<Uuid>) -> Self {
        self.active_canvas_id = id;
        self
    }
}
