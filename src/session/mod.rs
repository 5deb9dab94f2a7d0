//! Binds the graph engine to interactive canvas input and to the store.
//!
//! The session owns the interaction mode machine (click-to-create versus
//! panning), the pending node position consumed by the node-type menu, and the
//! canvas collection. Persistence is wired as an explicit mutation observer on
//! the engine, registered for the session's lifetime - every committed change
//! to nodes, edges, or viewport updates the active canvas record and saves the
//! whole application state.

use crate::canvas::{AppState, CanvasState, NodeKind, Viewport};
use crate::engine::CanvasEngine;
use crate::error::{ConnectionError, DeleteError, SessionError, StoreError};
use crate::geometry::Point;
use crate::services::{AnswerService, TweetService};
use crate::store::CanvasStore;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use uuid::Uuid;

/// What a click on empty canvas means.
///
/// `Normal` leaves clicks to panning; `Creating` turns the next empty-canvas
/// click into a pending node position. Escape always returns to `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Normal,
    Creating,
}

fn lock_app(app: &Mutex<AppState>) -> std::sync::MutexGuard<'_, AppState> {
    app.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An interactive canvas session over a store.
pub struct CanvasSession {
    engine: Arc<CanvasEngine>,
    store: Arc<dyn CanvasStore>,
    app: Arc<Mutex<AppState>>,
    mode: InteractionMode,
    pending_position: Option<Point>,
}

impl CanvasSession {
    /// Loads the stored state and opens the active canvas. A store with no
    /// canvases gets an "Untitled" one; a missing active id falls back to the
    /// first canvas.
    pub fn start(
        store: Arc<dyn CanvasStore>,
        tweets: Arc<dyn TweetService>,
        answers: Arc<dyn AnswerService>,
    ) -> Result<Self, SessionError> {
        let mut app = store.load()?;
        if app.canvases.is_empty() {
            let (next, id) = app.add_canvas("Untitled");
            app = next.set_active_canvas(Some(id));
        }
        let active_id = match app.active_canvas_id {
            Some(id) if app.get_canvas(id).is_some() => id,
            _ => {
                let first = app.canvases[0].id;
                app = app.set_active_canvas(Some(first));
                first
            }
        };
        let active = app
            .get_canvas(active_id)
            .cloned()
            .ok_or(SessionError::CanvasNotFound(active_id))?;

        let engine = Arc::new(
            CanvasEngine::builder(tweets, answers)
                .with_state(active)
                .build(),
        );
        let app = Arc::new(Mutex::new(app));

        // Persistence observer: sync the mutated canvas into the collection
        // and replace the stored record. Save failures degrade to a warning;
        // the in-memory graph stays authoritative.
        {
            let app = Arc::clone(&app);
            let store = Arc::clone(&store);
            engine.register_observer(move |canvas| {
                let mut app = lock_app(&app);
                *app = std::mem::take(&mut *app)
                    .update_canvas(canvas.id, |record| *record = canvas.clone());
                if let Err(error) = store.save(&app) {
                    tracing::warn!(%error, "canvas save failed");
                }
            });
        }

        let session = Self {
            engine,
            store,
            app,
            mode: InteractionMode::Normal,
            pending_position: None,
        };
        session.persist()?;
        Ok(session)
    }

    /// The engine driving this session's active canvas.
    pub fn engine(&self) -> &Arc<CanvasEngine> {
        &self.engine
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn pending_position(&self) -> Option<Point> {
        self.pending_position
    }

    /// The dedicated creation-mode control.
    pub fn toggle_creation_mode(&mut self) {
        self.mode = match self.mode {
            InteractionMode::Normal => InteractionMode::Creating,
            InteractionMode::Creating => InteractionMode::Normal,
        };
        if self.mode == InteractionMode::Normal {
            self.pending_position = None;
        }
    }

    /// Escape cancels the pending position and leaves creation mode. This is
    /// the session-scoped keyboard hook; it lives and dies with the session.
    pub fn press_escape(&mut self) {
        self.pending_position = None;
        self.mode = InteractionMode::Normal;
    }

    /// A click on empty canvas. In creation mode it becomes the pending node
    /// position (the UI then opens the node-type menu); in normal mode the
    /// click belongs to panning and is ignored here.
    pub fn click_canvas(&mut self, position: Point) {
        if self.mode == InteractionMode::Creating {
            self.pending_position = Some(position);
        }
    }

    /// Consumes the pending position by creating a root node of the chosen
    /// kind there. Returns `None` when no click preceded the menu choice.
    pub fn pick_node_type(&mut self, kind: NodeKind) -> Option<String> {
        let position = self.pending_position.take()?;
        self.mode = InteractionMode::Normal;
        Some(self.engine.create_node(kind, position, None))
    }

    /// Creates a child node fanned out around its parent.
    pub fn create_child(&self, parent_id: &str, kind: NodeKind) -> String {
        self.engine.create_node(kind, Point::default(), Some(parent_id))
    }

    /// Commits a completed drag-to-connect gesture.
    pub fn connect(&self, source: &str, target: &str) -> Result<(), ConnectionError> {
        self.engine.connect(source, target)
    }

    /// Live preview while a connection is being dragged.
    pub fn can_connect(&self, source: &str, target: &str) -> bool {
        self.engine.is_valid_connection(source, target)
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.engine.set_viewport(viewport);
    }

    /// Deletes a node after the removal transition has had time to play.
    /// The child guard runs up front so a refused deletion fails fast.
    pub async fn delete_node_after(
        &self,
        node_id: &str,
        delay: Duration,
    ) -> Result<(), DeleteError> {
        let children = self.engine.with_state(|state| state.child_count(node_id));
        if children > 0 {
            return Err(DeleteError::HasChildren {
                node_id: node_id.to_string(),
                children,
            });
        }
        tokio::time::sleep(delay).await;
        self.engine.delete_node(node_id)
    }

    /// Creates a canvas, switches to it, and persists.
    pub fn create_canvas(&mut self, name: impl Into<String>) -> Result<Uuid, SessionError> {
        let id = {
            let mut app = lock_app(&self.app);
            let (next, id) = std::mem::take(&mut *app).add_canvas(name);
            *app = next;
            id
        };
        self.switch_canvas(id)?;
        Ok(id)
    }

    pub fn rename_canvas(&mut self, id: Uuid, name: impl Into<String>) -> Result<(), SessionError> {
        let name = name.into();
        {
            let mut app = lock_app(&self.app);
            if app.get_canvas(id).is_none() {
                return Err(SessionError::CanvasNotFound(id));
            }
            *app = std::mem::take(&mut *app).update_canvas(id, |canvas| canvas.name = name);
        }
        self.persist()?;
        Ok(())
    }

    /// Opens another canvas. The current one is already synced into the
    /// collection by the persistence observer, so only the engine state swaps.
    pub fn switch_canvas(&mut self, id: Uuid) -> Result<(), SessionError> {
        let target = {
            let mut app = lock_app(&self.app);
            let target = app
                .get_canvas(id)
                .cloned()
                .ok_or(SessionError::CanvasNotFound(id))?;
            *app = std::mem::take(&mut *app).set_active_canvas(Some(id));
            target
        };
        self.engine.replace_state(target);
        self.pending_position = None;
        self.persist()?;
        Ok(())
    }

    /// Deletes a canvas. Removing the active canvas switches to the first
    /// remaining one; removing the last canvas leaves a fresh "Untitled".
    pub fn remove_canvas(&mut self, id: Uuid) -> Result<(), SessionError> {
        let next_active = {
            let mut app = lock_app(&self.app);
            if app.get_canvas(id).is_none() {
                return Err(SessionError::CanvasNotFound(id));
            }
            let mut next = std::mem::take(&mut *app).remove_canvas(id);
            if next.canvases.is_empty() {
                let (with_fresh, fresh_id) = next.add_canvas("Untitled");
                next = with_fresh.set_active_canvas(Some(fresh_id));
            }
            let next_active = next.active_canvas_id;
            *app = next;
            next_active
        };
        if let Some(active) = next_active {
            self.switch_canvas(active)?;
        }
        Ok(())
    }

    /// A snapshot of the whole application state as the store sees it.
    pub fn app_state(&self) -> AppState {
        lock_app(&self.app).clone()
    }

    pub fn active_canvas(&self) -> CanvasState {
        self.engine.snapshot()
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.store.save(&lock_app(&self.app))
    }
}
