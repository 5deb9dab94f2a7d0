//! The node lifecycle manager: the single authority for creating, mutating,
//! and deleting nodes and edges on the active canvas.
//!
//! Every mutation is a single synchronous state replacement under the engine
//! lock; the lock is never held across a service call, so completions from
//! different nodes interleave freely while each individual write stays atomic.
//! Mutation observers run synchronously after each committed change and are
//! how persistence is wired in - they must not call back into the engine.

use crate::canvas::{
    CanvasState, Edge, Node, NodeKind, NodePayload, QuestionState, TweetState, Viewport,
};
use crate::context::ContextFormatter;
use crate::error::{ConnectionError, DeleteError};
use crate::geometry::{
    DimensionLookup, PlacementConfig, Point, child_desired_position, find_free_position,
};
use crate::graph::{ancestor_chain, validate_connection};
use crate::services::{AnswerRequest, AnswerService, TweetService};
use ahash::AHashMap;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Answer shown on a question card when generation fails. A question has no
/// failure state of its own, so the failure degrades into a visible answer.
pub const FALLBACK_ANSWER: &str = "답변을 만들지 못했어요. 잠시 후 다시 시도해 주세요.";

type ObserverFn = Box<dyn Fn(&CanvasState) + Send + Sync>;

struct EngineInner {
    state: CanvasState,
    generations: AHashMap<String, u64>,
    id_counter: u64,
    observers: Vec<ObserverFn>,
}

impl EngineInner {
    /// Stamps the state and notifies observers. Called after every mutation.
    fn commit(&mut self) {
        self.state.updated_at = Utc::now();
        for observer in &self.observers {
            observer(&self.state);
        }
    }

    /// Node ids are unique within a session: type prefix, microsecond
    /// timestamp, and a counter suffix that breaks same-microsecond ties.
    fn mint_id(&mut self, kind: NodeKind) -> String {
        self.id_counter += 1;
        format!(
            "{}-{}-{}",
            kind.id_prefix(),
            Utc::now().timestamp_micros(),
            self.id_counter
        )
    }

    fn bump_generation(&mut self, node_id: &str) -> u64 {
        let slot = self.generations.entry(node_id.to_string()).or_insert(0);
        *slot += 1;
        *slot
    }

    fn generation_is_current(&self, node_id: &str, generation: u64) -> bool {
        self.generations.get(node_id) == Some(&generation)
    }

    fn delete_node(&mut self, node_id: &str) -> Result<(), DeleteError> {
        if self.state.node(node_id).is_none() {
            return Ok(());
        }
        let children = self.state.child_count(node_id);
        if children > 0 {
            return Err(DeleteError::HasChildren {
                node_id: node_id.to_string(),
                children,
            });
        }
        self.state.nodes.retain(|n| n.id != node_id);
        self.state
            .edges
            .retain(|e| e.source != node_id && e.target != node_id);
        self.generations.remove(node_id);
        self.commit();
        Ok(())
    }
}

/// Builds a [`CanvasEngine`], optionally seeding it with an existing canvas,
/// a placement configuration, and a live dimension lookup.
pub struct EngineBuilder {
    state: CanvasState,
    tweets: Arc<dyn TweetService>,
    answers: Arc<dyn AnswerService>,
    placement: PlacementConfig,
    dimensions: Option<Box<dyn DimensionLookup + Send + Sync>>,
}

impl EngineBuilder {
    pub fn with_state(mut self, state: CanvasState) -> Self {
        self.state = state;
        self
    }

    pub fn with_placement(mut self, placement: PlacementConfig) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_dimensions(
        mut self,
        lookup: impl DimensionLookup + Send + Sync + 'static,
    ) -> Self {
        self.dimensions = Some(Box::new(lookup));
        self
    }

    pub fn build(self) -> CanvasEngine {
        CanvasEngine {
            inner: Mutex::new(EngineInner {
                state: self.state,
                generations: AHashMap::new(),
                id_counter: 0,
                observers: Vec::new(),
            }),
            tweets: self.tweets,
            answers: self.answers,
            placement: self.placement,
            dimensions: self.dimensions,
        }
    }
}

/// The canvas graph engine. See the module docs for the locking contract.
pub struct CanvasEngine {
    inner: Mutex<EngineInner>,
    tweets: Arc<dyn TweetService>,
    answers: Arc<dyn AnswerService>,
    placement: PlacementConfig,
    dimensions: Option<Box<dyn DimensionLookup + Send + Sync>>,
}

impl CanvasEngine {
    pub fn builder(
        tweets: Arc<dyn TweetService>,
        answers: Arc<dyn AnswerService>,
    ) -> EngineBuilder {
        EngineBuilder {
            state: CanvasState::new("Untitled"),
            tweets,
            answers,
            placement: PlacementConfig::default(),
            dimensions: None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dimension_lookup(&self) -> Option<&dyn DimensionLookup> {
        match &self.dimensions {
            Some(lookup) => Some(lookup.as_ref()),
            None => None,
        }
    }

    /// Runs a read against the current canvas state.
    pub fn with_state<R>(&self, read: impl FnOnce(&CanvasState) -> R) -> R {
        read(&self.lock().state)
    }

    /// A clone of the current canvas state.
    pub fn snapshot(&self) -> CanvasState {
        self.lock().state.clone()
    }

    /// Swaps in a different canvas and returns the previous one. Pending
    /// request generations belong to the old canvas and are cleared, so any
    /// still-in-flight completions for it are discarded.
    pub fn replace_state(&self, state: CanvasState) -> CanvasState {
        let mut inner = self.lock();
        inner.generations.clear();
        std::mem::replace(&mut inner.state, state)
    }

    /// Registers a mutation observer, invoked synchronously after every
    /// committed mutation with the new state.
    pub fn register_observer(&self, observer: impl Fn(&CanvasState) + Send + Sync + 'static) {
        self.lock().observers.push(Box::new(observer));
    }

    /// Creates a node and returns its id.
    ///
    /// Root nodes mint a fresh flow id and are placed at the nearest free spot
    /// to `position`. With a parent, the node inherits the parent's flow id,
    /// is fanned out around it, and is connected by a trusted edge - the
    /// parent-child relationship is known valid at creation time, so no
    /// connection check runs. A parent id that no longer resolves demotes the
    /// node to a root of a fresh flow.
    pub fn create_node(&self, kind: NodeKind, position: Point, parent_id: Option<&str>) -> String {
        let mut inner = self.lock();
        let id = inner.mint_id(kind);

        let parent = match parent_id {
            Some(pid) => inner.state.node(pid),
            None => None,
        };
        let (flow_id, desired) = match parent {
            Some(parent) => (
                parent.flow_id,
                child_desired_position(parent.position, inner.state.child_count(&parent.id)),
            ),
            None => (Uuid::new_v4(), position),
        };

        let size = self.placement.footprint(kind);
        let placed = find_free_position(
            &self.placement,
            desired,
            size,
            &inner.state.nodes,
            self.dimension_lookup(),
        );

        inner.state.nodes.push(Node {
            id: id.clone(),
            flow_id,
            position: placed,
            payload: NodePayload::initial(kind),
        });
        if let Some(pid) = parent_id {
            if inner.state.node(pid).is_some() {
                inner.state.edges.push(Edge::between(pid, &id));
            }
        }
        tracing::debug!(node = %id, kind = ?kind, "node created");
        inner.commit();
        id
    }

    /// Validates and records an edge. Re-connecting an existing pair is a
    /// no-op.
    pub fn connect(&self, source: &str, target: &str) -> Result<(), ConnectionError> {
        let mut inner = self.lock();
        validate_connection(&inner.state, source, target)?;
        let edge = Edge::between(source, target);
        if inner.state.edges.iter().any(|e| e.id == edge.id) {
            return Ok(());
        }
        tracing::debug!(%source, %target, "edge added");
        inner.state.edges.push(edge);
        inner.commit();
        Ok(())
    }

    /// Connection preview for drag gestures.
    pub fn is_valid_connection(&self, source: &str, target: &str) -> bool {
        crate::graph::is_valid_connection(&self.lock().state, source, target)
    }

    /// Loads tweet content into a tweet node.
    ///
    /// The node goes to `Loading` immediately; the completion write re-reads
    /// the node, so a concurrent deletion or retry is tolerated. A completion
    /// that lost a race to a newer request for the same node is discarded.
    pub async fn load_tweet(&self, node_id: &str, url: &str) {
        let generation = {
            let mut inner = self.lock();
            let Some(node) = inner.state.node_mut(node_id) else {
                return;
            };
            let NodePayload::Tweet(tweet) = &mut node.payload else {
                return;
            };
            tweet.url = url.to_string();
            tweet.state = TweetState::Loading;
            let generation = inner.bump_generation(node_id);
            inner.commit();
            generation
        };

        let result = self.tweets.fetch_tweet(url).await;

        let mut inner = self.lock();
        if !inner.generation_is_current(node_id, generation) {
            tracing::debug!(node = %node_id, "stale tweet completion discarded");
            return;
        }
        let Some(node) = inner.state.node_mut(node_id) else {
            return;
        };
        let NodePayload::Tweet(tweet) = &mut node.payload else {
            return;
        };
        match result {
            Ok(snapshot) => {
                tweet.state = TweetState::Loaded {
                    author: snapshot.author,
                    text: snapshot.text,
                    timestamp: snapshot.timestamp,
                };
            }
            Err(error) => {
                tracing::warn!(node = %node_id, %error, "tweet fetch failed");
                tweet.state = TweetState::Failed {
                    message: error.message,
                };
            }
        }
        inner.commit();
    }

    /// Submits a question node's prompt to the answer service.
    ///
    /// The ancestor chain is linearized root-first and sent along with the raw
    /// ancestor payloads. Generation failure degrades to [`FALLBACK_ANSWER`];
    /// the node always settles in `Answered`.
    pub async fn submit_question(&self, node_id: &str, prompt: &str) {
        let (generation, request) = {
            let mut inner = self.lock();
            let Some(node) = inner.state.node_mut(node_id) else {
                return;
            };
            let NodePayload::Question(question) = &mut node.payload else {
                return;
            };
            question.prompt = prompt.to_string();
            question.state = QuestionState::Loading;
            let generation = inner.bump_generation(node_id);
            inner.commit();

            let chain = ancestor_chain(&inner.state, node_id);
            let context = ContextFormatter::format_context(&chain);
            let ancestors = chain.into_iter().map(|n| n.payload.clone()).collect();
            (
                generation,
                AnswerRequest {
                    ancestors,
                    context,
                    prompt: prompt.to_string(),
                },
            )
        };

        let result = self.answers.generate_answer(request).await;

        let mut inner = self.lock();
        if !inner.generation_is_current(node_id, generation) {
            tracing::debug!(node = %node_id, "stale answer completion discarded");
            return;
        }
        let Some(node) = inner.state.node_mut(node_id) else {
            return;
        };
        let NodePayload::Question(question) = &mut node.payload else {
            return;
        };
        let response = match result {
            Ok(content) => content,
            Err(error) => {
                tracing::warn!(node = %node_id, %error, "degrading to fallback answer");
                FALLBACK_ANSWER.to_string()
            }
        };
        question.state = QuestionState::Answered { response };
        inner.commit();
    }

    /// Replaces a note's content. Missing nodes and non-notes are ignored.
    pub fn update_note(&self, node_id: &str, content: &str) {
        let mut inner = self.lock();
        let Some(node) = inner.state.node_mut(node_id) else {
            return;
        };
        let NodePayload::Note(note) = &mut node.payload else {
            return;
        };
        note.content = content.to_string();
        inner.commit();
    }

    /// Exit transition of a note's editing state: a note whose trimmed content
    /// is empty is abandoned and deleted, any other note just leaves editing
    /// mode.
    pub fn finalize_note(&self, node_id: &str) {
        let mut inner = self.lock();
        let abandoned = match inner.state.node(node_id) {
            Some(node) => match &node.payload {
                NodePayload::Note(note) => note.content.trim().is_empty(),
                _ => return,
            },
            None => return,
        };

        if abandoned && inner.delete_node(node_id).is_ok() {
            tracing::debug!(node = %node_id, "abandoned note removed");
            return;
        }

        // Either the note has content, or it is empty but has children and
        // outranks abandonment; close the editor in both cases.
        let Some(node) = inner.state.node_mut(node_id) else {
            return;
        };
        let NodePayload::Note(note) = &mut node.payload else {
            return;
        };
        note.is_editing = false;
        inner.commit();
    }

    /// Deletes a leaf node together with every edge that references it.
    /// Refuses nodes that still have children; deleting a node that no longer
    /// exists is a no-op.
    pub fn delete_node(&self, node_id: &str) -> Result<(), DeleteError> {
        let result = self.lock().delete_node(node_id);
        if result.is_ok() {
            tracing::debug!(node = %node_id, "node deleted");
        }
        result
    }

    /// Position update for node drags.
    pub fn move_node(&self, node_id: &str, position: Point) {
        let mut inner = self.lock();
        let Some(node) = inner.state.node_mut(node_id) else {
            return;
        };
        node.position = position;
        inner.commit();
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        let mut inner = self.lock();
        inner.state.viewport = viewport;
        inner.commit();
    }

    /// The formatted ancestor context of a node, as the answer service would
    /// receive it.
    pub fn context_for(&self, node_id: &str) -> String {
        ContextFormatter::format_context_for(&self.lock().state, node_id)
    }
}
