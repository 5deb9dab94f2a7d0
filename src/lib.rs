//! # Gyul - Canvas Graph Engine
//!
//! **Gyul** is the graph engine behind a visual note-taking canvas: users drop
//! tweet, question, and note cards onto an infinite surface and connect them
//! into per-flow reasoning trees. The engine owns everything with algorithmic
//! content in that app - node and edge state, tree-shaped connection
//! invariants, collision-free placement of new cards, and reconstruction of a
//! node's ancestor context for AI-answered questions. Rendering, routing, and
//! network transports stay with the host application.
//!
//! ## Core Workflow
//!
//! 1. **Implement the service seams**: [`services::TweetService`] resolves
//!    tweet urls into content and [`services::AnswerService`] turns a prompt
//!    plus ancestor context into an answer. Both are async and may fail; the
//!    engine degrades failures into terminal, renderable node states.
//! 2. **Open a session or build an engine**: [`session::CanvasSession`] loads
//!    a [`store::CanvasStore`], opens the active canvas, and wires persistence
//!    to every committed mutation. For headless use, build a
//!    [`engine::CanvasEngine`] directly.
//! 3. **Mutate through the engine**: create nodes (placed collision-free),
//!    connect them (cycle- and flow-checked), load tweets, submit questions,
//!    edit notes. Every mutation notifies registered observers synchronously.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gyul::canvas::NodeKind;
//! use gyul::engine::CanvasEngine;
//! use gyul::geometry::Point;
//! use gyul::services::{
//!     AnswerError, AnswerRequest, AnswerService, FetchError, TweetService, TweetSnapshot,
//! };
//! use async_trait::async_trait;
//! use chrono::Utc;
//! use std::sync::Arc;
//!
//! struct StubTweets;
//!
//! #[async_trait]
//! impl TweetService for StubTweets {
//!     async fn fetch_tweet(&self, _url: &str) -> Result<TweetSnapshot, FetchError> {
//!         Ok(TweetSnapshot {
//!             author: "@rustlang".to_string(),
//!             text: "Rust 1.85 is out".to_string(),
//!             timestamp: Utc::now(),
//!         })
//!     }
//! }
//!
//! struct StubAnswers;
//!
//! #[async_trait]
//! impl AnswerService for StubAnswers {
//!     async fn generate_answer(&self, request: AnswerRequest) -> Result<String, AnswerError> {
//!         Ok(format!("Considering the context: {}", request.context))
//!     }
//! }
//!
//! # async fn run() {
//! let engine = CanvasEngine::builder(Arc::new(StubTweets), Arc::new(StubAnswers)).build();
//!
//! // Drop a tweet onto the canvas and load its content.
//! let tweet = engine.create_node(NodeKind::Tweet, Point::new(100.0, 100.0), None);
//! engine.load_tweet(&tweet, "https://x.com/rustlang/status/1").await;
//!
//! // Ask a question about it; the child inherits the tweet's flow.
//! let question = engine.create_node(NodeKind::Question, Point::default(), Some(&tweet));
//! engine.submit_question(&question, "What does this imply?").await;
//!
//! // The question's ancestor chain, linearized the way the answer service saw it.
//! println!("{}", engine.context_for(&question));
//! # }
//! ```

pub mod canvas;
pub mod context;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod prelude;
pub mod services;
pub mod session;
pub mod store;
