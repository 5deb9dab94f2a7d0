//! Async seams to the external collaborators: tweet content lookup and answer
//! generation. The engine only ever sees these traits; transports live with
//! the embedding application.

use crate::canvas::NodePayload;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Content of a successfully fetched tweet.
#[derive(Debug, Clone, PartialEq)]
pub struct TweetSnapshot {
    pub author: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// A failed tweet fetch, carrying the message shown on the card.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Resolves a tweet url into its content. Implementations must be idempotent
/// and safely retryable; the engine re-invokes this on user retry.
#[async_trait]
pub trait TweetService: Send + Sync {
    async fn fetch_tweet(&self, url: &str) -> Result<TweetSnapshot, FetchError>;
}

/// Everything the answer service receives for one question: the raw ancestor
/// payloads, their formatted linearization, and the prompt itself.
#[derive(Debug, Clone)]
pub struct AnswerRequest {
    pub ancestors: Vec<NodePayload>,
    pub context: String,
    pub prompt: String,
}

/// A failed answer generation. Carries no detail: the engine degrades this
/// into a placeholder answer, never into an error state on the node.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("answer generation failed")]
pub struct AnswerError;

/// Generates an answer for a question node from its ancestor context.
#[async_trait]
pub trait AnswerService: Send + Sync {
    async fn generate_answer(&self, request: AnswerRequest) -> Result<String, AnswerError>;
}
