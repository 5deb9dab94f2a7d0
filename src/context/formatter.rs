use crate::canvas::{CanvasState, Node, NodePayload, NoteData, QuestionState, TweetState};
use crate::graph::ancestor_chain;
use itertools::Itertools;

/// Serializes a node's ancestors into flat, tagged text.
///
/// Only settled content contributes: loaded tweets, answered questions, and
/// non-blank notes. Everything still empty, loading, or failed is skipped - it
/// carries no usable context yet. The output is deterministic for a given
/// ancestor chain.
pub struct ContextFormatter;

impl ContextFormatter {
    /// Formats an ancestor chain, oldest first, joining fragments with a blank
    /// line. An empty chain yields an empty string.
    pub fn format_context(ancestors: &[&Node]) -> String {
        ancestors
            .iter()
            .filter_map(|node| Self::fragment(node))
            .join("\n\n")
    }

    /// Convenience wrapper: resolves the ancestor chain of `node_id` on the
    /// given canvas and formats it.
    pub fn format_context_for(state: &CanvasState, node_id: &str) -> String {
        Self::format_context(&ancestor_chain(state, node_id))
    }

    fn fragment(node: &Node) -> Option<String> {
        match &node.payload {
            NodePayload::Tweet(tweet) => match &tweet.state {
                TweetState::Loaded { author, text, .. } => {
                    Some(format!("[Tweet from {author}]: {text}"))
                }
                _ => None,
            },
            NodePayload::Question(question) => match &question.state {
                QuestionState::Answered { response } => Some(format!(
                    "[Question]: {}\n[Answer]: {}",
                    question.prompt, response
                )),
                _ => None,
            },
            NodePayload::Note(NoteData { content, .. }) if !content.trim().is_empty() => {
                Some(format!("[Note]: {content}"))
            }
            NodePayload::Note(_) => None,
        }
    }
}
