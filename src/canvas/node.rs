use crate::geometry::Point;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three node types a canvas can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Tweet,
    Question,
    Note,
}

impl NodeKind {
    /// Prefix used when minting node ids of this kind.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            NodeKind::Tweet => "tweet",
            NodeKind::Question => "question",
            NodeKind::Note => "note",
        }
    }
}

/// A node on the canvas.
///
/// Every node carries the `flow_id` of the reasoning tree it belongs to: root
/// nodes mint a fresh one, children inherit their parent's. Connections are
/// only legal between nodes of the same flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub flow_id: Uuid,
    pub position: Point,
    pub payload: NodePayload,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.payload.kind()
    }
}

/// Type-specific node content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodePayload {
    Tweet(TweetData),
    Question(QuestionData),
    Note(NoteData),
}

impl NodePayload {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodePayload::Tweet(_) => NodeKind::Tweet,
            NodePayload::Question(_) => NodeKind::Question,
            NodePayload::Note(_) => NodeKind::Note,
        }
    }

    /// Initial payload for a freshly created node of the given kind: an empty
    /// tweet, a draft question, or a note that starts out in editing mode.
    pub fn initial(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Tweet => NodePayload::Tweet(TweetData {
                url: String::new(),
                state: TweetState::Empty,
            }),
            NodeKind::Question => NodePayload::Question(QuestionData {
                prompt: String::new(),
                state: QuestionState::Draft,
            }),
            NodeKind::Note => NodePayload::Note(NoteData {
                content: String::new(),
                is_editing: true,
            }),
        }
    }
}

/// Content of a tweet node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetData {
    pub url: String,
    pub state: TweetState,
}

/// Lifecycle of a tweet node's content.
///
/// `Empty -> Loading -> {Loaded, Failed}`; retrying a loaded or failed tweet
/// goes back through `Loading`. There is no transition back to `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TweetState {
    Empty,
    Loading,
    Loaded {
        author: String,
        text: String,
        timestamp: DateTime<Utc>,
    },
    Failed {
        message: String,
    },
}

/// Content of a question node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionData {
    pub prompt: String,
    pub state: QuestionState,
}

/// Lifecycle of a question node: `Draft -> Loading -> Answered`.
/// Re-submitting an answered question runs another `Loading -> Answered` cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum QuestionState {
    Draft,
    Loading,
    Answered { response: String },
}

/// Content of a free-form note node. A note with blank content that has left
/// editing mode is considered abandoned and is removed on finalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteData {
    pub content: String,
    pub is_editing: bool,
}

/// A directed parent-to-child connection between two nodes of the same flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    /// Builds the edge between two nodes. Edge ids are derived from the
    /// endpoint ids, so the same pair always yields the same edge.
    pub fn between(source: &str, target: &str) -> Self {
        Self {
            id: format!("{source}->{target}"),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}
