//! Unit tests for the data model, errors, pure state helpers, and the
//! context formatter.
mod common;

use gyul::context::ContextFormatter;
use gyul::error::{ConnectionError, DeleteError};
use gyul::geometry::Point;
use gyul::prelude::{
    AppState, Edge, Node, NodeKind, NodePayload, NoteData, QuestionData, QuestionState, TweetData,
    TweetState, Viewport,
};
use uuid::Uuid;

fn node_with(id: &str, payload: NodePayload) -> Node {
    Node {
        id: id.to_string(),
        flow_id: Uuid::new_v4(),
        position: Point::default(),
        payload,
    }
}

#[test]
fn test_edge_id_is_deterministic() {
    let a = Edge::between("tweet-1", "note-2");
    let b = Edge::between("tweet-1", "note-2");
    assert_eq!(a.id, "tweet-1->note-2");
    assert_eq!(a, b);
}

#[test]
fn test_initial_payloads() {
    match NodePayload::initial(NodeKind::Tweet) {
        NodePayload::Tweet(tweet) => {
            assert_eq!(tweet.url, "");
            assert_eq!(tweet.state, TweetState::Empty);
        }
        other => panic!("expected tweet payload, got {other:?}"),
    }
    match NodePayload::initial(NodeKind::Question) {
        NodePayload::Question(question) => {
            assert_eq!(question.prompt, "");
            assert_eq!(question.state, QuestionState::Draft);
        }
        other => panic!("expected question payload, got {other:?}"),
    }
    match NodePayload::initial(NodeKind::Note) {
        NodePayload::Note(note) => {
            assert_eq!(note.content, "");
            assert!(note.is_editing);
        }
        other => panic!("expected note payload, got {other:?}"),
    }
}

#[test]
fn test_error_display() {
    let err = ConnectionError::WouldCycle {
        source: "note-a".to_string(),
        target: "tweet-b".to_string(),
    };
    assert!(err.to_string().contains("note-a"));
    assert!(err.to_string().contains("tweet-b"));
    assert!(err.to_string().contains("cycle"));

    let err = DeleteError::HasChildren {
        node_id: "question-1".to_string(),
        children: 3,
    };
    assert!(err.to_string().contains("question-1"));
    assert!(err.to_string().contains('3'));
}

#[test]
fn test_viewport_defaults_to_origin() {
    let viewport = Viewport::default();
    assert_eq!(viewport.x, 0.0);
    assert_eq!(viewport.y, 0.0);
    assert_eq!(viewport.zoom, 1.0);
}

#[test]
fn test_context_formatter_skips_unsettled_nodes() {
    let loading_tweet = node_with(
        "tweet-1",
        NodePayload::Tweet(TweetData {
            url: "https://x.com/a/status/1".to_string(),
            state: TweetState::Loading,
        }),
    );
    let draft_question = node_with(
        "question-1",
        NodePayload::Question(QuestionData {
            prompt: "pending".to_string(),
            state: QuestionState::Draft,
        }),
    );
    let blank_note = node_with(
        "note-1",
        NodePayload::Note(NoteData {
            content: "   ".to_string(),
            is_editing: false,
        }),
    );

    let ancestors = [&loading_tweet, &draft_question, &blank_note];
    assert_eq!(ContextFormatter::format_context(&ancestors), "");
}

#[test]
fn test_context_formatter_output_and_idempotence() {
    let tweet = node_with(
        "tweet-1",
        NodePayload::Tweet(TweetData {
            url: "https://x.com/a/status/1".to_string(),
            state: TweetState::Loaded {
                author: "@rustlang".to_string(),
                text: "Rust 1.85 is out".to_string(),
                timestamp: common::fixed_timestamp(),
            },
        }),
    );
    let question = node_with(
        "question-1",
        NodePayload::Question(QuestionData {
            prompt: "What changed?".to_string(),
            state: QuestionState::Answered {
                response: "Edition 2024 landed.".to_string(),
            },
        }),
    );
    let note = node_with(
        "note-1",
        NodePayload::Note(NoteData {
            content: "follow up later".to_string(),
            is_editing: false,
        }),
    );

    let ancestors = [&tweet, &question, &note];
    let expected = "[Tweet from @rustlang]: Rust 1.85 is out\n\n\
                    [Question]: What changed?\n[Answer]: Edition 2024 landed.\n\n\
                    [Note]: follow up later";
    let first = ContextFormatter::format_context(&ancestors);
    assert_eq!(first, expected);
    // Unchanged ancestors format byte-identically.
    assert_eq!(ContextFormatter::format_context(&ancestors), first);
}

#[test]
fn test_app_state_add_and_get() {
    let (state, id) = AppState::default().add_canvas("research");
    assert_eq!(state.canvases.len(), 1);
    let canvas = state.get_canvas(id).expect("canvas should exist");
    assert_eq!(canvas.name, "research");
    assert!(canvas.nodes.is_empty());
    assert_eq!(canvas.viewport, Viewport::default());
}

#[test]
fn test_app_state_update_refreshes_stamp() {
    let (state, id) = AppState::default().add_canvas("research");
    let before = state.get_canvas(id).unwrap().updated_at;
    let state = state.update_canvas(id, |canvas| canvas.name = "renamed".to_string());
    let canvas = state.get_canvas(id).unwrap();
    assert_eq!(canvas.name, "renamed");
    assert!(canvas.updated_at >= before);
}

#[test]
fn test_app_state_remove_repoints_active() {
    let (state, first) = AppState::default().add_canvas("first");
    let (state, second) = state.add_canvas("second");
    let state = state.set_active_canvas(Some(second));

    let state = state.remove_canvas(second);
    assert_eq!(state.active_canvas_id, Some(first));

    let state = state.remove_canvas(first);
    assert_eq!(state.active_canvas_id, None);
    assert!(state.canvases.is_empty());
}

#[test]
fn test_app_state_update_unknown_canvas_is_noop() {
    let (state, _) = AppState::default().add_canvas("only");
    let updated = state.clone().update_canvas(Uuid::new_v4(), |canvas| {
        canvas.name = "should not happen".to_string();
    });
    assert_eq!(updated, state);
}
