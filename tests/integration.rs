//! End-to-end scenario: a reasoning chain from tweet to answered question,
//! with ancestor context assembled for a third node.
mod common;

use common::{EchoAnswers, StaticTweets, echo_answer, engine_with};
use gyul::geometry::Point;
use gyul::graph::is_valid_connection;
use gyul::prelude::{NodeKind, NodePayload, QuestionState, TweetState};

#[tokio::test]
async fn test_reasoning_chain_end_to_end() {
    let engine = engine_with(
        StaticTweets::new("@rustlang", "Rust 1.85 is out"),
        EchoAnswers::new(),
    );

    // A root tweet, dropped at (100, 100) and loaded.
    let tweet = engine.create_node(NodeKind::Tweet, Point::new(100.0, 100.0), None);
    engine.load_tweet(&tweet, "https://x.com/rustlang/status/1").await;

    {
        let state = engine.snapshot();
        let node = state.node(&tweet).unwrap();
        assert_eq!(node.position, Point::new(100.0, 100.0));
        match &node.payload {
            NodePayload::Tweet(data) => {
                assert_eq!(data.url, "https://x.com/rustlang/status/1");
                assert!(matches!(data.state, TweetState::Loaded { .. }));
            }
            other => panic!("expected tweet payload, got {other:?}"),
        }
    }

    // A question child of the tweet: same flow, no cycle, edge recorded.
    let question = engine.create_node(NodeKind::Question, Point::default(), Some(&tweet));
    {
        let state = engine.snapshot();
        assert!(is_valid_connection(&state, &tweet, &question));
        assert_eq!(state.edges.len(), 1);
        assert_eq!(
            state.node(&tweet).unwrap().flow_id,
            state.node(&question).unwrap().flow_id
        );
    }

    // Submitting runs loading -> answered and always settles with a response.
    engine.submit_question(&question, "What does this mean for editions?").await;
    {
        let state = engine.snapshot();
        match &state.node(&question).unwrap().payload {
            NodePayload::Question(data) => {
                assert_eq!(data.prompt, "What does this mean for editions?");
                assert_eq!(
                    data.state,
                    QuestionState::Answered {
                        response: echo_answer("What does this mean for editions?"),
                    }
                );
            }
            other => panic!("expected question payload, got {other:?}"),
        }
    }

    // A third node below the question sees both ancestors, root first.
    let note = engine.create_node(NodeKind::Note, Point::default(), Some(&question));
    let expected = format!(
        "[Tweet from @rustlang]: Rust 1.85 is out\n\n\
         [Question]: What does this mean for editions?\n[Answer]: {}",
        echo_answer("What does this mean for editions?"),
    );
    assert_eq!(engine.context_for(&note), expected);
    // Unchanged ancestors linearize byte-identically.
    assert_eq!(engine.context_for(&note), expected);
}

#[tokio::test]
async fn test_retry_after_failure_reaches_loaded() {
    // First session against a dead service, then a retry against a live one,
    // driving empty -> loading -> failed -> loading -> loaded.
    let engine = engine_with(common::FailingTweets::new("offline"), EchoAnswers::new());
    let tweet = engine.create_node(NodeKind::Tweet, Point::new(0.0, 0.0), None);
    engine.load_tweet(&tweet, "https://x.com/rustlang/status/9").await;

    let state = engine.snapshot();
    match &state.node(&tweet).unwrap().payload {
        NodePayload::Tweet(data) => {
            assert_eq!(
                data.state,
                TweetState::Failed {
                    message: "offline".to_string(),
                }
            );
        }
        other => panic!("expected tweet payload, got {other:?}"),
    }

    let retry_engine = engine_with(
        StaticTweets::new("@rustlang", "back online"),
        EchoAnswers::new(),
    );
    let canvas = engine.snapshot();
    retry_engine.replace_state(canvas);
    retry_engine.load_tweet(&tweet, "https://x.com/rustlang/status/9").await;

    match &retry_engine.snapshot().node(&tweet).unwrap().payload {
        NodePayload::Tweet(data) => {
            assert_eq!(data.url, "https://x.com/rustlang/status/9");
            assert!(matches!(data.state, TweetState::Loaded { .. }));
        }
        other => panic!("expected tweet payload, got {other:?}"),
    }
}
