//! Common test utilities: scripted services and engine builders.
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use gyul::engine::CanvasEngine;
use gyul::services::{
    AnswerError, AnswerRequest, AnswerService, FetchError, TweetService, TweetSnapshot,
};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A fixed timestamp so loaded-tweet assertions are exact.
#[allow(dead_code)]
pub fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Tweet service that answers every url with the same snapshot, optionally
/// after a delay.
#[allow(dead_code)]
pub struct StaticTweets {
    author: String,
    text: String,
    delay: Duration,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl StaticTweets {
    pub fn new(author: &str, text: &str) -> Self {
        Self {
            author: author.to_string(),
            text: text.to_string(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl TweetService for StaticTweets {
    async fn fetch_tweet(&self, _url: &str) -> Result<TweetSnapshot, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(TweetSnapshot {
            author: self.author.clone(),
            text: self.text.clone(),
            timestamp: fixed_timestamp(),
        })
    }
}

/// Tweet service that always fails with the given message.
#[allow(dead_code)]
pub struct FailingTweets {
    message: String,
}

#[allow(dead_code)]
impl FailingTweets {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl TweetService for FailingTweets {
    async fn fetch_tweet(&self, _url: &str) -> Result<TweetSnapshot, FetchError> {
        Err(FetchError::new(self.message.clone()))
    }
}

/// Answer service that echoes the prompt, records every request it receives,
/// and takes per-call delays from a queue (missing entries mean no delay).
#[derive(Default)]
#[allow(dead_code)]
pub struct EchoAnswers {
    delays: Mutex<VecDeque<Duration>>,
    requests: Mutex<Vec<AnswerRequest>>,
}

#[allow(dead_code)]
impl EchoAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delays(delays: Vec<Duration>) -> Self {
        Self {
            delays: Mutex::new(delays.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<AnswerRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// The answer `EchoAnswers` produces for a prompt.
#[allow(dead_code)]
pub fn echo_answer(prompt: &str) -> String {
    format!("Echoing: {prompt}")
}

#[async_trait]
impl AnswerService for EchoAnswers {
    async fn generate_answer(&self, request: AnswerRequest) -> Result<String, AnswerError> {
        let delay = self.delays.lock().unwrap().pop_front();
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(echo_answer(&request.prompt))
    }
}

/// Answer service that always fails.
#[allow(dead_code)]
pub struct FailingAnswers;

#[async_trait]
impl AnswerService for FailingAnswers {
    async fn generate_answer(&self, _request: AnswerRequest) -> Result<String, AnswerError> {
        Err(AnswerError)
    }
}

/// Engine over arbitrary scripted services.
#[allow(dead_code)]
pub fn engine_with(
    tweets: impl TweetService + 'static,
    answers: impl AnswerService + 'static,
) -> CanvasEngine {
    CanvasEngine::builder(Arc::new(tweets), Arc::new(answers)).build()
}

/// Engine with a well-behaved tweet service and an echoing answer service.
#[allow(dead_code)]
pub fn default_engine() -> CanvasEngine {
    engine_with(StaticTweets::new("@rustlang", "Rust 1.85 is out"), EchoAnswers::new())
}
