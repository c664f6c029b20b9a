//! Fake provider for tests.
//!
//! Replies are queued in order; once the queue is down to its last reply,
//! that reply repeats. Every prompt is recorded so tests can inspect what
//! was rendered.

use super::*;
use crate::{Error, ErrorKind};
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(ErrorKind, String),
}

#[derive(Debug)]
pub struct FakeProvider {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeProvider {
    /// A provider that always answers with `text`
    pub fn with_response(text: impl Into<String>) -> Self {
        Self::from_replies([Reply::Text(text.into())])
    }

    /// A provider that always fails with the given kind and message
    pub fn failing(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::from_replies([Reply::Fail(kind, message.into())])
    }

    /// Answer with each text in turn, repeating the last one
    pub fn with_responses<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_replies(texts.into_iter().map(|t| Reply::Text(t.into())))
    }

    fn from_replies(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn next_reply(&self) -> Option<Reply> {
        let mut replies = self
            .replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        }
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.to_string());

        match self.next_reply() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(kind, message)) => {
                Err(Error::new(kind, message).with_operation("fake::complete"))
            }
            None => Err(Error::unexpected("FakeProvider has no reply configured")
                .with_operation("fake::complete")),
        }
    }
}
