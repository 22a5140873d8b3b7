//! In-memory messenger that records outbound actions for assertions.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use shopping_list::errors::{Result, ShoppingError};
use shopping_list::transport::{Messenger, PollHandle, PollTally};
use teloxide::ApiError;
use teloxide::RequestError;

/// One thing the bot sent to a chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat_id: i64,
        text: String,
    },
    Poll {
        chat_id: i64,
        message_id: i32,
        question: String,
        options: Vec<String>,
    },
    Stopped {
        chat_id: i64,
        message_id: i32,
    },
}

#[derive(Default)]
struct Inner {
    next_message_id: i32,
    sent: Vec<Sent>,
    options: HashMap<i32, Vec<String>>,
    votes: HashMap<i32, HashSet<usize>>,
    failing_polls_after: Option<usize>,
    failing_stops: HashSet<i32>,
}

#[derive(Default)]
pub struct RecordingMessenger {
    inner: Mutex<Inner>,
}

fn transport_error() -> ShoppingError {
    ShoppingError::Transport(RequestError::Api(ApiError::BotBlocked))
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark option `index` of poll `message_id` as voted.
    pub fn vote(&self, message_id: i32, index: usize) {
        let mut inner = self.inner.lock().unwrap();
        inner.votes.entry(message_id).or_default().insert(index);
    }

    /// Fail every poll send after `count` successful ones.
    pub fn fail_polls_after(&self, count: usize) {
        self.inner.lock().unwrap().failing_polls_after = Some(count);
    }

    pub fn fail_stop(&self, message_id: i32) {
        self.inner.lock().unwrap().failing_stops.insert(message_id);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.inner.lock().unwrap().sent.clone()
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap().sent.clear();
    }

    pub fn texts(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Text { chat_id: id, text } if id == chat_id => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn polls(&self, chat_id: i64) -> Vec<(i32, String, Vec<String>)> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Poll {
                    chat_id: id,
                    message_id,
                    question,
                    options,
                } if id == chat_id => Some((message_id, question, options)),
                _ => None,
            })
            .collect()
    }

    pub fn stopped(&self) -> Vec<i32> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Stopped { message_id, .. } => Some(message_id),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.inner.lock().unwrap().sent.push(Sent::Text {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_poll(&self, chat_id: i64, question: &str, options: &[String]) -> Result<PollHandle> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(remaining) = inner.failing_polls_after {
            if remaining == 0 {
                return Err(transport_error());
            }
            inner.failing_polls_after = Some(remaining - 1);
        }

        assert!(
            (2..=10).contains(&options.len()),
            "poll with {} options",
            options.len()
        );

        inner.next_message_id += 1;
        let message_id = inner.next_message_id;
        inner.options.insert(message_id, options.to_vec());
        inner.sent.push(Sent::Poll {
            chat_id,
            message_id,
            question: question.to_string(),
            options: options.to_vec(),
        });
        Ok(PollHandle {
            chat_id,
            message_id,
        })
    }

    async fn stop_poll(&self, handle: PollHandle) -> Result<Vec<PollTally>> {
        let mut inner = self.inner.lock().unwrap();
        if inner.failing_stops.contains(&handle.message_id) {
            return Err(transport_error());
        }

        inner.sent.push(Sent::Stopped {
            chat_id: handle.chat_id,
            message_id: handle.message_id,
        });

        let votes = inner.votes.remove(&handle.message_id).unwrap_or_default();
        let options = inner.options.get(&handle.message_id).cloned().unwrap_or_default();
        Ok(options
            .into_iter()
            .enumerate()
            .map(|(index, text)| PollTally {
                text,
                voter_count: u32::from(votes.contains(&index)),
            })
            .collect())
    }
}
