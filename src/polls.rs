//! # Poll Lifecycle Module
//!
//! Tracks the polls sent by the latest `/list` of each chat until `/done`
//! closes them.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::debug;

use crate::transport::PollHandle;

/// A poll that is still open, together with the items it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedPoll {
    pub handle: PollHandle,
    /// Items behind the poll options, option index for option index
    pub items: Vec<String>,
}

/// Listing state of one chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingState {
    /// No polls waiting for `/done`
    Idle,
    /// Polls sent and waiting for `/done`
    Listing { polls: usize },
}

/// Outstanding polls per chat
#[derive(Debug, Default)]
pub struct PollTracker {
    polls: Mutex<HashMap<i64, Vec<TrackedPoll>>>,
}

impl PollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the polls of a new listing.
    ///
    /// A new listing replaces the previous one; the superseded polls are
    /// returned so the caller can close them.
    pub async fn begin_listing(&self, chat_id: i64, polls: Vec<TrackedPoll>) -> Vec<TrackedPoll> {
        let mut tracked = self.polls.lock().await;
        let count = polls.len();
        let superseded = if polls.is_empty() {
            tracked.remove(&chat_id)
        } else {
            tracked.insert(chat_id, polls)
        }
        .unwrap_or_default();
        debug!(chat_id, polls = count, superseded = superseded.len(), "Listing recorded");
        superseded
    }

    /// Remove and return every outstanding poll of the chat.
    pub async fn take(&self, chat_id: i64) -> Vec<TrackedPoll> {
        self.polls
            .lock()
            .await
            .remove(&chat_id)
            .unwrap_or_default()
    }

    pub async fn state(&self, chat_id: i64) -> ListingState {
        match self.polls.lock().await.get(&chat_id) {
            Some(polls) if !polls.is_empty() => ListingState::Listing { polls: polls.len() },
            _ => ListingState::Idle,
        }
    }
}
