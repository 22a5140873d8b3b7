//! # Item Store Module
//!
//! Per-chat shopping lists kept in memory. One store instance is created at
//! startup and shared with every handler; all access goes through a single
//! reader-writer lock.

use std::collections::HashMap;
use std::path::Path;

use tokio::sync::RwLock;
use tokio::task;
use tracing::{debug, info};

use crate::errors::Result;
use crate::paginator::{paginate, Page, PAGE_SIZE};
use crate::persistence;

/// Split user input into items.
///
/// Lines are split on commas, every token is trimmed and empty tokens are
/// dropped.
pub fn parse_items(text: &str) -> Vec<String> {
    text.split('\n')
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// In-memory store of items keyed by chat identifier
///
/// A chat without items has no entry in the map, so empty and absent lists
/// are the same thing.
#[derive(Debug, Default)]
pub struct ItemStore {
    items: RwLock<HashMap<i64, Vec<String>>>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every item found in `text` to the chat's list.
    ///
    /// Returns the number of items added.
    pub async fn add(&self, chat_id: i64, text: &str) -> usize {
        let parsed = parse_items(text);
        if parsed.is_empty() {
            return 0;
        }

        let count = parsed.len();
        let mut items = self.items.write().await;
        items.entry(chat_id).or_default().extend(parsed);
        debug!(chat_id, added = count, total = items[&chat_id].len(), "Items added");
        count
    }

    /// Remove the first item equal to `item`. Returns whether one was found.
    pub async fn remove(&self, chat_id: i64, item: &str) -> bool {
        let mut items = self.items.write().await;
        let Some(list) = items.get_mut(&chat_id) else {
            return false;
        };
        let Some(position) = list.iter().position(|existing| existing == item) else {
            return false;
        };

        list.remove(position);
        if list.is_empty() {
            items.remove(&chat_id);
        }
        debug!(chat_id, item, "Item removed");
        true
    }

    /// Drop the chat's whole list.
    pub async fn wipe(&self, chat_id: i64) {
        let removed = self.items.write().await.remove(&chat_id);
        debug!(
            chat_id,
            wiped = removed.map(|list| list.len()).unwrap_or(0),
            "List wiped"
        );
    }

    /// Current items of a chat, in insertion order.
    pub async fn items(&self, chat_id: i64) -> Vec<String> {
        self.items
            .read()
            .await
            .get(&chat_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Current items of a chat split into poll-sized pages.
    pub async fn get_all(&self, chat_id: i64) -> Vec<Page> {
        let items = self.items.read().await;
        match items.get(&chat_id) {
            Some(list) => paginate(list, PAGE_SIZE),
            None => Vec::new(),
        }
    }

    /// Number of chats that currently have items.
    pub async fn chat_count(&self) -> usize {
        self.items.read().await.len()
    }

    /// Copy of the whole mapping.
    pub async fn snapshot(&self) -> HashMap<i64, Vec<String>> {
        self.items.read().await.clone()
    }

    /// Write the whole store to `path`.
    ///
    /// The lock is held only while copying the map; encoding and file I/O
    /// run on the blocking pool.
    pub async fn dump(&self, path: &Path) -> Result<()> {
        let items = self.snapshot().await;
        let path = path.to_path_buf();
        task::spawn_blocking(move || persistence::write_snapshot(&path, &items)).await?
    }

    /// Replace the store contents with the snapshot at `path`.
    ///
    /// Returns the number of chats restored. The store is left untouched on
    /// error.
    pub async fn restore(&self, path: &Path) -> Result<usize> {
        let restored = persistence::read_snapshot(path)?;
        let chats = restored.len();
        *self.items.write().await = restored;
        info!(path = %path.display(), chats, "Store restored from snapshot");
        Ok(chats)
    }
}
