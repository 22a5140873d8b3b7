//! # Error Types Module
//!
//! Errors raised by the item store, the snapshot files and the messaging
//! transport.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors produced by the shopping list core
#[derive(Debug, Error)]
pub enum ShoppingError {
    /// Snapshot file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Snapshot could not be encoded or decoded
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
    /// Snapshot was written by an incompatible format version
    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedSnapshotVersion { found: u32, expected: u32 },
    /// Sending or stopping a message/poll failed
    #[error("Transport error: {0}")]
    Transport(#[from] teloxide::RequestError),
    /// Background snapshot writer panicked or was cancelled
    #[error("Snapshot writer failed: {0}")]
    Writer(#[from] tokio::task::JoinError),
    /// Shutdown flush did not finish in time
    #[error("Shutdown flush timed out after {0:?}")]
    ShutdownTimeout(Duration),
}

impl ShoppingError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ShoppingError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ShoppingError> = std::result::Result<T, E>;
