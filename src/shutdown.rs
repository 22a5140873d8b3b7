//! # Shutdown Module
//!
//! Final snapshot of the store when the process is asked to stop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::errors::{Result, ShoppingError};
use crate::store::ItemStore;

/// Flushes the store to disk within a bounded time
#[derive(Debug, Clone)]
pub struct ShutdownHook {
    store: Arc<ItemStore>,
    dump_path: PathBuf,
    timeout: Duration,
}

impl ShutdownHook {
    pub fn new(store: Arc<ItemStore>, dump_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            store,
            dump_path: dump_path.into(),
            timeout,
        }
    }

    /// Write the snapshot, failing if it takes longer than the timeout.
    pub async fn flush(&self) -> Result<()> {
        let chats = self.store.chat_count().await;
        info!(path = %self.dump_path.display(), chats, "Dumping store before shutdown");
        match tokio::time::timeout(self.timeout, self.store.dump(&self.dump_path)).await {
            Ok(result) => result,
            Err(_) => Err(ShoppingError::ShutdownTimeout(self.timeout)),
        }
    }
}

/// Resolve once the process receives Ctrl-C or SIGTERM.
pub async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
