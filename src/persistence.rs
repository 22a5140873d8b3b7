//! # Snapshot Persistence Module
//!
//! Whole-store snapshots written to a single JSON file. The file carries an
//! explicit format version so a restore never silently misreads a snapshot
//! written by a different layout.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::errors::{Result, ShoppingError};

/// Current snapshot layout version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Default location of the snapshot file, relative to the working directory
pub const DEFAULT_DUMP_PATH: &str = "dumps/items.json";

/// On-disk snapshot envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    /// Items per chat, in insertion order
    pub chats: BTreeMap<i64, Vec<String>>,
}

impl Snapshot {
    pub fn new(chats: &HashMap<i64, Vec<String>>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            chats: chats
                .iter()
                .filter(|(_, items)| !items.is_empty())
                .map(|(chat_id, items)| (*chat_id, items.clone()))
                .collect(),
        }
    }
}

/// Write the given mapping to `path`.
///
/// The snapshot is written to a temporary file next to `path` and then
/// renamed over it, so an interrupted dump leaves the previous file intact.
pub fn write_snapshot(path: &Path, chats: &HashMap<i64, Vec<String>>) -> Result<()> {
    let snapshot = Snapshot::new(chats);
    let encoded = serde_json::to_vec_pretty(&snapshot)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| ShoppingError::io(dir, e))?;

    let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| ShoppingError::io(dir, e))?;
    temp_file
        .write_all(&encoded)
        .and_then(|_| temp_file.as_file().sync_all())
        .map_err(|e| ShoppingError::io(temp_file.path(), e))?;
    temp_file
        .persist(path)
        .map_err(|e| ShoppingError::io(path, e.error))?;

    info!(
        path = %path.display(),
        chats = snapshot.chats.len(),
        bytes = encoded.len(),
        "Snapshot written"
    );
    Ok(())
}

/// Read the mapping stored at `path`.
pub fn read_snapshot(path: &Path) -> Result<HashMap<i64, Vec<String>>> {
    let raw = fs::read(path).map_err(|e| ShoppingError::io(path, e))?;
    let snapshot: Snapshot = serde_json::from_slice(&raw)?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(ShoppingError::UnsupportedSnapshotVersion {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }

    debug!(
        path = %path.display(),
        saved_at = %snapshot.saved_at,
        chats = snapshot.chats.len(),
        "Snapshot read"
    );

    Ok(snapshot
        .chats
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .collect())
}
