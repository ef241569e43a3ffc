use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};

use crate::parser::parse_snapshot;
use crate::types::PlayerSnapshot;

const RECORD_EXTENSION: &str = "txt";

struct CacheEntry {
    mtime: SystemTime,
    snapshot: PlayerSnapshot,
}

/// Reads a directory of per-player record files into snapshots.
///
/// Parses are cached by modification time: a file whose mtime is unchanged
/// since the previous call reuses the cached snapshot. A failure on one
/// file skips that player for the call and leaves the rest intact; only a
/// failure to list the directory itself is an error.
pub struct SnapshotReader {
    data_dir: PathBuf,
    cache: HashMap<String, CacheEntry>,
}

impl SnapshotReader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cache: HashMap::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Read all eligible record files, sorted by player key.
    pub fn read_all(&mut self) -> Result<Vec<PlayerSnapshot>> {
        let mut snapshots = Vec::new();

        for (key, path) in self.list_records()? {
            match self.read_cached(&key, &path) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => {
                    tracing::warn!("Skipping record {:?}: {:#}", path, e);
                }
            }
        }

        snapshots.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(snapshots)
    }

    /// List the player keys currently present in the directory.
    pub fn player_keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.list_records()?.into_iter().map(|(k, _)| k).collect();
        keys.sort();
        Ok(keys)
    }

    /// Read and parse one player's record, bypassing the cache.
    /// Returns `Ok(None)` when no record file exists for the key.
    pub fn read_one(&self, key: &str) -> Result<Option<crate::parser::SnapshotDoc>> {
        let path = self.data_dir.join(format!("{}.{}", key, RECORD_EXTENSION));
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read record {:?}", path));
            }
        };
        Ok(Some(parse_snapshot(&content)))
    }

    fn list_records(&self) -> Result<Vec<(String, PathBuf)>> {
        let entries = std::fs::read_dir(&self.data_dir)
            .with_context(|| format!("Failed to read data dir: {:?}", self.data_dir))?;

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| "Failed to read directory entry")?;
            let path = entry.path();

            let is_record = path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(RECORD_EXTENSION));
            if !is_record {
                continue;
            }

            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            records.push((key.to_string(), path.clone()));
        }

        Ok(records)
    }

    fn read_cached(&mut self, key: &str, path: &Path) -> Result<PlayerSnapshot> {
        let mtime = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to stat record {:?}", path))?;

        if let Some(entry) = self.cache.get(key) {
            if entry.mtime == mtime {
                return Ok(entry.snapshot.clone());
            }
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read record {:?}", path))?;
        let doc = parse_snapshot(&content);
        let snapshot = PlayerSnapshot::from_doc(key, &doc);

        self.cache.insert(
            key.to_string(),
            CacheEntry {
                mtime,
                snapshot: snapshot.clone(),
            },
        );

        Ok(snapshot)
    }
}
