//! Rolling chat-log store.
//!
//! Append-only from the caller's point of view, size-capped, persisted as
//! a single JSON array, and fanned out to live subscribers on every write.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

const BROADCAST_CAPACITY: usize = 256;

#[derive(Error, Debug)]
pub enum ChatLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChatLogError>;

/// One chat line as relayed from the game server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message: String,
    pub sender: String,
    #[serde(default)]
    pub recipient: String,
    /// `"public"` or `"private"`.
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub date: String,
}

/// Capped chat log: newest-first in memory, durable as one JSON array,
/// broadcast to subscribers on every append.
pub struct ChatLog {
    path: PathBuf,
    cap: usize,
    messages: Vec<ChatMessage>,
    tx: broadcast::Sender<ChatMessage>,
}

impl ChatLog {
    /// Open the log, rehydrating from the backing file when it exists.
    pub fn open(path: impl Into<PathBuf>, cap: usize) -> Result<Self> {
        let path = path.into();

        let mut messages: Vec<ChatMessage> = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        messages.truncate(cap);

        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);

        Ok(Self {
            path,
            cap,
            messages,
            tx,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message: prepend, evict past the cap, persist durably,
    /// then broadcast to whoever is listening.
    ///
    /// Persistence runs against a candidate list first, so a failed write
    /// leaves the in-memory log unchanged and broadcasts nothing. Readers
    /// and live subscribers always see the same set of messages.
    pub fn append(&mut self, msg: ChatMessage) -> Result<()> {
        let mut candidate = self.messages.clone();
        candidate.insert(0, msg.clone());
        candidate.truncate(self.cap);
        Self::persist(&self.path, &candidate)?;

        self.messages = candidate;
        // Nobody listening is fine.
        let _ = self.tx.send(msg);
        Ok(())
    }

    /// The newest `limit` messages, newest first.
    pub fn recent(&self, limit: usize) -> &[ChatMessage] {
        &self.messages[..limit.min(self.messages.len())]
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatMessage> {
        self.tx.subscribe()
    }

    fn persist(path: &Path, messages: &[ChatMessage]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(messages)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}
