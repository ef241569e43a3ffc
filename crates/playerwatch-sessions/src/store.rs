use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::SessionRow;

/// Errors from the durable session log.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Ordered, bounded, durable collection of session rows.
///
/// Rows are kept newest-first; the log is capped at `max_rows` with the
/// oldest rows evicted from the tail. Mutations set a dirty flag, and
/// [`SessionLog::flush_if_dirty`] coalesces all of a tick's mutations into
/// one atomic rewrite (write to a temp file, then rename over the target),
/// so a crash mid-write never corrupts the previous durable state.
pub struct SessionLog {
    path: PathBuf,
    max_rows: usize,
    rows: Vec<SessionRow>,
    dirty: bool,
}

impl SessionLog {
    /// Rehydrate the log from its last durable write. A missing file is an
    /// empty log, not an error. Leftover temp files from an interrupted
    /// write are ignored; only the target file is ever read.
    pub fn load(path: impl Into<PathBuf>, max_rows: usize) -> Result<Self> {
        let path = path.into();

        let mut rows: Vec<SessionRow> = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        rows.truncate(max_rows);

        Ok(Self {
            path,
            max_rows,
            rows,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All rows, newest first.
    pub fn rows(&self) -> &[SessionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Prepend a row, evicting from the tail past the cap.
    pub fn push_front(&mut self, row: SessionRow) {
        self.rows.insert(0, row);
        self.rows.truncate(self.max_rows);
        self.dirty = true;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows.iter().any(|r| r.id == id)
    }

    /// The open row for a player key, if one exists.
    pub fn find_open_row(&self, player_key: &str) -> Option<&SessionRow> {
        self.rows
            .iter()
            .find(|r| r.player_key == player_key && r.is_open())
    }

    /// Rows still open, newest first. Used to seed reconciliation state at
    /// startup.
    pub fn open_rows(&self) -> impl Iterator<Item = &SessionRow> {
        self.rows.iter().filter(|r| r.is_open())
    }

    /// Mutate a row in place. Returns false when the row has been evicted.
    pub fn update_row(&mut self, id: &str, f: impl FnOnce(&mut SessionRow)) -> bool {
        match self.rows.iter_mut().find(|r| r.id == id) {
            Some(row) => {
                f(row);
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Close a row with the given leave value. Returns false when the row
    /// has been evicted.
    pub fn close_row(&mut self, id: &str, leave: String) -> bool {
        self.update_row(id, |row| row.close(leave))
    }

    /// Drop all rows. Persisted on the next flush.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.dirty = true;
    }

    /// Write the log to disk if any mutation happened since the last
    /// durable write. Returns whether a write happened. The dirty flag is
    /// cleared only on success, so in-memory state stays ahead of disk
    /// until the next successful write.
    pub fn flush_if_dirty(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.persist()?;
        self.dirty = false;
        Ok(true)
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&self.rows)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
