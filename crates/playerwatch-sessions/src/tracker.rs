use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use playerwatch_snapshots::SnapshotReader;

use crate::reconciler::{reconcile, ReconcilerState};
use crate::store::SessionLog;
use crate::types::SessionRow;

/// Bundles the snapshot reader, the session log and the reconciliation
/// state behind a single owner.
///
/// All session-log mutation flows through [`SessionTracker::refresh`] and
/// [`SessionTracker::reset`]; holding the tracker exclusively is what
/// keeps the single-writer invariant.
pub struct SessionTracker {
    reader: SnapshotReader,
    log: SessionLog,
    state: ReconcilerState,
}

impl SessionTracker {
    /// Open the tracker: rehydrate the log from its last durable write and
    /// seed the reconciliation state from the rows still open in it.
    pub fn open(
        data_dir: impl Into<PathBuf>,
        log_path: impl Into<PathBuf>,
        max_rows: usize,
    ) -> Result<Self> {
        let log_path = log_path.into();
        let log = SessionLog::load(&log_path, max_rows)
            .with_context(|| format!("Failed to load session log: {:?}", log_path))?;
        let state = ReconcilerState::from_log(&log);

        Ok(Self {
            reader: SnapshotReader::new(data_dir),
            log,
            state,
        })
    }

    /// One reconciliation tick: read the current snapshots, reconcile them
    /// against remembered state, and coalesce whatever changed into a
    /// single durable write.
    pub fn refresh(&mut self, now: DateTime<Local>) -> Result<()> {
        let snapshots = self
            .reader
            .read_all()
            .context("Session refresh could not list snapshots")?;

        reconcile(&mut self.log, &mut self.state, &snapshots, now);

        let wrote = self
            .log
            .flush_if_dirty()
            .context("Session refresh could not persist the log")?;
        if wrote {
            tracing::debug!(rows = self.log.len(), "Persisted session log");
        }
        Ok(())
    }

    /// Clear the log and all reconciliation state, then persist the empty
    /// log.
    pub fn reset(&mut self) -> Result<()> {
        self.log.reset();
        self.state.clear();
        self.log
            .flush_if_dirty()
            .context("Failed to persist reset session log")?;
        tracing::info!("Session log reset");
        Ok(())
    }

    /// All session rows, newest first.
    pub fn rows(&self) -> &[SessionRow] {
        self.log.rows()
    }

    pub fn row_count(&self) -> usize {
        self.log.len()
    }

    pub fn player_count(&self) -> usize {
        self.state.player_count()
    }

    pub fn data_dir(&self) -> &Path {
        self.reader.data_dir()
    }

    pub fn reader(&self) -> &SnapshotReader {
        &self.reader
    }
}
