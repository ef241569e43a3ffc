use std::collections::HashMap;

use chrono::{DateTime, Local};

use playerwatch_snapshots::PlayerSnapshot;

use crate::store::SessionLog;
use crate::types::{format_timestamp, SessionRow};

/// What the reconciler remembers about one player between ticks.
#[derive(Debug, Clone, Default)]
pub struct PlayerMemory {
    /// Id of the currently open row, if any. An association for lookup,
    /// not ownership: the row lives in the log and may be evicted out from
    /// under it, so it is validated against the log before use.
    pub active_row_id: Option<String>,
    pub connected: bool,
    pub play_count: i64,
}

/// Per-player remembered state, one entry per player key.
///
/// Owned by the tracker and passed explicitly into each tick; never
/// persisted. Reconstructible at any time by scanning the log for open
/// rows.
#[derive(Debug, Default)]
pub struct ReconcilerState {
    players: HashMap<String, PlayerMemory>,
}

impl ReconcilerState {
    /// Rebuild state from the persisted log: every open row seeds its
    /// player as connected with that row active.
    pub fn from_log(log: &SessionLog) -> Self {
        let mut players = HashMap::new();
        for row in log.open_rows() {
            // Rows are newest-first; keep the newest open row per key.
            players
                .entry(row.player_key.clone())
                .or_insert_with(|| PlayerMemory {
                    active_row_id: Some(row.id.clone()),
                    connected: true,
                    play_count: row.number_of_times_played,
                });
        }
        Self { players }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn get(&self, player_key: &str) -> Option<&PlayerMemory> {
        self.players.get(player_key)
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }
}

/// Run one reconciliation pass over the current snapshots.
///
/// Per player key, in order:
/// 1. start a new session on a fresh connect, or on a play-count advance
///    while connected (a reconnect whose disconnect fell between ticks) —
///    force-closing any row still open for the key first, so at most one
///    open row per key ever exists;
/// 2. refresh the active row in place while the player stays connected,
///    including a row opened this same tick;
/// 3. close the active row on a connected→disconnected transition, using
///    the record's own leave timestamp when it has one;
/// 4. always update the remembered connected/play-count values.
///
/// Players whose file vanished from the directory are left untouched:
/// absence of a file is not a disconnect signal, only an explicit
/// `connected = false` is. A disconnect/reconnect that completes within
/// one tick without advancing the play counter is folded into the same
/// session; the play-count heuristic is known to under-count in that case.
pub fn reconcile(
    log: &mut SessionLog,
    state: &mut ReconcilerState,
    snapshots: &[PlayerSnapshot],
    now: DateTime<Local>,
) {
    let stamp = format_timestamp(&now);

    for snap in snapshots {
        let memory = state.players.entry(snap.key.clone()).or_default();
        let prev_connected = memory.connected;
        let prev_play_count = memory.play_count;

        // Eviction may have dropped the row the association points at.
        let mut active = memory
            .active_row_id
            .take()
            .filter(|id| log.contains(id));

        let starts_session =
            snap.connected && (!prev_connected || snap.play_count > prev_play_count);

        if starts_session {
            if let Some(id) = active.take() {
                log.close_row(&id, stamp.clone());
            }
            let row = SessionRow::open(snap, &now);
            active = Some(row.id.clone());
            log.push_front(row);
        }

        if snap.connected {
            if let Some(id) = &active {
                log.update_row(id, |row| row.apply_snapshot(snap));
            }
        } else if prev_connected {
            if let Some(id) = active.take() {
                let leave = if snap.leave_from_file.is_empty() {
                    stamp.clone()
                } else {
                    snap.leave_from_file.clone()
                };
                log.close_row(&id, leave);
            }
        }

        memory.active_row_id = active;
        memory.connected = snap.connected;
        memory.play_count = snap.play_count;
    }
}
