//! Interval-driven refresh loops.
//!
//! The reconciler and the stats aggregator each run on their own fixed
//! interval. A tick that comes due while the previous one is still running
//! is skipped outright (`try_lock` fails, `MissedTickBehavior::Skip` drops
//! the backlog) — no queuing, no overlap. Failures land in the shared
//! health slot and never stop a loop.

use chrono::Local;
use tokio::sync::{Mutex, RwLock};
use tokio::time::MissedTickBehavior;

use playerwatch_sessions::{aggregate, PlayerOverview, SessionTracker};
use playerwatch_snapshots::SnapshotReader;

use crate::state::{AppState, Health};

pub fn spawn(state: &AppState) {
    tokio::spawn(session_loop(state.clone()));
    tokio::spawn(stats_loop(state.clone()));
}

async fn session_loop(state: AppState) {
    let mut interval = tokio::time::interval(state.config.session_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        try_refresh_sessions(&state).await;
    }
}

async fn stats_loop(state: AppState) {
    let mut interval = tokio::time::interval(state.config.stats_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        try_refresh_stats(&state).await;
    }
}

/// Scheduled reconciler entry. Returns false when the tracker is already
/// held (a manual refresh or a still-running tick) and the tick is
/// skipped, not queued; the skip is not an error.
pub(crate) async fn try_refresh_sessions(state: &AppState) -> bool {
    let Ok(mut tracker) = state.tracker.try_lock() else {
        tracing::debug!("Session refresh already in flight; skipping tick");
        return false;
    };
    refresh_sessions(&mut tracker, &state.health).await;
    true
}

/// Scheduled aggregator entry, with the same skip semantics.
pub(crate) async fn try_refresh_stats(state: &AppState) -> bool {
    let Ok(mut reader) = state.stats_reader.try_lock() else {
        tracing::debug!("Stats refresh already in flight; skipping tick");
        return false;
    };
    refresh_stats(&mut reader, &state.stats_table, &state.health).await;
    true
}

/// One reconciler tick. Shared by the session loop and the manual refresh
/// endpoint; the caller holds the tracker lock.
pub async fn refresh_sessions(tracker: &mut SessionTracker, health: &Mutex<Health>) {
    match tracker.refresh(Local::now()) {
        Ok(()) => {
            health.lock().await.last_session_refresh = Some(Local::now());
        }
        Err(e) => {
            tracing::error!("Session refresh failed: {:#}", e);
            health.lock().await.last_error = Some(format!("{:#}", e));
        }
    }
}

/// One aggregator tick: full recomputation, published as a whole-table
/// swap.
pub async fn refresh_stats(
    reader: &mut SnapshotReader,
    table: &RwLock<Vec<PlayerOverview>>,
    health: &Mutex<Health>,
) {
    match reader.read_all() {
        Ok(snapshots) => {
            let fresh = aggregate(&snapshots);
            *table.write().await = fresh;
            health.lock().await.last_stats_refresh = Some(Local::now());
        }
        Err(e) => {
            tracing::error!("Stats refresh failed: {:#}", e);
            health.lock().await.last_error = Some(format!("{:#}", e));
        }
    }
}
