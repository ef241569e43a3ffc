use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use playerwatch_snapshots::PlayerSnapshot;

/// Sentinel `leave` value for a session that has not ended yet.
pub const ONLINE: &str = "Online";

/// Timestamp format used throughout the session log: `dd.mm.yyyy HH:MM:SS`.
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

/// One persisted connect-to-disconnect interval for a player.
///
/// Rows are created by the reconciler when a connect is observed, updated
/// in place while the player stays connected, and closed on disconnect.
/// `id` and `join` are fixed at creation; everything else mirrors the most
/// recently seen snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRow {
    pub id: String,
    pub player_key: String,
    pub name: String,
    pub connection_state: ConnectionState,
    pub ip: String,
    pub rate: String,
    pub snaps: String,
    pub ping: String,
    pub allies_model: String,
    pub axis_model: String,
    pub game_version: String,
    /// Set when the row is created, never changed afterwards.
    pub join: String,
    /// `"Online"` while the session is open, a timestamp once closed.
    pub leave: String,
    pub join_from_file: String,
    pub number_of_times_played: i64,
}

impl SessionRow {
    /// Open a new row for a freshly observed connect.
    ///
    /// The id combines player key, play count and creation time in
    /// milliseconds, which is unique at creation.
    pub fn open(snap: &PlayerSnapshot, now: &DateTime<Local>) -> Self {
        Self {
            id: format!("{}-{}-{}", snap.key, snap.play_count, now.timestamp_millis()),
            player_key: snap.key.clone(),
            name: snap.name.clone(),
            connection_state: ConnectionState::Connected,
            ip: snap.ip.clone(),
            rate: snap.rate.clone(),
            snaps: snap.snaps.clone(),
            ping: snap.ping.clone(),
            allies_model: snap.allies_model.clone(),
            axis_model: snap.axis_model.clone(),
            game_version: snap.game_version.clone(),
            join: format_timestamp(now),
            leave: ONLINE.to_string(),
            join_from_file: snap.join_from_file.clone(),
            number_of_times_played: snap.play_count,
        }
    }

    pub fn is_open(&self) -> bool {
        self.connection_state == ConnectionState::Connected && self.leave == ONLINE
    }

    /// Refresh the live fields from the latest snapshot without touching
    /// `id` or `join`.
    pub fn apply_snapshot(&mut self, snap: &PlayerSnapshot) {
        self.name = snap.name.clone();
        self.connection_state = ConnectionState::Connected;
        self.ip = snap.ip.clone();
        self.rate = snap.rate.clone();
        self.snaps = snap.snaps.clone();
        self.ping = snap.ping.clone();
        self.allies_model = snap.allies_model.clone();
        self.axis_model = snap.axis_model.clone();
        self.game_version = snap.game_version.clone();
        self.leave = ONLINE.to_string();
        self.join_from_file = snap.join_from_file.clone();
        self.number_of_times_played = snap.play_count;
    }

    pub fn close(&mut self, leave: String) {
        self.connection_state = ConnectionState::Disconnected;
        self.leave = leave;
    }
}
