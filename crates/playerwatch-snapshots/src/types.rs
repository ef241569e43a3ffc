use serde::Serialize;

use crate::parser::{Section, SnapshotDoc, Value};

/// The current state of one player, rebuilt from their record file every
/// tick. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    /// Filename-derived player key. Stable and unique per record file.
    pub key: String,
    pub name: String,
    pub connected: bool,
    /// Monotonic-ish counter from the source record. Advances when the
    /// game server counts a new visit, which is how reconnects that fall
    /// between two ticks are detected.
    pub play_count: i64,

    pub ip: String,
    pub rate: String,
    pub snaps: String,
    pub ping: String,
    pub allies_model: String,
    pub axis_model: String,
    pub game_version: String,

    /// `join_date join_time` from the record, best effort.
    pub join_from_file: String,
    /// `leave_date leave_time` from the record, best effort.
    pub leave_from_file: String,

    pub kills: i64,
    pub deaths: i64,
    pub kdr: f64,
    pub headshots: i64,
    pub damage: i64,
    pub melts: i64,
    pub total_play_time: String,
}

impl PlayerSnapshot {
    /// Build a snapshot from a parsed record. Missing sections and keys
    /// fall back to empty/zero values; the record format is best effort.
    pub fn from_doc(key: &str, doc: &SnapshotDoc) -> Self {
        let userinfo = doc.get("userinfo");
        let session = doc.get("session");
        let combat = doc.get("combat");
        let body_locations = doc.get("body_locations");
        let freeze_tag = doc.get("freeze_tag");

        let name = get_display(userinfo, "name");
        let connection_state = get_display(userinfo, "connection_state");

        Self {
            key: key.to_string(),
            name: if name.is_empty() { key.to_string() } else { name },
            connected: connection_state.eq_ignore_ascii_case("connected"),
            play_count: get_i64(session, "number_of_times_played"),

            ip: get_display(userinfo, "ip"),
            rate: get_display(userinfo, "rate"),
            snaps: get_display(userinfo, "snaps"),
            ping: get_display(userinfo, "ping"),
            allies_model: get_display(userinfo, "allies_model"),
            axis_model: get_display(userinfo, "axis_model"),
            game_version: get_display(userinfo, "game_version"),

            join_from_file: join_date_time(session, "join_date", "join_time"),
            leave_from_file: join_date_time(session, "leave_date", "leave_time"),

            kills: get_i64(combat, "kills"),
            deaths: get_i64(combat, "deaths"),
            kdr: get_f64(combat, "kdr"),
            headshots: get_i64(body_locations, "headshots"),
            damage: get_i64(combat, "damage"),
            melts: get_i64(freeze_tag, "melts"),
            total_play_time: get_display(session, "total_play_time"),
        }
    }
}

fn get<'a>(section: Option<&'a Section>, key: &str) -> Option<&'a Value> {
    section.and_then(|s| s.get(key))
}

fn get_display(section: Option<&Section>, key: &str) -> String {
    get(section, key).map(|v| v.display()).unwrap_or_default()
}

fn get_i64(section: Option<&Section>, key: &str) -> i64 {
    get(section, key).and_then(|v| v.as_i64()).unwrap_or(0)
}

fn get_f64(section: Option<&Section>, key: &str) -> f64 {
    get(section, key).and_then(|v| v.as_f64()).unwrap_or(0.0)
}

fn join_date_time(section: Option<&Section>, date_key: &str, time_key: &str) -> String {
    let date = get_display(section, date_key);
    let time = get_display(section, time_key);
    [date, time]
        .iter()
        .filter(|p| !p.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_snapshot;

    const RECORD: &str = "\
[userinfo]
name = Falcon
connection_state = connected
ip = 10.0.0.7:12203
rate = 25000
snaps = 20
ping = 48
allies_model = allied_airborne
axis_model = german_wehrmacht_soldier
game_version = 1.12

[session]
join_date = 12.03.2026
join_time = 18:45:02
total_play_time = 41:12:09
number_of_times_played = 17

[combat]
kills = 812
deaths = 593
kdr = 1.37
damage = 120455

[body_locations]
headshots = 199

[freeze_tag]
melts = 44
";

    #[test]
    fn builds_full_snapshot_from_record() {
        let doc = parse_snapshot(RECORD);
        let snap = PlayerSnapshot::from_doc("falcon", &doc);

        assert_eq!(snap.key, "falcon");
        assert_eq!(snap.name, "Falcon");
        assert!(snap.connected);
        assert_eq!(snap.play_count, 17);
        assert_eq!(snap.rate, "25000");
        assert_eq!(snap.join_from_file, "12.03.2026 18:45:02");
        assert_eq!(snap.leave_from_file, "");
        assert_eq!(snap.kills, 812);
        assert_eq!(snap.kdr, 1.37);
        assert_eq!(snap.headshots, 199);
        assert_eq!(snap.melts, 44);
        assert_eq!(snap.total_play_time, "41:12:09");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let doc = parse_snapshot("[userinfo]\nconnection_state = disconnected\n");
        let snap = PlayerSnapshot::from_doc("ghost", &doc);

        assert_eq!(snap.name, "ghost");
        assert!(!snap.connected);
        assert_eq!(snap.play_count, 0);
        assert_eq!(snap.kills, 0);
        assert_eq!(snap.join_from_file, "");
    }
}
