use std::fs;

use chrono::{Local, TimeZone};
use playerwatch_sessions::{SessionLog, SessionRow, ONLINE};
use playerwatch_snapshots::PlayerSnapshot;
use tempfile::TempDir;

fn row(key: &str, play_count: i64) -> SessionRow {
    let snap = PlayerSnapshot {
        key: key.to_string(),
        name: key.to_string(),
        connected: true,
        play_count,
        ip: String::new(),
        rate: String::new(),
        snaps: String::new(),
        ping: String::new(),
        allies_model: String::new(),
        axis_model: String::new(),
        game_version: String::new(),
        join_from_file: String::new(),
        leave_from_file: String::new(),
        kills: 0,
        deaths: 0,
        kdr: 0.0,
        headshots: 0,
        damage: 0,
        melts: 0,
        total_play_time: String::new(),
    };
    let now = Local.with_ymd_and_hms(2026, 3, 12, 18, 0, 0).unwrap();
    SessionRow::open(&snap, &now)
}

#[test]
fn missing_file_loads_as_empty_log() {
    let dir = TempDir::new().unwrap();
    let log = SessionLog::load(dir.path().join("session_log.json"), 10).unwrap();
    assert!(log.is_empty());
    assert!(!log.is_dirty());
}

#[test]
fn cap_evicts_oldest_rows_from_the_tail() {
    let dir = TempDir::new().unwrap();
    let mut log = SessionLog::load(dir.path().join("session_log.json"), 3).unwrap();

    for i in 0..5 {
        log.push_front(row(&format!("player{}", i), i));
    }

    // Exactly the cap remains, and it is the newest three by insertion.
    assert_eq!(log.len(), 3);
    let keys: Vec<&str> = log.rows().iter().map(|r| r.player_key.as_str()).collect();
    assert_eq!(keys, vec!["player4", "player3", "player2"]);
}

#[test]
fn flush_coalesces_mutations_into_one_durable_write() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session_log.json");
    let mut log = SessionLog::load(&path, 10).unwrap();

    assert!(!log.flush_if_dirty().unwrap());
    assert!(!path.exists());

    log.push_front(row("alice", 1));
    log.push_front(row("bob", 1));
    let bob_id = log.rows()[0].id.clone();
    log.close_row(&bob_id, "12.03.2026 19:00:00".into());

    assert!(log.flush_if_dirty().unwrap());
    assert!(path.exists());
    // A second flush with nothing new writes nothing.
    assert!(!log.flush_if_dirty().unwrap());

    let reloaded = SessionLog::load(&path, 10).unwrap();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.rows()[0].player_key, "bob");
    assert!(!reloaded.rows()[0].is_open());
    assert_eq!(reloaded.rows()[1].leave, ONLINE);
}

#[test]
fn rehydrate_ignores_leftover_temp_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session_log.json");

    let mut log = SessionLog::load(&path, 10).unwrap();
    log.push_front(row("alice", 1));
    log.flush_if_dirty().unwrap();

    // Simulate a crash mid-write: a partial temp file next to a complete
    // target file. Rehydration must come from the target only.
    fs::write(path.with_extension("json.tmp"), "[{\"id\":\"partial").unwrap();

    let reloaded = SessionLog::load(&path, 10).unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.rows()[0].player_key, "alice");
}

#[test]
fn interrupted_first_write_leaves_no_log() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session_log.json");

    // Crash before the very first rename: only a temp file exists.
    fs::write(path.with_extension("json.tmp"), "garbage").unwrap();

    let log = SessionLog::load(&path, 10).unwrap();
    assert!(log.is_empty());
}

#[test]
fn load_applies_cap_to_oversized_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session_log.json");

    let mut log = SessionLog::load(&path, 10).unwrap();
    for i in 0..6 {
        log.push_front(row(&format!("p{}", i), i));
    }
    log.flush_if_dirty().unwrap();

    let reloaded = SessionLog::load(&path, 4).unwrap();
    assert_eq!(reloaded.len(), 4);
    // Newest-first order preserved; the tail was dropped.
    assert_eq!(reloaded.rows()[0].player_key, "p5");
    assert_eq!(reloaded.rows()[3].player_key, "p2");
}

#[test]
fn reset_clears_rows_and_persists_empty_array() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session_log.json");

    let mut log = SessionLog::load(&path, 10).unwrap();
    log.push_front(row("alice", 1));
    log.flush_if_dirty().unwrap();

    log.reset();
    assert!(log.is_empty());
    assert!(log.flush_if_dirty().unwrap());

    let content = fs::read_to_string(&path).unwrap();
    let rows: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn find_open_row_skips_closed_rows() {
    let dir = TempDir::new().unwrap();
    let mut log = SessionLog::load(dir.path().join("session_log.json"), 10).unwrap();

    log.push_front(row("alice", 1));
    let first_id = log.rows()[0].id.clone();
    log.close_row(&first_id, "12.03.2026 19:00:00".into());
    assert!(log.find_open_row("alice").is_none());

    log.push_front(row("alice", 2));
    let open = log.find_open_row("alice").unwrap();
    assert_ne!(open.id, first_id);
}

#[test]
fn update_row_reports_evicted_rows() {
    let dir = TempDir::new().unwrap();
    let mut log = SessionLog::load(dir.path().join("session_log.json"), 2).unwrap();

    log.push_front(row("alice", 1));
    let alice_id = log.rows()[0].id.clone();
    log.push_front(row("bob", 1));
    log.push_front(row("carol", 1));

    // Alice fell off the tail; mutating her row must report failure.
    assert!(!log.contains(&alice_id));
    assert!(!log.update_row(&alice_id, |r| r.name = "x".into()));
    assert!(!log.close_row(&alice_id, "t".into()));
}
