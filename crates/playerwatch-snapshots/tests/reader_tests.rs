use std::fs;

use playerwatch_snapshots::SnapshotReader;
use tempfile::TempDir;

fn write_record(dir: &TempDir, key: &str, connection_state: &str, kills: i64) {
    let content = format!(
        "[userinfo]\nname = {key}\nconnection_state = {connection_state}\n\n\
         [combat]\nkills = {kills}\n\n\
         [session]\nnumber_of_times_played = 1\n"
    );
    fs::write(dir.path().join(format!("{key}.txt")), content).unwrap();
}

#[test]
fn reads_all_eligible_records() {
    let dir = TempDir::new().unwrap();
    write_record(&dir, "alice", "connected", 10);
    write_record(&dir, "bob", "disconnected", 3);
    fs::write(dir.path().join("notes.md"), "not a record").unwrap();
    fs::write(dir.path().join("server.cfg"), "irrelevant").unwrap();

    let mut reader = SnapshotReader::new(dir.path());
    let snapshots = reader.read_all().unwrap();

    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0].key, "alice");
    assert!(snapshots[0].connected);
    assert_eq!(snapshots[1].key, "bob");
    assert!(!snapshots[1].connected);
    assert_eq!(snapshots[1].kills, 3);
}

#[test]
fn unchanged_mtime_reuses_cached_parse() {
    let dir = TempDir::new().unwrap();
    write_record(&dir, "alice", "connected", 10);
    let path = dir.path().join("alice.txt");

    let mut reader = SnapshotReader::new(dir.path());
    let first = reader.read_all().unwrap();
    assert_eq!(first[0].kills, 10);

    let mtime = fs::metadata(&path).unwrap().modified().unwrap();

    // Rewrite the file but pin the old mtime: the reader must serve the
    // cached snapshot without re-parsing.
    write_record(&dir, "alice", "connected", 99);
    let file = fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_modified(mtime).unwrap();
    drop(file);

    let cached = reader.read_all().unwrap();
    assert_eq!(cached[0].kills, 10);

    // Bump the mtime forward and the new content is picked up.
    let file = fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_modified(mtime + std::time::Duration::from_secs(5)).unwrap();
    drop(file);

    let fresh = reader.read_all().unwrap();
    assert_eq!(fresh[0].kills, 99);
}

#[test]
fn missing_directory_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let mut reader = SnapshotReader::new(&missing);
    assert!(reader.read_all().is_err());
    assert!(reader.player_keys().is_err());
}

#[test]
fn read_one_returns_none_for_unknown_player() {
    let dir = TempDir::new().unwrap();
    write_record(&dir, "alice", "connected", 1);

    let reader = SnapshotReader::new(dir.path());
    assert!(reader.read_one("alice").unwrap().is_some());
    assert!(reader.read_one("nobody").unwrap().is_none());
}

#[test]
fn player_keys_lists_stems_sorted() {
    let dir = TempDir::new().unwrap();
    write_record(&dir, "zeta", "connected", 0);
    write_record(&dir, "alpha", "connected", 0);

    let reader = SnapshotReader::new(dir.path());
    assert_eq!(reader.player_keys().unwrap(), vec!["alpha", "zeta"]);
}
