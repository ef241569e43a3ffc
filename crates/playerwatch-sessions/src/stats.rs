use serde::Serialize;

use playerwatch_snapshots::PlayerSnapshot;

/// One row of the player statistics table.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerOverview {
    pub key: String,
    pub name: String,
    pub kills: i64,
    pub deaths: i64,
    pub kdr: f64,
    pub headshots: i64,
    pub damage: i64,
    pub melts: i64,
    pub total_play_time: String,
}

/// Recompute the statistics table from the current snapshots, sorted by
/// kills descending. Pure and idempotent; carries no state between calls.
pub fn aggregate(snapshots: &[PlayerSnapshot]) -> Vec<PlayerOverview> {
    let mut table: Vec<PlayerOverview> = snapshots
        .iter()
        .map(|snap| PlayerOverview {
            key: snap.key.clone(),
            name: snap.name.clone(),
            kills: snap.kills,
            deaths: snap.deaths,
            kdr: snap.kdr,
            headshots: snap.headshots,
            damage: snap.damage,
            melts: snap.melts,
            total_play_time: snap.total_play_time.clone(),
        })
        .collect();

    table.sort_by(|a, b| b.kills.cmp(&a.kills).then_with(|| a.key.cmp(&b.key)));
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use playerwatch_snapshots::parser::parse_snapshot;

    fn snap(key: &str, kills: i64) -> PlayerSnapshot {
        let doc = parse_snapshot(&format!(
            "[userinfo]\nname = {key}\n[combat]\nkills = {kills}\ndeaths = 2\nkdr = 0.5\n"
        ));
        PlayerSnapshot::from_doc(key, &doc)
    }

    #[test]
    fn sorts_by_kills_descending() {
        let table = aggregate(&[snap("low", 3), snap("high", 90), snap("mid", 40)]);
        let keys: Vec<&str> = table.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["high", "mid", "low"]);
    }

    #[test]
    fn ties_break_on_key_for_stable_output() {
        let table = aggregate(&[snap("b", 10), snap("a", 10)]);
        assert_eq!(table[0].key, "a");
        assert_eq!(table[1].key, "b");
    }

    #[test]
    fn empty_input_yields_empty_table() {
        assert!(aggregate(&[]).is_empty());
    }
}
