use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::game::GameRecord;

/// A per-system problem found during a scan. Warnings never abort the scan
/// that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    pub system_id: String,
    pub message: String,
}

/// Immutable aggregate of one full scan pass. A refresh always builds a new
/// snapshot and publishes it whole; nothing mutates a snapshot after that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    pub scan_id: u64,
    pub scanned_at: DateTime<Utc>,
    games: HashMap<String, Vec<GameRecord>>,
    pub warnings: Vec<ScanWarning>,
}

impl LibrarySnapshot {
    pub fn new(scan_id: u64) -> Self {
        Self {
            scan_id,
            scanned_at: Utc::now(),
            games: HashMap::new(),
            warnings: vec![],
        }
    }

    pub(crate) fn set_games(&mut self, system_id: String, games: Vec<GameRecord>) {
        self.games.insert(system_id, games);
    }

    pub(crate) fn add_warning(&mut self, system_id: String, message: String) {
        self.warnings.push(ScanWarning { system_id, message });
    }

    /// Discovery order of the games, as produced by the scanner. Unknown
    /// systems yield an empty slice, same as a scanned-but-empty one.
    pub fn games_for(&self, system_id: &str) -> &[GameRecord] {
        self.games.get(system_id).map(|games| games.as_slice()).unwrap_or(&[])
    }

    pub fn count_for(&self, system_id: &str) -> usize {
        self.games_for(system_id).len()
    }

    pub fn counts_by_system(&self) -> HashMap<String, usize> {
        self.games.iter().map(|(system_id, games)| {
            (system_id.to_owned(), games.len())
        }).collect()
    }

    pub fn total_games(&self) -> usize {
        self.games.values().map(|games| games.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn record(system_id: &str, file_name: &str) -> GameRecord {
        let stem = file_name.rsplitn(2, '.').last().unwrap_or(file_name);
        GameRecord {
            id: GameRecord::game_id(system_id, stem),
            title: stem.to_string(),
            file_name: file_name.to_string(),
            path: PathBuf::from(file_name),
            system_id: system_id.to_string(),
            extension: ".nes".to_string(),
        }
    }

    #[test]
    fn counts_match_game_lists() {
        let mut snapshot = LibrarySnapshot::new(1);
        snapshot.set_games("nes".to_string(), vec![record("nes", "a.nes"), record("nes", "b.nes")]);
        snapshot.set_games("gb".to_string(), vec![]);

        let counts = snapshot.counts_by_system();
        assert_eq!(Some(&2), counts.get("nes"));
        assert_eq!(Some(&0), counts.get("gb"));
        assert_eq!(2, snapshot.games_for("nes").len());
        assert_eq!(2, snapshot.total_games());
    }

    #[test]
    fn unknown_system_is_empty_not_an_error() {
        let snapshot = LibrarySnapshot::new(1);
        assert!(snapshot.games_for("whatever").is_empty());
        assert_eq!(0, snapshot.count_for("whatever"));
    }
}
