use std::fmt;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// One ROM file found on disk. Records are rebuilt on every scan; the id is
/// derived from the system and file name so a rescan of an unchanged file
/// yields the same id.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: String,
    pub title: String,
    pub file_name: String,
    pub path: PathBuf,
    pub system_id: String,
    /// The matched suffix, verbatim from disk (case preserved).
    pub extension: String,
}

impl GameRecord {
    pub fn game_id(system_id: &str, file_stem: &str) -> String {
        format!("{}_{}", system_id, file_stem)
    }
}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.file_name)
    }
}
