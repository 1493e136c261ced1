use std::fmt;
use serde::{Deserialize, Serialize};

/// Best-effort descriptive data for a title. Enrichment failures produce a
/// fallback-marked record instead of an error; the launch path never waits
/// on this.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub description: String,
    pub release_date: String,
    pub genre: String,
    pub fallback: bool,
}

impl GameMetadata {
    pub fn unavailable(title: &str) -> Self {
        Self {
            description: format!("Could not fetch description for {}.", title),
            release_date: "N/A".to_string(),
            genre: "N/A".to_string(),
            fallback: true,
        }
    }
}

impl fmt::Display for GameMetadata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} | {} | {}", self.genre, self.release_date, self.description)
    }
}
