use std::fmt;
use serde::{Deserialize, Serialize};

/// Static description of an emulated platform. Loaded once at startup and
/// never mutated afterwards.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct SystemDefinition {
    pub id: String,
    pub name: String,
    pub full_name: String,
    /// Accepted ROM file suffixes, with the leading dot. Matching is
    /// case-insensitive regardless of how they are written here.
    pub extensions: Vec<String>,
    /// Core file stem without the platform library extension.
    pub core: String,
    /// Subdirectory under the ROMs root holding this system's files.
    pub folder: String,
}

impl SystemDefinition {
    pub fn new<S: Into<String>>(id: S, name: S, full_name: S, extensions: Vec<S>, core: S, folder: S) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            full_name: full_name.into(),
            extensions: extensions.into_iter().map(|e| e.into()).collect(),
            core: core.into(),
            folder: folder.into(),
        }
    }

    pub fn matches_extension(&self, extension: &str) -> bool {
        self.extensions.iter().any(|accepted| {
            accepted.eq_ignore_ascii_case(extension)
        })
    }
}

impl fmt::Display for SystemDefinition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.id, self.full_name, self.extensions.join(", "))
    }
}
