use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use crate::data::models::system::SystemDefinition;
use crate::error::EmuFeError;

/// Fixed table of supported systems. Built once at startup, read-only from
/// then on; there is no way to mutate a catalog.
#[derive(Debug, Clone)]
pub struct SystemCatalog {
    systems: Vec<SystemDefinition>,
}

impl SystemCatalog {
    /// The portable-package defaults, core stems matching the stock
    /// libretro distribution.
    pub fn builtin() -> Self {
        Self { systems: default_systems() }
    }

    pub fn new(systems: Vec<SystemDefinition>) -> Result<Self, EmuFeError> {
        let mut seen = HashSet::new();
        for system in &systems {
            if !seen.insert(system.id.as_str()) {
                return Err(EmuFeError::InvalidCatalog {
                    message: format!("duplicate system id `{}`", system.id)
                });
            }
            if system.extensions.is_empty() {
                return Err(EmuFeError::InvalidCatalog {
                    message: format!("system `{}` accepts no extensions", system.id)
                });
            }
        }

        Ok(Self { systems })
    }

    /// Loads a user-provided catalog, a JSON array of system definitions.
    pub fn from_file(path: &impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path).with_context(|| {
            format!("Cannot open catalog file `{}`", path.as_ref().display())
        })?;
        let systems: Vec<SystemDefinition> = serde_json::from_reader(BufReader::new(file)).with_context(|| {
            format!("Cannot parse catalog file `{}`", path.as_ref().display())
        })?;
        debug!("Loaded {} systems from {}", systems.len(), path.as_ref().display());

        Ok(Self::new(systems)?)
    }

    pub fn lookup(&self, system_id: &str) -> Option<&SystemDefinition> {
        self.systems.iter().find(|system| system.id == system_id)
    }

    pub fn all(&self) -> &[SystemDefinition] {
        &self.systems
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

fn default_systems() -> Vec<SystemDefinition> {
    vec![
        SystemDefinition::new("nes", "NES", "Nintendo Entertainment System",
            vec![".nes", ".zip"], "fceumm_libretro", "nes"),
        SystemDefinition::new("snes", "SNES", "Super Nintendo Entertainment System",
            vec![".smc", ".sfc", ".zip"], "snes9x_libretro", "snes"),
        SystemDefinition::new("genesis", "Genesis", "Sega Genesis / Mega Drive",
            vec![".md", ".gen", ".zip"], "genesis_plus_gx_libretro", "genesis"),
        SystemDefinition::new("mastersystem", "Master System", "Sega Master System",
            vec![".sms", ".zip"], "genesis_plus_gx_libretro", "mastersystem"),
        SystemDefinition::new("gb", "Game Boy", "Nintendo Game Boy",
            vec![".gb", ".zip"], "gambatte_libretro", "gb"),
        SystemDefinition::new("gbc", "Game Boy Color", "Nintendo Game Boy Color",
            vec![".gbc", ".zip"], "gambatte_libretro", "gbc"),
        SystemDefinition::new("gba", "Game Boy Advance", "Nintendo Game Boy Advance",
            vec![".gba", ".zip"], "mgba_libretro", "gba"),
        SystemDefinition::new("n64", "Nintendo 64", "Nintendo 64",
            vec![".n64", ".z64", ".v64", ".zip"], "mupen64plus_next_libretro", "n64"),
        SystemDefinition::new("psx", "PlayStation", "Sony PlayStation",
            vec![".cue", ".bin", ".img", ".pbp"], "pcsx_rearmed_libretro", "psx"),
        SystemDefinition::new("atari2600", "Atari 2600", "Atari 2600",
            vec![".a26", ".bin", ".zip"], "stella_libretro", "atari2600"),
        SystemDefinition::new("arcade", "Arcade", "Arcade (MAME)",
            vec![".zip"], "mame2003_plus_libretro", "arcade"),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::io::Write;

    use super::*;

    #[test]
    fn builtin_catalog_holds_its_invariants() {
        let catalog = SystemCatalog::builtin();
        assert!(!catalog.is_empty());

        let mut ids = HashSet::new();
        for system in catalog.all() {
            assert!(ids.insert(system.id.clone()), "duplicate id {}", system.id);
            assert!(!system.extensions.is_empty(), "{} has no extensions", system.id);
        }
    }

    #[test]
    fn lookup_finds_known_and_rejects_unknown() {
        let catalog = SystemCatalog::builtin();

        let snes = catalog.lookup("snes");
        assert!(snes.is_some());
        assert_eq!("snes9x_libretro", snes.unwrap().core);
        assert!(catalog.lookup("dreamcast").is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let systems = vec![
            SystemDefinition::new("nes", "NES", "NES", vec![".nes"], "fceumm_libretro", "nes"),
            SystemDefinition::new("nes", "NES again", "NES again", vec![".nes"], "fceumm_libretro", "nes2"),
        ];

        match SystemCatalog::new(systems) {
            Err(EmuFeError::InvalidCatalog { message }) => assert!(message.contains("nes")),
            other => panic!("expected InvalidCatalog, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn rejects_empty_extension_set() {
        let systems = vec![
            SystemDefinition::new("nes", "NES", "NES", vec![], "fceumm_libretro", "nes"),
        ];

        assert!(SystemCatalog::new(systems).is_err());
    }

    #[test]
    fn loads_catalog_from_json_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        let catalog = SystemCatalog::builtin();
        write!(file, "{}", serde_json::to_string(catalog.all())?)?;

        let loaded = SystemCatalog::from_file(&file.path())?;
        assert_eq!(catalog.len(), loaded.len());
        assert_eq!(Some("snes9x_libretro"), loaded.lookup("snes").map(|s| s.core.as_str()));

        Ok(())
    }
}
