use std::fs;

use log::debug;

use crate::data::models::game::GameRecord;
use crate::data::models::system::SystemDefinition;
use crate::error::ScanError;
use crate::filesystem::AppPaths;

/// Scans one system's ROM directory and turns matching files into records.
/// The scan is non-recursive on purpose: each system owns a single flat
/// folder and subdirectories are left alone.
#[derive(Debug, Clone)]
pub struct LibraryScanner {
    paths: AppPaths,
}

impl LibraryScanner {
    pub fn new(paths: AppPaths) -> Self {
        Self { paths }
    }

    /// A missing directory is a normal state: it is created and the scan
    /// reports an empty library for that system. Entries are processed in
    /// lexicographic file-name order so repeated scans are deterministic.
    pub fn scan_system(&self, system: &SystemDefinition) -> Result<Vec<GameRecord>, ScanError> {
        let dir = self.paths.system_rom_dir(&system.folder);
        if !dir.exists() {
            debug!("ROM directory {} missing, creating it", dir.display());
            fs::create_dir_all(&dir)?;
            return Ok(vec![]);
        }

        let entries = fs::read_dir(&dir).map_err(|e| {
            ScanError::UnreadableDirectory { path: dir.to_owned(), source: e }
        })?;

        let mut file_names = vec![];
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                file_names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        file_names.sort();

        let mut games = vec![];
        for file_name in file_names {
            let extension = extension_of(&file_name);
            if extension.is_empty() || !system.matches_extension(extension) {
                continue;
            }

            let stem = &file_name[..file_name.len() - extension.len()];
            games.push(GameRecord {
                id: GameRecord::game_id(&system.id, stem),
                title: clean_title(stem),
                file_name: file_name.to_owned(),
                path: dir.join(&file_name),
                system_id: system.id.to_owned(),
                extension: extension.to_owned(),
            });
        }

        debug!("Scanned {}: {} games", system.id, games.len());
        Ok(games)
    }
}

/// The suffix from the last dot to the end, case preserved. A name without a
/// dot has no extension and never matches anything.
pub fn extension_of(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(index) => &file_name[index..],
        None => "",
    }
}

/// Canonical display-title normalization, applied everywhere a title is
/// produced: drop bracketed or parenthesized tag groups, map `_` and `-` to
/// spaces, collapse whitespace runs. Falls back to the raw stem when the
/// rules would leave nothing (a name that is only tags).
pub fn clean_title(file_stem: &str) -> String {
    let mut cleaned = String::with_capacity(file_stem.len());
    let mut depth_paren = 0u32;
    let mut depth_bracket = 0u32;
    for c in file_stem.chars() {
        match c {
            '(' => depth_paren += 1,
            ')' => depth_paren = depth_paren.saturating_sub(1),
            '[' => depth_bracket += 1,
            ']' => depth_bracket = depth_bracket.saturating_sub(1),
            _ if depth_paren == 0 && depth_bracket == 0 => {
                if c == '_' || c == '-' {
                    cleaned.push(' ');
                } else {
                    cleaned.push(c);
                }
            }
            _ => {}
        }
    }

    let title = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        file_stem.to_string()
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use anyhow::Result;

    use super::*;
    use crate::catalog::SystemCatalog;

    fn snes() -> SystemDefinition {
        SystemDefinition::new("snes", "SNES", "Super Nintendo", vec![".smc", ".sfc"], "snes9x_libretro", "snes")
    }

    fn scanner_at(base: &std::path::Path) -> LibraryScanner {
        let paths = AppPaths::new(base);
        paths.ensure_layout(&SystemCatalog::builtin()).unwrap();
        LibraryScanner::new(paths)
    }

    #[test]
    fn extension_is_the_last_dot_segment() {
        assert_eq!(".smc", extension_of("Zelda.smc"));
        assert_eq!(".sfc", extension_of("some.game.sfc"));
        assert_eq!("", extension_of("README"));
        assert_eq!(".ZIP", extension_of("game.ZIP"));
    }

    #[test]
    fn cleans_region_tags_and_separators() {
        assert_eq!("Super Mario World", clean_title("Super_Mario-World"));
        assert_eq!("Zelda", clean_title("Zelda (USA) [!]"));
        assert_eq!("Metroid Fusion", clean_title("Metroid  Fusion (Europe) (En,Fr)"));
        assert_eq!("(USA)", clean_title("(USA)"));
    }

    #[test]
    fn matches_only_accepted_extensions() -> Result<()> {
        let base = tempfile::tempdir()?;
        let scanner = scanner_at(base.path());
        let rom_dir = base.path().join("ROMs").join("snes");
        File::create(rom_dir.join("Zelda.smc"))?;
        File::create(rom_dir.join("Notes.txt"))?;
        File::create(rom_dir.join("game.ZIP"))?;

        let games = scanner.scan_system(&snes())?;

        assert_eq!(1, games.len());
        assert_eq!("Zelda", games[0].title);
        assert_eq!(".smc", games[0].extension);
        assert_eq!("snes", games[0].system_id);
        assert_eq!(rom_dir.join("Zelda.smc"), games[0].path);

        Ok(())
    }

    #[test]
    fn extension_match_is_case_insensitive_and_verbatim() -> Result<()> {
        let base = tempfile::tempdir()?;
        let scanner = scanner_at(base.path());
        let rom_dir = base.path().join("ROMs").join("snes");
        File::create(rom_dir.join("Mario.SFC"))?;

        let games = scanner.scan_system(&snes())?;

        assert_eq!(1, games.len());
        assert_eq!(".SFC", games[0].extension);

        Ok(())
    }

    #[test]
    fn missing_directory_is_created_and_scan_is_empty() -> Result<()> {
        let base = tempfile::tempdir()?;
        let scanner = LibraryScanner::new(AppPaths::new(base.path()));

        let games = scanner.scan_system(&snes())?;

        assert!(games.is_empty());
        assert!(base.path().join("ROMs").join("snes").is_dir());

        Ok(())
    }

    #[test]
    fn subdirectories_are_not_descended_into() -> Result<()> {
        let base = tempfile::tempdir()?;
        let scanner = scanner_at(base.path());
        let rom_dir = base.path().join("ROMs").join("snes");
        fs::create_dir(rom_dir.join("nested.smc"))?;
        fs::create_dir(rom_dir.join("more"))?;
        File::create(rom_dir.join("more").join("Hidden.smc"))?;
        File::create(rom_dir.join("Top.smc"))?;

        let games = scanner.scan_system(&snes())?;

        assert_eq!(1, games.len());
        assert_eq!("Top", games[0].title);

        Ok(())
    }

    #[test]
    fn unreadable_directory_keeps_the_io_cause() -> Result<()> {
        use std::error::Error;

        let base = tempfile::tempdir()?;
        let scanner = scanner_at(base.path());
        let rom_dir = base.path().join("ROMs").join("snes");
        fs::remove_dir(&rom_dir)?;
        File::create(&rom_dir)?;

        let result = scanner.scan_system(&snes());

        match result {
            Err(e @ ScanError::UnreadableDirectory { .. }) => {
                assert!(e.to_string().contains("snes"));
                assert!(e.source().is_some());
            }
            other => panic!("expected UnreadableDirectory, got {:?}", other),
        }

        Ok(())
    }

    #[test]
    fn rescan_yields_identical_ids_in_sorted_order() -> Result<()> {
        let base = tempfile::tempdir()?;
        let scanner = scanner_at(base.path());
        let rom_dir = base.path().join("ROMs").join("snes");
        File::create(rom_dir.join("b game.sfc"))?;
        File::create(rom_dir.join("A game.smc"))?;

        let first = scanner.scan_system(&snes())?;
        let second = scanner.scan_system(&snes())?;

        let first_ids: Vec<_> = first.iter().map(|g| g.id.clone()).collect();
        let second_ids: Vec<_> = second.iter().map(|g| g.id.clone()).collect();
        assert_eq!(first_ids, second_ids);
        assert_eq!("snes_A game", first[0].id);
        assert_eq!("snes_b game", first[1].id);

        Ok(())
    }
}
