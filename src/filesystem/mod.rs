use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::catalog::SystemCatalog;

const EMULATOR_FOLDER: &str = "RetroArch";
const CACHE_FILE: &str = "library.json";

/// The portable-package layout: everything the front-end touches lives under
/// one base directory, so the whole tree can be moved or copied as a unit.
#[derive(Debug, Clone)]
pub struct AppPaths {
    base: PathBuf,
}

impl AppPaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn emulator_dir(&self) -> PathBuf {
        self.base.join("Emulators").join(EMULATOR_FOLDER)
    }

    pub fn emulator_exe(&self) -> PathBuf {
        self.emulator_dir().join(emulator_binary())
    }

    pub fn cores_dir(&self) -> PathBuf {
        self.emulator_dir().join("cores")
    }

    /// Resolves a core stem like `snes9x_libretro` to the platform's library
    /// file inside the cores directory.
    pub fn core_path(&self, core: &str) -> PathBuf {
        self.cores_dir().join(format!("{}{}", core, core_extension()))
    }

    pub fn core_file_name(&self, core: &str) -> String {
        format!("{}{}", core, core_extension())
    }

    pub fn bios_dir(&self) -> PathBuf {
        self.emulator_dir().join("system")
    }

    pub fn rom_root(&self) -> PathBuf {
        self.base.join("ROMs")
    }

    pub fn system_rom_dir(&self, folder: &str) -> PathBuf {
        self.rom_root().join(folder)
    }

    pub fn saves_dir(&self) -> PathBuf {
        self.base.join("Saves").join("saves")
    }

    pub fn states_dir(&self) -> PathBuf {
        self.base.join("Saves").join("states")
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.base.join("Screenshots")
    }

    pub fn snapshot_cache(&self) -> PathBuf {
        self.base.join(CACHE_FILE)
    }

    /// Creates the whole directory layout, including one ROM directory per
    /// catalog system. Safe to call on every start.
    pub fn ensure_layout(&self, catalog: &SystemCatalog) -> io::Result<()> {
        let mut dirs = vec![
            self.cores_dir(),
            self.bios_dir(),
            self.rom_root(),
            self.saves_dir(),
            self.states_dir(),
            self.screenshots_dir(),
        ];
        for system in catalog.all() {
            dirs.push(self.system_rom_dir(&system.folder));
        }

        for dir in dirs {
            if !dir.exists() {
                debug!("Creating {}", dir.display());
                fs::create_dir_all(&dir)?;
            }
        }

        Ok(())
    }
}

fn emulator_binary() -> &'static str {
    if cfg!(windows) {
        "retroarch.exe"
    } else {
        "retroarch"
    }
}

pub fn core_extension() -> &'static str {
    if cfg!(windows) {
        ".dll"
    } else if cfg!(target_os = "macos") {
        ".dylib"
    } else {
        ".so"
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::*;

    #[test]
    fn resolves_core_inside_cores_dir() {
        let paths = AppPaths::new("/tmp/emufe");
        let core = paths.core_path("snes9x_libretro");

        assert!(core.starts_with(paths.cores_dir()));
        let file_name = core.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("snes9x_libretro."));
    }

    #[test]
    fn ensure_layout_is_idempotent() -> Result<()> {
        let base = tempfile::tempdir()?;
        let paths = AppPaths::new(base.path());
        let catalog = SystemCatalog::builtin();

        paths.ensure_layout(&catalog)?;
        paths.ensure_layout(&catalog)?;

        assert!(paths.cores_dir().is_dir());
        assert!(paths.saves_dir().is_dir());
        assert!(paths.states_dir().is_dir());
        assert!(paths.screenshots_dir().is_dir());
        for system in catalog.all() {
            assert!(paths.system_rom_dir(&system.folder).is_dir());
        }

        Ok(())
    }
}
