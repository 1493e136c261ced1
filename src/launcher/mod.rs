use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use log::{info, warn};

use crate::catalog::SystemCatalog;
use crate::data::models::game::GameRecord;
use crate::error::EmuFeError;
use crate::filesystem::{core_extension, AppPaths};

/// Seam to the external process spawner. The orchestrator builds the argv
/// and hands it over; it does no process management of its own.
pub trait ProcessLauncher {
    fn launch(&self, program: &Path, args: &[OsString]) -> Result<(), EmuFeError>;
}

/// Spawns the emulator and waits for it, mapping a failed spawn or a
/// non-success exit to `LaunchFailed`. The argv is passed as separate
/// arguments, so paths with spaces need no quoting.
pub struct SystemProcessLauncher;

impl ProcessLauncher for SystemProcessLauncher {
    fn launch(&self, program: &Path, args: &[OsString]) -> Result<(), EmuFeError> {
        let status = Command::new(program).args(args).status().map_err(|e| {
            EmuFeError::LaunchFailed { message: e.to_string() }
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(EmuFeError::LaunchFailed {
                message: format!("emulator exited with {}", status)
            })
        }
    }
}

/// Single-shot launch of one game: resolve the system, check the emulator
/// and core are on disk, build the invocation, delegate. No queue, no retry.
pub struct LaunchOrchestrator {
    catalog: Arc<SystemCatalog>,
    paths: AppPaths,
    launcher: Box<dyn ProcessLauncher>,
}

impl LaunchOrchestrator {
    pub fn new(catalog: Arc<SystemCatalog>, paths: AppPaths) -> Self {
        Self::with_launcher(catalog, paths, Box::new(SystemProcessLauncher))
    }

    pub fn with_launcher(catalog: Arc<SystemCatalog>, paths: AppPaths, launcher: Box<dyn ProcessLauncher>) -> Self {
        Self { catalog, paths, launcher }
    }

    pub fn launch(&self, game: &GameRecord) -> Result<(), EmuFeError> {
        let system = self.catalog.lookup(&game.system_id).ok_or_else(|| {
            EmuFeError::UnknownSystem {
                game: game.title.to_owned(),
                system_id: game.system_id.to_owned(),
            }
        })?;

        let emulator = self.paths.emulator_exe();
        if !emulator.exists() {
            return Err(EmuFeError::EmulatorMissing { path: emulator });
        }

        let core = self.paths.core_path(&system.core);
        if !core.exists() {
            return Err(EmuFeError::CoreMissing {
                core: self.paths.core_file_name(&system.core),
                path: core,
            });
        }

        let args = vec![
            OsString::from("-L"),
            core.clone().into_os_string(),
            game.path.clone().into_os_string(),
        ];
        info!("Launching {} ({}) with core {}", game.title, system.full_name, core.display());

        self.launcher.launch(&emulator, &args)
    }

    /// The core files currently present on disk, by file name. A missing or
    /// unreadable cores directory is an empty list, not an error.
    pub fn installed_cores(&self) -> Vec<String> {
        let cores_dir = self.paths.cores_dir();
        let entries = match fs::read_dir(&cores_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot read cores directory {}: {}", cores_dir.display(), e);
                return vec![];
            }
        };

        let mut cores = entries.filter_map(|entry| {
            let file_name = entry.ok()?.file_name().to_string_lossy().to_string();
            if file_name.ends_with(core_extension()) {
                Some(file_name)
            } else {
                None
            }
        }).collect::<Vec<_>>();
        cores.sort();

        cores
    }
}
