mod macros;
pub mod catalog;
pub mod data;
pub mod error;
pub mod filesystem;
pub mod launcher;
pub mod metadata;
pub mod registry;
pub mod scanner;
pub mod sysout;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use log::warn;

use crate::catalog::SystemCatalog;
use crate::data::models::game::GameRecord;
use crate::data::models::metadata::GameMetadata;
use crate::data::models::snapshot::LibrarySnapshot;
use crate::error::EmuFeError;
use crate::filesystem::AppPaths;
use crate::launcher::LaunchOrchestrator;
use crate::metadata::{MetadataProvider, OfflineMetadataProvider};
use crate::registry::{GameRegistry, ScanReporter};

/// High-level entry point the presentation layer talks to. One instance per
/// portable package base directory.
pub struct EmuFe {
    paths: AppPaths,
    registry: GameRegistry,
    orchestrator: LaunchOrchestrator,
    metadata: Box<dyn MetadataProvider>,
}

impl EmuFe {
    /// Opens the package at `base` with the builtin system catalog,
    /// creating the directory layout when needed.
    pub fn new(base: impl Into<PathBuf>) -> Result<Self> {
        Self::build(AppPaths::new(base), SystemCatalog::builtin())
    }

    /// Same, with a user catalog loaded from a JSON file.
    pub fn with_catalog_file(base: impl Into<PathBuf>, catalog_file: &impl AsRef<Path>) -> Result<Self> {
        Self::build(AppPaths::new(base), SystemCatalog::from_file(catalog_file)?)
    }

    fn build(paths: AppPaths, catalog: SystemCatalog) -> Result<Self> {
        let catalog = Arc::new(catalog);
        paths.ensure_layout(&catalog)?;

        Ok(Self {
            registry: GameRegistry::new(Arc::clone(&catalog), paths.clone()),
            orchestrator: LaunchOrchestrator::new(catalog, paths.clone()),
            paths,
            metadata: Box::new(OfflineMetadataProvider),
        })
    }

    pub fn set_metadata_provider(&mut self, provider: Box<dyn MetadataProvider>) {
        self.metadata = provider;
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn catalog(&self) -> &SystemCatalog {
        self.registry.catalog()
    }

    pub fn refresh(&self) -> Arc<LibrarySnapshot> {
        self.registry.refresh()
    }

    pub fn refresh_with(&self, reporter: &dyn ScanReporter) -> Arc<LibrarySnapshot> {
        self.registry.refresh_with(reporter)
    }

    /// The cached snapshot from a previous session when one is readable,
    /// otherwise a fresh scan. An unreadable cache is only worth a warning.
    pub fn load_or_refresh(&self) -> Arc<LibrarySnapshot> {
        match self.registry.load_cache() {
            Ok(true) => self.registry.snapshot(),
            Ok(false) => self.registry.refresh(),
            Err(e) => {
                warn!("Ignoring snapshot cache: {}", e);
                self.registry.refresh()
            }
        }
    }

    pub fn save_cache(&self) -> Result<()> {
        self.registry.save_cache()
    }

    pub fn snapshot(&self) -> Arc<LibrarySnapshot> {
        self.registry.snapshot()
    }

    /// Games of one system from the latest snapshot. Unknown system ids are
    /// a `SystemNotFound`, an empty library is an empty list.
    pub fn games(&self, system_id: &str) -> Result<Vec<GameRecord>, EmuFeError> {
        if self.catalog().lookup(system_id).is_none() {
            return Err(EmuFeError::SystemNotFound(system_id.to_string()));
        }

        Ok(self.registry.games_for(system_id))
    }

    /// Game counts per system from the latest snapshot; a system with an
    /// empty library counts as 0, it is never dropped from the mapping.
    pub fn counts(&self) -> HashMap<String, usize> {
        self.registry.counts_by_system()
    }

    /// Finds a game by id, normalized title or file name, case-insensitive.
    pub fn find_game(&self, system_id: &str, name: &str) -> Result<GameRecord> {
        let games = self.games(system_id)?;
        let found = games.into_iter().find(|game| {
            game.id.eq_ignore_ascii_case(name)
                || game.title.eq_ignore_ascii_case(name)
                || game.file_name.eq_ignore_ascii_case(name)
        });

        match found {
            Some(game) => Ok(game),
            None => crate::err!(format!("Game `{}` not found for system `{}`. Try rescanning the library.", name, system_id)),
        }
    }

    pub fn launch(&self, game: &GameRecord) -> Result<(), EmuFeError> {
        self.orchestrator.launch(game)
    }

    pub fn installed_cores(&self) -> Vec<String> {
        self.orchestrator.installed_cores()
    }

    /// Best-effort descriptive data for a title; see `MetadataProvider`.
    pub fn metadata_for(&self, game: &GameRecord) -> GameMetadata {
        let system_name = self.catalog().lookup(&game.system_id).map(|system| system.full_name.as_str());
        self.metadata.enrich(&game.title, system_name)
    }
}
