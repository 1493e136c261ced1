use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::sync::{Arc, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use log::{info, warn};
use rayon::prelude::*;

use crate::catalog::SystemCatalog;
use crate::data::models::game::GameRecord;
use crate::data::models::snapshot::LibrarySnapshot;
use crate::data::models::system::SystemDefinition;
use crate::filesystem::AppPaths;
use crate::scanner::LibraryScanner;

/// Progress callbacks for a refresh. Scans may run in parallel, so
/// implementations are called from multiple threads.
pub trait ScanReporter: Sync {
    fn on_system_scanned(&self, _system: &SystemDefinition, _games: usize) {}
    fn finish(&self, _snapshot: &LibrarySnapshot) {}
}

pub struct SilentReporter;

impl ScanReporter for SilentReporter {}

/// Aggregates per-system scans into one snapshot and owns the single shared
/// reference to the latest one. Publication is a whole-value swap; readers
/// never see a snapshot that is still being assembled.
pub struct GameRegistry {
    catalog: Arc<SystemCatalog>,
    scanner: LibraryScanner,
    paths: AppPaths,
    current: RwLock<Arc<LibrarySnapshot>>,
    next_scan_id: AtomicU64,
}

impl GameRegistry {
    pub fn new(catalog: Arc<SystemCatalog>, paths: AppPaths) -> Self {
        Self {
            catalog,
            scanner: LibraryScanner::new(paths.clone()),
            paths,
            current: RwLock::new(Arc::new(LibrarySnapshot::new(0))),
            next_scan_id: AtomicU64::new(0),
        }
    }

    pub fn refresh(&self) -> Arc<LibrarySnapshot> {
        self.refresh_with(&SilentReporter)
    }

    /// Scans every catalog system and publishes the assembled snapshot. A
    /// failing system contributes an empty slot plus a warning; it never
    /// aborts the other systems.
    pub fn refresh_with(&self, reporter: &dyn ScanReporter) -> Arc<LibrarySnapshot> {
        let scan_id = self.next_scan_id.fetch_add(1, Ordering::SeqCst) + 1;

        let results = self.catalog.all().par_iter().map(|system| {
            let result = self.scanner.scan_system(system);
            reporter.on_system_scanned(system, result.as_ref().map(|games| games.len()).unwrap_or(0));
            (system, result)
        }).collect::<Vec<_>>();

        let mut snapshot = LibrarySnapshot::new(scan_id);
        for (system, result) in results {
            match result {
                Ok(games) => {
                    snapshot.set_games(system.id.to_owned(), games);
                }
                Err(e) => {
                    warn!("Skipping system `{}`: {}", system.id, e);
                    snapshot.set_games(system.id.to_owned(), vec![]);
                    snapshot.add_warning(system.id.to_owned(), e.to_string());
                }
            }
        }

        let published = self.publish(Arc::new(snapshot));
        reporter.finish(&published);
        published
    }

    /// Swaps in the snapshot unless a newer one was published meanwhile;
    /// stale results are dropped, never overwrite a newer snapshot. Returns
    /// whatever is current after the attempt.
    fn publish(&self, snapshot: Arc<LibrarySnapshot>) -> Arc<LibrarySnapshot> {
        let mut current = self.current.write().expect("snapshot lock poisoned");
        if snapshot.scan_id >= current.scan_id {
            *current = snapshot;
        } else {
            info!("Dropping stale scan #{}, scan #{} is already published", snapshot.scan_id, current.scan_id);
        }

        Arc::clone(&current)
    }

    pub fn snapshot(&self) -> Arc<LibrarySnapshot> {
        Arc::clone(&self.current.read().expect("snapshot lock poisoned"))
    }

    pub fn games_for(&self, system_id: &str) -> Vec<GameRecord> {
        self.snapshot().games_for(system_id).to_vec()
    }

    pub fn counts_by_system(&self) -> HashMap<String, usize> {
        self.snapshot().counts_by_system()
    }

    /// Persists the current snapshot next to the library, the equivalent of
    /// the front-end keeping its last scan between sessions.
    pub fn save_cache(&self) -> Result<()> {
        let cache_path = self.paths.snapshot_cache();
        let file = File::create(&cache_path).with_context(|| {
            format!("Cannot write snapshot cache `{}`", cache_path.display())
        })?;
        serde_json::to_writer(BufWriter::new(file), &*self.snapshot())?;
        info!("Saved snapshot cache to {}", cache_path.display());

        Ok(())
    }

    /// Loads a previously saved snapshot, if any. The cached snapshot is
    /// re-tagged with scan id 0 so any fresh scan supersedes it.
    pub fn load_cache(&self) -> Result<bool> {
        let cache_path = self.paths.snapshot_cache();
        if !cache_path.exists() {
            return Ok(false);
        }

        let file = File::open(&cache_path).with_context(|| {
            format!("Cannot read snapshot cache `{}`", cache_path.display())
        })?;
        let mut snapshot: LibrarySnapshot = serde_json::from_reader(BufReader::new(file)).with_context(|| {
            format!("Cannot parse snapshot cache `{}`", cache_path.display())
        })?;
        snapshot.scan_id = 0;
        self.publish(Arc::new(snapshot));

        Ok(true)
    }

    pub fn catalog(&self) -> &SystemCatalog {
        &self.catalog
    }
}
