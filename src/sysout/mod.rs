use std::sync::atomic::{AtomicUsize, Ordering};

use indicatif::{ProgressBar, ProgressStyle};

use crate::data::models::snapshot::LibrarySnapshot;
use crate::data::models::system::SystemDefinition;
use crate::registry::ScanReporter;

#[derive(Debug)]
pub struct ScanReporterSysOut {
    progress_bar: ProgressBar,
    games: AtomicUsize,
}

impl ScanReporterSysOut {
    pub fn new(total_systems: u64) -> Self {
        let progress_bar = ProgressBar::new(total_systems);
        progress_bar.set_style(ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.green/blue}] {pos}/{len} systems | {msg}")
            .progress_chars("#>-"));
        Self { progress_bar, games: AtomicUsize::new(0) }
    }
}

impl ScanReporter for ScanReporterSysOut {
    fn on_system_scanned(&self, system: &SystemDefinition, games: usize) {
        let total = self.games.fetch_add(games, Ordering::SeqCst) + games;

        self.progress_bar.inc(1);
        self.progress_bar.set_message(&format!("{}: {} games, #{} total", system.id, games, total));
    }

    fn finish(&self, snapshot: &LibrarySnapshot) {
        self.progress_bar.finish_with_message(&format!("Total games #{}", snapshot.total_games()));
    }
}
