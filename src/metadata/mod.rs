use crate::data::models::metadata::GameMetadata;

/// Contract for the enrichment collaborator. Implementations must come back
/// with a fallback-marked record on any failure; callers never handle an
/// error from this trait and never block a launch on it.
pub trait MetadataProvider {
    fn enrich(&self, title: &str, system_name: Option<&str>) -> GameMetadata;
}

/// The no-network provider shipped with the core. Always answers with the
/// fallback record; an AI-backed provider can substitute it behind the same
/// trait.
pub struct OfflineMetadataProvider;

impl MetadataProvider for OfflineMetadataProvider {
    fn enrich(&self, title: &str, _system_name: Option<&str>) -> GameMetadata {
        GameMetadata::unavailable(title)
    }
}
