//! Applies harvested environment values onto a loaded config.

use super::store::ConfigMap;

/// What a merge changed, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub sections_created: usize,
    pub keys_added: usize,
    pub keys_updated: usize,
    pub keys_unchanged: usize,
}

impl MergeStats {
    pub fn changed(&self) -> bool {
        self.sections_created + self.keys_added + self.keys_updated > 0
    }
}

/// Writes every `overlay` entry into `base`, creating sections on demand.
///
/// Add-or-overwrite only: sections and keys that exist solely in `base` are
/// never removed.
pub fn merge(base: &mut ConfigMap, overlay: ConfigMap) -> MergeStats {
    let mut stats = MergeStats::default();

    for (section, entries) in overlay.into_sections() {
        tracing::debug!(%section, "processing section");
        if !base.contains_section(&section) {
            stats.sections_created += 1;
        }
        let target = base.section_mut(&section);

        for (key, value) in entries {
            tracing::debug!(%section, %key, %value, "setting config value");
            match target.insert(key, value.clone()) {
                None => stats.keys_added += 1,
                Some(previous) if previous == value => stats.keys_unchanged += 1,
                Some(_) => stats.keys_updated += 1,
            }
        }
    }

    stats
}
