use std::path::PathBuf;

use crate::profiles::DedupDefaults;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub profiles_path: PathBuf,
    /// Veto medium-tier accepts that match a sibling category's shadow lexicon.
    pub shadow_suppression: bool,
    pub dedup_min_common: usize,
    pub dedup_ratio_threshold: f64,
    /// Maximum snippet length, in characters, accepted from input files.
    pub snippet_limit: usize,
}

impl AppConfig {
    #[must_use]
    pub fn dedup_defaults(&self) -> DedupDefaults {
        DedupDefaults {
            min_common: self.dedup_min_common,
            ratio_threshold: self.dedup_ratio_threshold,
        }
    }
}
