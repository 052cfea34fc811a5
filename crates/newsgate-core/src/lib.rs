//! Shared domain types and configuration for newsgate.
//!
//! Holds the record model that flows through the classification engine,
//! the category profile schema loaded from `profiles.yaml`, and the
//! environment-driven application config.

pub mod app_config;
pub mod config;
pub mod profiles;
pub mod records;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use profiles::{
    load_profiles, parse_profiles, Acceptance, CategoryProfile, ContextLexicon, DedupDefaults,
    DedupMethod, DedupSettings, DedupStrategy, MatchScope, ProfilesFile,
};
pub use records::{
    CandidateBatch, CandidateRecord, CategoryTag, ClassifiedRecord, Importance, TimeWindow,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read profiles file {path}: {source}")]
    ProfilesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profiles file: {0}")]
    ProfilesFileParse(#[from] serde_yaml::Error),

    #[error("profile validation failed: {0}")]
    Validation(String),

    #[error("category '{category}' has an invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        category: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
