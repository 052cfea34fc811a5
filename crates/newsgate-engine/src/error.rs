use newsgate_core::{CategoryTag, ConfigError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A profile could not be compiled. Always fatal, raised before any
    /// record is classified.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A batch or lookup named a category with no loaded profile.
    #[error("no profile loaded for category '{0}'")]
    UnknownCategory(CategoryTag),
}
