//! Errors raised while preparing the service before it binds.

use pinoy_gen::{DatasetError, GenerationError};
use thiserror::Error;

/// Errors returned while loading settings and building the generator.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Settings could not be loaded or parsed.
    #[error("failed to load configuration: {message}")]
    Config {
        /// Loader failure description.
        message: String,
    },
    /// The reference dataset failed to load or validate.
    #[error("failed to load reference dataset: {0}")]
    Dataset(#[from] DatasetError),
    /// Generator settings were rejected.
    #[error("invalid generator settings: {0}")]
    Generation(#[from] GenerationError),
}
