//! Error types for the generation CLI.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::error::GenerationError;

/// Errors surfaced by the CLI parsing and generation flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// A flag expected a value but none was provided.
    #[error("missing value for {flag}")]
    MissingValue {
        /// Flag that was missing its value.
        flag: &'static str,
    },
    /// An unsupported argument was supplied.
    #[error("unknown argument: {value}")]
    UnknownArgument {
        /// Argument value that was not recognised.
        value: String,
    },
    /// A numeric value failed to parse.
    #[error("invalid number for {flag}: '{value}' ({message})")]
    InvalidNumber {
        /// Flag associated with the invalid number.
        flag: &'static str,
        /// Raw value supplied for the flag.
        value: String,
        /// Parser error message.
        message: String,
    },
    /// The requested count exceeds what the CLI will generate in one run.
    #[error("--count {count} exceeds the maximum of {max}")]
    CountTooLarge {
        /// Requested count.
        count: usize,
        /// Maximum accepted count.
        max: usize,
    },
    /// The envelope could not be serialised.
    #[error("failed to serialise envelope: {message}")]
    SerializeError {
        /// Serialiser error message.
        message: String,
    },
    /// The output file could not be written.
    #[error("failed to write output file at '{path}': {message}")]
    WriteError {
        /// Output path.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },
    /// Dataset loading or record generation failed.
    #[error("generation failed: {source}")]
    Generation {
        /// Underlying generation error.
        #[from]
        #[source]
        source: GenerationError,
    },
}
