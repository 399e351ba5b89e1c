//! Error types for the pinoy-gen crate.
//!
//! This module defines semantic error enums for reference dataset loading and
//! record generation, following the project's error handling conventions with
//! `thiserror`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or validating a reference dataset.
///
/// Any of these is fatal at startup: a dataset that fails validation is never
/// handed to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    /// The dataset file could not be read.
    #[error("failed to read dataset file at '{path}': {message}")]
    IoError {
        /// Path to the dataset file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The dataset JSON is malformed or missing required fields.
    #[error("invalid dataset JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The dataset version is not supported.
    #[error("unsupported dataset version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the dataset.
        actual: u32,
    },

    /// A list required for generation is empty.
    #[error("dataset list '{list}' must not be empty")]
    EmptyList {
        /// Wire name of the empty list.
        list: &'static str,
    },

    /// A region has no cities to draw from.
    #[error("region '{region}' has no cities")]
    EmptyRegion {
        /// Name of the region without cities.
        region: String,
    },

    /// A list entry is empty or whitespace-only.
    #[error("blank entry in dataset list '{list}' at index {index}")]
    BlankEntry {
        /// Wire name of the list holding the blank entry.
        list: &'static str,
        /// Index of the blank entry within its list.
        index: usize,
    },

    /// A city entry has a blank name or postal code.
    #[error("blank city in region '{region}' at index {index}")]
    BlankCity {
        /// Name of the region holding the blank city.
        region: String,
        /// Index of the city within its region.
        index: usize,
    },

    /// A name keeps no letters or digits once reduced for an email address.
    #[error("name '{name}' in dataset list '{list}' at index {index} yields an empty email part")]
    UnaddressableName {
        /// Wire name of the list holding the name.
        list: &'static str,
        /// Index of the name within its list.
        index: usize,
        /// The offending name.
        name: String,
    },
}

/// Errors that can occur during record generation.
///
/// Generation either succeeds for every requested record or fails as a
/// whole; no partial results are ever returned alongside these errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The reference dataset could not be loaded or lacks required data.
    #[error("reference dataset unavailable: {0}")]
    DatasetUnavailable(#[from] DatasetError),

    /// The operating system's secure random source failed to supply a seed.
    #[error("secure random source unavailable: {message}")]
    EntropyUnavailable {
        /// Description of the entropy failure.
        message: String,
    },

    /// A negative record count was requested.
    #[error("record count must not be negative, got {count}")]
    InvalidCount {
        /// The rejected count.
        count: i64,
    },

    /// The configured reference year does not form a calendar date.
    #[error("reference year {year} is out of range")]
    InvalidReferenceYear {
        /// The rejected year.
        year: i32,
    },

    /// Date arithmetic left the representable range.
    #[error("date arithmetic out of range for field '{field}'")]
    DateOutOfRange {
        /// Record field being computed.
        field: &'static str,
    },
}
