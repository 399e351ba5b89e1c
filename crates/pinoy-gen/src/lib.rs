//! Seeded, deterministic generation of Philippine-localised person records.
//!
//! This crate turns an opaque seed string into a reproducible sequence of
//! fake person records (name, date of birth, location, contact details) for
//! testing and prototyping. It is independent of any transport so the HTTP
//! service and the offline CLI share one generator.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Loading and validating a reference dataset from JSON (an embedded
//!   Philippine dataset ships with the crate)
//! - Creating fresh hex seeds from the OS secure random source
//! - Deterministic record generation with a fixed draw order
//! - Writing generation envelopes to files atomically from the CLI
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use pinoy_gen::{GeneratorSettings, PinoyGenerator, RecordGenerator, ReferenceDataset};
//!
//! let dataset = Arc::new(ReferenceDataset::embedded().expect("valid dataset"));
//! let settings = GeneratorSettings::new(2024, "debug").expect("valid year");
//! let generator = PinoyGenerator::new(dataset, settings);
//!
//! let envelope = generator
//!     .generate(3, Some("8959bcbac47d82c434fd8f154dab3e04"))
//!     .expect("generation succeeds");
//!
//! assert_eq!(envelope.results.len(), 3);
//! assert_eq!(envelope.seed, "8959bcbac47d82c434fd8f154dab3e04");
//! ```

mod atomic_io;
mod dataset;
mod email;
mod error;
pub mod generate_cli;
mod generator;
mod record;
mod rng;
mod seed;

pub use dataset::{City, ReferenceDataset, Region};
pub use email::{EMAIL_DOMAIN, synthesize_email};
pub use error::{DatasetError, GenerationError};
pub use generator::{
    DEFAULT_VERSION, GeneratorSettings, PinoyGenerator, RecordGenerator, checked_count,
};
pub use record::{
    COUNTRY, DatedAge, Gender, GenerationEnvelope, Location, PersonName, PersonRecord,
};
pub use rng::RandomSource;
pub use seed::{GenerationSeed, SEED_BYTES, derive_numeric_seed, new_seed};
