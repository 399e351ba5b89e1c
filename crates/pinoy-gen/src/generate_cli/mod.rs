//! CLI support for offline record generation.
//!
//! This module provides parsing and generation helpers for the
//! `pinoy-generate` binary. The binary delegates to these functions so they
//! can be exercised in tests without spawning a subprocess.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::info;

use crate::atomic_io::write_atomic;
use crate::dataset::ReferenceDataset;
use crate::error::GenerationError;
use crate::generator::{
    DEFAULT_VERSION, GeneratorSettings, PinoyGenerator, RecordGenerator, checked_count,
};
use crate::record::GenerationEnvelope;

mod error;

pub use error::CliError;

const DEFAULT_COUNT: usize = 1;

/// Largest count accepted in a single run.
pub const MAX_COUNT: usize = 100_000;

/// Parsed options for the generation CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    count: usize,
    seed: Option<String>,
    year: Option<i32>,
    version_label: Option<String>,
    dataset_path: Option<PathBuf>,
    output: Option<Utf8PathBuf>,
}

impl Options {
    /// Returns the number of records to generate.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns the seed supplied with `--seed`, if any.
    #[must_use]
    pub fn seed(&self) -> Option<&str> {
        self.seed.as_deref()
    }

    /// Returns the output path, or `None` when writing to stdout.
    ///
    /// # Example
    ///
    /// ```
    /// use pinoy_gen::generate_cli::{ParseOutcome, parse_args};
    ///
    /// let args = vec!["--output".to_string(), "people.json".to_string()];
    /// let ParseOutcome::Options(options) = parse_args(args.into_iter()).expect("parse") else {
    ///     panic!("expected options");
    /// };
    ///
    /// assert_eq!(options.output().map(|p| p.as_str()), Some("people.json"));
    /// ```
    #[must_use]
    pub fn output(&self) -> Option<&Utf8Path> {
        self.output.as_deref()
    }
}

/// Outcome of parsing CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Show help output and exit successfully.
    Help,
    /// Continue with the parsed options.
    Options(Options),
}

/// Parses CLI arguments into generation options.
///
/// # Errors
///
/// Returns [`CliError`] when a flag is unknown, a value is missing, or a
/// number cannot be parsed or is out of range.
///
/// # Example
///
/// ```
/// use pinoy_gen::generate_cli::{ParseOutcome, parse_args};
///
/// let args = vec![
///     "--count".to_string(),
///     "5".to_string(),
///     "--seed".to_string(),
///     "8959bcbac47d82c434fd8f154dab3e04".to_string(),
/// ];
///
/// let ParseOutcome::Options(options) = parse_args(args.into_iter()).expect("parse") else {
///     panic!("expected options");
/// };
/// assert_eq!(options.count(), 5);
/// ```
pub fn parse_args<I>(mut args: I) -> Result<ParseOutcome, CliError>
where
    I: Iterator<Item = String>,
{
    let mut options = Options {
        count: DEFAULT_COUNT,
        seed: None,
        year: None,
        version_label: None,
        dataset_path: None,
        output: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(ParseOutcome::Help),
            "--count" => {
                let value = next_value(&mut args, "--count")?;
                let raw: i64 = parse_number(&value, "--count")?;
                let count = checked_count(raw)?;
                if count > MAX_COUNT {
                    return Err(CliError::CountTooLarge {
                        count,
                        max: MAX_COUNT,
                    });
                }
                options.count = count;
            }
            "--seed" => options.seed = Some(next_value(&mut args, "--seed")?),
            "--year" => {
                let value = next_value(&mut args, "--year")?;
                options.year = Some(parse_number(&value, "--year")?);
            }
            "--version-label" => {
                options.version_label = Some(next_value(&mut args, "--version-label")?);
            }
            "--dataset" => {
                options.dataset_path = Some(PathBuf::from(next_value(&mut args, "--dataset")?));
            }
            "--output" => {
                options.output = Some(Utf8PathBuf::from(next_value(&mut args, "--output")?));
            }
            _ => return Err(CliError::UnknownArgument { value: arg }),
        }
    }

    Ok(ParseOutcome::Options(options))
}

/// Loads the dataset and generates the envelope described by `options`.
///
/// # Errors
///
/// Returns [`CliError::Generation`] if the dataset cannot be loaded, the
/// year is invalid, or generation fails.
pub fn generate(options: &Options) -> Result<GenerationEnvelope, CliError> {
    let dataset = match &options.dataset_path {
        Some(path) => ReferenceDataset::from_file(path),
        None => ReferenceDataset::embedded(),
    }
    .map_err(GenerationError::from)?;

    let version = options
        .version_label
        .clone()
        .unwrap_or_else(|| DEFAULT_VERSION.to_owned());
    let settings = match options.year {
        Some(year) => GeneratorSettings::new(year, version),
        None => GeneratorSettings::current_year(version),
    }?;

    let generator = PinoyGenerator::new(Arc::new(dataset), settings);
    let envelope = generator.generate(options.count, options.seed())?;
    info!(
        seed = %envelope.seed,
        count = envelope.count,
        "generated records"
    );
    Ok(envelope)
}

/// Serialises an envelope as pretty JSON with a trailing newline.
///
/// # Errors
///
/// Returns [`CliError::SerializeError`] if serialisation fails.
pub fn render_envelope(envelope: &GenerationEnvelope) -> Result<String, CliError> {
    let mut json =
        serde_json::to_string_pretty(envelope).map_err(|err| CliError::SerializeError {
            message: err.to_string(),
        })?;
    json.push('\n');
    Ok(json)
}

/// Writes rendered output to `path` atomically.
///
/// # Errors
///
/// Returns [`CliError::WriteError`] if the parent directory cannot be opened
/// or the file cannot be written.
pub fn write_output(path: &Utf8Path, contents: &str) -> Result<(), CliError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let Some(file_name) = path.file_name() else {
        return Err(CliError::WriteError {
            path: path.to_path_buf(),
            message: "output path must name a file".to_owned(),
        });
    };
    let dir =
        Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| CliError::WriteError {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

    write_atomic(&dir, Utf8Path::new(file_name), contents)
}

/// Formats the success message emitted after writing an output file.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use pinoy_gen::GenerationEnvelope;
/// use pinoy_gen::generate_cli::success_message;
///
/// let envelope = GenerationEnvelope {
///     seed: "abc".to_string(),
///     count: 2,
///     version: "debug".to_string(),
///     results: vec![],
/// };
/// let message = success_message(&envelope, Utf8Path::new("people.json"));
///
/// assert!(message.contains("seed=abc"));
/// ```
#[must_use]
pub fn success_message(envelope: &GenerationEnvelope, path: &Utf8Path) -> String {
    format!(
        "Wrote {} records (seed={}, version={}) to {path}",
        envelope.count, envelope.seed, envelope.version
    )
}

fn next_value<I>(args: &mut I, flag: &'static str) -> Result<String, CliError>
where
    I: Iterator<Item = String>,
{
    args.next().ok_or(CliError::MissingValue { flag })
}

fn parse_number<T>(value: &str, flag: &'static str) -> Result<T, CliError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value.parse::<T>().map_err(|err| CliError::InvalidNumber {
        flag,
        value: value.to_owned(),
        message: err.to_string(),
    })
}
