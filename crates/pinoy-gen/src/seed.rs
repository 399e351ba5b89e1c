//! Seed creation and numeric seed derivation.
//!
//! A seed is an opaque string echoed back to callers. Its numeric form, used
//! to initialise the random source, is derived with SHA-256 so that similar
//! seed strings map to unrelated sequences.

use rand::TryRngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::GenerationError;

/// Number of entropy bytes in a fresh seed.
pub const SEED_BYTES: usize = 16;

/// A resolved seed: the caller-visible string and its numeric form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSeed {
    text: String,
    numeric: u64,
}

impl GenerationSeed {
    /// Wraps a seed string, deriving its numeric form.
    ///
    /// # Example
    ///
    /// ```
    /// use pinoy_gen::GenerationSeed;
    ///
    /// let a = GenerationSeed::from_text("8959bcbac47d82c434fd8f154dab3e04");
    /// let b = GenerationSeed::from_text("8959bcbac47d82c434fd8f154dab3e04");
    /// assert_eq!(a.numeric(), b.numeric());
    /// ```
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let numeric = derive_numeric_seed(&text);
        Self { text, numeric }
    }

    /// Creates a fresh seed from the operating system's secure random source.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::EntropyUnavailable`] if the source fails.
    pub fn fresh() -> Result<Self, GenerationError> {
        new_seed().map(Self::from_text)
    }

    /// Uses `supplied` verbatim when it is non-empty, otherwise creates a
    /// fresh seed.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::EntropyUnavailable`] only when a fresh seed
    /// was needed and the secure random source failed.
    pub fn resolve(supplied: Option<&str>) -> Result<Self, GenerationError> {
        match supplied {
            Some(text) if !text.is_empty() => Ok(Self::from_text(text)),
            _ => Self::fresh(),
        }
    }

    /// Returns the seed string.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the derived numeric seed.
    #[must_use]
    pub const fn numeric(&self) -> u64 {
        self.numeric
    }

    /// Consumes the seed, returning its string form.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Returns 16 bytes of secure random data as 32 lowercase hex characters.
///
/// # Errors
///
/// Returns [`GenerationError::EntropyUnavailable`] if the operating system
/// cannot supply random bytes. There is no fallback to a weaker source.
///
/// # Example
///
/// ```
/// let seed = pinoy_gen::new_seed().expect("entropy available");
/// assert_eq!(seed.len(), 32);
/// ```
pub fn new_seed() -> Result<String, GenerationError> {
    let mut bytes = [0_u8; SEED_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|err| GenerationError::EntropyUnavailable {
            message: err.to_string(),
        })?;

    let seed = hex::encode(bytes);
    debug!(seed = %seed, "seed generated");
    Ok(seed)
}

/// Derives the 64-bit numeric seed for a seed string.
///
/// The first eight bytes of the SHA-256 digest are read big-endian.
#[must_use]
pub fn derive_numeric_seed(seed: &str) -> u64 {
    let digest = Sha256::digest(seed.as_bytes());
    digest
        .iter()
        .take(8)
        .fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte))
}
