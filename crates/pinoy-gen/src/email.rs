//! Email address synthesis from generated names.
//!
//! Addresses take the form `first.last@gmail.com`. Name parts are reduced to
//! lowercase ASCII letters and digits so that multi-word and accented names
//! still yield a well-formed local part.
//!
//! # Normalisation Rules
//!
//! - Non-ASCII letters are transliterated first (`ñ` to `n`, `é` to `e`)
//! - ASCII letters are lowercased, ASCII digits are kept
//! - Everything else (spaces, hyphens, apostrophes, dots) is dropped

use deunicode::deunicode;

/// Domain used for every generated address.
pub const EMAIL_DOMAIN: &str = "gmail.com";

/// Builds the email address for a first and last name.
///
/// # Examples
///
/// ```
/// use pinoy_gen::synthesize_email;
///
/// assert_eq!(synthesize_email("Juan", "Dela Cruz"), "juan.delacruz@gmail.com");
/// assert_eq!(synthesize_email("Ma. Luisa", "Peña"), "maluisa.pena@gmail.com");
/// ```
#[must_use]
pub fn synthesize_email(first: &str, last: &str) -> String {
    format!(
        "{}.{}@{EMAIL_DOMAIN}",
        normalize_name_part(first),
        normalize_name_part(last)
    )
}

/// Reduces a name to the characters allowed in an email local part.
#[must_use]
pub(crate) fn normalize_name_part(name: &str) -> String {
    deunicode(name)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
