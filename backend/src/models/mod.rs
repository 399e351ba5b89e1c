//! Transport data models.
//!
//! Purpose: Define the payloads the HTTP layer emits on top of the generator's
//! own record types. Generated envelopes are serialised straight from
//! `pinoy_gen`; only the error envelope lives here.
//!
//! Public surface:
//! - ApiError (alias to `error::ApiError`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.

pub mod error;
pub use self::error::{ApiError, ErrorCode};

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, ApiError>;
