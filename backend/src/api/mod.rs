//! REST API modules.

pub mod health;
pub mod pinoys;

pub use crate::models::{ApiError, ApiResult};
