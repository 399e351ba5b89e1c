//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! tracing and per-client rate limiting.

pub mod rate_limit;
pub mod trace;

pub use rate_limit::{ClientRateLimiter, RateLimit};
pub use trace::{RequestStats, StatsSnapshot, Trace};
