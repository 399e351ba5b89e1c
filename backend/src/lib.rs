//! Random Pinoy User Generator HTTP service.
//!
//! Serves seeded, replayable Philippine person records from
//! [`pinoy_gen`] over actix-web, with request tracing, health probes, and
//! per-client rate limiting.

pub mod api;
pub mod middleware;
pub mod models;
pub mod server;

pub use middleware::{RateLimit, Trace};
