//! Person record endpoint: `GET /api/v1/pinoys?results=N&seed=S`.
//!
//! `results` defaults to one record, values below one are raised to one and
//! values above [`MAX_RESULTS`] are clamped. Negative or non-integer values
//! are rejected with `400 invalid_request`. An empty or absent `seed` asks the
//! generator for a fresh one; the envelope always echoes the seed used.

use std::sync::Arc;

use actix_web::{HttpResponse, get, web};
use pinoy_gen::{RecordGenerator, checked_count};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::models::{ApiError, ApiResult};

/// Upper bound on records served by one request.
pub const MAX_RESULTS: usize = 1000;

/// Shared generator state injected into handlers via `web::Data`.
#[derive(Clone)]
pub struct PinoyState {
    generator: Arc<dyn RecordGenerator>,
}

impl PinoyState {
    /// Wrap a generator implementation for the HTTP layer.
    #[must_use]
    pub fn new(generator: Arc<dyn RecordGenerator>) -> Self {
        Self { generator }
    }
}

/// Raw query parameters; both are kept as text so parsing errors map to the
/// API error envelope rather than actix's default query rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PinoysQuery {
    results: Option<String>,
    seed: Option<String>,
}

/// Resolve the `results` parameter into a record count in `[1, MAX_RESULTS]`.
///
/// # Errors
/// Returns an invalid-request [`ApiError`] when the value is not an integer
/// or is negative.
///
/// # Examples
/// ```
/// use rpug::api::pinoys::resolve_results;
///
/// assert_eq!(resolve_results(None).unwrap(), 1);
/// assert_eq!(resolve_results(Some("0")).unwrap(), 1);
/// assert_eq!(resolve_results(Some("5000")).unwrap(), 1000);
/// assert!(resolve_results(Some("abc")).is_err());
/// ```
pub fn resolve_results(raw: Option<&str>) -> Result<usize, ApiError> {
    let Some(text) = raw.filter(|value| !value.is_empty()) else {
        return Ok(1);
    };
    let requested: i64 = text.parse().map_err(|_| {
        ApiError::invalid_request("results must be an integer").with_details(json!({
            "parameter": "results",
            "value": text,
        }))
    })?;
    let count = checked_count(requested)?;
    Ok(count.clamp(1, MAX_RESULTS))
}

/// Generate a page of synthetic Philippine person records.
#[get("/pinoys")]
pub async fn list_pinoys(
    state: web::Data<PinoyState>,
    query: web::Query<PinoysQuery>,
) -> ApiResult<HttpResponse> {
    let PinoysQuery { results, seed } = query.into_inner();
    let count = resolve_results(results.as_deref())?;
    let seed = seed.filter(|value| !value.is_empty());
    debug!(count, seeded = seed.is_some(), "generating person records");

    let envelope = state.generator.generate(count, seed.as_deref())?;
    Ok(HttpResponse::Ok().json(envelope))
}
