//! Request tracing: a trace identifier, one log line, and outcome counters.
//!
//! Every request gets a UUID held in task-local storage so that
//! [`ApiError`](crate::models::ApiError) envelopes built while handling it are
//! correlated with the `trace-id` response header. Once the response is ready
//! the middleware logs the generation parameters the client asked for and
//! bumps the shared [`RequestStats`].
//!
//! Tokio task-locals are not inherited by spawned tasks; wrap such work in
//! [`TraceId::scope`].

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use serde::Deserialize;
use tokio::task_local;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Response header carrying the request's trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static TRACE_ID: TraceId;
}

/// Per-request trace identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Returns a fresh random (v4) identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the identifier of the request being handled, if any.
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Runs `fut` with `trace_id` in scope.
    ///
    /// # Examples
    /// ```
    /// use rpug::middleware::trace::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let trace_id = TraceId::random();
    /// let observed = TraceId::scope(trace_id, async move { TraceId::current() }).await;
    /// assert_eq!(observed, Some(trace_id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Running totals of request outcomes, shared by every worker.
#[derive(Debug, Default)]
pub struct RequestStats {
    served: AtomicU64,
    rate_limited: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time copy of [`RequestStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Requests answered with anything other than 429 or a 5xx status.
    pub served: u64,
    /// Requests turned away by the rate limiter.
    pub rate_limited: u64,
    /// Requests that ended in a server error.
    pub failed: u64,
}

impl RequestStats {
    /// Returns the current totals.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            served: self.served.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }

    /// Counts one response, returning the new total for its outcome.
    fn record(&self, status: StatusCode) -> u64 {
        let counter = if status == StatusCode::TOO_MANY_REQUESTS {
            &self.rate_limited
        } else if status.is_server_error() {
            &self.failed
        } else {
            &self.served
        };
        counter.fetch_add(1, Ordering::Relaxed).saturating_add(1)
    }
}

/// The generation parameters a client asked for, as sent.
#[derive(Debug, Default, Deserialize)]
struct RequestedGeneration {
    results: Option<String>,
    seed: Option<String>,
}

impl RequestedGeneration {
    fn from_request(req: &ServiceRequest) -> Self {
        web::Query::<Self>::from_query(req.query_string())
            .map(web::Query::into_inner)
            .unwrap_or_default()
    }
}

/// Tracing middleware; wrap it outermost so rejections from inner layers
/// are logged and counted too.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use actix_web::App;
/// use rpug::Trace;
/// use rpug::middleware::trace::RequestStats;
///
/// let stats = Arc::new(RequestStats::default());
/// let app = App::new().wrap(Trace::new(Arc::clone(&stats)));
/// ```
#[derive(Clone, Default)]
pub struct Trace {
    stats: Arc<RequestStats>,
}

impl Trace {
    /// Records outcomes into `stats`.
    #[must_use]
    pub const fn new(stats: Arc<RequestStats>) -> Self {
        Self { stats }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware {
            service,
            stats: Arc::clone(&self.stats),
        }))
    }
}

/// Service wrapper produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
    stats: Arc<RequestStats>,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let trace_id = TraceId::random();
        let path = req.path().to_owned();
        let requested = RequestedGeneration::from_request(&req);
        let stats = Arc::clone(&self.stats);
        let fut = self.service.call(req);

        Box::pin(TraceId::scope(trace_id, async move {
            let mut res = fut.await?;
            match HeaderValue::from_str(&trace_id.to_string()) {
                Ok(value) => {
                    res.headers_mut()
                        .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
                Err(error) => {
                    error!(%error, trace_id = %trace_id, "failed to encode trace-id header");
                }
            }

            let status = res.status();
            let total = stats.record(status);
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            let RequestedGeneration { results, seed } = requested;
            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!(
                    trace_id = %trace_id,
                    path = %path,
                    rate_limited_total = total,
                    "request rate limited"
                );
            } else if status.is_server_error() {
                warn!(
                    trace_id = %trace_id,
                    path = %path,
                    status = status.as_u16(),
                    failed_total = total,
                    "request failed"
                );
            } else {
                info!(
                    trace_id = %trace_id,
                    path = %path,
                    status = status.as_u16(),
                    results = ?results,
                    seed = ?seed,
                    elapsed_ms,
                    "request completed"
                );
            }
            Ok(res)
        }))
    }
}
