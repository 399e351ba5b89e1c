//! Per-client rate limiting backed by `governor`.
//!
//! Clients are keyed by their real IP as reported by
//! [`ConnectionInfo::realip_remote_addr`](actix_web::dev::ConnectionInfo::realip_remote_addr),
//! so `Forwarded` and `X-Forwarded-For` headers from a fronting proxy are
//! honoured. Each client gets a GCRA quota of `limit` requests per window
//! with a burst of `limit`; cells replenish continuously, so no window edge
//! lets a client through at twice its allowance. Rejected requests receive
//! `429 Too Many Requests` with the standard error envelope and a
//! `Retry-After` header.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderValue};
use actix_web::{Error, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::{debug, warn};

use crate::models::ApiError;

/// Key used when the peer address cannot be determined.
const UNKNOWN_CLIENT: &str = "unknown";

/// Number of tracked clients above which idle entries are dropped.
const PRUNE_THRESHOLD: usize = 1024;

/// Keyed GCRA limiter shared by every worker.
///
/// # Examples
/// ```
/// use std::num::NonZeroU32;
/// use std::time::Duration;
/// use rpug::middleware::ClientRateLimiter;
///
/// let limit = NonZeroU32::new(2).expect("non-zero");
/// let limiter = ClientRateLimiter::new(limit, Duration::from_secs(1));
/// assert!(limiter.check("10.0.0.1").is_ok());
/// assert!(limiter.check("10.0.0.1").is_ok());
/// assert!(limiter.check("10.0.0.1").is_err());
/// ```
pub struct ClientRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
    limit: NonZeroU32,
}

impl ClientRateLimiter {
    /// Allow `limit` requests per client in every `window`.
    ///
    /// A zero-length window falls back to one second.
    #[must_use]
    pub fn new(limit: NonZeroU32, window: Duration) -> Self {
        let quota = Quota::with_period(window / limit.get())
            .unwrap_or_else(|| Quota::per_second(limit))
            .allow_burst(limit);
        Self {
            limiter: RateLimiter::keyed(quota),
            clock: DefaultClock::default(),
            limit,
        }
    }

    /// Maximum burst admitted per client.
    #[must_use]
    pub const fn limit(&self) -> NonZeroU32 {
        self.limit
    }

    /// Record a request from `client`.
    ///
    /// # Errors
    /// Returns how long the client must wait before its next request would
    /// be admitted.
    pub fn check(&self, client: &str) -> Result<(), Duration> {
        if self.limiter.len() > PRUNE_THRESHOLD {
            self.limiter.retain_recent();
        }
        self.limiter
            .check_key(&client.to_owned())
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Number of clients currently tracked.
    #[must_use]
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Whole seconds for a `Retry-After` header: rounded up, at least one.
fn retry_after_secs(wait: Duration) -> u64 {
    let whole = wait.as_secs();
    let rounded = if wait.subsec_nanos() > 0 {
        whole.saturating_add(1)
    } else {
        whole
    };
    rounded.max(1)
}

/// Middleware rejecting requests once a client exceeds its window allowance.
///
/// # Examples
/// ```
/// use std::num::NonZeroU32;
/// use std::sync::Arc;
/// use std::time::Duration;
/// use actix_web::App;
/// use rpug::middleware::{ClientRateLimiter, RateLimit};
///
/// let limit = NonZeroU32::new(2).expect("non-zero");
/// let limiter = Arc::new(ClientRateLimiter::new(limit, Duration::from_secs(1)));
/// let app = App::new().wrap(RateLimit::new(limiter));
/// ```
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<ClientRateLimiter>,
}

impl RateLimit {
    /// Wrap a shared limiter so every worker draws on the same quotas.
    #[must_use]
    pub const fn new(limiter: Arc<ClientRateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            limiter: Arc::clone(&self.limiter),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: S,
    limiter: Arc<ClientRateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or(UNKNOWN_CLIENT)
            .to_owned();

        let wait = match self.limiter.check(&client) {
            Ok(()) => {
                debug!(client = %client, "request admitted by rate limiter");
                let fut = self.service.call(req);
                return Box::pin(
                    async move { fut.await.map(ServiceResponse::map_into_left_body) },
                );
            }
            Err(wait) => wait,
        };

        let retry_after = retry_after_secs(wait);
        let limit = self.limiter.limit().get();
        // Build the rejection inside the returned future so the trace
        // identifier scoped by the outer middleware is captured.
        Box::pin(async move {
            warn!(client = %client, limit, "rate limit exceeded");
            let mut response =
                ApiError::too_many_requests("rate limit exceeded; retry later").error_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
            Ok(req.into_response(response).map_into_right_body())
        })
    }
}
