//! Server construction and middleware wiring.

mod config;
mod error;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use error::StartupError;
pub use settings::ServerSettings;
pub use state_builders::{build_generator, load_dataset};

use std::sync::Arc;
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::Compress;
use actix_web::{App, HttpServer, web};
use tracing::info;

use crate::api::health::{HealthState, live, ping, ready};
use crate::api::pinoys::{PinoyState, list_pinoys};
use crate::middleware::{ClientRateLimiter, RateLimit, RequestStats, Trace};
use crate::models::ApiError;

/// Length of one rate-limiting window.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(1);

/// Shared state handed to every worker's application instance.
#[derive(Clone)]
pub struct AppDependencies {
    /// Readiness and liveness flags.
    pub health_state: web::Data<HealthState>,
    /// Generator used by the person record endpoint.
    pub pinoy_state: web::Data<PinoyState>,
    /// Limiter shared across workers so each client has one quota.
    pub limiter: Arc<ClientRateLimiter>,
    /// Request outcome totals shared across workers.
    pub request_stats: Arc<RequestStats>,
}

/// Build the application: tracing and compression wrap every route; the
/// rate limiter guards the versioned API scope only, so probes and the
/// heartbeat stay reachable.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody + 'static>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        pinoy_state,
        limiter,
        request_stats,
    } = deps;

    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        actix_web::error::Error::from(ApiError::invalid_request(format!("invalid query: {err}")))
    });

    let api = web::scope("/api/v1")
        .wrap(RateLimit::new(limiter))
        .app_data(query_config)
        .service(list_pinoys);

    App::new()
        .app_data(health_state)
        .app_data(pinoy_state)
        .wrap(Compress::default())
        .wrap(Trace::new(request_stats))
        .service(api)
        .service(ping)
        .service(ready)
        .service(live)
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `request_stats`: outcome totals the trace middleware adds to.
/// - `config`: pre-built [`ServerConfig`] containing the generator, binding, and rate limit.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    request_stats: Arc<RequestStats>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        generator,
        rate_limit,
    } = config;
    let deps = AppDependencies {
        health_state: health_state.clone(),
        pinoy_state: web::Data::new(PinoyState::new(generator)),
        limiter: Arc::new(ClientRateLimiter::new(rate_limit, RATE_LIMIT_WINDOW)),
        request_stats,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}

/// Fail the liveness probe, then stop the server gracefully so in-flight
/// requests finish.
pub async fn drain(health_state: web::Data<HealthState>, handle: ServerHandle) {
    health_state.mark_unhealthy();
    info!("draining: liveness probe now failing");
    handle.stop(true).await;
}
