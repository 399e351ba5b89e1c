//! Service entry-point: loads settings, builds the generator, and serves HTTP.

use std::env;
use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use rpug::api::health::HealthState;
use rpug::middleware::RequestStats;
use rpug::server::{ServerConfig, ServerSettings, build_generator, create_server, drain};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_args(env::args_os()).map_err(std::io::Error::other)?;
    let rate_limit = settings.rate_limit().map_err(std::io::Error::other)?;
    info!(
        port = settings.port(),
        environment = settings.environment(),
        version = settings.version_label(),
        reference_year = settings.reference_year(),
        rate_limit = rate_limit.get(),
        "configuration loaded"
    );

    let generator = build_generator(&settings).map_err(std::io::Error::other)?;
    let config = ServerConfig::new(settings.bind_addr(), generator).with_rate_limit(rate_limit);

    let health_state = web::Data::new(HealthState::new());
    let request_stats = Arc::new(RequestStats::default());
    let server = create_server(health_state.clone(), Arc::clone(&request_stats), config)?;
    let handle = server.handle();
    actix_web::rt::spawn(async move {
        shutdown_signal().await;
        drain(health_state, handle).await;
    });
    info!(
        bind_addr = %settings.bind_addr(),
        ping_url = %format!("http://localhost:{}/ping", settings.port()),
        api_url = %format!("http://localhost:{}/api/v1/pinoys", settings.port()),
        "server listening"
    );

    let outcome = server.await;
    let totals = request_stats.snapshot();
    info!(
        served = totals.served,
        rate_limited = totals.rate_limited,
        failed = totals.failed,
        "server stopped"
    );
    outcome
}

/// Resolves on SIGINT, or SIGTERM where the platform has it. Never resolves
/// when no handler can be installed.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
                return;
            }
            Err(error) => warn!(%error, "SIGTERM handler unavailable"),
        }
    }
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "SIGINT handler unavailable");
        std::future::pending::<()>().await;
    }
}
