//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use pinoy_gen::RecordGenerator;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) generator: Arc<dyn RecordGenerator>,
    pub(crate) rate_limit: NonZeroU32,
}

impl ServerConfig {
    /// Requests admitted per client per window when no limit is configured.
    pub const DEFAULT_RATE_LIMIT: NonZeroU32 = NonZeroU32::MIN.saturating_add(1);

    /// Construct a server configuration around a ready generator.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, generator: Arc<dyn RecordGenerator>) -> Self {
        Self {
            bind_addr,
            generator,
            rate_limit: Self::DEFAULT_RATE_LIMIT,
        }
    }

    /// Override the per-client request allowance per second.
    #[must_use]
    pub const fn with_rate_limit(mut self, rate_limit: NonZeroU32) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the per-client request allowance per second.
    #[must_use]
    pub const fn rate_limit(&self) -> NonZeroU32 {
        self.rate_limit
    }
}
