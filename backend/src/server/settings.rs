//! Service settings loaded via OrthoConfig.
//!
//! Every value is optional in the environment; accessors supply the defaults
//! so a bare `rpug` invocation serves the embedded dataset on port 3000.

use std::ffi::OsString;
use std::net::{Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::path::Path;
use std::path::PathBuf;

use chrono::{Datelike, Utc};
use ortho_config::OrthoConfig;
use pinoy_gen::DEFAULT_VERSION;
use serde::Deserialize;

use super::StartupError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ENVIRONMENT: &str = "dev";
const PRODUCTION_ENVIRONMENT: &str = "prod";
const DEFAULT_RATE_LIMIT: u32 = 2;

/// Configuration values controlling the HTTP service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RPUG")]
pub struct ServerSettings {
    /// TCP port to listen on.
    pub port: Option<u16>,
    /// Deployment environment name; `prod` enables the version label.
    pub env: Option<String>,
    /// Version label echoed in every envelope when running in production.
    pub version_label: Option<String>,
    /// Year whose first of January anchors ages and registration dates.
    pub reference_year: Option<i32>,
    /// Optional reference dataset override.
    pub dataset_path: Option<PathBuf>,
    /// Requests admitted per client per second.
    pub rate_limit: Option<u32>,
}

impl ServerSettings {
    /// Load settings from the environment, configuration files, and `args`.
    ///
    /// # Errors
    /// Returns [`StartupError::Config`] when a value cannot be parsed.
    pub fn load_from_args<I>(args: I) -> Result<Self, StartupError>
    where
        I: IntoIterator<Item = OsString>,
    {
        Self::load_from_iter(args).map_err(|err| StartupError::Config {
            message: err.to_string(),
        })
    }

    /// Return the configured port, falling back to the default.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Return the configured environment name, falling back to `dev`.
    pub fn environment(&self) -> &str {
        self.env
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_ENVIRONMENT)
    }

    /// Whether the service runs in the production environment.
    pub fn is_production(&self) -> bool {
        self.environment() == PRODUCTION_ENVIRONMENT
    }

    /// Version label for envelopes.
    ///
    /// Outside production, or when no label is configured, this is always
    /// [`DEFAULT_VERSION`].
    pub fn version_label(&self) -> &str {
        if !self.is_production() {
            return DEFAULT_VERSION;
        }
        self.version_label
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_VERSION)
    }

    /// Return the configured reference year, falling back to the current UTC year.
    pub fn reference_year(&self) -> i32 {
        self.reference_year.unwrap_or_else(|| Utc::now().year())
    }

    /// Return the dataset override, if any.
    pub fn dataset_path(&self) -> Option<&Path> {
        self.dataset_path.as_deref()
    }

    /// Return the per-client request allowance per second.
    ///
    /// # Errors
    /// Returns [`StartupError::Config`] when the allowance is zero.
    pub fn rate_limit(&self) -> Result<NonZeroU32, StartupError> {
        let limit = self.rate_limit.unwrap_or(DEFAULT_RATE_LIMIT);
        NonZeroU32::new(limit).ok_or_else(|| StartupError::Config {
            message: "RPUG_RATE_LIMIT must be at least 1".to_owned(),
        })
    }

    /// Socket address the server binds to on all interfaces.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port()))
    }
}
