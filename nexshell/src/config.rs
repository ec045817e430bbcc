//! Configuration loading and validation.
//!
//! Configuration is assembled from two layers, later layers overriding earlier:
//!
//! 1. A YAML config file (path from `--config` / `NEXSHELL_CONFIG`, default
//!    `config.yaml`; a missing file contributes nothing)
//! 2. `NEXSHELL_`-prefixed environment variables, with `__` separating nested
//!    keys
//!
//! Example:
//!
//! ```yaml
//! api_base_url: "https://nexus.example.com/api/v1"
//! default_route: /dashboard
//! request_timeout: 15s
//! ```
//!
//! ```bash
//! export NEXSHELL_API_BASE_URL="http://localhost:8000/api/v1"
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};
use url::Url;

use crate::commands::Command;
use crate::errors::Error;

/// CLI entry point: config file selection plus the subcommand to run.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "NEXSHELL_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without contacting the backend.
    #[arg(long)]
    pub validate: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Main application configuration.
///
/// All fields have defaults suitable for a locally-running backend, so the
/// shell works with no config file at all.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the Nexus REST API (e.g. "https://nexus.example.com/api/v1")
    pub api_base_url: Url,
    /// Directory holding the persisted credential record.
    /// Defaults to `<platform config dir>/nexshell`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_dir: Option<PathBuf>,
    /// Landing route a permission-denied navigation silently falls back to
    pub default_route: String,
    /// Route an unauthenticated navigation is redirected to
    pub login_route: String,
    /// Timeout for individual backend requests
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse("http://localhost:8000/api/v1").expect("valid default URL"),
            credentials_dir: None,
            default_route: "/dashboard".to_string(),
            login_route: "/login".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values.
            // NEXSHELL_CONFIG and NEXSHELL_PASSWORD belong to the CLI layer,
            // not the config schema.
            .merge(Env::prefixed("NEXSHELL_").ignore(&["config", "password"]).split("__"))
    }

    /// Resolve the credentials directory, falling back to the platform config dir.
    pub fn credentials_dir(&self) -> PathBuf {
        self.credentials_dir.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("nexshell")
        })
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if !matches!(self.api_base_url.scheme(), "http" | "https") {
            return Err(Error::Internal {
                operation: format!(
                    "Config validation: api_base_url must be http or https, got {}",
                    self.api_base_url.scheme()
                ),
            });
        }

        for (name, route) in [("default_route", &self.default_route), ("login_route", &self.login_route)] {
            if !route.starts_with('/') {
                return Err(Error::Internal {
                    operation: format!("Config validation: {name} must be an absolute path (got {route:?})"),
                });
            }
        }

        if self.request_timeout < Duration::from_secs(1) {
            return Err(Error::Internal {
                operation: "Config validation: request_timeout must be at least 1 second".to_string(),
            });
        }

        if self.request_timeout > Duration::from_secs(300) {
            return Err(Error::Internal {
                operation: "Config validation: request_timeout must be at most 5 minutes".to_string(),
            });
        }

        Ok(())
    }
}
