//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the reloader.
//! All types derive Serde traits for deserialization from an optional TOML
//! file; environment variables are overlaid afterwards by the loader.

use serde::{Deserialize, Serialize};

/// Root configuration for the reloader.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ReloaderConfig {
    /// Endpoint discovery and polling.
    pub discovery: DiscoveryConfig,

    /// Config file and reload command.
    pub deploy: DeployConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,

    /// Optional status endpoint.
    pub admin: AdminConfig,
}

/// Discovery and polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// The proxy's own listening port, used to build the link filter.
    pub port: String,

    /// Seconds between reconcile cycles.
    pub polling_period_secs: u64,

    /// Credential sent verbatim as the `Authorization` header.
    #[serde(skip_serializing)]
    pub auth: String,

    /// Deadline for a single descriptor fetch, in seconds.
    pub fetch_timeout_secs: u64,

    /// TCP connect timeout for descriptor fetches, in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            port: "80".to_string(),
            polling_period_secs: 30,
            auth: String::new(),
            fetch_timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}

/// Deployment configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeployConfig {
    /// nginx config file that is overwritten on every deploy.
    pub config_path: String,

    /// Command run after the file is written.
    ///
    /// Split on whitespace into argv and executed without a shell, so quoting
    /// is not interpreted. Put pipelines or quoted arguments in a script and
    /// name the script here.
    pub reload_command: String,

    /// Deadline for the reload command, in seconds.
    pub reload_timeout_secs: u64,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            config_path: "/etc/nginx/conf.d/default.conf".to_string(),
            reload_command: "service nginx restart".to_string(),
            reload_timeout_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Prometheus exporter bind address; disabled when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_address: None,
        }
    }
}

/// Status endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// Bind address; the endpoint is disabled when unset.
    pub bind_address: Option<String>,

    /// Bearer token required on `/admin/*` when set.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}
