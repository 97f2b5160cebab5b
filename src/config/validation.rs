//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (periods and timeouts > 0, port is a TCP port)
//! - Check listener addresses parse before anything binds
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ReloaderConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ReloaderConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("PORT '{0}' is not a valid TCP port")]
    InvalidPort(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },
}

pub fn validate_config(config: &ReloaderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let discovery = &config.discovery;
    if !matches!(discovery.port.parse::<u16>(), Ok(p) if p > 0) {
        errors.push(ValidationError::InvalidPort(discovery.port.clone()));
    }
    if discovery.polling_period_secs == 0 {
        errors.push(ValidationError::Zero("POLLING_PERIOD"));
    }
    if discovery.fetch_timeout_secs == 0 {
        errors.push(ValidationError::Zero("FETCH_TIMEOUT"));
    }
    if discovery.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero("connect_timeout_secs"));
    }

    let deploy = &config.deploy;
    if deploy.config_path.trim().is_empty() {
        errors.push(ValidationError::Empty("NGINX_CONFIG_PATH"));
    }
    if deploy.reload_command.trim().is_empty() {
        errors.push(ValidationError::Empty("RELOAD_COMMAND"));
    }
    if deploy.reload_timeout_secs == 0 {
        errors.push(ValidationError::Zero("RELOAD_TIMEOUT"));
    }

    let addresses = [
        ("METRICS_ADDRESS", &config.observability.metrics_address),
        ("ADMIN_ADDRESS", &config.admin.bind_address),
    ];
    for (field, address) in addresses {
        if let Some(value) = address {
            if value.parse::<SocketAddr>().is_err() {
                errors.push(ValidationError::InvalidAddress {
                    field,
                    value: value.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
