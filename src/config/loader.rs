//! Configuration loading from the environment and, optionally, disk.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::schema::{LogFormat, ReloaderConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Optional TOML file loaded before the environment overlay.
pub const CONFIG_FILE_VAR: &str = "RELOADER_CONFIG";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// A validated configuration plus the overrides that were ignored on the way.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: ReloaderConfig,
    pub warnings: Vec<String>,
}

/// Parse a TOML configuration file without validating it.
pub fn read_config_file(path: &Path) -> Result<ReloaderConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ReloaderConfig, ConfigError> {
    let config = read_config_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Build the configuration from environment variables.
///
/// When `RELOADER_CONFIG` names a file it provides the base values, otherwise
/// defaults are used. Environment variables always win.
pub fn load_from_env<I>(vars: I) -> Result<LoadedConfig, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let vars: HashMap<String, String> = vars.into_iter().collect();

    let mut config = match vars.get(CONFIG_FILE_VAR).filter(|p| !p.is_empty()) {
        Some(path) => read_config_file(Path::new(path))?,
        None => ReloaderConfig::default(),
    };

    let warnings = apply_env(&mut config, &vars);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(LoadedConfig { config, warnings })
}

/// Overlay recognised environment variables onto `config`.
///
/// Unparsable numeric values keep the previous value and produce a warning.
pub fn apply_env(config: &mut ReloaderConfig, vars: &HashMap<String, String>) -> Vec<String> {
    let mut warnings = Vec::new();
    let get = |name: &str| vars.get(name).map(String::as_str).filter(|v| !v.is_empty());

    if let Some(port) = get("PORT") {
        config.discovery.port = port.to_string();
    }
    if let Some(auth) = vars.get("TUTUM_AUTH") {
        config.discovery.auth = auth.clone();
    }

    let numeric = [
        ("POLLING_PERIOD", &mut config.discovery.polling_period_secs),
        ("FETCH_TIMEOUT", &mut config.discovery.fetch_timeout_secs),
        ("RELOAD_TIMEOUT", &mut config.deploy.reload_timeout_secs),
    ];
    for (name, slot) in numeric {
        if let Some(raw) = get(name) {
            match raw.trim().parse::<u64>() {
                Ok(value) => *slot = value,
                Err(_) => warnings.push(format!(
                    "{} '{}' is not an integer, keeping {}",
                    name, raw, slot
                )),
            }
        }
    }

    if let Some(path) = get("NGINX_CONFIG_PATH") {
        config.deploy.config_path = path.to_string();
    }
    if let Some(command) = get("RELOAD_COMMAND") {
        config.deploy.reload_command = command.to_string();
    }

    if let Some(level) = get("LOG_LEVEL") {
        config.observability.log_level = level.to_string();
    }
    if let Some(format) = get("LOG_FORMAT") {
        match format.to_ascii_lowercase().as_str() {
            "json" => config.observability.log_format = LogFormat::Json,
            "pretty" => config.observability.log_format = LogFormat::Pretty,
            other => warnings.push(format!(
                "LOG_FORMAT '{}' is unknown, keeping {:?}",
                other, config.observability.log_format
            )),
        }
    }
    if let Some(address) = get("METRICS_ADDRESS") {
        config.observability.metrics_address = Some(address.to_string());
    }

    if let Some(address) = get("ADMIN_ADDRESS") {
        config.admin.bind_address = Some(address.to_string());
    }
    if let Some(key) = get("ADMIN_API_KEY") {
        config.admin.api_key = Some(key.to_string());
    }

    warnings
}
