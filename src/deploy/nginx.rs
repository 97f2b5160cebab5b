//! nginx deployer: file overwrite followed by a reload command.

use std::path::PathBuf;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::config::DeployConfig;
use crate::deploy::{DeployError, Deployer};

/// Deploys by overwriting the nginx config file and running the reload command.
#[derive(Debug, Clone)]
pub struct NginxDeployer {
    config_path: PathBuf,
    reload_command: Vec<String>,
    reload_timeout: Duration,
}

impl NginxDeployer {
    pub fn new(config: &DeployConfig) -> Self {
        Self {
            config_path: PathBuf::from(&config.config_path),
            reload_command: config
                .reload_command
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            reload_timeout: Duration::from_secs(config.reload_timeout_secs),
        }
    }

    async fn write_config(&self, config: &[u8]) -> Result<(), DeployError> {
        tokio::fs::write(&self.config_path, config)
            .await
            .map_err(|source| DeployError::Write {
                path: self.config_path.clone(),
                source,
            })
    }

    async fn reload(&self) -> Result<(), DeployError> {
        let (program, args) = self
            .reload_command
            .split_first()
            .ok_or(DeployError::EmptyCommand)?;
        let command = self.reload_command.join(" ");

        let mut child = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| DeployError::Spawn {
                command: command.clone(),
                source,
            })?;

        let status = match timeout(self.reload_timeout, child.wait()).await {
            Ok(result) => result.map_err(|source| DeployError::Spawn {
                command: command.clone(),
                source,
            })?,
            Err(_) => return Err(DeployError::ReloadTimeout(self.reload_timeout.as_secs())),
        };

        if !status.success() {
            return Err(DeployError::ReloadFailed { command, status });
        }
        Ok(())
    }
}

impl Deployer for NginxDeployer {
    async fn deploy(&self, config: &[u8]) -> Result<(), DeployError> {
        self.write_config(config).await?;
        tracing::debug!(path = %self.config_path.display(), bytes = config.len(), "Config written");

        self.reload().await?;
        tracing::info!(
            path = %self.config_path.display(),
            command = %self.reload_command.join(" "),
            "Proxy reloaded"
        );
        Ok(())
    }
}
