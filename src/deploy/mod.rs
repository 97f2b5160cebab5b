//! Configuration deployment subsystem.
//!
//! # Data Flow
//! ```text
//! Rendered config bytes (changed since last deploy)
//!     → nginx.rs: overwrite config file (truncate + write)
//!     → nginx.rs: run reload command, wait for exit status
//!     → Ok(()) or DeployError
//! ```
//!
//! # Design Decisions
//! - Best-effort: overwrite then reload, no atomic swap
//! - A non-zero reload exit is a failure so the next cycle retries
//! - The reload command is argv-split, never run through a shell

pub mod nginx;

use std::future::Future;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub use nginx::NginxDeployer;

/// Errors that can occur while deploying a configuration.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Writing the configuration file failed.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The reload command could not be started.
    #[error("failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The reload command exited unsuccessfully.
    #[error("'{command}' exited with {status}")]
    ReloadFailed { command: String, status: ExitStatus },

    /// The reload command did not finish in time.
    #[error("reload timed out after {0} seconds")]
    ReloadTimeout(u64),

    /// No reload command configured.
    #[error("reload command is empty")]
    EmptyCommand,
}

/// Writes a configuration and signals the proxy to pick it up.
pub trait Deployer: Send + Sync {
    fn deploy(&self, config: &[u8]) -> impl Future<Output = Result<(), DeployError>> + Send;
}
