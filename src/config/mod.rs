//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! RELOADER_CONFIG (optional TOML file)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (overlay PORT, POLLING_PERIOD, TUTUM_AUTH, ...)
//!     → validation.rs (semantic checks)
//!     → ReloaderConfig (validated, immutable)
//!     → passed by value into the reconcile loop
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; no process-wide mutable settings
//! - All fields have defaults so an empty environment is a valid config
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from_env, ConfigError, LoadedConfig};
pub use schema::AdminConfig;
pub use schema::DeployConfig;
pub use schema::DiscoveryConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::ReloaderConfig;
