//! nginx upstream reloader library.

pub mod admin;
pub mod config;
pub mod deploy;
pub mod discovery;
pub mod lifecycle;
pub mod observability;
pub mod reconcile;
pub mod render;
pub mod resilience;

pub use config::ReloaderConfig;
pub use lifecycle::Shutdown;
pub use reconcile::Reconciler;
