//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Logging → Metrics/Admin → Reconcile loop
//!
//! Shutdown (shutdown.rs):
//!     Signal received → abort in-flight cycle or sleep → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast at startup: invalid config is fatal
//! - After startup nothing is fatal; failures are retried next cycle

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
