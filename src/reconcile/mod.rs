//! Reconciliation subsystem.
//!
//! # Data Flow
//! ```text
//! Every polling period:
//!     EnvironmentSource snapshot
//!     → scan → for each endpoint, in scan order:
//!         fetch (with deadline) → aggregate → render
//!         → equal to last deployed? Unchanged
//!         → else Deployer::deploy → Deployed | Failed
//!     → CycleReport → StatusHandle (admin), metrics, logs
//! ```
//!
//! # Design Decisions
//! - Single sequential task; the config file has one writer
//! - Per-endpoint outcomes replace process exit on fetch/deploy errors
//! - Each endpoint's config is deployed independently; there is no
//!   atomicity across endpoints within a cycle
//! - The baseline lives in memory only and resets on restart

pub mod reconciler;
pub mod report;

pub use reconciler::{EnvironmentSource, ProcessEnvironment, ReconcileSettings, Reconciler};
pub use report::{CycleReport, EndpointOutcome, EndpointReport, StatusHandle};
