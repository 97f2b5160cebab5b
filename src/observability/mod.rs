//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Reconcile loop produces:
//!     → logging.rs (structured log events per endpoint and deploy)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
