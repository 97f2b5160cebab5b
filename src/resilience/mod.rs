//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Descriptor fetch:
//!     → timeouts.rs (enforce per-fetch deadline)
//!     → On failure: endpoint skipped for this cycle, retried next tick
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No in-cycle retries: the poll interval is the retry schedule

pub mod timeouts;
