//! Backend discovery subsystem.
//!
//! # Data Flow
//! ```text
//! Process environment (KEY=VALUE)
//!     → scanner.rs (select *_TUTUM_API_URL entries)
//!     → Vec<ApiEndpoint>
//!
//! Per endpoint:
//!     → client.rs (GET descriptor URL, Authorization: TUTUM_AUTH)
//!     → ServiceDescriptor.link_variables
//!     → aggregator.rs (group {CONTAINER}_PORT_{N}_TCP_{ADDR,PORT})
//!     → Vec<BackendRoute>, sorted by container name
//! ```
//!
//! # Design Decisions
//! - Scanning and aggregation are pure and never fail outward
//! - Only the client performs I/O

pub mod aggregator;
pub mod client;
pub mod model;
pub mod scanner;

pub use aggregator::{aggregate, link_filter};
pub use client::{FetchError, HttpServiceClient, ServiceClient};
pub use model::{ApiEndpoint, BackendRoute, ServiceDescriptor};
pub use scanner::{parse_endpoint, scan, ScanError};
