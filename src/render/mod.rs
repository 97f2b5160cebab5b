//! Proxy configuration rendering.
//!
//! # Data Flow
//! ```text
//! Vec<BackendRoute> (sorted by container name)
//!     → nginx.rs (upstream block + passthrough server block)
//!     → config bytes
//! ```
//!
//! # Design Decisions
//! - Output depends only on the route sequence (no timestamps, no env)
//! - Deduplication key is the full `address:port` string

pub mod nginx;

pub use nginx::render;
