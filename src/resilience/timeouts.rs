//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap descriptor fetches with a deadline
//! - Cancel the in-flight request cleanly when the deadline passes
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other fetch errors

use std::time::Duration;

use tokio::time::timeout;

use crate::discovery::{FetchError, ServiceClient, ServiceDescriptor};

/// Fetch a descriptor, failing with [`FetchError::Timeout`] after `limit`.
pub async fn fetch_with_deadline<C: ServiceClient>(
    client: &C,
    url: &str,
    auth: &str,
    limit: Duration,
) -> Result<ServiceDescriptor, FetchError> {
    match timeout(limit, client.fetch(url, auth)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(limit.as_secs())),
    }
}
