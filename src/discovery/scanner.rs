//! Endpoint discovery from environment strings.
//!
//! # Responsibilities
//! - Split `KEY=VALUE` entries on the first `=`
//! - Select keys containing `_TUTUM_API_URL`
//! - Preserve source order of matching entries
//!
//! # Design Decisions
//! - Scanning is best-effort: rejected entries are dropped, never reported
//! - The value is kept verbatim, it may itself contain `=`

use thiserror::Error;

use crate::discovery::model::ApiEndpoint;

/// Marker that identifies an endpoint variable.
pub const API_URL_MARKER: &str = "_TUTUM_API_URL";

/// Why an environment entry is not an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("invalid environment entry, expected KEY=VALUE")]
    MissingSeparator,

    #[error("key does not contain _TUTUM_API_URL")]
    NotAnEndpoint,
}

/// Parse a single `KEY=VALUE` entry into an endpoint.
pub fn parse_endpoint(entry: &str) -> Result<ApiEndpoint, ScanError> {
    let (key, value) = entry.split_once('=').ok_or(ScanError::MissingSeparator)?;
    let index = key.find(API_URL_MARKER).ok_or(ScanError::NotAnEndpoint)?;

    Ok(ApiEndpoint {
        service_name: key[..index].to_string(),
        url: value.to_string(),
    })
}

/// Extract every endpoint from an environment snapshot, in source order.
pub fn scan<I, S>(environ: I) -> Vec<ApiEndpoint>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    environ
        .into_iter()
        .filter_map(|entry| parse_endpoint(entry.as_ref()).ok())
        .collect()
}
