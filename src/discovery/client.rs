//! Service descriptor client.
//!
//! # Responsibilities
//! - Fetch a service document from its descriptor URL
//! - Forward the configured credential as the `Authorization` header
//! - Decode `link_variables` out of the JSON body
//!
//! # Design Decisions
//! - The reconcile loop only sees the [`ServiceClient`] trait, so tests and
//!   alternate transports plug in without HTTP
//! - Deadlines are enforced by the caller (see `resilience::timeouts`), the
//!   HTTP client only carries a connect timeout

use std::future::Future;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use thiserror::Error;
use url::Url;

use crate::discovery::model::ServiceDescriptor;

/// Errors that can occur while fetching a service descriptor.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The descriptor URL could not be parsed.
    #[error("invalid descriptor URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Transport-level failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// The body was not a valid service document.
    #[error("invalid service document: {0}")]
    Decode(#[from] serde_json::Error),

    /// The fetch did not complete within its deadline.
    #[error("fetch timed out after {0} seconds")]
    Timeout(u64),
}

/// Fetches service descriptors.
pub trait ServiceClient: Send + Sync {
    fn fetch(
        &self,
        url: &str,
        auth: &str,
    ) -> impl Future<Output = Result<ServiceDescriptor, FetchError>> + Send;
}

/// HTTP implementation of [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct HttpServiceClient {
    client: reqwest::Client,
}

impl HttpServiceClient {
    /// Create a client with the given connect timeout.
    pub fn new(connect_timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("upstream-reloader/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl ServiceClient for HttpServiceClient {
    async fn fetch(&self, url: &str, auth: &str) -> Result<ServiceDescriptor, FetchError> {
        let url = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, auth)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
