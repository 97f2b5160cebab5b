//! The reconcile loop.

use std::ffi::OsString;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::sleep;

use crate::config::ReloaderConfig;
use crate::deploy::Deployer;
use crate::discovery::{aggregate, link_filter, scan, ApiEndpoint, ServiceClient};
use crate::observability::metrics;
use crate::reconcile::report::{CycleReport, EndpointOutcome, EndpointReport, StatusHandle};
use crate::render::render;
use crate::resilience::timeouts::fetch_with_deadline;

/// Source of `KEY=VALUE` environment entries, re-read every cycle.
pub trait EnvironmentSource: Send + Sync {
    fn snapshot(&self) -> Vec<String>;
}

/// The live process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl EnvironmentSource for ProcessEnvironment {
    fn snapshot(&self) -> Vec<String> {
        std::env::vars_os()
            .filter_map(|(key, value)| utf8_entry(key, value))
            .collect()
    }
}

/// `KEY=VALUE` for entries that are valid UTF-8 on both sides.
fn utf8_entry(key: OsString, value: OsString) -> Option<String> {
    match (key.into_string(), value.into_string()) {
        (Ok(key), Ok(value)) => Some(format!("{}={}", key, value)),
        (key, _) => {
            let key = match key {
                Ok(key) => key,
                Err(raw) => raw.to_string_lossy().into_owned(),
            };
            tracing::debug!(key = %key, "Skipping environment entry that is not valid UTF-8");
            None
        }
    }
}

impl EnvironmentSource for Vec<String> {
    fn snapshot(&self) -> Vec<String> {
        self.clone()
    }
}

/// Settings the loop needs, extracted once from [`ReloaderConfig`].
#[derive(Debug, Clone)]
pub struct ReconcileSettings {
    pub link_filter: String,
    pub auth: String,
    pub fetch_timeout: Duration,
    pub polling_period: Duration,
}

impl ReconcileSettings {
    pub fn from_config(config: &ReloaderConfig) -> Self {
        Self {
            link_filter: link_filter(&config.discovery.port),
            auth: config.discovery.auth.clone(),
            fetch_timeout: Duration::from_secs(config.discovery.fetch_timeout_secs),
            polling_period: Duration::from_secs(config.discovery.polling_period_secs),
        }
    }
}

/// Keeps the proxy config in sync with the discovered backends.
///
/// `last_deployed` is the change-detection baseline. It starts empty and only
/// moves forward after a successful deploy, so a failed deploy is retried on
/// the next cycle as long as the rendered config still differs.
pub struct Reconciler<C, D, E> {
    settings: ReconcileSettings,
    client: C,
    deployer: D,
    environment: E,
    last_deployed: Vec<u8>,
    cycles: u64,
    status: StatusHandle,
}

impl<C, D, E> Reconciler<C, D, E>
where
    C: ServiceClient,
    D: Deployer,
    E: EnvironmentSource,
{
    pub fn new(settings: ReconcileSettings, client: C, deployer: D, environment: E) -> Self {
        Self {
            settings,
            client,
            deployer,
            environment,
            last_deployed: Vec::new(),
            cycles: 0,
            status: StatusHandle::new(),
        }
    }

    /// Publish cycle reports to `status` instead of a private handle.
    pub fn with_status(mut self, status: StatusHandle) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> StatusHandle {
        self.status.clone()
    }

    pub fn last_deployed(&self) -> &[u8] {
        &self.last_deployed
    }

    /// Run cycles until `shutdown` fires.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            link_filter = %self.settings.link_filter,
            polling_period_secs = self.settings.polling_period.as_secs(),
            fetch_timeout_secs = self.settings.fetch_timeout.as_secs(),
            "Reconcile loop starting"
        );

        loop {
            if self.cycle(Some(&mut shutdown)).await.is_none() {
                tracing::info!("Reconcile loop received shutdown signal during fetch, exiting loop");
                break;
            }

            tokio::select! {
                _ = sleep(self.settings.polling_period) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Reconcile loop received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// One scan → fetch → aggregate → render → diff → deploy pass.
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.cycle(None)
            .await
            .unwrap_or_else(|| CycleReport::new(self.cycles, Vec::new(), &self.last_deployed))
    }

    /// Runs one pass. With a `shutdown` receiver, a pending fetch is abandoned
    /// when it fires and `None` is returned without publishing a report. A
    /// deploy that already started always runs to completion; the signal stays
    /// queued in the receiver for the caller.
    async fn cycle(
        &mut self,
        mut shutdown: Option<&mut broadcast::Receiver<()>>,
    ) -> Option<CycleReport> {
        self.cycles += 1;
        let endpoints = scan(self.environment.snapshot());
        if endpoints.is_empty() {
            tracing::debug!(cycle = self.cycles, "No service endpoints discovered");
        }

        let mut reports = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            let report = self
                .reconcile_endpoint(endpoint, shutdown.as_deref_mut())
                .await?;
            reports.push(report);
        }

        let report = CycleReport::new(self.cycles, reports, &self.last_deployed);
        metrics::record_cycle();
        if report.failed() > 0 {
            tracing::warn!(
                cycle = report.cycle,
                deployed = report.deployed(),
                unchanged = report.unchanged(),
                failed = report.failed(),
                "Cycle finished with failures"
            );
        } else {
            tracing::debug!(
                cycle = report.cycle,
                deployed = report.deployed(),
                unchanged = report.unchanged(),
                "Cycle finished"
            );
        }

        self.status.publish(report.clone());
        Some(report)
    }

    async fn reconcile_endpoint(
        &mut self,
        endpoint: ApiEndpoint,
        shutdown: Option<&mut broadcast::Receiver<()>>,
    ) -> Option<EndpointReport> {
        let fetch = fetch_with_deadline(
            &self.client,
            &endpoint.url,
            &self.settings.auth,
            self.settings.fetch_timeout,
        );
        let fetched = match shutdown {
            Some(shutdown) => tokio::select! {
                result = fetch => result,
                _ = shutdown.recv() => {
                    tracing::debug!(service = %endpoint.service_name, "Abandoning fetch on shutdown");
                    return None;
                }
            },
            None => fetch.await,
        };

        let descriptor = match fetched {
            Ok(descriptor) => descriptor,
            Err(e) => {
                tracing::warn!(
                    service = %endpoint.service_name,
                    url = %endpoint.url,
                    error = %e,
                    "Failed to get service, skipping until next cycle"
                );
                metrics::record_fetch_failure(&endpoint.service_name);
                return Some(EndpointReport {
                    service_name: endpoint.service_name,
                    url: endpoint.url,
                    routes: 0,
                    outcome: EndpointOutcome::Failed(e.to_string()),
                });
            }
        };

        let routes = aggregate(&self.settings.link_filter, &descriptor.link_variables);
        metrics::record_backend_routes(&endpoint.service_name, routes.len());
        let config = render(&routes);

        let outcome = if config == self.last_deployed {
            EndpointOutcome::Unchanged
        } else {
            tracing::info!(service = %endpoint.service_name, routes = routes.len(), "Deploying config");
            tracing::debug!(config = %String::from_utf8_lossy(&config), "Rendered config");

            match self.deployer.deploy(&config).await {
                Ok(()) => {
                    metrics::record_deploy(true);
                    self.last_deployed = config;
                    EndpointOutcome::Deployed
                }
                Err(e) => {
                    metrics::record_deploy(false);
                    tracing::error!(
                        service = %endpoint.service_name,
                        error = %e,
                        "Failed to deploy config, will retry next cycle"
                    );
                    EndpointOutcome::Failed(e.to_string())
                }
            }
        };

        Some(EndpointReport {
            service_name: endpoint.service_name,
            url: endpoint.url,
            routes: routes.len(),
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::ffi::OsStringExt;

    #[test]
    fn test_utf8_entry_joins_key_and_value() {
        let entry = utf8_entry(
            OsString::from("WEB_TUTUM_API_URL"),
            OsString::from("https://x/api/v1/service/1/"),
        );
        assert_eq!(
            entry.as_deref(),
            Some("WEB_TUTUM_API_URL=https://x/api/v1/service/1/")
        );
    }

    #[test]
    fn test_utf8_entry_skips_invalid_value() {
        let value = OsString::from_vec(vec![b'h', b't', 0xff, 0xfe]);
        assert_eq!(utf8_entry(OsString::from("WEB_TUTUM_API_URL"), value), None);
    }

    #[test]
    fn test_utf8_entry_skips_invalid_key() {
        let key = OsString::from_vec(vec![0xff, b'_', b'X']);
        assert_eq!(utf8_entry(key, OsString::from("1")), None);
    }
}
