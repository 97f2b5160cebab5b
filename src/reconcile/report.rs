//! Per-cycle results.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use arc_swap::ArcSwapOption;
use serde::Serialize;

/// What happened to one endpoint during a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum EndpointOutcome {
    /// The rendered config changed and was written and reloaded.
    Deployed,
    /// The rendered config matched the last deployed one.
    Unchanged,
    /// Fetch or deploy failed; retried next cycle.
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointReport {
    pub service_name: String,
    pub url: String,
    /// Routes aggregated from the descriptor (before address dedup).
    pub routes: usize,
    pub outcome: EndpointOutcome,
}

/// Summary of one reconcile cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// 1-based cycle counter since startup.
    pub cycle: u64,
    /// Unix timestamp (seconds) at which the cycle finished.
    pub finished_at: u64,
    pub endpoints: Vec<EndpointReport>,
    /// The config currently considered deployed.
    pub deployed_config: String,
}

impl CycleReport {
    pub fn new(cycle: u64, endpoints: Vec<EndpointReport>, deployed_config: &[u8]) -> Self {
        let finished_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self {
            cycle,
            finished_at,
            endpoints,
            deployed_config: String::from_utf8_lossy(deployed_config).into_owned(),
        }
    }

    pub fn deployed(&self) -> usize {
        self.count(|o| matches!(o, EndpointOutcome::Deployed))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, EndpointOutcome::Unchanged))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, EndpointOutcome::Failed(_)))
    }

    fn count(&self, f: impl Fn(&EndpointOutcome) -> bool) -> usize {
        self.endpoints.iter().filter(|e| f(&e.outcome)).count()
    }
}

/// Latest cycle report, shared between the loop and readers.
#[derive(Debug, Clone, Default)]
pub struct StatusHandle {
    latest: Arc<ArcSwapOption<CycleReport>>,
}

impl StatusHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, report: CycleReport) {
        self.latest.store(Some(Arc::new(report)));
    }

    pub fn latest(&self) -> Option<Arc<CycleReport>> {
        self.latest.load_full()
    }
}
