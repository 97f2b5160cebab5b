//! nginx upstream reloader.
//!
//! Sidecar that keeps an nginx `upstream backend` block in sync with the
//! containers of linked services.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                        UPSTREAM RELOADER                          │
//!   │                                                                   │
//!   │  env *_TUTUM_API_URL ──▶ discovery::scanner                       │
//!   │                               │                                   │
//!   │                               ▼                                   │
//!   │        descriptor API ◀── discovery::client (deadline)            │
//!   │                               │ link_variables                    │
//!   │                               ▼                                   │
//!   │                        discovery::aggregator                      │
//!   │                               │ routes (sorted)                   │
//!   │                               ▼                                   │
//!   │                        render::nginx ──▶ diff ──▶ deploy::nginx ──┼──▶ nginx
//!   │                                                                   │
//!   │  lifecycle (signals) · observability (logs, metrics) · admin      │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;

use upstream_reloader::admin::{self, AdminState};
use upstream_reloader::config::{load_from_env, LoadedConfig};
use upstream_reloader::deploy::NginxDeployer;
use upstream_reloader::discovery::HttpServiceClient;
use upstream_reloader::lifecycle::{signals, Shutdown};
use upstream_reloader::observability::{logging, metrics};
use upstream_reloader::reconcile::{ProcessEnvironment, ReconcileSettings, Reconciler};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let LoadedConfig { config, warnings } = match load_from_env(std::env::vars_os().filter_map(
        |(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)),
    )) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("upstream-reloader: invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!("upstream-reloader v{} starting", env!("CARGO_PKG_VERSION"));
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    tracing::info!(
        port = %config.discovery.port,
        polling_period_secs = config.discovery.polling_period_secs,
        config_path = %config.deploy.config_path,
        reload_command = %config.deploy.reload_command,
        auth_configured = !config.discovery.auth.is_empty(),
        "Configuration loaded"
    );

    if let Some(address) = &config.observability.metrics_address {
        let addr: SocketAddr = address.parse()?;
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(metrics_address = %address, error = %e, "Failed to start metrics exporter");
        }
    }

    let shutdown = Shutdown::new();
    let loop_shutdown = shutdown.subscribe();

    let client = HttpServiceClient::new(Duration::from_secs(config.discovery.connect_timeout_secs))?;
    let deployer = NginxDeployer::new(&config.deploy);
    let reconciler = Reconciler::new(
        ReconcileSettings::from_config(&config),
        client,
        deployer,
        ProcessEnvironment,
    );

    let admin_task = match &config.admin.bind_address {
        Some(address) => {
            let listener = TcpListener::bind(address.as_str()).await?;
            let state = AdminState::new(reconciler.status(), config.admin.api_key.clone());
            let admin_shutdown = shutdown.subscribe();
            Some(tokio::spawn(async move {
                if let Err(e) = admin::serve(listener, state, admin_shutdown).await {
                    tracing::error!(error = %e, "Admin endpoint failed");
                }
            }))
        }
        None => None,
    };

    tokio::spawn(signals::wait_for_signal(shutdown.clone()));
    reconciler.run(loop_shutdown).await;

    if let Some(task) = admin_task {
        let _ = task.await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
