//! Read-only status endpoint.
//!
//! - `GET /admin/status`: version and counts from the latest cycle
//! - `GET /admin/report`: the latest full cycle report
//! - `GET /admin/config`: the config currently considered deployed

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::reconcile::StatusHandle;

#[derive(Clone)]
pub struct AdminState {
    pub status: StatusHandle,
    pub api_key: Option<Arc<str>>,
}

impl AdminState {
    pub fn new(status: StatusHandle, api_key: Option<String>) -> Self {
        Self {
            status,
            api_key: api_key.map(Arc::from),
        }
    }
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/report", get(get_report))
        .route("/admin/config", get(get_config))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}

/// Serve the admin router until `shutdown` fires.
pub async fn serve(
    listener: TcpListener,
    state: AdminState,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Admin endpoint listening");

    axum::serve(listener, setup_admin_router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("Admin endpoint stopped");
    Ok(())
}
