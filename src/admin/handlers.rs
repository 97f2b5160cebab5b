use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::admin::AdminState;
use crate::reconcile::CycleReport;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    /// `starting` until the first cycle completes, then `operational`.
    pub status: &'static str,
    pub cycle: Option<u64>,
    pub deployed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    let latest = state.status.latest();
    Json(match latest.as_deref() {
        Some(report) => SystemStatus {
            version: env!("CARGO_PKG_VERSION"),
            status: "operational",
            cycle: Some(report.cycle),
            deployed: report.deployed(),
            unchanged: report.unchanged(),
            failed: report.failed(),
        },
        None => SystemStatus {
            version: env!("CARGO_PKG_VERSION"),
            status: "starting",
            cycle: None,
            deployed: 0,
            unchanged: 0,
            failed: 0,
        },
    })
}

pub async fn get_report(State(state): State<AdminState>) -> Result<Json<CycleReport>, StatusCode> {
    state
        .status
        .latest()
        .map(|report| Json(report.as_ref().clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn get_config(State(state): State<AdminState>) -> Result<String, StatusCode> {
    state
        .status
        .latest()
        .map(|report| report.deployed_config.clone())
        .ok_or(StatusCode::NOT_FOUND)
}
