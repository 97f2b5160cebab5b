//! Admin status endpoint.

use axum::body::{to_bytes, Body};
use axum::http::{header::AUTHORIZATION, Request, StatusCode};
use tower::ServiceExt;

use upstream_reloader::admin::{setup_admin_router, AdminState};
use upstream_reloader::reconcile::{CycleReport, EndpointOutcome, EndpointReport, StatusHandle};

fn report(cycle: u64) -> CycleReport {
    CycleReport::new(
        cycle,
        vec![
            EndpointReport {
                service_name: "WEB".to_string(),
                url: "https://x/1".to_string(),
                routes: 2,
                outcome: EndpointOutcome::Deployed,
            },
            EndpointReport {
                service_name: "API".to_string(),
                url: "https://x/2".to_string(),
                routes: 0,
                outcome: EndpointOutcome::Failed("unexpected status 500".to_string()),
            },
        ],
        b"\nupstream backend {\n\tserver 10.0.0.1:80;\n\n}",
    )
}

async fn get(state: AdminState, uri: &str, token: Option<&str>) -> (StatusCode, String) {
    let mut request = Request::builder().uri(uri);
    if let Some(token) = token {
        request = request.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    let response = setup_admin_router(state)
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_status_before_first_cycle() {
    let state = AdminState::new(StatusHandle::new(), None);
    let (status, body) = get(state, "/admin/status", None).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "starting");
    assert!(json["cycle"].is_null());
}

#[tokio::test]
async fn test_status_reports_latest_cycle_counts() {
    let handle = StatusHandle::new();
    handle.publish(report(7));
    let (status, body) = get(AdminState::new(handle, None), "/admin/status", None).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "operational");
    assert_eq!(json["cycle"], 7);
    assert_eq!(json["deployed"], 1);
    assert_eq!(json["failed"], 1);
}

#[tokio::test]
async fn test_report_and_config() {
    let handle = StatusHandle::new();
    let state = AdminState::new(handle.clone(), None);

    let (status, _) = get(state.clone(), "/admin/report", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    handle.publish(report(1));

    let (status, body) = get(state.clone(), "/admin/report", None).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["endpoints"][1]["outcome"]["status"], "failed");
    assert_eq!(json["endpoints"][1]["outcome"]["reason"], "unexpected status 500");

    let (status, body) = get(state, "/admin/config", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\tserver 10.0.0.1:80;"));
}

#[tokio::test]
async fn test_api_key_is_enforced() {
    let state = AdminState::new(StatusHandle::new(), Some("admin-secret".to_string()));

    let (status, _) = get(state.clone(), "/admin/status", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get(state.clone(), "/admin/status", Some("wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get(state, "/admin/status", Some("admin-secret")).await;
    assert_eq!(status, StatusCode::OK);
}
