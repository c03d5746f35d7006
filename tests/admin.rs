//! Admin API routing and authentication.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header::AUTHORIZATION, Request, StatusCode};
use tower::ServiceExt;

use pod_balancer::admin::handlers::{MemberList, SystemStatus};
use pod_balancer::admin::{setup_admin_router, AdminState};
use pod_balancer::controller::{shared_view, MembershipView};

const KEY: &str = "test-admin-key";

fn state() -> AdminState {
    let view = shared_view();
    view.store(Arc::new(MembershipView {
        front_end_available: true,
        members: vec!["10.0.0.1:8080".parse::<SocketAddr>().unwrap()],
        events_processed: 7,
    }));
    AdminState::new(view, KEY)
}

fn request(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_missing_token_rejected() {
    let app = setup_admin_router(state());
    let response = app.oneshot(request("/admin/status", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_token_rejected() {
    let app = setup_admin_router(state());
    let response = app
        .oneshot(request("/admin/members", Some("nope")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_status_reports_view() {
    let app = setup_admin_router(state());
    let response = app
        .oneshot(request("/admin/status", Some(KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let status: SystemStatus = serde_json::from_slice(&body).unwrap();
    assert!(status.front_end_available);
    assert_eq!(status.members, 1);
    assert_eq!(status.events_processed, 7);
    assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_members_lists_addresses() {
    let app = setup_admin_router(state());
    let response = app
        .oneshot(request("/admin/members", Some(KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let list: MemberList = serde_json::from_slice(&body).unwrap();
    assert_eq!(list.members, vec!["10.0.0.1:8080".parse::<SocketAddr>().unwrap()]);
}
