//! Read-only admin API.
//!
//! # Responsibilities
//! - Expose the controller's published membership view over HTTP
//! - Require a bearer token on every route
//!
//! # Design Decisions
//! - Handlers only read the `ArcSwap` view; they never touch the tracker
//! - Served on its own listener so it never shares a port with metrics

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use self::auth::admin_auth_middleware;
use self::handlers::{get_members, get_status};
use crate::controller::SharedView;

#[derive(Clone)]
pub struct AdminState {
    pub view: SharedView,
    pub api_key: Arc<str>,
}

impl AdminState {
    pub fn new(view: SharedView, api_key: &str) -> Self {
        Self {
            view,
            api_key: Arc::from(api_key),
        }
    }
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/members", get(get_members))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the admin router until shutdown is signalled.
pub async fn serve(
    listener: TcpListener,
    state: AdminState,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    tracing::info!(address = ?listener.local_addr().ok(), "Admin API listening");
    axum::serve(listener, setup_admin_router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
}
