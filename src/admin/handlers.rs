use std::net::SocketAddr;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::admin::AdminState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub front_end_available: bool,
    pub members: usize,
    pub events_processed: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemberList {
    pub front_end_available: bool,
    pub members: Vec<SocketAddr>,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    let view = state.view.load();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        front_end_available: view.front_end_available,
        members: view.members.len(),
        events_processed: view.events_processed,
    })
}

pub async fn get_members(State(state): State<AdminState>) -> Json<MemberList> {
    let view = state.view.load();
    Json(MemberList {
        front_end_available: view.front_end_available,
        members: view.members.clone(),
    })
}
