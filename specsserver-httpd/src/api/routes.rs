use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use shared::types::ServerStatus;

#[derive(Clone)]
pub struct AppState {
    /// Hostname the operator announces, e.g. "specsserver.local"
    pub hostname: String,
    /// System hostname of the machine actually serving
    pub machine: String,
    pub started_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct EndpointHelp {
    pub path: &'static str,
    pub description: &'static str,
}

/// What a LAN client sees when it hits the bare hostname.
#[derive(Serialize)]
pub struct Descriptor {
    pub service: &'static str,
    pub version: &'static str,
    pub hostname: String,
    pub machine: String,
    pub endpoints: Vec<EndpointHelp>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_index))
        .route("/healthz", get(get_healthz))
        .with_state(state)
}

async fn get_index(State(state): State<AppState>) -> Json<Descriptor> {
    Json(Descriptor {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        hostname: state.hostname.clone(),
        machine: state.machine.clone(),
        endpoints: vec![
            EndpointHelp {
                path: "/",
                description: "this descriptor",
            },
            EndpointHelp {
                path: "/healthz",
                description: "liveness and uptime",
            },
        ],
    })
}

async fn get_healthz(State(state): State<AppState>) -> Json<ServerStatus> {
    let now = Utc::now();
    Json(ServerStatus {
        status: "ok".to_string(),
        hostname: state.hostname.clone(),
        machine: state.machine.clone(),
        started_at: state.started_at,
        uptime_secs: (now - state.started_at).num_seconds(),
    })
}
