use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServiceList {
    pub services: Vec<String>,
}

pub async fn get_status() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
    })
}

/// Registered service names. Base addresses stay private.
pub async fn get_services(State(state): State<AppState>) -> Json<ServiceList> {
    Json(ServiceList {
        services: state
            .registry
            .names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}
