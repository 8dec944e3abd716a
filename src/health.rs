use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{error::now_rfc3339, state::AppState};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        .route("/health/live", get(live))
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: u64,
    pub version: &'static str,
    pub environment: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Probe {
    pub status: &'static str,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    pub message: &'static str,
}

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "healthy",
        timestamp: now_rfc3339(),
        uptime: state.started_at.elapsed().as_secs(),
        version: VERSION,
        environment: state.config.environment.as_str(),
    })
}

pub async fn ready() -> Json<Probe> {
    Json(Probe {
        status: "ready",
        timestamp: now_rfc3339(),
        uptime: None,
        message: "Service is ready to handle requests",
    })
}

pub async fn live(State(state): State<AppState>) -> Json<Probe> {
    Json(Probe {
        status: "alive",
        timestamp: now_rfc3339(),
        uptime: Some(state.started_at.elapsed().as_secs()),
        message: "Service is alive and running",
    })
}

#[derive(Debug, Serialize)]
pub struct Banner {
    pub message: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub timestamp: String,
    pub environment: &'static str,
}

pub async fn banner(State(state): State<AppState>) -> Json<Banner> {
    Json(Banner {
        message: "Task Management API",
        version: VERSION,
        status: "running",
        timestamp: now_rfc3339(),
        environment: state.config.environment.as_str(),
    })
}
