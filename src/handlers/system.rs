use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Clone)]
pub struct SystemState {
    pub version: String,
    pub env: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
pub struct VersionResponse {
    version: String,
    env: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn version(State(state): State<SystemState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        version: state.version,
        env: state.env,
    })
}
