use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::DatasetOverview;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn overview(State(state): State<AppState>) -> Result<Json<DatasetOverview>, ApiError> {
    let snapshot = state.snapshot.read().await;
    Ok(Json(snapshot.overview()))
}
