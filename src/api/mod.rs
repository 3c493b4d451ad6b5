//! REST API endpoints.
//!
//! Axum-based HTTP API serving the derived tournament statistics:
//! archetypes, players, cards, matchups and the metagame breakdown.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::calculate::CalculateError;
use crate::storage::StorageError;

use self::state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CalculateError> for ApiError {
    fn from(err: CalculateError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// CORS policy from the configured origin; `*` allows any origin.
fn cors_layer(origin: &str) -> CorsLayer {
    let allow = if origin == "*" {
        AllowOrigin::any()
    } else {
        match origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!("Invalid CORS origin {:?}, allowing any", origin);
                AllowOrigin::any()
            }
        }
    };
    CorsLayer::new().allow_origin(allow)
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origin);

    let api = Router::new()
        .route("/health", get(routes::overview::health))
        .route("/overview", get(routes::overview::overview))
        .route("/archetypes", get(routes::archetypes::list_archetypes))
        .route("/archetypes/:name", get(routes::archetypes::archetype_detail))
        .route("/players", get(routes::players::list_players))
        .route("/players/:name", get(routes::players::player_detail))
        .route("/cards", get(routes::cards::list_cards))
        .route("/cards/:name", get(routes::cards::card_detail))
        .route("/matchups", get(routes::matchups::matchup_grid))
        .route("/matchups/:archetype/:opponent", get(routes::matchups::matchup_detail))
        .route("/metagame", get(routes::metagame::metagame))
        .route("/reload", post(routes::reload::reload));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
