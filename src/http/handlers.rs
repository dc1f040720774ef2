//! Inbound handlers for the user operations and health probes.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::health::{self, HealthReport};
use crate::http::server::AppState;
use crate::users::{ProxyError, RegistrationRequest, UserResponse};

/// `GET /api/users/{user_id}/validate`
///
/// An id segment that does not decode is reported as `INVALID_REQUEST`.
pub async fn validate_user(
    State(state): State<AppState>,
    user_id: Result<Path<String>, PathRejection>,
) -> Result<Json<bool>, ProxyError> {
    let Path(user_id) = user_id.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected user id");
        ProxyError::invalid_request(format!("Invalid user ID: {}", rejection.body_text()))
    })?;

    state.users.validate_user(&user_id).await.map(Json)
}

/// `POST /api/users/register`
///
/// A body that is missing or not a JSON object is reported as
/// `INVALID_REQUEST` without reaching the user service.
pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ProxyError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected registration body");
        ProxyError::invalid_request(format!(
            "Register request cannot be null: {}",
            rejection.body_text()
        ))
    })?;

    state.users.register_user(request).await.map(Json)
}

/// `GET /health`
pub async fn health() -> Json<HealthReport> {
    Json(HealthReport::up())
}

/// `GET /ready`
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let report = health::readiness(&state.users, &state.user_service_url).await;
    let status = if report.is_up() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
