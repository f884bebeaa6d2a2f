//! Registration endpoint

use axum::{extract::State, http::StatusCode};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, UserResponse};
use crate::domain::RegistrationRequest;

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegistrationRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    debug!(phone = %request.phone, "Registration request");

    let user = state.user_service.register(&request).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}
