//! Authentication handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::auth::AuthTokens;
use crate::services::{AuthService, PgReportStore};
use crate::AppState;

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthTokens>> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let auth_service = AuthService::new(PgReportStore::new(state.db.clone()), &state.config);
    let tokens = auth_service.login(&body.email, &body.password).await?;

    Ok(Json(tokens))
}
