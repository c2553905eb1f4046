use crate::errors::AuthError;
use crate::models::{Employee, TelegramLoginAssertion, TokenResponse, UserInfoResponse};
use crate::routes::AppState;
use crate::services::token_service;
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::instrument;

/// Handle Telegram login
///
/// POST /auth/telegram
///
/// Body rejections (bad JSON, wrong content type, missing fields) are turned
/// into 400 responses with the service's error body.
#[instrument(skip_all, name = "auth.handler.telegram_login")]
pub async fn handle_telegram_login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TelegramLoginAssertion>, JsonRejection>,
) -> Result<Json<TokenResponse>, AuthError> {
    let Json(assertion) = payload.map_err(|e| AuthError::MalformedPayload(e.body_text()))?;

    let token = token_service::login_with_telegram(
        &state.verifier,
        state.directory.as_ref(),
        &state.codec,
        state.config.auth_required_role,
        &assertion,
    )
    .await?;

    Ok(Json(token))
}

/// Handle current principal lookup
///
/// GET /auth/me (requires authentication)
#[instrument(skip_all, name = "auth.handler.me")]
pub async fn handle_me(Extension(employee): Extension<Employee>) -> Json<UserInfoResponse> {
    Json(UserInfoResponse::from(employee))
}
