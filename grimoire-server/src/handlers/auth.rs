//! Handlers for `/api/auth` (signup, login)

use super::MessageResponse;
use crate::auth::jwt::issue_token;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use grimoire_core::CatalogError;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for signup and login
#[derive(Debug, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: String,
    pub token: String,
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let Json(input) = body?;
    input.validate().map_err(CatalogError::from)?;

    state.accounts.signup(&input.email, &input.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created!",
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(input) = body?;
    let account = state
        .accounts
        .authenticate(&input.email, &input.password)
        .await?;

    let token = issue_token(&account.id, &state.config.jwt)
        .map_err(|e| ApiError::Internal(format!("could not issue token: {e}")))?;

    Ok(Json(LoginResponse {
        user_id: account.id.to_string(),
        token,
    }))
}
