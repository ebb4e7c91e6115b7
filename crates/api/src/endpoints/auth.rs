//! Authentication endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use critika_common::{AppResult, TokenPair};
use critika_core::services::auth::{ExchangeCodeInput, RefreshInput, RequestCodeInput};
use serde::Serialize;

use crate::{middleware::AppState, response::created};

/// Confirmation-code request acknowledgment.
#[derive(Serialize)]
pub struct RequestCodeResponse {
    pub email: String,
}

/// Refreshed access token.
#[derive(Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Mail a confirmation code to an address.
async fn request_code(
    State(state): State<AppState>,
    Json(input): Json<RequestCodeInput>,
) -> AppResult<(StatusCode, Json<RequestCodeResponse>)> {
    let email = input.email.clone();
    state.auth_service.request_code(input).await?;

    Ok(created(RequestCodeResponse { email }))
}

/// Exchange a confirmation code for an access/refresh token pair.
async fn obtain_token(
    State(state): State<AppState>,
    Json(input): Json<ExchangeCodeInput>,
) -> AppResult<(StatusCode, Json<TokenPair>)> {
    let pair = state.auth_service.exchange_code(input).await?;

    Ok(created(pair))
}

/// Exchange a refresh token for a new access token.
async fn refresh_token(
    State(state): State<AppState>,
    Json(input): Json<RefreshInput>,
) -> AppResult<(StatusCode, Json<RefreshResponse>)> {
    let access = state.auth_service.refresh(input).await?;

    Ok(created(RefreshResponse { access }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/email/", post(request_code))
        .route("/token/", post(obtain_token))
        .route("/token/refresh/", post(refresh_token))
}
