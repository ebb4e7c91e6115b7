//! API response helpers.
//!
//! Handlers return plain JSON bodies; errors take the
//! `{"error":{"code","message"}}` shape via `AppError`.

use axum::{Json, http::StatusCode};
use serde::Serialize;

/// 201 Created with a JSON body.
pub fn created<T: Serialize>(body: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(body))
}

/// 204 No Content.
#[must_use]
pub const fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}
