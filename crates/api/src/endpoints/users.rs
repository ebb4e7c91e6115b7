//! User endpoints: admin CRUD by username, plus `/me/` self-service.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use critika_common::AppResult;
use critika_core::permission;
use critika_core::services::user::{CreateUserInput, UpdateUserInput};
use critika_db::entities::user::{self, UserRole};
use serde::Serialize;

use super::categories::ListQuery;
use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{created, no_content},
};

/// User response.
#[derive(Serialize)]
pub struct UserResponse {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub role: UserRole,
    pub email: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            first_name: u.first_name,
            last_name: u.last_name,
            username: u.username,
            bio: u.bio,
            role: u.role,
            email: u.email,
        }
    }
}

/// List users (admin). `search` filters by username substring.
async fn list(
    MaybeAuthUser(caller): MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    permission::require_admin(caller.as_ref())?;

    let limit = query.limit.min(100);
    let users = state
        .user_service
        .list(query.search.as_deref(), limit, query.offset)
        .await?;

    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Create a user (admin).
async fn create(
    MaybeAuthUser(caller): MaybeAuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    permission::require_admin(caller.as_ref())?;

    let user = state.user_service.create(input).await?;

    Ok(created(user.into()))
}

/// Get the caller's own profile.
async fn me(AuthUser(user): AuthUser) -> AppResult<Json<UserResponse>> {
    Ok(Json(user.into()))
}

/// Update the caller's own profile.
///
/// Shares the admin write shape, `role` included.
async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<Json<UserResponse>> {
    let updated = state.user_service.update_self(user, input).await?;

    Ok(Json(updated.into()))
}

/// Get a user by username (admin).
async fn retrieve(
    MaybeAuthUser(caller): MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserResponse>> {
    permission::require_admin(caller.as_ref())?;

    let user = state.user_service.get_by_username(&username).await?;

    Ok(Json(user.into()))
}

/// Partially update a user by username (admin).
async fn update(
    MaybeAuthUser(caller): MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<Json<UserResponse>> {
    permission::require_admin(caller.as_ref())?;

    let user = state.user_service.update_by_username(&username, input).await?;

    Ok(Json(user.into()))
}

/// Delete a user by username (admin).
async fn remove(
    MaybeAuthUser(caller): MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<StatusCode> {
    permission::require_admin(caller.as_ref())?;

    state.user_service.delete_by_username(&username).await?;

    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/me/", get(me).patch(update_me))
        .route("/{username}/", get(retrieve).patch(update).delete(remove))
}
