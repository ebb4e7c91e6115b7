//! Comment endpoints, nested under a review.
//!
//! The review is resolved by id alone; the title segment of the path is
//! not re-checked against the review's actual title.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use critika_common::AppResult;
use critika_core::services::comment::{CommentDetails, CreateCommentInput, UpdateCommentInput};
use serde::Serialize;

use super::reviews::PageQuery;
use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{created, no_content},
};

/// Comment response. `author` is the author's username.
#[derive(Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub text: String,
    pub author: Option<String>,
    pub pub_date: String,
}

impl From<CommentDetails> for CommentResponse {
    fn from(details: CommentDetails) -> Self {
        Self {
            id: details.comment.id,
            text: details.comment.text,
            author: details.author_username,
            pub_date: details.comment.created_at.to_rfc3339(),
        }
    }
}

/// List comments on a review.
async fn list(
    State(state): State<AppState>,
    Path((_title_id, review_id)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    let limit = query.limit.min(100);
    let comments = state
        .comment_service
        .list(&review_id, limit, query.offset)
        .await?;

    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

/// Retrieve one comment.
async fn retrieve(
    State(state): State<AppState>,
    Path((_title_id, review_id, comment_id)): Path<(String, String, String)>,
) -> AppResult<Json<CommentResponse>> {
    let details = state.comment_service.get(&review_id, &comment_id).await?;

    Ok(Json(details.into()))
}

/// Post a comment.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((_title_id, review_id)): Path<(String, String)>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<(StatusCode, Json<CommentResponse>)> {
    let details = state
        .comment_service
        .create(&review_id, &user, input)
        .await?;

    Ok(created(details.into()))
}

/// Partially update a comment.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((_title_id, review_id, comment_id)): Path<(String, String, String)>,
    Json(input): Json<UpdateCommentInput>,
) -> AppResult<Json<CommentResponse>> {
    let details = state
        .comment_service
        .update(&review_id, &comment_id, &user, input)
        .await?;

    Ok(Json(details.into()))
}

/// Delete a comment.
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((_title_id, review_id, comment_id)): Path<(String, String, String)>,
) -> AppResult<StatusCode> {
    state
        .comment_service
        .delete(&review_id, &comment_id, &user)
        .await?;

    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{comment_id}/", get(retrieve).patch(update).delete(remove))
}
