//! Review endpoints, nested under a title.
//!
//! Anyone may read; any authenticated user may post one review per title;
//! PATCH/DELETE require the author, a moderator, an admin, or staff.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use critika_common::AppResult;
use critika_core::services::review::{CreateReviewInput, ReviewDetails, UpdateReviewInput};
use serde::{Deserialize, Serialize};

use super::categories::default_limit;
use super::comments;
use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{created, no_content},
};

/// Review response. `author` is the author's username.
#[derive(Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub text: String,
    pub author: Option<String>,
    pub score: i16,
    pub pub_date: String,
}

impl From<ReviewDetails> for ReviewResponse {
    fn from(details: ReviewDetails) -> Self {
        Self {
            id: details.review.id,
            text: details.review.text,
            author: details.author_username,
            score: details.review.score,
            pub_date: details.review.created_at.to_rfc3339(),
        }
    }
}

/// Pagination query.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// List reviews on a title.
async fn list(
    State(state): State<AppState>,
    Path(title_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<ReviewResponse>>> {
    let limit = query.limit.min(100);
    let reviews = state
        .review_service
        .list(&title_id, limit, query.offset)
        .await?;

    Ok(Json(reviews.into_iter().map(Into::into).collect()))
}

/// Retrieve one review.
async fn retrieve(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(String, String)>,
) -> AppResult<Json<ReviewResponse>> {
    let details = state.review_service.get(&title_id, &review_id).await?;

    Ok(Json(details.into()))
}

/// Post a review. One per (author, title).
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(title_id): Path<String>,
    Json(input): Json<CreateReviewInput>,
) -> AppResult<(StatusCode, Json<ReviewResponse>)> {
    let details = state.review_service.create(&title_id, &user, input).await?;

    Ok(created(details.into()))
}

/// Partially update a review.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(String, String)>,
    Json(input): Json<UpdateReviewInput>,
) -> AppResult<Json<ReviewResponse>> {
    let details = state
        .review_service
        .update(&title_id, &review_id, &user, input)
        .await?;

    Ok(Json(details.into()))
}

/// Delete a review. Its comments cascade away.
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    state
        .review_service
        .delete(&title_id, &review_id, &user)
        .await?;

    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{review_id}/", get(retrieve).patch(update).delete(remove))
        .nest("/{review_id}/comments", comments::router())
}
