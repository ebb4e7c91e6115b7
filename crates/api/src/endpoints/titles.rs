//! Title endpoints. Public reads with filters, admin writes.
//!
//! Reads embed the nested category and genre objects plus the computed
//! rating; writes reference category and genres by slug.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use critika_common::AppResult;
use critika_core::permission;
use critika_core::services::catalog::{CreateTitleInput, TitleDetails, UpdateTitleInput};
use critika_db::repositories::TitleFilter;
use serde::{Deserialize, Serialize};

use super::categories::{CategoryResponse, default_limit};
use super::genres::GenreResponse;
use super::reviews;
use crate::{
    extractors::MaybeAuthUser,
    middleware::AppState,
    response::{created, no_content},
};

/// Title response with nested taxonomy and computed rating.
#[derive(Serialize)]
pub struct TitleResponse {
    pub id: String,
    pub name: String,
    pub year: i32,
    /// Mean review score; null when the title has no reviews.
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub genre: Vec<GenreResponse>,
    pub category: Option<CategoryResponse>,
}

impl From<TitleDetails> for TitleResponse {
    fn from(details: TitleDetails) -> Self {
        Self {
            id: details.title.id,
            name: details.title.name,
            year: details.title.year,
            rating: details.rating,
            description: details.title.description,
            genre: details.genres.into_iter().map(Into::into).collect(),
            category: details.category.map(Into::into),
        }
    }
}

/// List query: the four filters plus pagination.
#[derive(Debug, Deserialize)]
pub struct TitleListQuery {
    pub genre: Option<String>,
    pub category: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// List titles matching the filters.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<TitleListQuery>,
) -> AppResult<Json<Vec<TitleResponse>>> {
    let limit = query.limit.min(100);
    let filter = TitleFilter {
        genre: query.genre,
        category: query.category,
        name: query.name,
        year: query.year,
    };

    let titles = state
        .catalog_service
        .list_titles(&filter, limit, query.offset)
        .await?;

    Ok(Json(titles.into_iter().map(Into::into).collect()))
}

/// Retrieve one title.
async fn retrieve(
    State(state): State<AppState>,
    Path(title_id): Path<String>,
) -> AppResult<Json<TitleResponse>> {
    let details = state.catalog_service.get_title(&title_id).await?;

    Ok(Json(details.into()))
}

/// Create a title (admin).
async fn create(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTitleInput>,
) -> AppResult<(StatusCode, Json<TitleResponse>)> {
    permission::require_admin(user.as_ref())?;

    let details = state.catalog_service.create_title(input).await?;

    Ok(created(details.into()))
}

/// Partially update a title (admin).
async fn update(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(title_id): Path<String>,
    Json(input): Json<UpdateTitleInput>,
) -> AppResult<Json<TitleResponse>> {
    permission::require_admin(user.as_ref())?;

    let details = state.catalog_service.update_title(&title_id, input).await?;

    Ok(Json(details.into()))
}

/// Delete a title (admin). Reviews and their comments cascade away.
async fn remove(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(title_id): Path<String>,
) -> AppResult<StatusCode> {
    permission::require_admin(user.as_ref())?;

    state.catalog_service.delete_title(&title_id).await?;

    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{title_id}/", get(retrieve).patch(update).delete(remove))
        .nest("/{title_id}/reviews", reviews::router())
}
