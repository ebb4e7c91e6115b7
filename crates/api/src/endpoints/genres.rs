//! Genre endpoints. Public reads, admin writes, addressed by slug.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
};
use critika_common::AppResult;
use critika_core::permission;
use critika_core::services::catalog::CreateTaxonomyInput;
use critika_db::entities::genre;
use serde::Serialize;

use super::categories::ListQuery;
use crate::{
    extractors::MaybeAuthUser,
    middleware::AppState,
    response::{created, no_content},
};

/// Genre response.
#[derive(Serialize)]
pub struct GenreResponse {
    pub name: String,
    pub slug: String,
}

impl From<genre::Model> for GenreResponse {
    fn from(g: genre::Model) -> Self {
        Self {
            name: g.name,
            slug: g.slug,
        }
    }
}

/// List genres.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<GenreResponse>>> {
    let limit = query.limit.min(100);
    let genres = state
        .catalog_service
        .list_genres(query.search.as_deref(), limit, query.offset)
        .await?;

    Ok(Json(genres.into_iter().map(Into::into).collect()))
}

/// Create a genre (admin).
async fn create(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTaxonomyInput>,
) -> AppResult<(StatusCode, Json<GenreResponse>)> {
    permission::require_admin(user.as_ref())?;

    let genre = state.catalog_service.create_genre(input).await?;

    Ok(created(genre.into()))
}

/// Delete a genre by slug (admin).
async fn remove(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    permission::require_admin(user.as_ref())?;

    state.catalog_service.delete_genre(&slug).await?;

    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{slug}/", delete(remove))
}
