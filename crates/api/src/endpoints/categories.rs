//! Category endpoints. Public reads, admin writes, addressed by slug.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
};
use critika_common::AppResult;
use critika_core::permission;
use critika_core::services::catalog::CreateTaxonomyInput;
use critika_db::entities::category;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::MaybeAuthUser,
    middleware::AppState,
    response::{created, no_content},
};

/// Category response.
#[derive(Serialize)]
pub struct CategoryResponse {
    pub name: String,
    pub slug: String,
}

impl From<category::Model> for CategoryResponse {
    fn from(c: category::Model) -> Self {
        Self {
            name: c.name,
            slug: c.slug,
        }
    }
}

/// List query: exact-name search plus pagination.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

pub(crate) const fn default_limit() -> u64 {
    10
}

/// List categories.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<CategoryResponse>>> {
    let limit = query.limit.min(100);
    let categories = state
        .catalog_service
        .list_categories(query.search.as_deref(), limit, query.offset)
        .await?;

    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// Create a category (admin).
async fn create(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTaxonomyInput>,
) -> AppResult<(StatusCode, Json<CategoryResponse>)> {
    permission::require_admin(user.as_ref())?;

    let category = state.catalog_service.create_category(input).await?;

    Ok(created(category.into()))
}

/// Delete a category by slug (admin). Titles fall back to no category.
async fn remove(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    permission::require_admin(user.as_ref())?;

    state.catalog_service.delete_category(&slug).await?;

    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{slug}/", delete(remove))
}
