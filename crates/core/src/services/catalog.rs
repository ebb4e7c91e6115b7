//! Catalog service: categories, genres, and titles.
//!
//! Categories and genres are flat admin-managed taxonomy entries addressed
//! by slug. Titles carry at most one category and any number of genres;
//! their `rating` is never stored, it is the mean of their review scores.

use std::collections::HashMap;

use critika_common::{AppError, AppResult, IdGenerator};
use critika_db::entities::{category, genre, title};
use critika_db::repositories::{
    CategoryRepository, GenreRepository, ReviewRepository, TitleFilter, TitleRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a category or genre.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaxonomyInput {
    #[validate(length(min = 1, max = 30))]
    pub name: String,
    #[validate(length(min = 1, max = 30))]
    pub slug: String,
}

/// Input for creating a title. Category and genres are slug references.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTitleInput {
    #[validate(length(min = 1))]
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
}

/// Input for partially updating a title.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTitleInput {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

/// A title with its nested taxonomy and computed rating.
#[derive(Debug, Clone)]
pub struct TitleDetails {
    pub title: title::Model,
    pub category: Option<category::Model>,
    pub genres: Vec<genre::Model>,
    /// Mean review score; `None` when the title has no reviews.
    pub rating: Option<f64>,
}

/// Catalog service.
#[derive(Clone)]
pub struct CatalogService {
    category_repo: CategoryRepository,
    genre_repo: GenreRepository,
    title_repo: TitleRepository,
    review_repo: ReviewRepository,
    id_gen: IdGenerator,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub fn new(
        category_repo: CategoryRepository,
        genre_repo: GenreRepository,
        title_repo: TitleRepository,
        review_repo: ReviewRepository,
    ) -> Self {
        Self {
            category_repo,
            genre_repo,
            title_repo,
            review_repo,
            id_gen: IdGenerator::new(),
        }
    }

    // ==================== Categories ====================

    /// List categories, optionally filtered by exact name.
    pub async fn list_categories(
        &self,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<category::Model>> {
        self.category_repo.list(search, limit, offset).await
    }

    /// Create a category. Slugs are unique.
    pub async fn create_category(&self, input: CreateTaxonomyInput) -> AppResult<category::Model> {
        input.validate()?;
        validate_slug(&input.slug)?;

        if self.category_repo.find_by_slug(&input.slug).await?.is_some() {
            return Err(AppError::Validation(format!(
                "slug {} is already in use",
                input.slug
            )));
        }

        self.category_repo
            .create(category::ActiveModel {
                id: Set(self.id_gen.generate()),
                name: Set(input.name),
                slug: Set(input.slug),
            })
            .await
    }

    /// Delete a category by slug. Titles keep existing with no category.
    pub async fn delete_category(&self, slug: &str) -> AppResult<()> {
        let removed = self.category_repo.delete_by_slug(slug).await?;
        if removed == 0 {
            return Err(AppError::NotFound(format!("category {slug}")));
        }
        Ok(())
    }

    // ==================== Genres ====================

    /// List genres, optionally filtered by exact name.
    pub async fn list_genres(
        &self,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<genre::Model>> {
        self.genre_repo.list(search, limit, offset).await
    }

    /// Create a genre. Slugs are unique.
    pub async fn create_genre(&self, input: CreateTaxonomyInput) -> AppResult<genre::Model> {
        input.validate()?;
        validate_slug(&input.slug)?;

        if self.genre_repo.find_by_slug(&input.slug).await?.is_some() {
            return Err(AppError::Validation(format!(
                "slug {} is already in use",
                input.slug
            )));
        }

        self.genre_repo
            .create(genre::ActiveModel {
                id: Set(self.id_gen.generate()),
                name: Set(input.name),
                slug: Set(input.slug),
            })
            .await
    }

    /// Delete a genre by slug.
    pub async fn delete_genre(&self, slug: &str) -> AppResult<()> {
        let removed = self.genre_repo.delete_by_slug(slug).await?;
        if removed == 0 {
            return Err(AppError::NotFound(format!("genre {slug}")));
        }
        Ok(())
    }

    // ==================== Titles ====================

    /// List titles matching the filter, with nested taxonomy and ratings.
    pub async fn list_titles(
        &self,
        filter: &TitleFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<TitleDetails>> {
        let titles = self.title_repo.list(filter, limit, offset).await?;
        self.assemble_details(titles).await
    }

    /// Get one title with nested taxonomy and rating.
    pub async fn get_title(&self, id: &str) -> AppResult<TitleDetails> {
        let title = self.title_repo.get_by_id(id).await?;
        let mut details = self.assemble_details(vec![title]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::Internal("title details assembly".to_string()))
    }

    /// Create a title. Category and genres are resolved from slugs.
    pub async fn create_title(&self, input: CreateTitleInput) -> AppResult<TitleDetails> {
        input.validate()?;

        let category = self.resolve_category(input.category.as_deref()).await?;
        let genres = self.resolve_genres(&input.genre).await?;

        let title = self
            .title_repo
            .create(title::ActiveModel {
                id: Set(self.id_gen.generate()),
                name: Set(input.name),
                year: Set(input.year),
                description: Set(input.description),
                category_id: Set(category.as_ref().map(|c| c.id.clone())),
            })
            .await?;

        self.title_repo
            .set_genres(&title.id, &genres.iter().map(|g| g.id.clone()).collect::<Vec<_>>())
            .await?;

        Ok(TitleDetails {
            title,
            category,
            genres,
            rating: None,
        })
    }

    /// Partially update a title.
    pub async fn update_title(&self, id: &str, input: UpdateTitleInput) -> AppResult<TitleDetails> {
        input.validate()?;

        let existing = self.title_repo.get_by_id(id).await?;
        let mut active: title::ActiveModel = existing.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(year) = input.year {
            active.year = Set(year);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(slug) = input.category.as_deref() {
            let category = self.resolve_category(Some(slug)).await?;
            active.category_id = Set(category.map(|c| c.id));
        }

        let title = self.title_repo.update(active).await?;

        if let Some(slugs) = &input.genre {
            let genres = self.resolve_genres(slugs).await?;
            self.title_repo
                .set_genres(&title.id, &genres.iter().map(|g| g.id.clone()).collect::<Vec<_>>())
                .await?;
        }

        self.get_title(&title.id).await
    }

    /// Delete a title. Its reviews and their comments cascade away.
    pub async fn delete_title(&self, id: &str) -> AppResult<()> {
        let title = self.title_repo.get_by_id(id).await?;
        self.title_repo.delete_by_id(&title.id).await
    }

    async fn resolve_category(&self, slug: Option<&str>) -> AppResult<Option<category::Model>> {
        match slug {
            None => Ok(None),
            Some(slug) => self
                .category_repo
                .find_by_slug(slug)
                .await?
                .map(Some)
                .ok_or_else(|| AppError::Validation(format!("unknown category {slug}"))),
        }
    }

    async fn resolve_genres(&self, slugs: &[String]) -> AppResult<Vec<genre::Model>> {
        let genres = self.genre_repo.find_by_slugs(slugs).await?;

        if genres.len() != slugs.len() {
            let known: Vec<&str> = genres.iter().map(|g| g.slug.as_str()).collect();
            let missing: Vec<&str> = slugs
                .iter()
                .map(String::as_str)
                .filter(|s| !known.contains(s))
                .collect();
            return Err(AppError::Validation(format!(
                "unknown genre {}",
                missing.join(", ")
            )));
        }

        Ok(genres)
    }

    /// Attach categories, genres, and ratings to a page of titles.
    async fn assemble_details(&self, titles: Vec<title::Model>) -> AppResult<Vec<TitleDetails>> {
        let title_ids: Vec<String> = titles.iter().map(|t| t.id.clone()).collect();

        let category_ids: Vec<String> = titles
            .iter()
            .filter_map(|t| t.category_id.clone())
            .collect();
        let categories: HashMap<String, category::Model> = self
            .category_repo
            .find_by_ids(&category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();

        let mut genres: HashMap<String, Vec<genre::Model>> = HashMap::new();
        for (title_id, genre) in self.title_repo.genres_for_titles(&title_ids).await? {
            genres.entry(title_id).or_default().push(genre);
        }

        let ratings: HashMap<String, f64> = self
            .review_repo
            .average_scores(&title_ids)
            .await?
            .into_iter()
            .collect();

        Ok(titles
            .into_iter()
            .map(|title| TitleDetails {
                category: title
                    .category_id
                    .as_ref()
                    .and_then(|id| categories.get(id).cloned()),
                genres: genres.remove(&title.id).unwrap_or_default(),
                rating: ratings.get(&title.id).copied(),
                title,
            })
            .collect())
    }
}

fn validate_slug(slug: &str) -> AppResult<()> {
    let valid = slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!("invalid slug {slug}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service(db: DatabaseConnection) -> CatalogService {
        let db = Arc::new(db);
        CatalogService::new(
            CategoryRepository::new(Arc::clone(&db)),
            GenreRepository::new(Arc::clone(&db)),
            TitleRepository::new(Arc::clone(&db)),
            ReviewRepository::new(db),
        )
    }

    fn category_row(id: &str, slug: &str) -> category::Model {
        category::Model {
            id: id.to_string(),
            name: slug.to_string(),
            slug: slug.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_category_rejects_duplicate_slug() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[category_row("cat1", "films")]])
            .into_connection();
        let service = service(db);

        let result = service
            .create_category(CreateTaxonomyInput {
                name: "Films".to_string(),
                slug: "films".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_category_rejects_bad_slug() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service
            .create_category(CreateTaxonomyInput {
                name: "Films".to_string(),
                slug: "no spaces allowed".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_category_unknown_slug_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let service = service(db);

        let result = service.delete_category("missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_title_rejects_unknown_category() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<category::Model>::new()])
            .into_connection();
        let service = service(db);

        let result = service
            .create_title(CreateTitleInput {
                name: "Alien".to_string(),
                year: 1979,
                description: None,
                category: Some("missing".to_string()),
                genre: vec![],
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_title_rejects_unknown_genre() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![genre::Model {
                id: "g1".to_string(),
                name: "Horror".to_string(),
                slug: "horror".to_string(),
            }]])
            .into_connection();
        let service = service(db);

        let result = service
            .create_title(CreateTitleInput {
                name: "Alien".to_string(),
                year: 1979,
                description: None,
                category: None,
                genre: vec!["horror".to_string(), "missing".to_string()],
            })
            .await;

        match result {
            Err(AppError::Validation(msg)) => assert!(msg.contains("missing")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
