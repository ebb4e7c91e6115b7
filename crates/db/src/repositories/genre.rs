//! Genre repository.

use std::sync::Arc;

use crate::entities::{Genre, genre};
use critika_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Genre repository for database operations.
#[derive(Clone)]
pub struct GenreRepository {
    db: Arc<DatabaseConnection>,
}

impl GenreRepository {
    /// Create a new genre repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List genres, optionally filtered by exact name.
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<genre::Model>> {
        let mut query = Genre::find();

        if let Some(name) = search {
            query = query.filter(genre::Column::Name.eq(name));
        }

        query
            .order_by_asc(genre::Column::Slug)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a genre by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<genre::Model>> {
        Genre::find()
            .filter(genre::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find genres by slug, preserving no particular order.
    pub async fn find_by_slugs(&self, slugs: &[String]) -> AppResult<Vec<genre::Model>> {
        if slugs.is_empty() {
            return Ok(vec![]);
        }

        Genre::find()
            .filter(genre::Column::Slug.is_in(slugs.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new genre.
    pub async fn create(&self, model: genre::ActiveModel) -> AppResult<genre::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a genre by slug. Returns how many rows were removed.
    pub async fn delete_by_slug(&self, slug: &str) -> AppResult<u64> {
        let result = Genre::delete_many()
            .filter(genre::Column::Slug.eq(slug))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};
    use std::sync::Arc;

    fn create_test_genre(id: &str, name: &str, slug: &str) -> genre::Model {
        genre::Model {
            id: id.to_string(),
            name: name.to_string(),
            slug: slug.to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_with_exact_name_search() {
        let genre = create_test_genre("g1", "Drama", "drama");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[genre.clone()]])
                .into_connection(),
        );

        let repo = GenreRepository::new(db);
        let result = repo.list(Some("Drama"), 10, 0).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].slug, "drama");
    }

    #[tokio::test]
    async fn test_find_by_slugs_empty_skips_query() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let repo = GenreRepository::new(db);
        let result = repo.find_by_slugs(&[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_create_genre() {
        let genre = create_test_genre("g1", "Drama", "drama");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[genre.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = GenreRepository::new(db);

        let active = genre::ActiveModel {
            id: Set("g1".to_string()),
            name: Set("Drama".to_string()),
            slug: Set("drama".to_string()),
        };

        let result = repo.create(active).await.unwrap();
        assert_eq!(result.name, "Drama");
    }

    #[tokio::test]
    async fn test_delete_by_slug() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = GenreRepository::new(db);
        let removed = repo.delete_by_slug("drama").await.unwrap();

        assert_eq!(removed, 1);
    }
}
