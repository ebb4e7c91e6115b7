//! Title repository.

use std::sync::Arc;

use crate::entities::{Genre, Title, TitleGenre, category, genre, title, title_genre};
use critika_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

/// Query filters for listing titles. All filters combine with AND.
#[derive(Debug, Default, Clone)]
pub struct TitleFilter {
    /// Exact genre slug.
    pub genre: Option<String>,
    /// Exact category slug.
    pub category: Option<String>,
    /// Substring of the title name.
    pub name: Option<String>,
    /// Exact year.
    pub year: Option<i32>,
}

/// Title repository for database operations.
#[derive(Clone)]
pub struct TitleRepository {
    db: Arc<DatabaseConnection>,
}

impl TitleRepository {
    /// Create a new title repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a title by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<title::Model>> {
        Title::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a title by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<title::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("title {id}")))
    }

    /// List titles matching the filter.
    pub async fn list(
        &self,
        filter: &TitleFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<title::Model>> {
        let mut query = Title::find();

        if let Some(slug) = &filter.category {
            query = query
                .join(JoinType::InnerJoin, title::Relation::Category.def())
                .filter(category::Column::Slug.eq(slug));
        }
        if let Some(slug) = &filter.genre {
            query = query
                .join(JoinType::InnerJoin, title::Relation::TitleGenres.def())
                .join(JoinType::InnerJoin, title_genre::Relation::Genre.def())
                .filter(genre::Column::Slug.eq(slug));
        }
        if let Some(name) = &filter.name {
            query = query.filter(title::Column::Name.contains(name));
        }
        if let Some(year) = filter.year {
            query = query.filter(title::Column::Year.eq(year));
        }

        query
            .order_by_asc(title::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new title.
    pub async fn create(&self, model: title::ActiveModel) -> AppResult<title::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a title.
    pub async fn update(&self, model: title::ActiveModel) -> AppResult<title::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a title by ID. Reviews and their comments go with it (FK cascade).
    pub async fn delete_by_id(&self, id: &str) -> AppResult<()> {
        Title::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Genres attached to a single title.
    pub async fn genres_for_title(&self, title_id: &str) -> AppResult<Vec<genre::Model>> {
        TitleGenre::find()
            .filter(title_genre::Column::TitleId.eq(title_id))
            .find_also_related(Genre)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
            .map(|rows| rows.into_iter().filter_map(|(_, g)| g).collect())
    }

    /// Genres for a page of titles, as (`title_id`, genre) pairs.
    pub async fn genres_for_titles(
        &self,
        title_ids: &[String],
    ) -> AppResult<Vec<(String, genre::Model)>> {
        if title_ids.is_empty() {
            return Ok(vec![]);
        }

        TitleGenre::find()
            .filter(title_genre::Column::TitleId.is_in(title_ids.to_vec()))
            .find_also_related(Genre)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
            .map(|rows| {
                rows.into_iter()
                    .filter_map(|(tg, g)| g.map(|g| (tg.title_id, g)))
                    .collect()
            })
    }

    /// Replace the set of genres attached to a title.
    pub async fn set_genres(&self, title_id: &str, genre_ids: &[String]) -> AppResult<()> {
        TitleGenre::delete_many()
            .filter(title_genre::Column::TitleId.eq(title_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if genre_ids.is_empty() {
            return Ok(());
        }

        let models = genre_ids.iter().map(|genre_id| title_genre::ActiveModel {
            title_id: Set(title_id.to_string()),
            genre_id: Set(genre_id.clone()),
        });

        TitleGenre::insert_many(models)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_title(id: &str, name: &str, year: i32) -> title::Model {
        title::Model {
            id: id.to_string(),
            name: name.to_string(),
            year,
            description: None,
            category_id: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<title::Model>::new()])
                .into_connection(),
        );

        let repo = TitleRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_unfiltered() {
        let t1 = create_test_title("t1", "Alien", 1979);
        let t2 = create_test_title("t2", "Aliens", 1986);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[t1, t2]])
                .into_connection(),
        );

        let repo = TitleRepository::new(db);
        let result = repo.list(&TitleFilter::default(), 10, 0).await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_list_with_filters() {
        let t1 = create_test_title("t1", "Alien", 1979);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[t1]])
                .into_connection(),
        );

        let repo = TitleRepository::new(db);
        let filter = TitleFilter {
            genre: Some("horror".to_string()),
            category: Some("films".to_string()),
            name: Some("Ali".to_string()),
            year: Some(1979),
        };
        let result = repo.list(&filter, 10, 0).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Alien");
    }

    #[tokio::test]
    async fn test_set_genres_empty_only_deletes() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );

        let repo = TitleRepository::new(db);
        repo.set_genres("t1", &[]).await.unwrap();
    }

    #[tokio::test]
    async fn test_genres_for_titles_empty_skips_query() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let repo = TitleRepository::new(db);
        let result = repo.genres_for_titles(&[]).await.unwrap();

        assert!(result.is_empty());
    }
}
