//! Review repository.

use std::sync::Arc;

use crate::entities::{Review, review};
use critika_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

#[derive(FromQueryResult)]
struct RatingRow {
    rating: Option<f64>,
}

#[derive(FromQueryResult)]
struct TitleRatingRow {
    title_id: String,
    rating: Option<f64>,
}

/// Review repository for database operations.
#[derive(Clone)]
pub struct ReviewRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a review by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<review::Model>> {
        Review::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a review by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<review::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("review {id}")))
    }

    /// Find a review by ID scoped to a title.
    ///
    /// A review reached through the wrong title's path is treated as absent.
    pub async fn find_by_id_for_title(
        &self,
        id: &str,
        title_id: &str,
    ) -> AppResult<Option<review::Model>> {
        Review::find()
            .filter(review::Column::Id.eq(id))
            .filter(review::Column::TitleId.eq(title_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a review by ID scoped to a title, erroring if not found.
    pub async fn get_by_id_for_title(&self, id: &str, title_id: &str) -> AppResult<review::Model> {
        self.find_by_id_for_title(id, title_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("review {id}")))
    }

    /// List reviews for a title, newest first.
    pub async fn list_for_title(
        &self,
        title_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<review::Model>> {
        Review::find()
            .filter(review::Column::TitleId.eq(title_id))
            .order_by_desc(review::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the review a given author wrote for a given title, if any.
    pub async fn find_by_author_and_title(
        &self,
        author_id: &str,
        title_id: &str,
    ) -> AppResult<Option<review::Model>> {
        Review::find()
            .filter(review::Column::AuthorId.eq(author_id))
            .filter(review::Column::TitleId.eq(title_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new review.
    pub async fn create(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a review.
    pub async fn update(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a review by ID. Comments go with it (FK cascade).
    pub async fn delete_by_id(&self, id: &str) -> AppResult<()> {
        Review::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Mean review score for a title; `None` when it has no reviews.
    pub async fn average_score(&self, title_id: &str) -> AppResult<Option<f64>> {
        let row = Review::find()
            .select_only()
            .column_as(Expr::cust("AVG(score::double precision)"), "rating")
            .filter(review::Column::TitleId.eq(title_id))
            .into_model::<RatingRow>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.and_then(|r| r.rating))
    }

    /// Mean review scores for a page of titles. Titles without reviews are
    /// simply absent from the result.
    pub async fn average_scores(&self, title_ids: &[String]) -> AppResult<Vec<(String, f64)>> {
        if title_ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = Review::find()
            .select_only()
            .column(review::Column::TitleId)
            .column_as(Expr::cust("AVG(score::double precision)"), "rating")
            .filter(review::Column::TitleId.is_in(title_ids.to_vec()))
            .group_by(review::Column::TitleId)
            .into_model::<TitleRatingRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(|r| r.rating.map(|rating| (r.title_id, rating)))
            .collect())
    }
}
