//! Review service.
//!
//! Reviews live under a title; an author gets exactly one review per
//! title. The unique (author, title) index in the store is the atomic
//! backstop for the duplicate check here.

use std::collections::HashMap;

use chrono::Utc;
use critika_common::{AppError, AppResult, IdGenerator};
use critika_db::entities::{review, user};
use critika_db::repositories::{ReviewRepository, TitleRepository, UserRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::permission::{self, Method};

/// Input for creating a review.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewInput {
    #[validate(length(min = 1))]
    pub text: String,
    /// Score in [1, 10].
    #[validate(range(min = 1, max = 10))]
    pub score: i16,
}

/// Input for partially updating a review.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReviewInput {
    #[validate(length(min = 1))]
    pub text: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub score: Option<i16>,
}

/// A review with its author's username resolved.
#[derive(Debug, Clone)]
pub struct ReviewDetails {
    pub review: review::Model,
    /// `None` for authors who have not picked a username yet.
    pub author_username: Option<String>,
}

/// Review service.
#[derive(Clone)]
pub struct ReviewService {
    review_repo: ReviewRepository,
    title_repo: TitleRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub fn new(
        review_repo: ReviewRepository,
        title_repo: TitleRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            review_repo,
            title_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a review on a title. One per (author, title).
    pub async fn create(
        &self,
        title_id: &str,
        author: &user::Model,
        input: CreateReviewInput,
    ) -> AppResult<ReviewDetails> {
        input.validate()?;

        let title = self.title_repo.get_by_id(title_id).await?;

        if self
            .review_repo
            .find_by_author_and_title(&author.id, &title.id)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateReview);
        }

        let review = self
            .review_repo
            .create(review::ActiveModel {
                id: Set(self.id_gen.generate()),
                title_id: Set(title.id),
                author_id: Set(author.id.clone()),
                text: Set(input.text),
                score: Set(input.score),
                created_at: Set(Utc::now().into()),
            })
            .await?;

        Ok(ReviewDetails {
            review,
            author_username: author.username.clone(),
        })
    }

    /// List reviews on a title, newest first.
    pub async fn list(
        &self,
        title_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<ReviewDetails>> {
        let title = self.title_repo.get_by_id(title_id).await?;
        let reviews = self.review_repo.list_for_title(&title.id, limit, offset).await?;
        self.with_authors(reviews).await
    }

    /// Get one review, scoped to the title in the path.
    pub async fn get(&self, title_id: &str, review_id: &str) -> AppResult<ReviewDetails> {
        let title = self.title_repo.get_by_id(title_id).await?;
        let review = self
            .review_repo
            .get_by_id_for_title(review_id, &title.id)
            .await?;

        let mut details = self.with_authors(vec![review]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::Internal("review details assembly".to_string()))
    }

    /// Partially update a review. Author, moderator, admin, or staff only.
    pub async fn update(
        &self,
        title_id: &str,
        review_id: &str,
        caller: &user::Model,
        input: UpdateReviewInput,
    ) -> AppResult<ReviewDetails> {
        input.validate()?;

        let title = self.title_repo.get_by_id(title_id).await?;
        let review = self
            .review_repo
            .get_by_id_for_title(review_id, &title.id)
            .await?;

        permission::require_object_mutation(caller, Method::Patch, &review.author_id)?;

        let author_id = review.author_id.clone();
        let mut active: review::ActiveModel = review.into();
        if let Some(text) = input.text {
            active.text = Set(text);
        }
        if let Some(score) = input.score {
            active.score = Set(score);
        }

        let review = self.review_repo.update(active).await?;
        let author = self.user_repo.find_by_id(&author_id).await?;

        Ok(ReviewDetails {
            review,
            author_username: author.and_then(|a| a.username),
        })
    }

    /// Delete a review. Author, moderator, admin, or staff only. Comments
    /// cascade away.
    pub async fn delete(
        &self,
        title_id: &str,
        review_id: &str,
        caller: &user::Model,
    ) -> AppResult<()> {
        let title = self.title_repo.get_by_id(title_id).await?;
        let review = self
            .review_repo
            .get_by_id_for_title(review_id, &title.id)
            .await?;

        permission::require_object_mutation(caller, Method::Delete, &review.author_id)?;

        self.review_repo.delete_by_id(&review.id).await
    }

    async fn with_authors(&self, reviews: Vec<review::Model>) -> AppResult<Vec<ReviewDetails>> {
        let author_ids: Vec<String> = reviews.iter().map(|r| r.author_id.clone()).collect();
        let authors: HashMap<String, Option<String>> = self
            .user_repo
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        Ok(reviews
            .into_iter()
            .map(|review| ReviewDetails {
                author_username: authors.get(&review.author_id).cloned().flatten(),
                review,
            })
            .collect())
    }
}
