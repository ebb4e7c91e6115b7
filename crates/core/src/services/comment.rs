//! Comment service.
//!
//! Comments live under a review. The review is resolved from the path by
//! id alone; the title segment of the path is not re-checked against the
//! review's actual title.

use std::collections::HashMap;

use chrono::Utc;
use critika_common::{AppError, AppResult, IdGenerator};
use critika_db::entities::{comment, user};
use critika_db::repositories::{CommentRepository, ReviewRepository, UserRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::permission::{self, Method};

/// Input for creating a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    #[validate(length(min = 1))]
    pub text: String,
}

/// Input for partially updating a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentInput {
    #[validate(length(min = 1))]
    pub text: Option<String>,
}

/// A comment with its author's username resolved.
#[derive(Debug, Clone)]
pub struct CommentDetails {
    pub comment: comment::Model,
    /// `None` for authors who have not picked a username yet.
    pub author_username: Option<String>,
}

/// Comment service.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    review_repo: ReviewRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(
        comment_repo: CommentRepository,
        review_repo: ReviewRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            comment_repo,
            review_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a comment on a review.
    pub async fn create(
        &self,
        review_id: &str,
        author: &user::Model,
        input: CreateCommentInput,
    ) -> AppResult<CommentDetails> {
        input.validate()?;

        let review = self.review_repo.get_by_id(review_id).await?;

        let comment = self
            .comment_repo
            .create(comment::ActiveModel {
                id: Set(self.id_gen.generate()),
                review_id: Set(review.id),
                author_id: Set(author.id.clone()),
                text: Set(input.text),
                created_at: Set(Utc::now().into()),
            })
            .await?;

        Ok(CommentDetails {
            comment,
            author_username: author.username.clone(),
        })
    }

    /// List comments on a review, oldest first.
    pub async fn list(
        &self,
        review_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<CommentDetails>> {
        let review = self.review_repo.get_by_id(review_id).await?;
        let comments = self
            .comment_repo
            .list_for_review(&review.id, limit, offset)
            .await?;
        self.with_authors(comments).await
    }

    /// Get one comment, scoped to the review in the path.
    pub async fn get(&self, review_id: &str, comment_id: &str) -> AppResult<CommentDetails> {
        let review = self.review_repo.get_by_id(review_id).await?;
        let comment = self
            .comment_repo
            .get_by_id_for_review(comment_id, &review.id)
            .await?;

        let mut details = self.with_authors(vec![comment]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::Internal("comment details assembly".to_string()))
    }

    /// Partially update a comment. Author, moderator, admin, or staff only.
    pub async fn update(
        &self,
        review_id: &str,
        comment_id: &str,
        caller: &user::Model,
        input: UpdateCommentInput,
    ) -> AppResult<CommentDetails> {
        input.validate()?;

        let review = self.review_repo.get_by_id(review_id).await?;
        let comment = self
            .comment_repo
            .get_by_id_for_review(comment_id, &review.id)
            .await?;

        permission::require_object_mutation(caller, Method::Patch, &comment.author_id)?;

        let author_id = comment.author_id.clone();
        let mut active: comment::ActiveModel = comment.into();
        if let Some(text) = input.text {
            active.text = Set(text);
        }

        let comment = self.comment_repo.update(active).await?;
        let author = self.user_repo.find_by_id(&author_id).await?;

        Ok(CommentDetails {
            comment,
            author_username: author.and_then(|a| a.username),
        })
    }

    /// Delete a comment. Author, moderator, admin, or staff only.
    pub async fn delete(
        &self,
        review_id: &str,
        comment_id: &str,
        caller: &user::Model,
    ) -> AppResult<()> {
        let review = self.review_repo.get_by_id(review_id).await?;
        let comment = self
            .comment_repo
            .get_by_id_for_review(comment_id, &review.id)
            .await?;

        permission::require_object_mutation(caller, Method::Delete, &comment.author_id)?;

        self.comment_repo.delete_by_id(&comment.id).await
    }

    async fn with_authors(&self, comments: Vec<comment::Model>) -> AppResult<Vec<CommentDetails>> {
        let author_ids: Vec<String> = comments.iter().map(|c| c.author_id.clone()).collect();
        let authors: HashMap<String, Option<String>> = self
            .user_repo
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        Ok(comments
            .into_iter()
            .map(|comment| CommentDetails {
                author_username: authors.get(&comment.author_id).cloned().flatten(),
                comment,
            })
            .collect())
    }
}
