//! User service.
//!
//! Admin-managed CRUD addressed by username, plus the self-service profile
//! endpoint. The self-service update shares the admin write shape, so it
//! accepts `role` — callers can change their own role through it.

use chrono::Utc;
use critika_common::{AppError, AppResult, IdGenerator};
use critika_db::entities::user::{self, UserRole};
use critika_db::repositories::UserRepository;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a user (admin).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 150))]
    pub username: String,

    pub role: Option<UserRole>,

    #[validate(length(max = 500))]
    pub bio: Option<String>,

    #[validate(length(max = 50))]
    pub first_name: Option<String>,

    #[validate(length(max = 50))]
    pub last_name: Option<String>,
}

/// Input for partially updating a user.
///
/// Shared by the admin endpoints and `/users/me/`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 150))]
    pub username: Option<String>,

    pub role: Option<UserRole>,

    #[validate(length(max = 500))]
    pub bio: Option<String>,

    #[validate(length(max = 50))]
    pub first_name: Option<String>,

    #[validate(length(max = 50))]
    pub last_name: Option<String>,
}

/// User service.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List users, optionally filtered by a username substring.
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<user::Model>> {
        self.user_repo.list(search, limit, offset).await
    }

    /// Get a user by username.
    pub async fn get_by_username(&self, username: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_username(username).await
    }

    /// Create a user explicitly (admin path).
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Validation(format!(
                "email {} is already in use",
                input.email
            )));
        }
        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Validation(format!(
                "username {} is already taken",
                input.username
            )));
        }

        self.user_repo
            .create(user::ActiveModel {
                id: Set(self.id_gen.generate()),
                email: Set(input.email),
                username: Set(Some(input.username)),
                role: Set(input.role.unwrap_or_default()),
                is_staff: Set(false),
                bio: Set(input.bio),
                first_name: Set(input.first_name),
                last_name: Set(input.last_name),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .await
    }

    /// Partially update a user found by username (admin path).
    pub async fn update_by_username(
        &self,
        username: &str,
        input: UpdateUserInput,
    ) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_username(username).await?;
        self.apply_update(user, input).await
    }

    /// Partially update the caller's own profile.
    ///
    /// Same write shape as the admin path, `role` included.
    pub async fn update_self(
        &self,
        caller: user::Model,
        input: UpdateUserInput,
    ) -> AppResult<user::Model> {
        self.apply_update(caller, input).await
    }

    /// Delete a user by username (admin path).
    pub async fn delete_by_username(&self, username: &str) -> AppResult<()> {
        let user = self.user_repo.get_by_username(username).await?;
        self.user_repo.delete_by_id(&user.id).await
    }

    async fn apply_update(
        &self,
        user: user::Model,
        input: UpdateUserInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        if let Some(email) = &input.email
            && *email != user.email
            && self.user_repo.find_by_email(email).await?.is_some()
        {
            return Err(AppError::Validation(format!(
                "email {email} is already in use"
            )));
        }
        if let Some(username) = &input.username
            && Some(username) != user.username.as_ref()
            && self.user_repo.find_by_username(username).await?.is_some()
        {
            return Err(AppError::Validation(format!(
                "username {username} is already taken"
            )));
        }

        let mut active: user::ActiveModel = user.into();

        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(username) = input.username {
            active.username = Set(Some(username));
        }
        if let Some(role) = input.role {
            active.role = Set(role);
        }
        if let Some(bio) = input.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(first_name) = input.first_name {
            active.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = input.last_name {
            active.last_name = Set(Some(last_name));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(active).await
    }
}
