//! Authentication service.
//!
//! Passwordless flow: an emailed one-time code is exchanged for a signed
//! access/refresh token pair. The exchange runs as three explicit steps —
//! validate the code, get-or-create the user, issue the pair — so each is
//! testable on its own.

use chrono::{Duration, Utc};
use critika_common::config::AuthConfig;
use critika_common::{
    AppError, AppResult, IdGenerator, TokenKind, TokenPair, decode_token, issue_access, issue_pair,
};
use critika_db::entities::{user, user_code};
use critika_db::repositories::{UserCodeRepository, UserRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::email::EmailService;

/// Input for requesting a confirmation code.
#[derive(Debug, Deserialize, Validate)]
pub struct RequestCodeInput {
    /// Address the code is mailed to; becomes the user's identity.
    #[validate(email)]
    pub email: String,
}

/// Input for exchanging a confirmation code for tokens.
///
/// Fields are optional so that an absent field reports `MissingField`
/// rather than a deserialization error.
#[derive(Debug, Deserialize)]
pub struct ExchangeCodeInput {
    pub email: Option<String>,
    pub confirmation_code: Option<String>,
}

/// Input for refreshing an access token.
#[derive(Debug, Deserialize)]
pub struct RefreshInput {
    pub refresh: Option<String>,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    code_repo: UserCodeRepository,
    email_service: EmailService,
    id_gen: IdGenerator,
    auth: AuthConfig,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(
        user_repo: UserRepository,
        code_repo: UserCodeRepository,
        email_service: EmailService,
        auth: AuthConfig,
    ) -> Self {
        Self {
            user_repo,
            code_repo,
            email_service,
            id_gen: IdGenerator::new(),
            auth,
        }
    }

    /// Generate a fresh confirmation code for an email, overwrite any
    /// previous one, and dispatch it. Last write wins: only the newest
    /// code for an address can be exchanged.
    pub async fn request_code(&self, input: RequestCodeInput) -> AppResult<()> {
        input.validate()?;

        let code = self.id_gen.generate_code();

        self.code_repo
            .upsert(user_code::ActiveModel {
                email: Set(input.email.clone()),
                confirmation_code: Set(code.clone()),
                created: Set(Utc::now().into()),
            })
            .await?;

        self.email_service
            .send_confirmation_code(&input.email, &code)
            .await?;

        tracing::debug!(email = %input.email, "Issued confirmation code");
        Ok(())
    }

    /// Exchange a valid (email, code) pair for an access/refresh pair.
    ///
    /// Creates the user on first exchange (email only, no username yet)
    /// and deletes the code row: codes are single use.
    pub async fn exchange_code(&self, input: ExchangeCodeInput) -> AppResult<TokenPair> {
        let email = require_field(input.email, "email")?;
        let code = require_field(input.confirmation_code, "confirmation_code")?;

        self.validate_code(&email, &code).await?;
        let user = self.get_or_create_user(&email).await?;
        self.code_repo.delete_by_email(&email).await?;

        issue_pair(&self.auth, &user.id)
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh(&self, input: RefreshInput) -> AppResult<String> {
        let token = require_field(input.refresh, "refresh")?;
        let claims = decode_token(&self.auth, &token, TokenKind::Refresh)?;

        let user = self
            .user_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        issue_access(&self.auth, &user.id)
    }

    /// Resolve an access token to its user. Used by the API middleware.
    pub async fn authenticate_access(&self, token: &str) -> AppResult<user::Model> {
        let claims = decode_token(&self.auth, token, TokenKind::Access)?;

        self.user_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Step 1 of the exchange: the stored code must match and be fresh.
    async fn validate_code(&self, email: &str, code: &str) -> AppResult<()> {
        let row = self
            .code_repo
            .find_by_email(email)
            .await?
            .filter(|row| row.confirmation_code == code)
            .ok_or(AppError::InvalidCode)?;

        let age = Utc::now() - row.created.with_timezone(&Utc);
        if age >= Duration::minutes(self.auth.code_ttl_minutes) {
            return Err(AppError::CodeExpired);
        }

        Ok(())
    }

    /// Step 2 of the exchange: users appear on their first successful
    /// exchange, with no username yet.
    async fn get_or_create_user(&self, email: &str) -> AppResult<user::Model> {
        if let Some(user) = self.user_repo.find_by_email(email).await? {
            return Ok(user);
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(email.to_string()),
            username: Set(None),
            role: Set(user::UserRole::User),
            is_staff: Set(false),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(email = %email, user_id = %user.id, "Created user from token exchange");
        Ok(user)
    }
}

fn require_field(value: Option<String>, name: &'static str) -> AppResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(AppError::MissingField(name))
}
