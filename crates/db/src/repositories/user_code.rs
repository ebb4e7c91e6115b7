//! Confirmation code repository.

use std::sync::Arc;

use crate::entities::{UserCode, user_code};
use critika_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, sea_query::OnConflict,
};

/// Repository for one-time confirmation codes.
#[derive(Clone)]
pub struct UserCodeRepository {
    db: Arc<DatabaseConnection>,
}

impl UserCodeRepository {
    /// Create a new confirmation code repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the code row for an email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user_code::Model>> {
        UserCode::find_by_id(email)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert or overwrite the code row for an email (last write wins).
    ///
    /// The row is keyed by email, so two concurrent requests for the same
    /// address cannot leave more than one live code behind.
    pub async fn upsert(&self, model: user_code::ActiveModel) -> AppResult<()> {
        UserCode::insert(model)
            .on_conflict(
                OnConflict::column(user_code::Column::Email)
                    .update_columns([
                        user_code::Column::ConfirmationCode,
                        user_code::Column::Created,
                    ])
                    .to_owned(),
            )
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete the code row for an email (single use).
    pub async fn delete_by_email(&self, email: &str) -> AppResult<()> {
        UserCode::delete_many()
            .filter(user_code::Column::Email.eq(email))
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
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};
    use std::sync::Arc;

    fn create_test_code(email: &str, code: &str) -> user_code::Model {
        user_code::Model {
            email: email.to_string(),
            confirmation_code: code.to_string(),
            created: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_email_found() {
        let code = create_test_code("a@example.com", "1234");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[code.clone()]])
                .into_connection(),
        );

        let repo = UserCodeRepository::new(db);
        let result = repo.find_by_email("a@example.com").await.unwrap();

        assert_eq!(result.unwrap().confirmation_code, "1234");
    }

    #[tokio::test]
    async fn test_find_by_email_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user_code::Model>::new()])
                .into_connection(),
        );

        let repo = UserCodeRepository::new(db);
        let result = repo.find_by_email("nobody@example.com").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_upsert_and_delete() {
        let code = create_test_code("a@example.com", "1234");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[code]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let repo = UserCodeRepository::new(db);

        let active = user_code::ActiveModel {
            email: Set("a@example.com".to_string()),
            confirmation_code: Set("1234".to_string()),
            created: Set(Utc::now().into()),
        };

        repo.upsert(active).await.unwrap();
        repo.delete_by_email("a@example.com").await.unwrap();
    }
}
