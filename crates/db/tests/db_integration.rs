//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `critika_test`)
//!   `TEST_DB_PASSWORD` (default: `critika_test`)
//!   `TEST_DB_NAME` (default: `critika_test`)

#![allow(clippy::unwrap_used)]

use chrono::Utc;
use critika_db::entities::{Comment, Review, comment, review, title, user};
use critika_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, PaginatorTrait, Set};

fn user_model(id: &str, email: &str) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(id.to_string()),
        email: Set(email.to_string()),
        username: Set(Some(format!("u-{id}"))),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
}

fn title_model(id: &str, name: &str) -> title::ActiveModel {
    title::ActiveModel {
        id: Set(id.to_string()),
        name: Set(name.to_string()),
        year: Set(1999),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_title_delete_cascades_to_reviews_and_comments() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    let conn = db.connection();

    user_model("u1", "u1@example.com").insert(conn).await.unwrap();
    let title = title_model("t1", "Alien").insert(conn).await.unwrap();

    let review = review::ActiveModel {
        id: Set("r1".to_string()),
        title_id: Set("t1".to_string()),
        author_id: Set("u1".to_string()),
        text: Set("Scary".to_string()),
        score: Set(9),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
    .unwrap();

    comment::ActiveModel {
        id: Set("c1".to_string()),
        review_id: Set(review.id.clone()),
        author_id: Set("u1".to_string()),
        text: Set("Agreed".to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
    .unwrap();

    title.delete(conn).await.unwrap();

    assert_eq!(Review::find().count(conn).await.unwrap(), 0);
    assert_eq!(Comment::find().count(conn).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_review_rejected_by_unique_index() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    let conn = db.connection();

    user_model("u2", "u2@example.com").insert(conn).await.unwrap();
    title_model("t2", "Aliens").insert(conn).await.unwrap();

    let make_review = |id: &str| review::ActiveModel {
        id: Set(id.to_string()),
        title_id: Set("t2".to_string()),
        author_id: Set("u2".to_string()),
        text: Set("Good".to_string()),
        score: Set(7),
        created_at: Set(Utc::now().into()),
    };

    make_review("r2").insert(conn).await.unwrap();
    let second = make_review("r3").insert(conn).await;

    assert!(second.is_err(), "unique (author, title) index must reject");
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_rating_is_mean_of_review_scores() {
    use critika_db::repositories::ReviewRepository;

    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    let conn = db.connection();

    user_model("u3", "u3@example.com").insert(conn).await.unwrap();
    user_model("u4", "u4@example.com").insert(conn).await.unwrap();
    title_model("t3", "Alien 3").insert(conn).await.unwrap();
    title_model("t4", "Unreviewed").insert(conn).await.unwrap();

    for (id, author, score) in [("r4", "u3", 3), ("r5", "u4", 7)] {
        review::ActiveModel {
            id: Set(id.to_string()),
            title_id: Set("t3".to_string()),
            author_id: Set(author.to_string()),
            text: Set("Fine".to_string()),
            score: Set(score),
            created_at: Set(Utc::now().into()),
        }
        .insert(conn)
        .await
        .unwrap();
    }

    let repo = ReviewRepository::new(std::sync::Arc::new(db.conn));
    assert_eq!(repo.average_score("t3").await.unwrap(), Some(5.0));
    assert_eq!(repo.average_score("t4").await.unwrap(), None);
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
}
