//! API endpoints.

mod auth;
mod categories;
mod comments;
mod genres;
mod reviews;
mod titles;
mod users;

pub use categories::CategoryResponse;
pub use genres::GenreResponse;

use axum::Router;

use crate::middleware::AppState;

/// Create the `/v1` API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", categories::router())
        .nest("/genres", genres::router())
        .nest("/titles", titles::router())
        .nest("/users", users::router())
}
