//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use critika_core::{AuthService, CatalogService, CommentService, ReviewService, UserService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub review_service: ReviewService,
    pub comment_service: CommentService,
    pub user_service: UserService,
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <access token>` to a user model in the
/// request extensions. Invalid or missing tokens leave the request
/// anonymous; the extractors decide whether that is acceptable.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.auth_service.authenticate_access(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
