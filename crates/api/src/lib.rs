//! HTTP API layer for critika.
//!
//! This crate provides the REST API under `/v1`:
//!
//! - **Endpoints**: auth, categories, genres, titles, reviews, comments, users
//! - **Extractors**: authenticated and optionally-authenticated callers
//! - **Middleware**: bearer-token resolution into the request
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
