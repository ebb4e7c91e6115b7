//! Business logic services.

#![allow(missing_docs)]

pub mod auth;
pub mod catalog;
pub mod comment;
pub mod email;
pub mod review;
pub mod user;

pub use auth::{AuthService, ExchangeCodeInput, RefreshInput, RequestCodeInput};
pub use catalog::{
    CatalogService, CreateTaxonomyInput, CreateTitleInput, TitleDetails, UpdateTitleInput,
};
pub use comment::{CommentDetails, CommentService, CreateCommentInput, UpdateCommentInput};
pub use email::EmailService;
pub use review::{CreateReviewInput, ReviewDetails, ReviewService, UpdateReviewInput};
pub use user::{CreateUserInput, UpdateUserInput, UserService};
