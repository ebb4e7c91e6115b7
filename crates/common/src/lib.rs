//! Common utilities and shared types for critika.
//!
//! This crate provides foundational components used across all critika crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based identifiers and confirmation codes via [`IdGenerator`]
//! - **Tokens**: Signed access/refresh token pairs via [`token`]
//!
//! # Example
//!
//! ```no_run
//! use critika_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod token;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use token::{Claims, TokenKind, TokenPair, decode_token, issue_access, issue_pair};
