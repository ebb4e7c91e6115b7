//! Core business logic for critika.

pub mod permission;
pub mod services;

pub use permission::{Actor, Method};
pub use services::*;
