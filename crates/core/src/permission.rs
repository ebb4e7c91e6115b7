//! Permission evaluator.
//!
//! Pure functions over an explicit caller model. No framework types appear
//! here, so every policy is unit-testable as `(role, is_staff, method,
//! is_author) -> bool`.
//!
//! Object-level checks apply only to mutations of existing resources;
//! creation is governed solely by the coarse authenticated-or-read-only
//! check.

use critika_common::{AppError, AppResult};
use critika_db::entities::user::{self, UserRole};

/// Request method as the policies see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Options,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Safe methods never mutate and are open to everyone.
    #[must_use]
    pub const fn is_safe(self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Options)
    }
}

/// The caller attributes the policies evaluate. `None` = anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Assigned role.
    pub role: UserRole,
    /// Superuser flag, orthogonal to role.
    pub is_staff: bool,
}

impl From<&user::Model> for Actor {
    fn from(user: &user::Model) -> Self {
        Self {
            role: user.role,
            is_staff: user.is_staff,
        }
    }
}

/// Allow only authenticated admins: staff or role=admin.
#[must_use]
pub fn is_admin(actor: Option<Actor>) -> bool {
    actor.is_some_and(|a| a.is_staff || a.role == UserRole::Admin)
}

/// Safe methods for everyone; mutations require an admin.
#[must_use]
pub fn is_admin_or_read_only(actor: Option<Actor>, method: Method) -> bool {
    method.is_safe() || is_admin(actor)
}

/// Coarse check for author-owned resources: safe methods for everyone,
/// anything else for any authenticated caller. This is the only gate on
/// creation.
#[must_use]
pub fn is_authenticated_or_read_only(actor: Option<Actor>, method: Method) -> bool {
    method.is_safe() || actor.is_some()
}

/// Object-level check for author-owned resources.
///
/// Only PATCH and DELETE can mutate an existing object, and only for the
/// author, moderators, admins, or staff. Every other unsafe method is
/// denied regardless of who asks.
#[must_use]
pub fn is_staff_or_author_or_read_only(
    actor: Option<Actor>,
    method: Method,
    is_author: bool,
) -> bool {
    if method.is_safe() {
        return true;
    }
    if !matches!(method, Method::Patch | Method::Delete) {
        return false;
    }
    let Some(actor) = actor else {
        return false;
    };
    is_author || actor.is_staff || actor.role == UserRole::Admin || actor.role == UserRole::Moderator
}

/// Guard: the caller must be an admin.
///
/// Anonymous callers get 401, authenticated non-admins 403.
pub fn require_admin(user: Option<&user::Model>) -> AppResult<()> {
    match user {
        None => Err(AppError::Unauthorized),
        Some(u) if is_admin(Some(Actor::from(u))) => Ok(()),
        Some(_) => Err(AppError::PermissionDenied(
            "admin rights required".to_string(),
        )),
    }
}

/// Guard: the caller may mutate an object owned by `author_id` with `method`.
pub fn require_object_mutation(
    user: &user::Model,
    method: Method,
    author_id: &str,
) -> AppResult<()> {
    let allowed =
        is_staff_or_author_or_read_only(Some(Actor::from(user)), method, user.id == author_id);
    if allowed {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(
            "you may only modify your own content".to_string(),
        ))
    }
}
