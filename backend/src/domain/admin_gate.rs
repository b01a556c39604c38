//! Authorization predicate for privileged lifecycle transitions.
//!
//! A single reusable check resolves the actor's role through the identity
//! port. Privileged operations (approve, reject, confirm payment) call
//! [`AdminGate::authorize`] before touching any state.

use std::sync::Arc;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Error, Role, User, UserId};

/// Capability check over an actor's resolved role.
pub struct AdminGate<U> {
    users: Arc<U>,
    admin_role: Role,
}

// Derived Clone would bound `U: Clone`; the repositories behind the Arc
// never are.
impl<U> Clone for AdminGate<U> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            admin_role: self.admin_role,
        }
    }
}

impl<U> AdminGate<U> {
    /// Create a gate admitting the default `admin` role.
    pub fn new(users: Arc<U>) -> Self {
        Self {
            users,
            admin_role: Role::Admin,
        }
    }

    /// Create a gate admitting a configured role identifier.
    pub fn with_admin_role(users: Arc<U>, admin_role: Role) -> Self {
        Self { users, admin_role }
    }
}

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("identity store unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("identity store error: {message}"))
        }
        UserRepositoryError::DuplicateEmail { email } => {
            Error::conflict(format!("email already registered: {email}"))
        }
    }
}

impl<U: UserRepository> AdminGate<U> {
    /// Resolve the actor and require the admin role.
    ///
    /// An unknown actor is `Unauthenticated` (401-equivalent); a known
    /// actor with any other role is `Forbidden` (403-equivalent).
    pub async fn authorize(&self, actor: &UserId) -> Result<User, Error> {
        let user = self
            .users
            .find_by_id(actor)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::unauthenticated("unknown actor"))?;

        if user.role() != self.admin_role {
            return Err(Error::forbidden("admin role required"));
        }

        Ok(user)
    }
}
