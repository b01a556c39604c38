//! User identity and role model.
//!
//! Users are created by the identity collaborator; this core only reads
//! identity fields and lets the wallet manager adjust balances through the
//! repository port.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::Money;

/// Validation errors returned by [`User::new`] and the id/role parsers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must contain an '@'")]
    MalformedEmail,
    #[error("full name must not be empty")]
    EmptyFullName,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an already-validated UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role assigned to a user at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    LandOwner,
    Investor,
    Admin,
}

impl Role {
    /// Canonical storage identifier for the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LandOwner => "land_owner",
            Self::Investor => "investor",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "land_owner" => Ok(Self::LandOwner),
            "investor" => Ok(Self::Investor),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered platform user.
///
/// ## Invariants
/// - `email` is non-empty and contains an `@`.
/// - `full_name` is non-empty once trimmed.
/// - `balance` is adjusted only by the wallet manager; other components
///   treat it as read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    email: String,
    full_name: String,
    phone: Option<String>,
    role: Role,
    balance: Money,
    created_at: DateTime<Utc>,
}

impl User {
    /// Build a user from validated components.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        full_name: impl Into<String>,
        phone: Option<String>,
        role: Role,
        balance: Money,
        created_at: DateTime<Utc>,
    ) -> Result<Self, UserValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email.contains('@') {
            return Err(UserValidationError::MalformedEmail);
        }

        let full_name = full_name.into();
        if full_name.trim().is_empty() {
            return Err(UserValidationError::EmptyFullName);
        }

        Ok(Self {
            id,
            email,
            full_name,
            phone,
            role,
            balance,
            created_at,
        })
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Registration email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Full display name.
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    /// Optional contact phone number.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Role assigned at registration.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Current wallet balance.
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Registration timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Copy of this user carrying an updated balance.
    pub(crate) fn with_balance(mut self, balance: Money) -> Self {
        self.balance = balance;
        self
    }
}
