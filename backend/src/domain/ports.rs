//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe how the domain expects to talk to the backing
//! store and identity collaborator. The store is assumed to offer
//! single-row conditional updates only, so every state transition is
//! expressed as a compare-and-swap returning [`CasOutcome`]. Driving ports
//! are the surface consumed by the HTTP adapters.

use async_trait::async_trait;
use thiserror::Error;

use super::error::Error;
use super::investment::{Investment, InvestmentFilter, InvestmentId, InvestmentStatus};
use super::land::{Land, LandDraft, LandId, LandStatus};
use super::money::Money;
use super::stats::PlatformStats;
use super::user::{Role, User, UserId};

/// Outcome of a conditional single-row update.
///
/// `Lost` means the row no longer matched the expected prior value: either
/// the precondition never held or a concurrent writer won the race. The
/// caller decides whether to retry or surface `Conflict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// The row matched and the update was applied.
    Applied,
    /// The row did not match; nothing was written.
    Lost,
}

/// Persistence errors raised by [`UserRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// A user with the same email already exists.
    #[error("email already registered: {email}")]
    DuplicateEmail { email: String },
}

impl UserRepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for unique-email violations.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }
}

/// Persistence errors raised by [`LandRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LandRepositoryError {
    /// Repository connection could not be established.
    #[error("land repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("land repository query failed: {message}")]
    Query { message: String },
}

impl LandRepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Persistence errors raised by [`InvestmentRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvestmentRepositoryError {
    /// Repository connection could not be established.
    #[error("investment repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("investment repository query failed: {message}")]
    Query { message: String },
}

impl InvestmentRepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Identity and wallet persistence port.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user record.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by registration email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;

    /// Conditionally replace the balance where it still equals `expected`.
    async fn compare_and_swap_balance(
        &self,
        id: &UserId,
        expected: Money,
        next: Money,
    ) -> Result<CasOutcome, UserRepositoryError>;

    /// Count users holding the given role.
    async fn count_by_role(&self, role: Role) -> Result<u64, UserRepositoryError>;
}

/// Land parcel persistence port.
#[async_trait]
pub trait LandRepository: Send + Sync {
    /// Insert a new land record.
    async fn insert(&self, land: &Land) -> Result<(), LandRepositoryError>;

    /// Fetch a parcel by identifier.
    async fn find_by_id(&self, id: &LandId) -> Result<Option<Land>, LandRepositoryError>;

    /// Conditionally transition the status where it still equals
    /// `expected`. This is the admission-control primitive: a `Lost`
    /// outcome guarantees nothing was written.
    async fn compare_and_swap_status(
        &self,
        id: &LandId,
        expected: LandStatus,
        next: LandStatus,
    ) -> Result<CasOutcome, LandRepositoryError>;

    /// List parcels in the given status, optionally narrowed by a
    /// case-insensitive location substring.
    async fn list_by_status(
        &self,
        status: LandStatus,
        location: Option<&str>,
    ) -> Result<Vec<Land>, LandRepositoryError>;

    /// List parcels owned by the given user.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Land>, LandRepositoryError>;

    /// Count parcels in the given status.
    async fn count_by_status(&self, status: LandStatus) -> Result<u64, LandRepositoryError>;
}

/// Investment record persistence port.
#[async_trait]
pub trait InvestmentRepository: Send + Sync {
    /// Insert a new investment record.
    async fn insert(&self, investment: &Investment) -> Result<(), InvestmentRepositoryError>;

    /// Fetch a record by identifier.
    async fn find_by_id(
        &self,
        id: &InvestmentId,
    ) -> Result<Option<Investment>, InvestmentRepositoryError>;

    /// Conditionally transition the status where it still equals
    /// `expected`, optionally overwriting the amount in the same write.
    async fn compare_and_swap_status(
        &self,
        id: &InvestmentId,
        expected: InvestmentStatus,
        next: InvestmentStatus,
        amount: Option<Money>,
    ) -> Result<CasOutcome, InvestmentRepositoryError>;

    /// List records for an investor, narrowed to a status category.
    async fn list_by_investor(
        &self,
        investor: &UserId,
        filter: InvestmentFilter,
    ) -> Result<Vec<Investment>, InvestmentRepositoryError>;

    /// List records in the given status for admin review queues.
    async fn list_by_status(
        &self,
        status: InvestmentStatus,
    ) -> Result<Vec<Investment>, InvestmentRepositoryError>;
}

/// Driving port: land lifecycle mutations exposed to the HTTP layer.
#[async_trait]
pub trait LandCommand: Send + Sync {
    /// Submit a new parcel on behalf of its owner; always enters
    /// `pending_approval`.
    async fn submit(&self, owner: UserId, draft: LandDraft) -> Result<Land, Error>;

    /// Admin approval: `pending_approval` → `available`.
    async fn approve(&self, actor: UserId, land: LandId) -> Result<Land, Error>;

    /// Admin rejection: `pending_approval` → `rejected`.
    async fn reject(&self, actor: UserId, land: LandId) -> Result<Land, Error>;
}

/// Driving port: land read-side queries.
#[async_trait]
pub trait LandQuery: Send + Sync {
    /// Parcels open for investment, optionally filtered by location.
    async fn available(&self, location: Option<&str>) -> Result<Vec<Land>, Error>;

    /// Fetch a single parcel.
    async fn get(&self, land: LandId) -> Result<Land, Error>;

    /// Parcels owned by the given user.
    async fn by_owner(&self, owner: UserId) -> Result<Vec<Land>, Error>;

    /// Installed/funded sites shown on the public map.
    async fn active_sites(&self) -> Result<Vec<Land>, Error>;

    /// Admin review queue of parcels awaiting approval.
    async fn pending_review(&self, actor: UserId) -> Result<Vec<Land>, Error>;
}

/// Driving port: investment lifecycle mutations exposed to the HTTP layer.
#[async_trait]
pub trait InvestmentCommand: Send + Sync {
    /// Reserve a land parcel and create the funding request. At most one
    /// concurrent caller wins; the rest observe `Conflict`.
    async fn request(
        &self,
        investor: UserId,
        land: LandId,
        amount: Money,
    ) -> Result<Investment, Error>;

    /// Admin approval of financial terms: `pending_approval` →
    /// `payment_pending`, optionally renegotiating the amount.
    async fn approve(
        &self,
        actor: UserId,
        investment: InvestmentId,
        final_amount: Option<Money>,
    ) -> Result<Investment, Error>;

    /// Admin rejection with compensating release of the land.
    async fn reject(&self, actor: UserId, investment: InvestmentId) -> Result<Investment, Error>;

    /// Admin payment confirmation: `payment_pending` → `completed`,
    /// activating the land in the same logical unit of work.
    async fn confirm_payment(
        &self,
        actor: UserId,
        investment: InvestmentId,
    ) -> Result<Investment, Error>;

    /// Investor-initiated withdrawal, releasing the land.
    async fn cancel(&self, investor: UserId, investment: InvestmentId)
    -> Result<Investment, Error>;
}

/// Driving port: investment read-side queries.
#[async_trait]
pub trait InvestmentQuery: Send + Sync {
    /// Records for an investor narrowed to a status category.
    async fn for_investor(
        &self,
        investor: UserId,
        filter: InvestmentFilter,
    ) -> Result<Vec<Investment>, Error>;

    /// Admin review queue for the given status.
    async fn review_queue(
        &self,
        actor: UserId,
        status: InvestmentStatus,
    ) -> Result<Vec<Investment>, Error>;
}

/// Driving port: wallet operations.
#[async_trait]
pub trait WalletOps: Send + Sync {
    /// Add funds; amount must be strictly positive.
    async fn credit(&self, user: UserId, amount: Money) -> Result<Money, Error>;

    /// Withdraw funds; fails with `InsufficientFunds` when the balance
    /// cannot cover the amount.
    async fn debit(&self, user: UserId, amount: Money) -> Result<Money, Error>;

    /// Current balance.
    async fn balance_of(&self, user: UserId) -> Result<Money, Error>;
}

/// Driving port: public platform statistics projection.
#[async_trait]
pub trait PlatformStatsQuery: Send + Sync {
    /// Aggregate public counters; a pure read-side projection.
    async fn platform_stats(&self) -> Result<PlatformStats, Error>;
}
