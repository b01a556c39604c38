//! Investment record aggregate and its lifecycle status.
//!
//! An investment is created when an investor reserves a land parcel and is
//! immutable afterwards except for its status and a final amount negotiated
//! by an admin at approval.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::land::LandId;
use super::money::Money;
use super::user::UserId;

/// Stable investment identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct InvestmentId(Uuid);

impl InvestmentId {
    /// Validate and construct an [`InvestmentId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, InvestmentValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| InvestmentValidationError::InvalidId)
    }

    /// Wrap an already-validated UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`InvestmentId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for InvestmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle status of an investment record.
///
/// Transitions:
/// - `pending_approval` → `payment_pending` (admin approves terms),
///   `rejected` (admin declines), or `cancelled` (investor withdraws)
/// - `payment_pending` → `completed` (payment confirmed) or `cancelled`
/// - `completed`, `rejected`, and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentStatus {
    PendingApproval,
    PaymentPending,
    Completed,
    Rejected,
    Cancelled,
}

impl InvestmentStatus {
    /// Canonical storage identifier for the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingApproval => "pending_approval",
            Self::PaymentPending => "payment_pending",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the record still holds a claim on its land parcel.
    pub const fn is_open(self) -> bool {
        matches!(self, Self::PendingApproval | Self::PaymentPending)
    }

    /// Whether no further transition can leave this status.
    pub const fn is_terminal(self) -> bool {
        !self.is_open()
    }
}

impl FromStr for InvestmentStatus {
    type Err = InvestmentValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending_approval" => Ok(Self::PendingApproval),
            "payment_pending" => Ok(Self::PaymentPending),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(InvestmentValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

impl fmt::Display for InvestmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category filter over investment statuses used by investor queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvestmentFilter {
    /// Anything not completed, rejected, or cancelled.
    Open,
    /// Completed investments only.
    Closed,
}

impl InvestmentFilter {
    /// Whether the given status belongs to this category.
    pub const fn matches(self, status: InvestmentStatus) -> bool {
        match self {
            Self::Open => status.is_open(),
            Self::Closed => matches!(status, InvestmentStatus::Completed),
        }
    }
}

/// Validation errors for investment identifiers and statuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvestmentValidationError {
    #[error("investment id must be a valid UUID")]
    InvalidId,
    #[error("unknown investment status: {0}")]
    UnknownStatus(String),
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
}

/// Funding request from an investor against a single land parcel.
///
/// ## Invariants
/// - `amount` is strictly positive.
/// - `land_id` and `investor_id` are immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    id: InvestmentId,
    land_id: LandId,
    investor_id: UserId,
    amount: Money,
    status: InvestmentStatus,
    created_at: DateTime<Utc>,
}

impl Investment {
    /// Create a new funding request, entering the lifecycle at
    /// `pending_approval`.
    pub fn requested(
        id: InvestmentId,
        land_id: LandId,
        investor_id: UserId,
        amount: Money,
        created_at: DateTime<Utc>,
    ) -> Result<Self, InvestmentValidationError> {
        if !amount.is_positive() {
            return Err(InvestmentValidationError::NonPositiveAmount);
        }

        Ok(Self {
            id,
            land_id,
            investor_id,
            amount,
            status: InvestmentStatus::PendingApproval,
            created_at,
        })
    }

    /// Rehydrate a stored record. Adapter-side constructor.
    pub fn from_stored(
        id: InvestmentId,
        land_id: LandId,
        investor_id: UserId,
        amount: Money,
        status: InvestmentStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            land_id,
            investor_id,
            amount,
            status,
            created_at,
        }
    }

    /// Stable investment identifier.
    pub fn id(&self) -> &InvestmentId {
        &self.id
    }

    /// Target land parcel.
    pub fn land_id(&self) -> &LandId {
        &self.land_id
    }

    /// Funding investor.
    pub fn investor_id(&self) -> &UserId {
        &self.investor_id
    }

    /// Committed amount; may be overwritten once by admin approval.
    pub fn amount(&self) -> Money {
        self.amount
    }

    /// Current lifecycle status.
    pub fn status(&self) -> InvestmentStatus {
        self.status
    }

    /// Request timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Copy of this record carrying an updated status.
    pub(crate) fn with_status(mut self, status: InvestmentStatus) -> Self {
        self.status = status;
        self
    }

    /// Copy of this record carrying a renegotiated amount.
    pub(crate) fn with_amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn request(amount: i64) -> Result<Investment, InvestmentValidationError> {
        Investment::requested(
            InvestmentId::random(),
            LandId::random(),
            UserId::random(),
            Money::from_minor(amount),
            Utc::now(),
        )
    }

    #[rstest]
    fn new_requests_start_pending_approval() {
        let investment = request(10_000).expect("valid request");
        assert_eq!(investment.status(), InvestmentStatus::PendingApproval);
    }

    #[rstest]
    #[case(0)]
    #[case(-500)]
    fn non_positive_amounts_are_rejected(#[case] amount: i64) {
        let err = request(amount).expect_err("non-positive amount rejected");
        assert_eq!(err, InvestmentValidationError::NonPositiveAmount);
    }

    #[rstest]
    #[case(InvestmentStatus::PendingApproval, true)]
    #[case(InvestmentStatus::PaymentPending, true)]
    #[case(InvestmentStatus::Completed, false)]
    #[case(InvestmentStatus::Rejected, false)]
    #[case(InvestmentStatus::Cancelled, false)]
    fn open_statuses_hold_a_claim(#[case] status: InvestmentStatus, #[case] open: bool) {
        assert_eq!(status.is_open(), open);
        assert_eq!(status.is_terminal(), !open);
    }

    #[rstest]
    #[case(InvestmentFilter::Open, InvestmentStatus::PendingApproval, true)]
    #[case(InvestmentFilter::Open, InvestmentStatus::PaymentPending, true)]
    #[case(InvestmentFilter::Open, InvestmentStatus::Completed, false)]
    #[case(InvestmentFilter::Closed, InvestmentStatus::Completed, true)]
    #[case(InvestmentFilter::Closed, InvestmentStatus::Cancelled, false)]
    #[case(InvestmentFilter::Closed, InvestmentStatus::Rejected, false)]
    fn filters_partition_the_status_set(
        #[case] filter: InvestmentFilter,
        #[case] status: InvestmentStatus,
        #[case] matches: bool,
    ) {
        assert_eq!(filter.matches(status), matches);
    }

    #[rstest]
    fn status_parser_rejects_the_superseded_vocabulary() {
        // "pending" came from an earlier draft of the flow; only the
        // canonical identifiers are accepted.
        assert!("pending".parse::<InvestmentStatus>().is_err());
        assert!("approved_waiting_payment".parse::<InvestmentStatus>().is_err());
    }
}
