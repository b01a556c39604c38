//! Land parcel aggregate and its lifecycle status.
//!
//! The status field is the exclusive possession of the land lifecycle
//! service; adapters rehydrate stored parcels but never invent transitions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::Money;
use super::user::UserId;

/// Stable land parcel identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct LandId(Uuid);

impl LandId {
    /// Validate and construct a [`LandId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, LandValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| LandValidationError::InvalidId)
    }

    /// Wrap an already-validated UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`LandId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for LandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle status of a land parcel.
///
/// Transitions:
/// - `pending_approval` → `available` (admin approval) or `rejected`
/// - `available` → `reserved` (investment request)
/// - `reserved` → `active` (payment confirmed) or back to `available`
///   (reservation fell through)
/// - `active` and `rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LandStatus {
    PendingApproval,
    Available,
    Reserved,
    Active,
    Rejected,
}

impl LandStatus {
    /// Canonical storage identifier for the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingApproval => "pending_approval",
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Active => "active",
            Self::Rejected => "rejected",
        }
    }

    /// Whether no further transition can leave this status.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Active | Self::Rejected)
    }
}

impl FromStr for LandStatus {
    type Err = LandValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending_approval" => Ok(Self::PendingApproval),
            "available" => Ok(Self::Available),
            "reserved" => Ok(Self::Reserved),
            "active" => Ok(Self::Active),
            "rejected" => Ok(Self::Rejected),
            other => Err(LandValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

impl fmt::Display for LandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for land identifiers, statuses, and drafts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LandValidationError {
    #[error("land id must be a valid UUID")]
    InvalidId,
    #[error("unknown land status: {0}")]
    UnknownStatus(String),
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("location must not be empty")]
    EmptyLocation,
    #[error("land type must not be empty")]
    EmptyLandType,
    #[error("ownership info must not be empty")]
    EmptyOwnershipInfo,
    #[error("area must be greater than zero")]
    NonPositiveArea,
    #[error("total price must be greater than zero")]
    NonPositivePrice,
    #[error("fixed payout must not be negative")]
    NegativePayout,
    #[error("revenue share percent must be between 0 and 100")]
    RevenueShareOutOfRange,
}

/// Owner-supplied attributes for a land submission.
///
/// A draft deliberately has no status field: submissions always enter the
/// lifecycle at `pending_approval` regardless of what the caller sends.
#[derive(Debug, Clone, PartialEq)]
pub struct LandDraft {
    title: String,
    location: String,
    land_type: String,
    ownership_info: String,
    area_sqft: f64,
    total_price: Money,
    potential_capacity_kw: f64,
    owner_fixed_payout: Money,
    owner_revenue_share_percent: f64,
    description: Option<String>,
    image_url: Option<String>,
}

/// Raw field bundle used to build a [`LandDraft`].
#[derive(Debug, Clone, Default)]
pub struct LandDraftFields {
    pub title: String,
    pub location: String,
    pub land_type: String,
    pub ownership_info: String,
    pub area_sqft: f64,
    pub total_price: Money,
    pub potential_capacity_kw: f64,
    pub owner_fixed_payout: Money,
    pub owner_revenue_share_percent: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl LandDraft {
    /// Validate and construct a submission draft.
    pub fn new(fields: LandDraftFields) -> Result<Self, LandValidationError> {
        let LandDraftFields {
            title,
            location,
            land_type,
            ownership_info,
            area_sqft,
            total_price,
            potential_capacity_kw,
            owner_fixed_payout,
            owner_revenue_share_percent,
            description,
            image_url,
        } = fields;

        if title.trim().is_empty() {
            return Err(LandValidationError::EmptyTitle);
        }
        if location.trim().is_empty() {
            return Err(LandValidationError::EmptyLocation);
        }
        if land_type.trim().is_empty() {
            return Err(LandValidationError::EmptyLandType);
        }
        if ownership_info.trim().is_empty() {
            return Err(LandValidationError::EmptyOwnershipInfo);
        }
        if !(area_sqft > 0.0) {
            return Err(LandValidationError::NonPositiveArea);
        }
        if !total_price.is_positive() {
            return Err(LandValidationError::NonPositivePrice);
        }
        if owner_fixed_payout.is_negative() {
            return Err(LandValidationError::NegativePayout);
        }
        if !(0.0..=100.0).contains(&owner_revenue_share_percent) {
            return Err(LandValidationError::RevenueShareOutOfRange);
        }

        Ok(Self {
            title,
            location,
            land_type,
            ownership_info,
            area_sqft,
            total_price,
            potential_capacity_kw,
            owner_fixed_payout,
            owner_revenue_share_percent,
            description,
            image_url,
        })
    }
}

/// Solar-capable land parcel listed by an owner.
///
/// ## Invariants
/// - `owner_id` is immutable after creation.
/// - `status` changes only through the land lifecycle service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Land {
    id: LandId,
    owner_id: UserId,
    title: String,
    location: String,
    land_type: String,
    ownership_info: String,
    area_sqft: f64,
    total_price: Money,
    potential_capacity_kw: f64,
    owner_fixed_payout: Money,
    owner_revenue_share_percent: f64,
    description: Option<String>,
    image_url: Option<String>,
    status: LandStatus,
    created_at: DateTime<Utc>,
}

impl Land {
    /// Create a parcel from an owner submission, entering the lifecycle at
    /// `pending_approval`.
    pub fn submitted(
        id: LandId,
        owner_id: UserId,
        draft: LandDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        let LandDraft {
            title,
            location,
            land_type,
            ownership_info,
            area_sqft,
            total_price,
            potential_capacity_kw,
            owner_fixed_payout,
            owner_revenue_share_percent,
            description,
            image_url,
        } = draft;

        Self {
            id,
            owner_id,
            title,
            location,
            land_type,
            ownership_info,
            area_sqft,
            total_price,
            potential_capacity_kw,
            owner_fixed_payout,
            owner_revenue_share_percent,
            description,
            image_url,
            status: LandStatus::PendingApproval,
            created_at,
        }
    }

    /// Rehydrate a stored parcel. Adapter-side constructor; the status has
    /// already been validated against the storage identifier set.
    pub fn from_stored(
        id: LandId,
        owner_id: UserId,
        draft: LandDraft,
        status: LandStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut land = Self::submitted(id, owner_id, draft, created_at);
        land.status = status;
        land
    }

    /// Stable parcel identifier.
    pub fn id(&self) -> &LandId {
        &self.id
    }

    /// Owning user; immutable after creation.
    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Listing title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Free-text location used for search.
    pub fn location(&self) -> &str {
        self.location.as_str()
    }

    /// Kind of site, e.g. rooftop or open land.
    pub fn land_type(&self) -> &str {
        self.land_type.as_str()
    }

    /// Ownership arrangement, e.g. sole owner or leased.
    pub fn ownership_info(&self) -> &str {
        self.ownership_info.as_str()
    }

    /// Parcel area in square feet.
    pub fn area_sqft(&self) -> f64 {
        self.area_sqft
    }

    /// Asking price for full funding.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Estimated generation capacity in kilowatts.
    pub fn potential_capacity_kw(&self) -> f64 {
        self.potential_capacity_kw
    }

    /// Fixed payout owed to the owner per payout cycle.
    pub fn owner_fixed_payout(&self) -> Money {
        self.owner_fixed_payout
    }

    /// Owner's share of generation revenue, in percent.
    pub fn owner_revenue_share_percent(&self) -> f64 {
        self.owner_revenue_share_percent
    }

    /// Optional listing description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Optional listing image.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Current lifecycle status.
    pub fn status(&self) -> LandStatus {
        self.status
    }

    /// Submission timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Copy of this parcel carrying an updated status.
    pub(crate) fn with_status(mut self, status: LandStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn fields() -> LandDraftFields {
        LandDraftFields {
            title: "South field".into(),
            location: "Pune".into(),
            land_type: "Open Land".into(),
            ownership_info: "Sole Owner".into(),
            area_sqft: 12_000.0,
            total_price: Money::from_minor(5_000_000),
            potential_capacity_kw: 25.0,
            owner_fixed_payout: Money::from_minor(50_000),
            owner_revenue_share_percent: 10.0,
            description: None,
            image_url: None,
        }
    }

    #[rstest]
    fn submission_always_starts_pending_approval() {
        let draft = LandDraft::new(fields()).expect("valid draft");
        let land = Land::submitted(LandId::random(), UserId::random(), draft, Utc::now());
        assert_eq!(land.status(), LandStatus::PendingApproval);
    }

    #[rstest]
    fn draft_rejects_blank_title() {
        let mut raw = fields();
        raw.title = "   ".into();
        let err = LandDraft::new(raw).expect_err("blank title rejected");
        assert_eq!(err, LandValidationError::EmptyTitle);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    fn draft_rejects_non_positive_area(#[case] area: f64) {
        let mut raw = fields();
        raw.area_sqft = area;
        let err = LandDraft::new(raw).expect_err("non-positive area rejected");
        assert_eq!(err, LandValidationError::NonPositiveArea);
    }

    #[rstest]
    fn draft_rejects_free_listings() {
        let mut raw = fields();
        raw.total_price = Money::ZERO;
        let err = LandDraft::new(raw).expect_err("zero price rejected");
        assert_eq!(err, LandValidationError::NonPositivePrice);
    }

    #[rstest]
    #[case(-0.1)]
    #[case(100.1)]
    fn draft_rejects_out_of_range_revenue_share(#[case] percent: f64) {
        let mut raw = fields();
        raw.owner_revenue_share_percent = percent;
        let err = LandDraft::new(raw).expect_err("share out of range rejected");
        assert_eq!(err, LandValidationError::RevenueShareOutOfRange);
    }

    #[rstest]
    #[case("pending_approval", LandStatus::PendingApproval)]
    #[case("available", LandStatus::Available)]
    #[case("reserved", LandStatus::Reserved)]
    #[case("active", LandStatus::Active)]
    #[case("rejected", LandStatus::Rejected)]
    fn status_round_trips_through_storage_identifier(
        #[case] raw: &str,
        #[case] status: LandStatus,
    ) {
        assert_eq!(raw.parse::<LandStatus>().expect("known status"), status);
        assert_eq!(status.as_str(), raw);
    }

    #[rstest]
    fn unknown_status_is_rejected() {
        let err = "sold".parse::<LandStatus>().expect_err("unknown status");
        assert_eq!(err, LandValidationError::UnknownStatus("sold".into()));
    }

    #[rstest]
    fn terminal_statuses_are_active_and_rejected() {
        assert!(LandStatus::Active.is_terminal());
        assert!(LandStatus::Rejected.is_terminal());
        assert!(!LandStatus::Reserved.is_terminal());
        assert!(!LandStatus::Available.is_terminal());
        assert!(!LandStatus::PendingApproval.is_terminal());
    }
}
