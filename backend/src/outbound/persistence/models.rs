//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and
//! must never be exposed to the domain. Conversions into domain aggregates
//! go through the validated domain constructors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Investment, InvestmentId, Land, LandDraft, LandDraftFields, LandId, Money, User, UserId,
};

use super::schema::{investments, lands, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub balance_minor: i64,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// Convert into a validated domain user.
    pub(crate) fn into_domain(self) -> Result<User, String> {
        let role = self.role.parse().map_err(|err| format!("{err}"))?;
        User::new(
            UserId::from_uuid(self.id),
            self.email,
            self.full_name,
            self.phone,
            role,
            Money::from_minor(self.balance_minor),
            self.created_at,
        )
        .map_err(|err| err.to_string())
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub full_name: &'a str,
    pub phone: Option<&'a str>,
    pub role: &'a str,
    pub balance_minor: i64,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the lands table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = lands)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LandRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub location: String,
    pub land_type: String,
    pub ownership_info: String,
    pub area_sqft: f64,
    pub total_price_minor: i64,
    pub potential_capacity_kw: f64,
    pub owner_fixed_payout_minor: i64,
    pub owner_revenue_share_percent: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl LandRow {
    /// Convert into a validated domain land parcel.
    pub(crate) fn into_domain(self) -> Result<Land, String> {
        let status = self.status.parse().map_err(|err| format!("{err}"))?;
        let draft = LandDraft::new(LandDraftFields {
            title: self.title,
            location: self.location,
            land_type: self.land_type,
            ownership_info: self.ownership_info,
            area_sqft: self.area_sqft,
            total_price: Money::from_minor(self.total_price_minor),
            potential_capacity_kw: self.potential_capacity_kw,
            owner_fixed_payout: Money::from_minor(self.owner_fixed_payout_minor),
            owner_revenue_share_percent: self.owner_revenue_share_percent,
            description: self.description,
            image_url: self.image_url,
        })
        .map_err(|err| err.to_string())?;

        Ok(Land::from_stored(
            LandId::from_uuid(self.id),
            UserId::from_uuid(self.owner_id),
            draft,
            status,
            self.created_at,
        ))
    }
}

/// Insertable struct for creating new land records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = lands)]
pub(crate) struct NewLandRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: &'a str,
    pub location: &'a str,
    pub land_type: &'a str,
    pub ownership_info: &'a str,
    pub area_sqft: f64,
    pub total_price_minor: i64,
    pub potential_capacity_kw: f64,
    pub owner_fixed_payout_minor: i64,
    pub owner_revenue_share_percent: f64,
    pub description: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewLandRow<'a> {
    pub(crate) fn from_domain(land: &'a Land) -> Self {
        Self {
            id: *land.id().as_uuid(),
            owner_id: *land.owner_id().as_uuid(),
            title: land.title(),
            location: land.location(),
            land_type: land.land_type(),
            ownership_info: land.ownership_info(),
            area_sqft: land.area_sqft(),
            total_price_minor: land.total_price().minor(),
            potential_capacity_kw: land.potential_capacity_kw(),
            owner_fixed_payout_minor: land.owner_fixed_payout().minor(),
            owner_revenue_share_percent: land.owner_revenue_share_percent(),
            description: land.description(),
            image_url: land.image_url(),
            status: land.status().as_str(),
            created_at: land.created_at(),
        }
    }
}

/// Row struct for reading from the investments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = investments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InvestmentRow {
    pub id: Uuid,
    pub land_id: Uuid,
    pub investor_id: Uuid,
    pub amount_minor: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl InvestmentRow {
    /// Convert into a domain investment record.
    pub(crate) fn into_domain(self) -> Result<Investment, String> {
        let status = self.status.parse().map_err(|err| format!("{err}"))?;
        Ok(Investment::from_stored(
            InvestmentId::from_uuid(self.id),
            LandId::from_uuid(self.land_id),
            UserId::from_uuid(self.investor_id),
            Money::from_minor(self.amount_minor),
            status,
            self.created_at,
        ))
    }
}

/// Insertable struct for creating new investment records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = investments)]
pub(crate) struct NewInvestmentRow {
    pub id: Uuid,
    pub land_id: Uuid,
    pub investor_id: Uuid,
    pub amount_minor: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl NewInvestmentRow {
    pub(crate) fn from_domain(investment: &Investment) -> Self {
        Self {
            id: *investment.id().as_uuid(),
            land_id: *investment.land_id().as_uuid(),
            investor_id: *investment.investor_id().as_uuid(),
            amount_minor: investment.amount().minor(),
            status: investment.status().as_str().to_owned(),
            created_at: investment.created_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn user_row_rejects_unknown_roles() {
        let row = UserRow {
            id: Uuid::new_v4(),
            email: "row@example.com".into(),
            full_name: "Row User".into(),
            phone: None,
            role: "superuser".into(),
            balance_minor: 0,
            created_at: Utc::now(),
        };

        let err = row.into_domain().expect_err("unknown role refused");
        assert!(err.contains("superuser"));
    }

    #[rstest]
    fn land_row_rejects_unknown_statuses() {
        let row = LandRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Plot".into(),
            location: "Pune".into(),
            land_type: "Farm".into(),
            ownership_info: "Sole Owner".into(),
            area_sqft: 1_000.0,
            total_price_minor: 100_000,
            potential_capacity_kw: 10.0,
            owner_fixed_payout_minor: 1_000,
            owner_revenue_share_percent: 10.0,
            description: None,
            image_url: None,
            status: "sold".into(),
            created_at: Utc::now(),
        };

        let err = row.into_domain().expect_err("unknown status refused");
        assert!(err.contains("sold"));
    }

    #[rstest]
    fn investment_row_round_trips_through_the_domain() {
        let row = InvestmentRow {
            id: Uuid::new_v4(),
            land_id: Uuid::new_v4(),
            investor_id: Uuid::new_v4(),
            amount_minor: 5_000,
            status: "payment_pending".into(),
            created_at: Utc::now(),
        };

        let investment = row.clone().into_domain().expect("valid row");
        let back = NewInvestmentRow::from_domain(&investment);
        assert_eq!(back.amount_minor, row.amount_minor);
        assert_eq!(back.status, row.status);
    }
}
