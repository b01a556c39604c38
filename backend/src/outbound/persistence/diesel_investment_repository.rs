//! PostgreSQL-backed `InvestmentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CasOutcome, InvestmentRepository, InvestmentRepositoryError};
use crate::domain::{Investment, InvestmentFilter, InvestmentId, InvestmentStatus, Money, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{InvestmentRow, NewInvestmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::investments;

/// Diesel-backed implementation of the investment record port.
#[derive(Clone)]
pub struct DieselInvestmentRepository {
    pool: DbPool,
}

impl DieselInvestmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> InvestmentRepositoryError {
    map_pool_error(error, InvestmentRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> InvestmentRepositoryError {
    map_diesel_error(
        error,
        InvestmentRepositoryError::query,
        InvestmentRepositoryError::connection,
    )
}

fn rows_to_investments(
    rows: Vec<InvestmentRow>,
) -> Result<Vec<Investment>, InvestmentRepositoryError> {
    rows.into_iter()
        .map(|row| row.into_domain().map_err(InvestmentRepositoryError::query))
        .collect()
}

#[async_trait]
impl InvestmentRepository for DieselInvestmentRepository {
    async fn insert(&self, investment: &Investment) -> Result<(), InvestmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::insert_into(investments::table)
            .values(&NewInvestmentRow::from_domain(investment))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &InvestmentId,
    ) -> Result<Option<Investment>, InvestmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = investments::table
            .filter(investments::id.eq(id.as_uuid()))
            .select(InvestmentRow::as_select())
            .first::<InvestmentRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(|row| {
            row.into_domain()
                .map_err(InvestmentRepositoryError::query)
        })
        .transpose()
    }

    async fn compare_and_swap_status(
        &self,
        id: &InvestmentId,
        expected: InvestmentStatus,
        next: InvestmentStatus,
        amount: Option<Money>,
    ) -> Result<CasOutcome, InvestmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let target = investments::table.filter(
            investments::id
                .eq(id.as_uuid())
                .and(investments::status.eq(expected.as_str())),
        );

        // The optional amount overwrite rides on the same conditional
        // update so status and amount can never diverge.
        let updated = match amount {
            Some(amount) => {
                diesel::update(target)
                    .set((
                        investments::status.eq(next.as_str()),
                        investments::amount_minor.eq(amount.minor()),
                    ))
                    .execute(&mut conn)
                    .await
            }
            None => {
                diesel::update(target)
                    .set(investments::status.eq(next.as_str()))
                    .execute(&mut conn)
                    .await
            }
        }
        .map_err(diesel_error)?;

        Ok(if updated == 0 {
            CasOutcome::Lost
        } else {
            CasOutcome::Applied
        })
    }

    async fn list_by_investor(
        &self,
        investor: &UserId,
        filter: InvestmentFilter,
    ) -> Result<Vec<Investment>, InvestmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let statuses: &[&str] = match filter {
            InvestmentFilter::Open => &[
                InvestmentStatus::PendingApproval.as_str(),
                InvestmentStatus::PaymentPending.as_str(),
            ],
            InvestmentFilter::Closed => &[InvestmentStatus::Completed.as_str()],
        };

        let rows: Vec<InvestmentRow> = investments::table
            .filter(
                investments::investor_id
                    .eq(investor.as_uuid())
                    .and(investments::status.eq_any(statuses)),
            )
            .order(investments::created_at.desc())
            .select(InvestmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        rows_to_investments(rows)
    }

    async fn list_by_status(
        &self,
        status: InvestmentStatus,
    ) -> Result<Vec<Investment>, InvestmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let rows: Vec<InvestmentRow> = investments::table
            .filter(investments::status.eq(status.as_str()))
            .order(investments::created_at.desc())
            .select(InvestmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        rows_to_investments(rows)
    }
}
