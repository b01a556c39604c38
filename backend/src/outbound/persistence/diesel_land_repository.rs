//! PostgreSQL-backed `LandRepository` implementation using Diesel ORM.
//!
//! Status transitions are single conditional `UPDATE`s keyed on the
//! expected prior status. PostgreSQL's row-level locking makes the
//! check-and-write atomic, so at most one concurrent caller observes
//! `Applied` for any given transition.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CasOutcome, LandRepository, LandRepositoryError};
use crate::domain::{Land, LandId, LandStatus, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{LandRow, NewLandRow};
use super::pool::{DbPool, PoolError};
use super::schema::lands;

/// Diesel-backed implementation of the land parcel port.
#[derive(Clone)]
pub struct DieselLandRepository {
    pool: DbPool,
}

impl DieselLandRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> LandRepositoryError {
    map_pool_error(error, LandRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> LandRepositoryError {
    map_diesel_error(
        error,
        LandRepositoryError::query,
        LandRepositoryError::connection,
    )
}

fn rows_to_lands(rows: Vec<LandRow>) -> Result<Vec<Land>, LandRepositoryError> {
    rows.into_iter()
        .map(|row| row.into_domain().map_err(LandRepositoryError::query))
        .collect()
}

#[async_trait]
impl LandRepository for DieselLandRepository {
    async fn insert(&self, land: &Land) -> Result<(), LandRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::insert_into(lands::table)
            .values(&NewLandRow::from_domain(land))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find_by_id(&self, id: &LandId) -> Result<Option<Land>, LandRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = lands::table
            .filter(lands::id.eq(id.as_uuid()))
            .select(LandRow::as_select())
            .first::<LandRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(|row| row.into_domain().map_err(LandRepositoryError::query))
            .transpose()
    }

    async fn compare_and_swap_status(
        &self,
        id: &LandId,
        expected: LandStatus,
        next: LandStatus,
    ) -> Result<CasOutcome, LandRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let updated = diesel::update(
            lands::table.filter(
                lands::id
                    .eq(id.as_uuid())
                    .and(lands::status.eq(expected.as_str())),
            ),
        )
        .set(lands::status.eq(next.as_str()))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;

        Ok(if updated == 0 {
            CasOutcome::Lost
        } else {
            CasOutcome::Applied
        })
    }

    async fn list_by_status(
        &self,
        status: LandStatus,
        location: Option<&str>,
    ) -> Result<Vec<Land>, LandRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let mut query = lands::table
            .filter(lands::status.eq(status.as_str()))
            .into_boxed();
        if let Some(fragment) = location {
            query = query.filter(lands::location.ilike(format!("%{fragment}%")));
        }

        let rows: Vec<LandRow> = query
            .order(lands::created_at.desc())
            .select(LandRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        rows_to_lands(rows)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Land>, LandRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let rows: Vec<LandRow> = lands::table
            .filter(lands::owner_id.eq(owner.as_uuid()))
            .order(lands::created_at.desc())
            .select(LandRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        rows_to_lands(rows)
    }

    async fn count_by_status(&self, status: LandStatus) -> Result<u64, LandRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let count: i64 = lands::table
            .filter(lands::status.eq(status.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(count.unsigned_abs())
    }
}
