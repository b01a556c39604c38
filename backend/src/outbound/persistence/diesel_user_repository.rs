//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! The balance compare-and-swap is a single conditional `UPDATE`: the
//! `WHERE` clause re-checks the expected balance, so a zero row count
//! means a concurrent writer got there first.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CasOutcome, UserRepository, UserRepositoryError};
use crate::domain::{Money, Role, User, UserId};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the identity/wallet port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserRepositoryError {
    map_pool_error(error, UserRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    row.into_domain().map_err(UserRepositoryError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email(),
            full_name: user.full_name(),
            phone: user.phone(),
            role: user.role().as_str(),
            balance_minor: user.balance().minor(),
            created_at: user.created_at(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    UserRepositoryError::duplicate_email(user.email())
                } else {
                    diesel_error(err)
                }
            })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn compare_and_swap_balance(
        &self,
        id: &UserId,
        expected: Money,
        next: Money,
    ) -> Result<CasOutcome, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let updated = diesel::update(
            users::table.filter(
                users::id
                    .eq(id.as_uuid())
                    .and(users::balance_minor.eq(expected.minor())),
            ),
        )
        .set(users::balance_minor.eq(next.minor()))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;

        Ok(if updated == 0 {
            CasOutcome::Lost
        } else {
            CasOutcome::Applied
        })
    }

    async fn count_by_role(&self, role: Role) -> Result<u64, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let count: i64 = users::table
            .filter(users::role.eq(role.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(count.unsigned_abs())
    }
}
