//! In-memory repository adapters.
//!
//! Back the service when no database is configured and double as stub
//! stores in unit tests. Each repository holds its rows behind a single
//! mutex, so the compare-and-swap operations are atomic by construction:
//! the read of the expected value and the write of the next one happen
//! under the same lock.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    CasOutcome, InvestmentRepository, InvestmentRepositoryError, LandRepository,
    LandRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Investment, InvestmentFilter, InvestmentId, InvestmentStatus, Land, LandId, LandStatus, Money,
    Role, User, UserId,
};

fn acquire<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoned lock only means a panicking test left the map intact.
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mutex-backed user and wallet store.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    /// Insert a user directly, bypassing the port. Seeding helper for
    /// tests and the memory-backed server mode.
    pub fn seed(&self, user: User) {
        acquire(&self.rows).insert(*user.id(), user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut rows = acquire(&self.rows);
        if rows.values().any(|row| row.email() == user.email()) {
            return Err(UserRepositoryError::duplicate_email(user.email()));
        }
        rows.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(acquire(&self.rows).get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        Ok(acquire(&self.rows)
            .values()
            .find(|row| row.email() == email)
            .cloned())
    }

    async fn compare_and_swap_balance(
        &self,
        id: &UserId,
        expected: Money,
        next: Money,
    ) -> Result<CasOutcome, UserRepositoryError> {
        let mut rows = acquire(&self.rows);
        match rows.get(id) {
            Some(row) if row.balance() == expected => {
                let updated = row.clone().with_balance(next);
                rows.insert(*id, updated);
                Ok(CasOutcome::Applied)
            }
            _ => Ok(CasOutcome::Lost),
        }
    }

    async fn count_by_role(&self, role: Role) -> Result<u64, UserRepositoryError> {
        let count = acquire(&self.rows)
            .values()
            .filter(|row| row.role() == role)
            .count();
        Ok(count as u64)
    }
}

/// Mutex-backed land parcel store.
#[derive(Debug, Default)]
pub struct InMemoryLandRepository {
    rows: Mutex<HashMap<LandId, Land>>,
}

impl InMemoryLandRepository {
    /// Insert a parcel directly, bypassing the port.
    pub fn seed(&self, land: Land) {
        acquire(&self.rows).insert(*land.id(), land);
    }
}

#[async_trait]
impl LandRepository for InMemoryLandRepository {
    async fn insert(&self, land: &Land) -> Result<(), LandRepositoryError> {
        acquire(&self.rows).insert(*land.id(), land.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &LandId) -> Result<Option<Land>, LandRepositoryError> {
        Ok(acquire(&self.rows).get(id).cloned())
    }

    async fn compare_and_swap_status(
        &self,
        id: &LandId,
        expected: LandStatus,
        next: LandStatus,
    ) -> Result<CasOutcome, LandRepositoryError> {
        let mut rows = acquire(&self.rows);
        match rows.get(id) {
            Some(row) if row.status() == expected => {
                let updated = row.clone().with_status(next);
                rows.insert(*id, updated);
                Ok(CasOutcome::Applied)
            }
            _ => Ok(CasOutcome::Lost),
        }
    }

    async fn list_by_status(
        &self,
        status: LandStatus,
        location: Option<&str>,
    ) -> Result<Vec<Land>, LandRepositoryError> {
        let needle = location.map(str::to_lowercase);
        let rows = acquire(&self.rows)
            .values()
            .filter(|row| row.status() == status)
            .filter(|row| match &needle {
                Some(fragment) => row.location().to_lowercase().contains(fragment),
                None => true,
            })
            .cloned()
            .collect();
        Ok(rows)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Land>, LandRepositoryError> {
        Ok(acquire(&self.rows)
            .values()
            .filter(|row| row.owner_id() == owner)
            .cloned()
            .collect())
    }

    async fn count_by_status(&self, status: LandStatus) -> Result<u64, LandRepositoryError> {
        let count = acquire(&self.rows)
            .values()
            .filter(|row| row.status() == status)
            .count();
        Ok(count as u64)
    }
}

/// Mutex-backed investment record store.
#[derive(Debug, Default)]
pub struct InMemoryInvestmentRepository {
    rows: Mutex<HashMap<InvestmentId, Investment>>,
}

impl InMemoryInvestmentRepository {
    /// Insert a record directly, bypassing the port.
    pub fn seed(&self, investment: Investment) {
        acquire(&self.rows).insert(*investment.id(), investment);
    }
}

#[async_trait]
impl InvestmentRepository for InMemoryInvestmentRepository {
    async fn insert(&self, investment: &Investment) -> Result<(), InvestmentRepositoryError> {
        acquire(&self.rows).insert(*investment.id(), investment.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &InvestmentId,
    ) -> Result<Option<Investment>, InvestmentRepositoryError> {
        Ok(acquire(&self.rows).get(id).cloned())
    }

    async fn compare_and_swap_status(
        &self,
        id: &InvestmentId,
        expected: InvestmentStatus,
        next: InvestmentStatus,
        amount: Option<Money>,
    ) -> Result<CasOutcome, InvestmentRepositoryError> {
        let mut rows = acquire(&self.rows);
        match rows.get(id) {
            Some(row) if row.status() == expected => {
                let mut updated = row.clone().with_status(next);
                if let Some(amount) = amount {
                    updated = updated.with_amount(amount);
                }
                rows.insert(*id, updated);
                Ok(CasOutcome::Applied)
            }
            _ => Ok(CasOutcome::Lost),
        }
    }

    async fn list_by_investor(
        &self,
        investor: &UserId,
        filter: InvestmentFilter,
    ) -> Result<Vec<Investment>, InvestmentRepositoryError> {
        Ok(acquire(&self.rows)
            .values()
            .filter(|row| row.investor_id() == investor && filter.matches(row.status()))
            .cloned()
            .collect())
    }

    async fn list_by_status(
        &self,
        status: InvestmentStatus,
    ) -> Result<Vec<Investment>, InvestmentRepositoryError> {
        Ok(acquire(&self.rows)
            .values()
            .filter(|row| row.status() == status)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn user(email: &str) -> User {
        User::new(
            UserId::random(),
            email,
            "Row User",
            None,
            Role::Investor,
            Money::from_minor(100),
            Utc::now(),
        )
        .expect("valid user")
    }

    #[rstest]
    #[tokio::test]
    async fn insert_refuses_duplicate_emails() {
        let repo = InMemoryUserRepository::default();
        repo.insert(&user("dup@example.com")).await.expect("first insert");

        let err = repo
            .insert(&user("dup@example.com"))
            .await
            .expect_err("duplicate refused");
        assert_eq!(
            err,
            UserRepositoryError::duplicate_email("dup@example.com")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn balance_cas_loses_on_stale_expectation() {
        let repo = InMemoryUserRepository::default();
        let row = user("cas@example.com");
        let id = *row.id();
        repo.seed(row);

        let lost = repo
            .compare_and_swap_balance(&id, Money::from_minor(999), Money::ZERO)
            .await
            .expect("cas ran");
        assert_eq!(lost, CasOutcome::Lost);

        let applied = repo
            .compare_and_swap_balance(&id, Money::from_minor(100), Money::from_minor(150))
            .await
            .expect("cas ran");
        assert_eq!(applied, CasOutcome::Applied);

        let stored = repo.find_by_id(&id).await.expect("readable").expect("present");
        assert_eq!(stored.balance(), Money::from_minor(150));
    }
}
