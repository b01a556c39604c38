//! Wallet manager: balance credit/debit with optimistic concurrency.
//!
//! Balance updates are expressed as a compare-and-swap against the
//! previously read balance, retried once on a lost race before surfacing
//! `Conflict`. This closes the lost-update window without multi-row
//! transactions.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::admin_gate::map_user_repository_error;
use crate::domain::ports::{CasOutcome, UserRepository, WalletOps};
use crate::domain::{Error, Money, User, UserId};

/// Lost CAS races are retried this many times before giving up.
const CAS_RETRIES: usize = 1;

/// Wallet manager over the identity/wallet port.
#[derive(Clone)]
pub struct WalletService<U> {
    users: Arc<U>,
}

impl<U> WalletService<U> {
    /// Create a wallet service over the given repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

enum Adjustment {
    Credit,
    Debit,
}

impl<U: UserRepository> WalletService<U> {
    async fn load_user(&self, user: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found("user wallet not found"))
    }

    fn next_balance(current: Money, amount: Money, op: &Adjustment) -> Result<Money, Error> {
        match op {
            Adjustment::Credit => current
                .checked_add(amount)
                .ok_or_else(|| Error::invalid_input("credit would overflow the balance")),
            Adjustment::Debit => {
                if current < amount {
                    return Err(Error::insufficient_funds(format!(
                        "balance {current} cannot cover debit of {amount}"
                    )));
                }
                current
                    .checked_sub(amount)
                    .ok_or_else(|| Error::internal("balance subtraction underflowed"))
            }
        }
    }

    async fn adjust(&self, user: UserId, amount: Money, op: Adjustment) -> Result<Money, Error> {
        if !amount.is_positive() {
            return Err(Error::invalid_input("amount must be greater than zero"));
        }

        for attempt in 0..=CAS_RETRIES {
            let current = self.load_user(&user).await?.balance();
            let next = Self::next_balance(current, amount, &op)?;

            let outcome = self
                .users
                .compare_and_swap_balance(&user, current, next)
                .await
                .map_err(map_user_repository_error)?;

            match outcome {
                CasOutcome::Applied => return Ok(next),
                CasOutcome::Lost => {
                    debug!(%user, attempt, "wallet update lost a balance race");
                }
            }
        }

        Err(Error::conflict("wallet update raced with another operation"))
    }
}

#[async_trait]
impl<U: UserRepository> WalletOps for WalletService<U> {
    async fn credit(&self, user: UserId, amount: Money) -> Result<Money, Error> {
        self.adjust(user, amount, Adjustment::Credit).await
    }

    async fn debit(&self, user: UserId, amount: Money) -> Result<Money, Error> {
        self.adjust(user, amount, Adjustment::Debit).await
    }

    async fn balance_of(&self, user: UserId) -> Result<Money, Error> {
        Ok(self.load_user(&user).await?.balance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::UserRepositoryError;
    use crate::domain::{ErrorCode, Role};
    use crate::outbound::memory::InMemoryUserRepository;
    use chrono::Utc;
    use rstest::{fixture, rstest};

    fn wallet_with_user() -> (WalletService<InMemoryUserRepository>, UserId) {
        let repo = Arc::new(InMemoryUserRepository::default());
        let id = UserId::random();
        let user = User::new(
            id,
            "wallet@example.com",
            "Wallet Holder",
            None,
            Role::Investor,
            Money::ZERO,
            Utc::now(),
        )
        .expect("valid user");
        repo.seed(user);
        (WalletService::new(repo), id)
    }

    #[fixture]
    fn funded() -> (WalletService<InMemoryUserRepository>, UserId) {
        wallet_with_user()
    }

    #[rstest]
    #[tokio::test]
    async fn credit_then_partial_debits_track_the_balance(
        funded: (WalletService<InMemoryUserRepository>, UserId),
    ) {
        let (wallet, user) = funded;

        wallet
            .credit(user, Money::from_minor(100))
            .await
            .expect("credit succeeds");

        let after_first = wallet
            .debit(user, Money::from_minor(40))
            .await
            .expect("first debit covered");
        assert_eq!(after_first, Money::from_minor(60));

        let err = wallet
            .debit(user, Money::from_minor(70))
            .await
            .expect_err("second debit exceeds the balance");
        assert_eq!(err.code(), ErrorCode::InsufficientFunds);

        let balance = wallet.balance_of(user).await.expect("balance readable");
        assert_eq!(balance, Money::from_minor(60));
    }

    #[rstest]
    #[case(0)]
    #[case(-25)]
    #[tokio::test]
    async fn non_positive_amounts_are_invalid(
        funded: (WalletService<InMemoryUserRepository>, UserId),
        #[case] amount: i64,
    ) {
        let (wallet, user) = funded;

        let credit = wallet.credit(user, Money::from_minor(amount)).await;
        let debit = wallet.debit(user, Money::from_minor(amount)).await;

        for result in [credit, debit] {
            let err = result.expect_err("non-positive amount rejected");
            assert_eq!(err.code(), ErrorCode::InvalidInput);
        }
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_wallet_is_not_found() {
        let repo = Arc::new(InMemoryUserRepository::default());
        let wallet = WalletService::new(repo);

        let err = wallet
            .balance_of(UserId::random())
            .await
            .expect_err("missing user");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_credits_are_not_lost(
        funded: (WalletService<InMemoryUserRepository>, UserId),
    ) {
        let (wallet, user) = funded;

        let (a, b) = tokio::join!(
            wallet.credit(user, Money::from_minor(30)),
            wallet.credit(user, Money::from_minor(50)),
        );
        a.expect("first credit lands");
        b.expect("second credit lands");

        let balance = wallet.balance_of(user).await.expect("balance readable");
        assert_eq!(balance, Money::from_minor(80));
    }

    #[rstest]
    #[tokio::test]
    async fn debit_never_drives_the_balance_negative(
        funded: (WalletService<InMemoryUserRepository>, UserId),
    ) {
        let (wallet, user) = funded;
        wallet
            .credit(user, Money::from_minor(50))
            .await
            .expect("credit succeeds");

        let (a, b) = tokio::join!(
            wallet.debit(user, Money::from_minor(40)),
            wallet.debit(user, Money::from_minor(40)),
        );

        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "only one debit can be covered");

        let balance = wallet.balance_of(user).await.expect("balance readable");
        assert_eq!(balance, Money::from_minor(10));
        assert!(!balance.is_negative());
    }

    /// Loses every balance swap, standing in for a wallet under constant
    /// contention.
    struct ContendedRepository {
        inner: InMemoryUserRepository,
    }

    #[async_trait]
    impl UserRepository for ContendedRepository {
        async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
            self.inner.insert(user).await
        }

        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
            self.inner.find_by_email(email).await
        }

        async fn compare_and_swap_balance(
            &self,
            _id: &UserId,
            _expected: Money,
            _next: Money,
        ) -> Result<CasOutcome, UserRepositoryError> {
            Ok(CasOutcome::Lost)
        }

        async fn count_by_role(&self, role: Role) -> Result<u64, UserRepositoryError> {
            self.inner.count_by_role(role).await
        }
    }

    #[rstest]
    #[tokio::test]
    async fn exhausted_retries_surface_a_conflict() {
        let inner = InMemoryUserRepository::default();
        let id = UserId::random();
        let user = User::new(
            id,
            "contended@example.com",
            "Contended Holder",
            None,
            Role::Investor,
            Money::from_minor(100),
            Utc::now(),
        )
        .expect("valid user");
        inner.seed(user);
        let wallet = WalletService::new(Arc::new(ContendedRepository { inner }));

        let err = wallet
            .credit(id, Money::from_minor(10))
            .await
            .expect_err("every attempt loses the race");
        assert_eq!(err.code(), ErrorCode::Conflict);

        let balance = wallet.balance_of(id).await.expect("balance readable");
        assert_eq!(balance, Money::from_minor(100));
    }
}
