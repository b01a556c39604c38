//! Investment lifecycle manager, coupled to the land lifecycle.
//!
//! Transitions that take the land (reserve, activate) treat the land
//! status compare-and-swap as the lock: the land moves first, and a
//! paired investment update that loses its own race reverts the land
//! before the error surfaces. Transitions that free the land (reject,
//! cancel) settle the investment record first, so the parcel is never
//! back on the market while its investment is still open.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info};

use crate::domain::admin_gate::{AdminGate, map_user_repository_error};
use crate::domain::land_service::{LandService, map_land_repository_error};
use crate::domain::ports::{
    CasOutcome, InvestmentCommand, InvestmentQuery, InvestmentRepository,
    InvestmentRepositoryError, LandRepository, UserRepository,
};
use crate::domain::{
    Error, ErrorCode, Investment, InvestmentFilter, InvestmentId, InvestmentStatus, LandId, Money,
    UserId,
};

fn map_investment_repository_error(error: InvestmentRepositoryError) -> Error {
    match error {
        InvestmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("investment store unavailable: {message}"))
        }
        InvestmentRepositoryError::Query { message } => {
            Error::internal(format!("investment store error: {message}"))
        }
    }
}

/// Investment lifecycle service over the investment port and the land
/// lifecycle manager.
pub struct InvestmentService<I, L, U> {
    investments: Arc<I>,
    lands: LandService<L, U>,
    users: Arc<U>,
    gate: AdminGate<U>,
}

// Derived Clone would bound the repository types; only the Arcs are
// cloned.
impl<I, L, U> Clone for InvestmentService<I, L, U> {
    fn clone(&self) -> Self {
        Self {
            investments: Arc::clone(&self.investments),
            lands: self.lands.clone(),
            users: Arc::clone(&self.users),
            gate: self.gate.clone(),
        }
    }
}

impl<I, L, U> InvestmentService<I, L, U> {
    /// Create a lifecycle service with the given collaborators.
    pub fn new(
        investments: Arc<I>,
        lands: LandService<L, U>,
        users: Arc<U>,
        gate: AdminGate<U>,
    ) -> Self {
        Self {
            investments,
            lands,
            users,
            gate,
        }
    }
}

impl<I, L, U> InvestmentService<I, L, U>
where
    I: InvestmentRepository,
    L: LandRepository,
    U: UserRepository,
{
    async fn load(&self, id: &InvestmentId) -> Result<Investment, Error> {
        self.investments
            .find_by_id(id)
            .await
            .map_err(map_investment_repository_error)?
            .ok_or_else(|| Error::not_found("investment not found"))
    }

    /// Reserve the land, retrying the compare-and-swap once on a lost
    /// race before surfacing `Conflict`.
    async fn reserve_land(&self, land: &LandId) -> Result<(), Error> {
        match self.lands.mark_reserved(land).await {
            Ok(_) => Ok(()),
            Err(err) if err.code() == ErrorCode::Conflict => {
                self.lands.mark_reserved(land).await.map(|_| ())
            }
            Err(err) => Err(err),
        }
    }

    /// Roll a land transition back after the paired investment update
    /// lost its race. A failed rollback is logged but the original
    /// conflict still surfaces; the land CAS guarantees someone else owns
    /// the row by then.
    async fn rollback_land(&self, land: &LandId, undo: RollbackKind) {
        let result = match undo {
            RollbackKind::Release => self.lands.release(land).await,
            RollbackKind::RevertActivation => self.lands.revert_activation(land).await,
        };
        if let Err(err) = result {
            error!(land = %land, %err, "compensating land transition failed");
        }
    }

    /// Free the parcel after its investment reached a terminal state.
    /// The terminal status already stands, so a failed release is logged
    /// rather than surfaced.
    async fn release_settled_land(&self, land: &LandId) {
        if let Err(err) = self.lands.release(land).await {
            error!(land = %land, %err, "land release after settlement failed");
        }
    }
}

enum RollbackKind {
    Release,
    RevertActivation,
}

#[async_trait]
impl<I, L, U> InvestmentCommand for InvestmentService<I, L, U>
where
    I: InvestmentRepository,
    L: LandRepository,
    U: UserRepository,
{
    async fn request(
        &self,
        investor: UserId,
        land: LandId,
        amount: Money,
    ) -> Result<Investment, Error> {
        if !amount.is_positive() {
            return Err(Error::invalid_input("amount must be greater than zero"));
        }

        let investor_exists = self
            .users
            .find_by_id(&investor)
            .await
            .map_err(map_user_repository_error)?
            .is_some();
        if !investor_exists {
            return Err(Error::not_found("investor not found"));
        }

        // Admission control: the land CAS decides the single winner.
        self.reserve_land(&land).await?;

        let investment = Investment::requested(
            InvestmentId::random(),
            land,
            investor,
            amount,
            Utc::now(),
        )
        .map_err(|err| Error::invalid_input(err.to_string()))?;

        if let Err(err) = self.investments.insert(&investment).await {
            self.rollback_land(&land, RollbackKind::Release).await;
            return Err(map_investment_repository_error(err));
        }

        info!(
            investment = %investment.id(),
            land = %land,
            investor = %investor,
            "land reserved and funding request created"
        );
        Ok(investment)
    }

    async fn approve(
        &self,
        actor: UserId,
        investment: InvestmentId,
        final_amount: Option<Money>,
    ) -> Result<Investment, Error> {
        self.gate.authorize(&actor).await?;

        if let Some(amount) = final_amount {
            if !amount.is_positive() {
                return Err(Error::invalid_input(
                    "final amount must be greater than zero",
                ));
            }
        }

        let record = self.load(&investment).await?;
        let outcome = self
            .investments
            .compare_and_swap_status(
                &investment,
                InvestmentStatus::PendingApproval,
                InvestmentStatus::PaymentPending,
                final_amount,
            )
            .await
            .map_err(map_investment_repository_error)?;

        match outcome {
            CasOutcome::Applied => {
                info!(investment = %investment, "financial terms approved, awaiting payment");
                let record = record.with_status(InvestmentStatus::PaymentPending);
                Ok(match final_amount {
                    Some(amount) => record.with_amount(amount),
                    None => record,
                })
            }
            CasOutcome::Lost => Err(Error::conflict(
                "investment is not awaiting approval",
            )),
        }
    }

    async fn reject(&self, actor: UserId, investment: InvestmentId) -> Result<Investment, Error> {
        self.gate.authorize(&actor).await?;
        let record = self.load(&investment).await?;

        // The investment CAS decides the winner; the parcel is only freed
        // once the record is terminally rejected, so no rival request can
        // reserve it while this one is still open.
        let outcome = self
            .investments
            .compare_and_swap_status(
                &investment,
                InvestmentStatus::PendingApproval,
                InvestmentStatus::Rejected,
                None,
            )
            .await
            .map_err(map_investment_repository_error)?;

        match outcome {
            CasOutcome::Applied => {
                self.release_settled_land(record.land_id()).await;
                info!(investment = %investment, land = %record.land_id(), "investment rejected, land released");
                Ok(record.with_status(InvestmentStatus::Rejected))
            }
            CasOutcome::Lost => Err(Error::conflict("investment is not awaiting approval")),
        }
    }

    async fn confirm_payment(
        &self,
        actor: UserId,
        investment: InvestmentId,
    ) -> Result<Investment, Error> {
        self.gate.authorize(&actor).await?;
        let record = self.load(&investment).await?;

        // Land first: activation is the lock for the pair.
        self.lands.mark_active(record.land_id()).await?;

        let outcome = self
            .investments
            .compare_and_swap_status(
                &investment,
                InvestmentStatus::PaymentPending,
                InvestmentStatus::Completed,
                None,
            )
            .await
            .map_err(map_investment_repository_error)?;

        match outcome {
            CasOutcome::Applied => {
                info!(investment = %investment, land = %record.land_id(), "payment confirmed, land active");
                Ok(record.with_status(InvestmentStatus::Completed))
            }
            CasOutcome::Lost => {
                self.rollback_land(record.land_id(), RollbackKind::RevertActivation)
                    .await;
                Err(Error::conflict("investment is not awaiting payment"))
            }
        }
    }

    async fn cancel(
        &self,
        investor: UserId,
        investment: InvestmentId,
    ) -> Result<Investment, Error> {
        let record = self.load(&investment).await?;
        if record.investor_id() != &investor {
            return Err(Error::forbidden("investment belongs to another investor"));
        }

        let current = record.status();
        if !current.is_open() {
            return Err(Error::conflict("investment is already settled"));
        }

        // Settle the record first; the parcel stays reserved until the
        // withdrawal has definitively won over any racing approval.
        let outcome = self
            .investments
            .compare_and_swap_status(&investment, current, InvestmentStatus::Cancelled, None)
            .await
            .map_err(map_investment_repository_error)?;

        match outcome {
            CasOutcome::Applied => {
                self.release_settled_land(record.land_id()).await;
                info!(investment = %investment, land = %record.land_id(), "investment withdrawn, land released");
                Ok(record.with_status(InvestmentStatus::Cancelled))
            }
            CasOutcome::Lost => Err(Error::conflict("investment status changed concurrently")),
        }
    }
}

#[async_trait]
impl<I, L, U> InvestmentQuery for InvestmentService<I, L, U>
where
    I: InvestmentRepository,
    L: LandRepository,
    U: UserRepository,
{
    async fn for_investor(
        &self,
        investor: UserId,
        filter: InvestmentFilter,
    ) -> Result<Vec<Investment>, Error> {
        self.investments
            .list_by_investor(&investor, filter)
            .await
            .map_err(map_investment_repository_error)
    }

    async fn review_queue(
        &self,
        actor: UserId,
        status: InvestmentStatus,
    ) -> Result<Vec<Investment>, Error> {
        self.gate.authorize(&actor).await?;
        self.investments
            .list_by_status(status)
            .await
            .map_err(map_investment_repository_error)
    }
}
