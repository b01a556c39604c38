//! Land lifecycle manager.
//!
//! Owns every transition of `Land.status`. Transitions are conditional
//! updates on the expected prior status; a lost update means the
//! precondition no longer holds and surfaces as `Conflict` with nothing
//! written.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::domain::admin_gate::{AdminGate, map_user_repository_error};
use crate::domain::ports::{
    CasOutcome, LandCommand, LandQuery, LandRepository, LandRepositoryError, UserRepository,
};
use crate::domain::{Error, Land, LandDraft, LandId, LandStatus, UserId};

pub(crate) fn map_land_repository_error(error: LandRepositoryError) -> Error {
    match error {
        LandRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("land store unavailable: {message}"))
        }
        LandRepositoryError::Query { message } => {
            Error::internal(format!("land store error: {message}"))
        }
    }
}

/// Land lifecycle service over the land and identity ports.
pub struct LandService<L, U> {
    lands: Arc<L>,
    users: Arc<U>,
    gate: AdminGate<U>,
}

// Derived Clone would bound the repository types; only the Arcs are
// cloned.
impl<L, U> Clone for LandService<L, U> {
    fn clone(&self) -> Self {
        Self {
            lands: Arc::clone(&self.lands),
            users: Arc::clone(&self.users),
            gate: self.gate.clone(),
        }
    }
}

impl<L, U> LandService<L, U> {
    /// Create a lifecycle service with the given repositories and gate.
    pub fn new(lands: Arc<L>, users: Arc<U>, gate: AdminGate<U>) -> Self {
        Self { lands, users, gate }
    }
}

impl<L, U> LandService<L, U>
where
    L: LandRepository,
    U: UserRepository,
{
    async fn load(&self, id: &LandId) -> Result<Land, Error> {
        self.lands
            .find_by_id(id)
            .await
            .map_err(map_land_repository_error)?
            .ok_or_else(|| Error::not_found("land not found"))
    }

    /// Apply `expected → next` on the parcel's status, surfacing
    /// `Conflict` when the precondition no longer holds.
    async fn transition(
        &self,
        id: &LandId,
        expected: LandStatus,
        next: LandStatus,
    ) -> Result<Land, Error> {
        let land = self.load(id).await?;

        let outcome = self
            .lands
            .compare_and_swap_status(id, expected, next)
            .await
            .map_err(map_land_repository_error)?;

        match outcome {
            CasOutcome::Applied => {
                info!(land = %id, from = %expected, to = %next, "land status transition");
                Ok(land.with_status(next))
            }
            CasOutcome::Lost => Err(Error::conflict(format!(
                "land is not {expected}; transition to {next} refused"
            ))),
        }
    }

    /// Lock an available parcel for a pending investment.
    pub(crate) async fn mark_reserved(&self, id: &LandId) -> Result<Land, Error> {
        self.transition(id, LandStatus::Available, LandStatus::Reserved)
            .await
    }

    /// Activate a reserved parcel once its investment completes.
    pub(crate) async fn mark_active(&self, id: &LandId) -> Result<Land, Error> {
        self.transition(id, LandStatus::Reserved, LandStatus::Active)
            .await
    }

    /// Compensating action: return a reserved parcel to the open market.
    pub(crate) async fn release(&self, id: &LandId) -> Result<Land, Error> {
        self.transition(id, LandStatus::Reserved, LandStatus::Available)
            .await
    }

    /// Compensating action: undo an activation whose paired investment
    /// update lost its race.
    pub(crate) async fn revert_activation(&self, id: &LandId) -> Result<Land, Error> {
        self.transition(id, LandStatus::Active, LandStatus::Reserved)
            .await
    }
}

#[async_trait]
impl<L, U> LandCommand for LandService<L, U>
where
    L: LandRepository,
    U: UserRepository,
{
    async fn submit(&self, owner: UserId, draft: LandDraft) -> Result<Land, Error> {
        let exists = self
            .users
            .find_by_id(&owner)
            .await
            .map_err(map_user_repository_error)?
            .is_some();
        if !exists {
            return Err(Error::not_found("land owner not found"));
        }

        let land = Land::submitted(LandId::random(), owner, draft, Utc::now());
        self.lands
            .insert(&land)
            .await
            .map_err(map_land_repository_error)?;

        info!(land = %land.id(), owner = %owner, "land submitted for approval");
        Ok(land)
    }

    async fn approve(&self, actor: UserId, land: LandId) -> Result<Land, Error> {
        self.gate.authorize(&actor).await?;
        self.transition(&land, LandStatus::PendingApproval, LandStatus::Available)
            .await
    }

    async fn reject(&self, actor: UserId, land: LandId) -> Result<Land, Error> {
        self.gate.authorize(&actor).await?;
        self.transition(&land, LandStatus::PendingApproval, LandStatus::Rejected)
            .await
    }
}

#[async_trait]
impl<L, U> LandQuery for LandService<L, U>
where
    L: LandRepository,
    U: UserRepository,
{
    async fn available(&self, location: Option<&str>) -> Result<Vec<Land>, Error> {
        self.lands
            .list_by_status(LandStatus::Available, location)
            .await
            .map_err(map_land_repository_error)
    }

    async fn get(&self, land: LandId) -> Result<Land, Error> {
        self.load(&land).await
    }

    async fn by_owner(&self, owner: UserId) -> Result<Vec<Land>, Error> {
        self.lands
            .list_by_owner(&owner)
            .await
            .map_err(map_land_repository_error)
    }

    async fn active_sites(&self) -> Result<Vec<Land>, Error> {
        self.lands
            .list_by_status(LandStatus::Active, None)
            .await
            .map_err(map_land_repository_error)
    }

    async fn pending_review(&self, actor: UserId) -> Result<Vec<Land>, Error> {
        self.gate.authorize(&actor).await?;
        self.lands
            .list_by_status(LandStatus::PendingApproval, None)
            .await
            .map_err(map_land_repository_error)
    }
}
