//! Public platform statistics projection.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::admin_gate::map_user_repository_error;
use crate::domain::land_service::map_land_repository_error;
use crate::domain::ports::{LandRepository, PlatformStatsQuery, UserRepository};
use crate::domain::{Error, LandStatus, Role};

/// Estimated annual generation per active site, in kWh. Marketing figure
/// carried over from the original launch deck.
const ENERGY_PER_ACTIVE_SITE_KWH: f64 = 1250.5;

/// Aggregate counters shown on the public landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_investors: u64,
    pub total_land_owners: u64,
    pub active_sites: u64,
    pub total_energy_generated_kwh: f64,
}

/// Read-side projection service over the identity and land ports.
#[derive(Clone)]
pub struct StatsService<U, L> {
    users: Arc<U>,
    lands: Arc<L>,
}

impl<U, L> StatsService<U, L> {
    /// Create a stats projection over the given repositories.
    pub fn new(users: Arc<U>, lands: Arc<L>) -> Self {
        Self { users, lands }
    }
}

#[async_trait]
impl<U, L> PlatformStatsQuery for StatsService<U, L>
where
    U: UserRepository,
    L: LandRepository,
{
    async fn platform_stats(&self) -> Result<PlatformStats, Error> {
        let total_investors = self
            .users
            .count_by_role(Role::Investor)
            .await
            .map_err(map_user_repository_error)?;
        let total_land_owners = self
            .users
            .count_by_role(Role::LandOwner)
            .await
            .map_err(map_user_repository_error)?;
        let active_sites = self
            .lands
            .count_by_status(LandStatus::Active)
            .await
            .map_err(map_land_repository_error)?;

        // Site counts stay far below 2^52, so the cast is exact.
        let total_energy_generated_kwh = active_sites as f64 * ENERGY_PER_ACTIVE_SITE_KWH;

        Ok(PlatformStats {
            total_investors,
            total_land_owners,
            active_sites,
            total_energy_generated_kwh,
        })
    }
}
