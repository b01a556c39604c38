//! Server construction and dependency wiring.
//!
//! Wiring is generic over the repository ports: the same service graph is
//! assembled whether the store is PostgreSQL or the in-memory adapters
//! used for local development and tests.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use crate::api::HttpState;
use crate::domain::ports::{InvestmentRepository, LandRepository, UserRepository};
use crate::domain::{
    AdminGate, InvestmentService, LandService, Role, StatsService, WalletService,
};
use crate::outbound::memory::{
    InMemoryInvestmentRepository, InMemoryLandRepository, InMemoryUserRepository,
};
use crate::outbound::persistence::{
    DbPool, DieselInvestmentRepository, DieselLandRepository, DieselUserRepository, PoolConfig,
    PoolError,
};

/// Assemble the service graph over a concrete set of repositories.
pub fn build_http_state<U, L, I>(
    users: Arc<U>,
    lands: Arc<L>,
    investments: Arc<I>,
    admin_role: Role,
) -> HttpState
where
    U: UserRepository + 'static,
    L: LandRepository + 'static,
    I: InvestmentRepository + 'static,
{
    let gate = AdminGate::with_admin_role(users.clone(), admin_role);
    let land_service = LandService::new(lands.clone(), users.clone(), gate.clone());
    let investment_service =
        InvestmentService::new(investments, land_service.clone(), users.clone(), gate);
    let wallet_service = WalletService::new(users.clone());
    let stats_service = StatsService::new(users, lands);

    HttpState {
        land_commands: Arc::new(land_service.clone()),
        land_queries: Arc::new(land_service),
        investment_commands: Arc::new(investment_service.clone()),
        investment_queries: Arc::new(investment_service),
        wallet: Arc::new(wallet_service),
        stats: Arc::new(stats_service),
    }
}

/// Wire the service graph over fresh in-memory repositories.
pub fn build_memory_state(admin_role: Role) -> HttpState {
    build_http_state(
        Arc::new(InMemoryUserRepository::default()),
        Arc::new(InMemoryLandRepository::default()),
        Arc::new(InMemoryInvestmentRepository::default()),
        admin_role,
    )
}

/// Wire the service graph over Diesel repositories sharing one pool.
pub async fn build_diesel_state(
    database_url: &str,
    admin_role: Role,
) -> Result<HttpState, PoolError> {
    let pool = DbPool::new(PoolConfig::new(database_url)).await?;
    Ok(build_http_state(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselLandRepository::new(pool.clone())),
        Arc::new(DieselInvestmentRepository::new(pool)),
        admin_role,
    ))
}
