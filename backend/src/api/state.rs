//! Shared application state handed to the HTTP handlers.

use std::sync::Arc;

use crate::domain::ports::{
    InvestmentCommand, InvestmentQuery, LandCommand, LandQuery, PlatformStatsQuery, WalletOps,
};

/// Trait objects over the driving ports, shared across workers.
///
/// Handlers depend on the ports alone, so the same routes serve the
/// Diesel-backed wiring and the in-memory wiring used in tests.
#[derive(Clone)]
pub struct HttpState {
    pub land_commands: Arc<dyn LandCommand>,
    pub land_queries: Arc<dyn LandQuery>,
    pub investment_commands: Arc<dyn InvestmentCommand>,
    pub investment_queries: Arc<dyn InvestmentQuery>,
    pub wallet: Arc<dyn WalletOps>,
    pub stats: Arc<dyn PlatformStatsQuery>,
}
