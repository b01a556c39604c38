//! Domain model for the solar land marketplace.
//!
//! Everything here is persistence-agnostic: aggregates validate their own
//! invariants, lifecycle services own the status transitions, and the
//! [`ports`] module defines the traits adapters implement.

mod admin_gate;
mod error;
mod investment;
mod investment_service;
mod land;
mod land_service;
mod money;
pub mod ports;
mod stats;
mod user;
mod wallet_service;

pub use admin_gate::AdminGate;
pub use error::{Error, ErrorCode};
pub use investment::{
    Investment, InvestmentFilter, InvestmentId, InvestmentStatus, InvestmentValidationError,
};
pub use investment_service::InvestmentService;
pub use land::{Land, LandDraft, LandDraftFields, LandId, LandStatus, LandValidationError};
pub use land_service::LandService;
pub use money::Money;
pub use stats::{PlatformStats, StatsService};
pub use user::{Role, User, UserId, UserValidationError};
pub use wallet_service::WalletService;
