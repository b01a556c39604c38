//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Thin adapters over the domain repository ports: row structs in
//! `models.rs` and table definitions in `schema.rs` stay internal, and
//! every database error is mapped to the port's error type. Connections
//! come from a `bb8` pool with native async support via `diesel-async`.

mod diesel_error_mapping;
mod diesel_investment_repository;
mod diesel_land_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_investment_repository::DieselInvestmentRepository;
pub use diesel_land_repository::DieselLandRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
