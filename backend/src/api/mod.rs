//! REST API adapters over the domain's driving ports.

pub mod admin;
pub mod error;
pub mod health;
pub mod identity;
pub mod investments;
pub mod lands;
pub mod public;
pub mod state;
pub mod wallet;

pub use error::{ApiError, ApiResult};
pub use state::HttpState;

use actix_web::web;

/// Register every marketplace route on the given service config.
///
/// Shared between the production server and in-process test servers so
/// both exercise identical routing.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(lands::submit)
        .service(lands::my_lands)
        .service(public::available)
        .service(public::solar_sites)
        .service(public::platform_stats)
        .service(public::detail)
        .service(investments::request)
        .service(investments::my_requests)
        .service(investments::my_investments)
        .service(investments::cancel)
        .service(investments::wallet)
        .service(wallet::credit)
        .service(wallet::debit)
        .service(admin::land_requests)
        .service(admin::approve_land)
        .service(admin::reject_land)
        .service(admin::investor_requests)
        .service(admin::approve_investment)
        .service(admin::reject_investment)
        .service(admin::mark_paid);
}
