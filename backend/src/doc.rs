//! OpenAPI documentation configuration.
//!
//! Generates the specification consumed by Swagger UI in debug builds.
//! Registers every marketplace path plus the shared schemas, and the
//! `X-User-ID` header scheme forwarded by the authenticating gateway.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::admin::{
    ApproveInvestmentRequest, InvestmentDecisionRequest, LandDecisionRequest,
};
use crate::api::error::ApiError;
use crate::api::investments::{InvestRequest, WalletBalance};
use crate::api::lands::SubmitLandRequest;
use crate::api::wallet::{AdjustBalanceRequest, BalanceResponse};
use crate::domain::{
    ErrorCode, Investment, InvestmentId, InvestmentStatus, Land, LandId, LandStatus, Money,
    PlatformStats, UserId,
};

/// Enrich the generated document with the identity header scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "UserIdHeader",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-User-ID",
                "Authenticated caller identifier forwarded by the gateway.",
            ))),
        );
    }
}

/// OpenAPI document for the marketplace REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Solar land marketplace API",
        description = "Land listings, investment lifecycle, wallets, and public statistics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("UserIdHeader" = [])),
    paths(
        crate::api::lands::submit,
        crate::api::lands::my_lands,
        crate::api::public::available,
        crate::api::public::detail,
        crate::api::public::solar_sites,
        crate::api::public::platform_stats,
        crate::api::investments::request,
        crate::api::investments::my_requests,
        crate::api::investments::my_investments,
        crate::api::investments::cancel,
        crate::api::investments::wallet,
        crate::api::wallet::credit,
        crate::api::wallet::debit,
        crate::api::admin::land_requests,
        crate::api::admin::approve_land,
        crate::api::admin::reject_land,
        crate::api::admin::investor_requests,
        crate::api::admin::approve_investment,
        crate::api::admin::reject_investment,
        crate::api::admin::mark_paid,
        crate::api::health::ready,
        crate::api::health::live,
    ),
    components(schemas(
        Land,
        LandId,
        LandStatus,
        Investment,
        InvestmentId,
        InvestmentStatus,
        UserId,
        Money,
        PlatformStats,
        ApiError,
        ErrorCode,
        SubmitLandRequest,
        InvestRequest,
        WalletBalance,
        AdjustBalanceRequest,
        BalanceResponse,
        LandDecisionRequest,
        ApproveInvestmentRequest,
        InvestmentDecisionRequest,
    )),
    tags(
        (name = "lands", description = "Owner-facing listing operations"),
        (name = "marketplace", description = "Public browsing and statistics"),
        (name = "investments", description = "Investor lifecycle operations"),
        (name = "wallet", description = "Wallet credit and debit"),
        (name = "admin", description = "Review queues and lifecycle decisions"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;
