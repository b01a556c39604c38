//! Investor API handlers.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::api::identity::Actor;
use crate::api::state::HttpState;
use crate::domain::{Investment, InvestmentFilter, InvestmentId, LandId, Money};

/// Funding request payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvestRequest {
    land_id: Uuid,
    /// Offered amount in integer minor units.
    amount_minor: i64,
}

/// Wallet balance envelope.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    /// Balance in integer minor units.
    balance_minor: Money,
}

/// Reserve a parcel and create a funding request.
///
/// At most one concurrent request per parcel succeeds; the rest receive
/// 409 and the parcel stays reserved for the winner.
#[utoipa::path(
    post,
    path = "/invest/request",
    request_body = InvestRequest,
    responses(
        (status = 200, description = "Request created, parcel reserved", body = Investment),
        (status = 400, description = "Non-positive amount"),
        (status = 401, description = "Missing or malformed identity header"),
        (status = 404, description = "Unknown investor or parcel"),
        (status = 409, description = "Parcel is not available")
    ),
    tags = ["investments"],
    operation_id = "requestInvestment"
)]
#[post("/invest/request")]
pub async fn request(
    state: web::Data<HttpState>,
    actor: Actor,
    body: web::Json<InvestRequest>,
) -> ApiResult<web::Json<Investment>> {
    let body = body.into_inner();
    let investment = state
        .investment_commands
        .request(
            actor.id(),
            LandId::from_uuid(body.land_id),
            Money::from_minor(body.amount_minor),
        )
        .await?;
    Ok(web::Json(investment))
}

/// The caller's open funding requests.
#[utoipa::path(
    get,
    path = "/invest/my-requests",
    responses(
        (status = 200, description = "Open requests", body = [Investment]),
        (status = 401, description = "Missing or malformed identity header")
    ),
    tags = ["investments"],
    operation_id = "myRequests"
)]
#[get("/invest/my-requests")]
pub async fn my_requests(
    state: web::Data<HttpState>,
    actor: Actor,
) -> ApiResult<web::Json<Vec<Investment>>> {
    let investments = state
        .investment_queries
        .for_investor(actor.id(), InvestmentFilter::Open)
        .await?;
    Ok(web::Json(investments))
}

/// The caller's completed investments.
#[utoipa::path(
    get,
    path = "/invest/my-investments",
    responses(
        (status = 200, description = "Completed investments", body = [Investment]),
        (status = 401, description = "Missing or malformed identity header")
    ),
    tags = ["investments"],
    operation_id = "myInvestments"
)]
#[get("/invest/my-investments")]
pub async fn my_investments(
    state: web::Data<HttpState>,
    actor: Actor,
) -> ApiResult<web::Json<Vec<Investment>>> {
    let investments = state
        .investment_queries
        .for_investor(actor.id(), InvestmentFilter::Closed)
        .await?;
    Ok(web::Json(investments))
}

/// Withdraw an open funding request, releasing the parcel.
#[utoipa::path(
    post,
    path = "/invest/cancel/{investment_id}",
    params(("investment_id" = Uuid, Path, description = "Investment identifier")),
    responses(
        (status = 200, description = "Request withdrawn", body = Investment),
        (status = 401, description = "Missing or malformed identity header"),
        (status = 403, description = "Investment belongs to another investor"),
        (status = 404, description = "Unknown investment"),
        (status = 409, description = "Investment is already settled")
    ),
    tags = ["investments"],
    operation_id = "cancelInvestment"
)]
#[post("/invest/cancel/{investment_id}")]
pub async fn cancel(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Investment>> {
    let investment = state
        .investment_commands
        .cancel(actor.id(), InvestmentId::from_uuid(path.into_inner()))
        .await?;
    Ok(web::Json(investment))
}

/// The caller's wallet balance.
#[utoipa::path(
    get,
    path = "/invest/wallet",
    responses(
        (status = 200, description = "Current balance", body = WalletBalance),
        (status = 401, description = "Missing or malformed identity header"),
        (status = 404, description = "Unknown user")
    ),
    tags = ["wallet"],
    operation_id = "walletBalance"
)]
#[get("/invest/wallet")]
pub async fn wallet(
    state: web::Data<HttpState>,
    actor: Actor,
) -> ApiResult<web::Json<WalletBalance>> {
    let balance_minor = state.wallet.balance_of(actor.id()).await?;
    Ok(web::Json(WalletBalance { balance_minor }))
}
