//! Admin review API handlers.
//!
//! Authorization lives in the domain's admin gate; these handlers only
//! forward the caller's identity and translate payloads.

use actix_web::{get, post, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::api::identity::Actor;
use crate::api::state::HttpState;
use crate::domain::{Error, Investment, InvestmentId, InvestmentStatus, Land, LandId, Money};

/// Payload naming the parcel under review.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LandDecisionRequest {
    land_id: Uuid,
}

/// Payload approving an investment, optionally renegotiating the amount.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveInvestmentRequest {
    investment_id: Uuid,
    /// Final amount in integer minor units; omitted keeps the offer.
    #[serde(default)]
    final_amount_minor: Option<i64>,
}

/// Payload naming the investment under review.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentDecisionRequest {
    investment_id: Uuid,
}

/// Status filter for the investment review queue.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ReviewQueueQuery {
    /// Lifecycle status identifier; defaults to `pending_approval`.
    status: Option<String>,
}

/// Parcels awaiting approval.
#[utoipa::path(
    get,
    path = "/admin/land-requests",
    responses(
        (status = 200, description = "Review queue", body = [Land]),
        (status = 401, description = "Missing or malformed identity header"),
        (status = 403, description = "Caller is not an admin")
    ),
    tags = ["admin"],
    operation_id = "landRequests"
)]
#[get("/admin/land-requests")]
pub async fn land_requests(
    state: web::Data<HttpState>,
    actor: Actor,
) -> ApiResult<web::Json<Vec<Land>>> {
    let lands = state.land_queries.pending_review(actor.id()).await?;
    Ok(web::Json(lands))
}

/// Approve a parcel, opening it for investment.
#[utoipa::path(
    post,
    path = "/admin/land-approve",
    request_body = LandDecisionRequest,
    responses(
        (status = 200, description = "Parcel approved", body = Land),
        (status = 401, description = "Missing or malformed identity header"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Unknown parcel"),
        (status = 409, description = "Parcel is not awaiting approval")
    ),
    tags = ["admin"],
    operation_id = "approveLand"
)]
#[post("/admin/land-approve")]
pub async fn approve_land(
    state: web::Data<HttpState>,
    actor: Actor,
    body: web::Json<LandDecisionRequest>,
) -> ApiResult<web::Json<Land>> {
    let land = state
        .land_commands
        .approve(actor.id(), LandId::from_uuid(body.land_id))
        .await?;
    Ok(web::Json(land))
}

/// Reject a parcel; terminal.
#[utoipa::path(
    post,
    path = "/admin/land-reject",
    request_body = LandDecisionRequest,
    responses(
        (status = 200, description = "Parcel rejected", body = Land),
        (status = 401, description = "Missing or malformed identity header"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Unknown parcel"),
        (status = 409, description = "Parcel is not awaiting approval")
    ),
    tags = ["admin"],
    operation_id = "rejectLand"
)]
#[post("/admin/land-reject")]
pub async fn reject_land(
    state: web::Data<HttpState>,
    actor: Actor,
    body: web::Json<LandDecisionRequest>,
) -> ApiResult<web::Json<Land>> {
    let land = state
        .land_commands
        .reject(actor.id(), LandId::from_uuid(body.land_id))
        .await?;
    Ok(web::Json(land))
}

/// Investment review queue, filtered by status.
#[utoipa::path(
    get,
    path = "/admin/investor-requests",
    params(ReviewQueueQuery),
    responses(
        (status = 200, description = "Review queue", body = [Investment]),
        (status = 400, description = "Unknown status identifier"),
        (status = 401, description = "Missing or malformed identity header"),
        (status = 403, description = "Caller is not an admin")
    ),
    tags = ["admin"],
    operation_id = "investorRequests"
)]
#[get("/admin/investor-requests")]
pub async fn investor_requests(
    state: web::Data<HttpState>,
    actor: Actor,
    query: web::Query<ReviewQueueQuery>,
) -> ApiResult<web::Json<Vec<Investment>>> {
    let status = match query.status.as_deref() {
        Some(raw) => raw
            .parse::<InvestmentStatus>()
            .map_err(|err| Error::invalid_input(err.to_string()))?,
        None => InvestmentStatus::PendingApproval,
    };

    let investments = state
        .investment_queries
        .review_queue(actor.id(), status)
        .await?;
    Ok(web::Json(investments))
}

/// Approve an investment's financial terms.
#[utoipa::path(
    post,
    path = "/admin/investor-approve",
    request_body = ApproveInvestmentRequest,
    responses(
        (status = 200, description = "Terms approved, awaiting payment", body = Investment),
        (status = 400, description = "Non-positive final amount"),
        (status = 401, description = "Missing or malformed identity header"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Unknown investment"),
        (status = 409, description = "Investment is not awaiting approval")
    ),
    tags = ["admin"],
    operation_id = "approveInvestment"
)]
#[post("/admin/investor-approve")]
pub async fn approve_investment(
    state: web::Data<HttpState>,
    actor: Actor,
    body: web::Json<ApproveInvestmentRequest>,
) -> ApiResult<web::Json<Investment>> {
    let body = body.into_inner();
    let investment = state
        .investment_commands
        .approve(
            actor.id(),
            InvestmentId::from_uuid(body.investment_id),
            body.final_amount_minor.map(Money::from_minor),
        )
        .await?;
    Ok(web::Json(investment))
}

/// Reject an investment, releasing the parcel.
#[utoipa::path(
    post,
    path = "/admin/investor-reject",
    request_body = InvestmentDecisionRequest,
    responses(
        (status = 200, description = "Investment rejected, parcel released", body = Investment),
        (status = 401, description = "Missing or malformed identity header"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Unknown investment"),
        (status = 409, description = "Investment is not awaiting approval")
    ),
    tags = ["admin"],
    operation_id = "rejectInvestment"
)]
#[post("/admin/investor-reject")]
pub async fn reject_investment(
    state: web::Data<HttpState>,
    actor: Actor,
    body: web::Json<InvestmentDecisionRequest>,
) -> ApiResult<web::Json<Investment>> {
    let investment = state
        .investment_commands
        .reject(actor.id(), InvestmentId::from_uuid(body.investment_id))
        .await?;
    Ok(web::Json(investment))
}

/// Confirm payment, completing the investment and activating the parcel.
#[utoipa::path(
    post,
    path = "/payment/mark-paid",
    request_body = InvestmentDecisionRequest,
    responses(
        (status = 200, description = "Payment confirmed, site active", body = Investment),
        (status = 401, description = "Missing or malformed identity header"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Unknown investment"),
        (status = 409, description = "Investment is not awaiting payment")
    ),
    tags = ["admin"],
    operation_id = "markPaid"
)]
#[post("/payment/mark-paid")]
pub async fn mark_paid(
    state: web::Data<HttpState>,
    actor: Actor,
    body: web::Json<InvestmentDecisionRequest>,
) -> ApiResult<web::Json<Investment>> {
    let investment = state
        .investment_commands
        .confirm_payment(actor.id(), InvestmentId::from_uuid(body.investment_id))
        .await?;
    Ok(web::Json(investment))
}
