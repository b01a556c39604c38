//! Wallet mutation API handlers.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiResult;
use crate::api::identity::Actor;
use crate::api::state::HttpState;
use crate::domain::Money;

/// Credit or debit payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustBalanceRequest {
    /// Amount in integer minor units; must be strictly positive.
    amount_minor: i64,
}

/// Balance after a wallet mutation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    balance_minor: Money,
}

/// Add funds to the caller's wallet.
#[utoipa::path(
    post,
    path = "/wallet/credit",
    request_body = AdjustBalanceRequest,
    responses(
        (status = 200, description = "Funds added", body = BalanceResponse),
        (status = 400, description = "Non-positive amount"),
        (status = 401, description = "Missing or malformed identity header"),
        (status = 404, description = "Unknown user"),
        (status = 409, description = "Update raced with another operation")
    ),
    tags = ["wallet"],
    operation_id = "creditWallet"
)]
#[post("/wallet/credit")]
pub async fn credit(
    state: web::Data<HttpState>,
    actor: Actor,
    body: web::Json<AdjustBalanceRequest>,
) -> ApiResult<web::Json<BalanceResponse>> {
    let balance_minor = state
        .wallet
        .credit(actor.id(), Money::from_minor(body.amount_minor))
        .await?;
    Ok(web::Json(BalanceResponse { balance_minor }))
}

/// Withdraw funds from the caller's wallet.
#[utoipa::path(
    post,
    path = "/wallet/debit",
    request_body = AdjustBalanceRequest,
    responses(
        (status = 200, description = "Funds withdrawn", body = BalanceResponse),
        (status = 400, description = "Non-positive amount"),
        (status = 401, description = "Missing or malformed identity header"),
        (status = 404, description = "Unknown user"),
        (status = 409, description = "Update raced with another operation"),
        (status = 422, description = "Balance cannot cover the amount")
    ),
    tags = ["wallet"],
    operation_id = "debitWallet"
)]
#[post("/wallet/debit")]
pub async fn debit(
    state: web::Data<HttpState>,
    actor: Actor,
    body: web::Json<AdjustBalanceRequest>,
) -> ApiResult<web::Json<BalanceResponse>> {
    let balance_minor = state
        .wallet
        .debit(actor.id(), Money::from_minor(body.amount_minor))
        .await?;
    Ok(web::Json(BalanceResponse { balance_minor }))
}
