//! Land owner API handlers.

use actix_web::{get, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::error::ApiResult;
use crate::api::identity::Actor;
use crate::api::state::HttpState;
use crate::domain::{Error, Land, LandDraft, LandDraftFields, Money};

/// Owner-submitted listing payload.
///
/// Deliberately has no status field; unknown fields in the request body
/// are ignored, so a caller smuggling `"status": "available"` still gets
/// a `pending_approval` listing.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitLandRequest {
    title: String,
    location: String,
    land_type: String,
    ownership_info: String,
    area_sqft: f64,
    /// Asking price in integer minor units.
    total_price_minor: i64,
    potential_capacity_kw: f64,
    /// Fixed owner payout in integer minor units.
    owner_fixed_payout_minor: i64,
    #[serde(default)]
    owner_revenue_share_percent: f64,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

impl SubmitLandRequest {
    fn into_draft(self) -> Result<LandDraft, Error> {
        LandDraft::new(LandDraftFields {
            title: self.title,
            location: self.location,
            land_type: self.land_type,
            ownership_info: self.ownership_info,
            area_sqft: self.area_sqft,
            total_price: Money::from_minor(self.total_price_minor),
            potential_capacity_kw: self.potential_capacity_kw,
            owner_fixed_payout: Money::from_minor(self.owner_fixed_payout_minor),
            owner_revenue_share_percent: self.owner_revenue_share_percent,
            description: self.description,
            image_url: self.image_url,
        })
        .map_err(|err| Error::invalid_input(err.to_string()))
    }
}

/// Submit a land parcel for admin review.
#[utoipa::path(
    post,
    path = "/land/submit",
    request_body = SubmitLandRequest,
    responses(
        (status = 200, description = "Listing created awaiting approval", body = Land),
        (status = 400, description = "Invalid listing fields"),
        (status = 401, description = "Missing or malformed identity header"),
        (status = 404, description = "Unknown owner")
    ),
    tags = ["lands"],
    operation_id = "submitLand"
)]
#[post("/land/submit")]
pub async fn submit(
    state: web::Data<HttpState>,
    actor: Actor,
    body: web::Json<SubmitLandRequest>,
) -> ApiResult<web::Json<Land>> {
    let draft = body.into_inner().into_draft()?;
    let land = state.land_commands.submit(actor.id(), draft).await?;
    Ok(web::Json(land))
}

/// List the caller's own listings in every status.
#[utoipa::path(
    get,
    path = "/land/my-lands",
    responses(
        (status = 200, description = "Listings owned by the caller", body = [Land]),
        (status = 401, description = "Missing or malformed identity header")
    ),
    tags = ["lands"],
    operation_id = "myLands"
)]
#[get("/land/my-lands")]
pub async fn my_lands(state: web::Data<HttpState>, actor: Actor) -> ApiResult<web::Json<Vec<Land>>> {
    let lands = state.land_queries.by_owner(actor.id()).await?;
    Ok(web::Json(lands))
}
