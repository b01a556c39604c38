//! Public marketplace API handlers; no identity header required.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::api::state::HttpState;
use crate::domain::{Land, LandId, PlatformStats};

/// Optional location filter for browsing listings.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct LocationQuery {
    /// Case-insensitive substring matched against listing locations.
    location: Option<String>,
}

/// Browse parcels open for investment.
#[utoipa::path(
    get,
    path = "/lands/available",
    params(LocationQuery),
    responses(
        (status = 200, description = "Available parcels", body = [Land])
    ),
    tags = ["marketplace"],
    operation_id = "availableLands"
)]
#[get("/lands/available")]
pub async fn available(
    state: web::Data<HttpState>,
    query: web::Query<LocationQuery>,
) -> ApiResult<web::Json<Vec<Land>>> {
    let lands = state
        .land_queries
        .available(query.location.as_deref())
        .await?;
    Ok(web::Json(lands))
}

/// Fetch a single parcel.
#[utoipa::path(
    get,
    path = "/lands/{land_id}",
    params(("land_id" = Uuid, Path, description = "Parcel identifier")),
    responses(
        (status = 200, description = "Parcel detail", body = Land),
        (status = 404, description = "Unknown parcel")
    ),
    tags = ["marketplace"],
    operation_id = "landDetail"
)]
#[get("/lands/{land_id}")]
pub async fn detail(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Land>> {
    let land = state
        .land_queries
        .get(LandId::from_uuid(path.into_inner()))
        .await?;
    Ok(web::Json(land))
}

/// Funded sites shown on the public map.
#[utoipa::path(
    get,
    path = "/map/solar-sites",
    responses(
        (status = 200, description = "Active solar sites", body = [Land])
    ),
    tags = ["marketplace"],
    operation_id = "solarSites"
)]
#[get("/map/solar-sites")]
pub async fn solar_sites(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Land>>> {
    let sites = state.land_queries.active_sites().await?;
    Ok(web::Json(sites))
}

/// Aggregate counters for the landing page.
#[utoipa::path(
    get,
    path = "/stats/platform",
    responses(
        (status = 200, description = "Platform statistics", body = PlatformStats)
    ),
    tags = ["marketplace"],
    operation_id = "platformStats"
)]
#[get("/stats/platform")]
pub async fn platform_stats(state: web::Data<HttpState>) -> ApiResult<web::Json<PlatformStats>> {
    let stats = state.stats.platform_stats().await?;
    Ok(web::Json(stats))
}
