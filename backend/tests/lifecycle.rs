//! End-to-end lifecycle tests over the HTTP surface with in-memory stores.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::Utc;
use serde_json::{Value, json};

use backend::api::identity::USER_ID_HEADER;
use backend::api::{HttpState, configure_routes};
use backend::domain::{Money, Role, User, UserId};
use backend::outbound::memory::{
    InMemoryInvestmentRepository, InMemoryLandRepository, InMemoryUserRepository,
};
use backend::server::build_http_state;

struct Fixture {
    state: HttpState,
    admin: UserId,
    owner: UserId,
    investor: UserId,
    second_investor: UserId,
}

fn seed_user(repo: &InMemoryUserRepository, role: Role, email: &str) -> UserId {
    let id = UserId::random();
    let user = User::new(id, email, "Fixture User", None, role, Money::ZERO, Utc::now())
        .expect("valid user");
    repo.seed(user);
    id
}

fn fixture() -> Fixture {
    let users = Arc::new(InMemoryUserRepository::default());
    let lands = Arc::new(InMemoryLandRepository::default());
    let investments = Arc::new(InMemoryInvestmentRepository::default());

    let admin = seed_user(&users, Role::Admin, "admin@example.com");
    let owner = seed_user(&users, Role::LandOwner, "owner@example.com");
    let investor = seed_user(&users, Role::Investor, "investor@example.com");
    let second_investor = seed_user(&users, Role::Investor, "rival@example.com");

    Fixture {
        state: build_http_state(users, lands, investments, Role::Admin),
        admin,
        owner,
        investor,
        second_investor,
    }
}

async fn spawn_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await
}

fn listing_payload() -> Value {
    json!({
        "title": "Riverside field",
        "location": "Nashik",
        "landType": "Open Land",
        "ownershipInfo": "Sole Owner",
        "areaSqft": 22000.0,
        "totalPriceMinor": 7_500_000,
        "potentialCapacityKw": 40.0,
        "ownerFixedPayoutMinor": 300_000,
        "ownerRevenueSharePercent": 12.0
    })
}

async fn post_json<S>(app: &S, actor: UserId, path: &str, body: &Value) -> ServiceResponse
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri(path)
        .insert_header((USER_ID_HEADER, actor.to_string()))
        .set_json(body)
        .to_request();
    test::call_service(app, req).await
}

async fn get_as<S>(app: &S, actor: UserId, path: &str) -> ServiceResponse
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::get()
        .uri(path)
        .insert_header((USER_ID_HEADER, actor.to_string()))
        .to_request();
    test::call_service(app, req).await
}

async fn body_json(response: ServiceResponse) -> Value {
    test::read_body_json(response).await
}

/// Submit a listing and approve it, returning the land id.
async fn approved_land<S>(app: &S, f: &Fixture) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = post_json(app, f.owner, "/land/submit", &listing_payload()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let land = body_json(response).await;
    let land_id = land["id"].as_str().expect("land id").to_owned();

    let response = post_json(
        app,
        f.admin,
        "/admin/land-approve",
        &json!({ "landId": land_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    land_id
}

#[actix_rt::test]
async fn submission_ignores_a_smuggled_status_field() {
    let f = fixture();
    let app = spawn_app(f.state.clone()).await;

    let mut payload = listing_payload();
    payload["status"] = json!("available");

    let response = post_json(&app, f.owner, "/land/submit", &payload).await;
    assert_eq!(response.status(), StatusCode::OK);

    let land = body_json(response).await;
    assert_eq!(land["status"], "pending_approval");

    // Not browsable until an admin approves it.
    let response = get_as(&app, f.investor, "/lands/available").await;
    let listings = body_json(response).await;
    assert_eq!(listings.as_array().map(Vec::len), Some(0));
}

#[actix_rt::test]
async fn full_lifecycle_from_submission_to_active_site() {
    let f = fixture();
    let app = spawn_app(f.state.clone()).await;
    let land_id = approved_land(&app, &f).await;

    // Investor reserves the parcel.
    let response = post_json(
        &app,
        f.investor,
        "/invest/request",
        &json!({ "landId": land_id, "amountMinor": 7_500_000 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let investment = body_json(response).await;
    let investment_id = investment["id"].as_str().expect("investment id").to_owned();
    assert_eq!(investment["status"], "pending_approval");

    // Admin approves with a renegotiated amount.
    let response = post_json(
        &app,
        f.admin,
        "/admin/investor-approve",
        &json!({ "investmentId": investment_id, "finalAmountMinor": 7_000_000 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let approved = body_json(response).await;
    assert_eq!(approved["status"], "payment_pending");
    assert_eq!(approved["amount"], 7_000_000);

    // Payment confirmation activates the site.
    let response = post_json(
        &app,
        f.admin,
        "/payment/mark-paid",
        &json!({ "investmentId": investment_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let completed = body_json(response).await;
    assert_eq!(completed["status"], "completed");

    let response = get_as(&app, f.investor, "/map/solar-sites").await;
    let sites = body_json(response).await;
    assert_eq!(sites.as_array().map(Vec::len), Some(1));
    assert_eq!(sites[0]["status"], "active");

    let response = get_as(&app, f.investor, "/invest/my-investments").await;
    let closed = body_json(response).await;
    assert_eq!(closed.as_array().map(Vec::len), Some(1));

    // A completed investment cannot be confirmed twice.
    let response = post_json(
        &app,
        f.admin,
        "/payment/mark-paid",
        &json!({ "investmentId": investment_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = get_as(&app, f.investor, "/stats/platform").await;
    let stats = body_json(response).await;
    assert_eq!(stats["activeSites"], 1);
    assert_eq!(stats["totalInvestors"], 2);
    assert_eq!(stats["totalLandOwners"], 1);
}

#[actix_rt::test]
async fn a_reserved_parcel_refuses_further_requests() {
    let f = fixture();
    let app = spawn_app(f.state.clone()).await;
    let land_id = approved_land(&app, &f).await;

    let body = json!({ "landId": land_id, "amountMinor": 1_000_000 });
    let response = post_json(&app, f.investor, "/invest/request", &body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(&app, f.second_investor, "/invest/request", &body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The loser holds no record.
    let response = get_as(&app, f.second_investor, "/invest/my-requests").await;
    let open = body_json(response).await;
    assert_eq!(open.as_array().map(Vec::len), Some(0));
}

#[actix_rt::test]
async fn rejection_returns_the_parcel_to_the_market() {
    let f = fixture();
    let app = spawn_app(f.state.clone()).await;
    let land_id = approved_land(&app, &f).await;

    let response = post_json(
        &app,
        f.investor,
        "/invest/request",
        &json!({ "landId": land_id, "amountMinor": 2_000_000 }),
    )
    .await;
    let investment = body_json(response).await;
    let investment_id = investment["id"].as_str().expect("investment id");

    let response = post_json(
        &app,
        f.admin,
        "/admin/investor-reject",
        &json!({ "investmentId": investment_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_as(&app, f.second_investor, "/lands/available").await;
    let listings = body_json(response).await;
    assert_eq!(listings.as_array().map(Vec::len), Some(1));

    // The rival can now take the freed parcel.
    let response = post_json(
        &app,
        f.second_investor,
        "/invest/request",
        &json!({ "landId": land_id, "amountMinor": 2_000_000 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn investors_withdraw_only_their_own_requests() {
    let f = fixture();
    let app = spawn_app(f.state.clone()).await;
    let land_id = approved_land(&app, &f).await;

    let response = post_json(
        &app,
        f.investor,
        "/invest/request",
        &json!({ "landId": land_id, "amountMinor": 2_000_000 }),
    )
    .await;
    let investment = body_json(response).await;
    let investment_id = investment["id"].as_str().expect("investment id");

    let path = format!("/invest/cancel/{investment_id}");
    let response = post_json(&app, f.second_investor, &path, &json!({})).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json(&app, f.investor, &path, &json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cancelled = body_json(response).await;
    assert_eq!(cancelled["status"], "cancelled");

    let response = get_as(&app, f.investor, "/lands/available").await;
    let listings = body_json(response).await;
    assert_eq!(listings.as_array().map(Vec::len), Some(1));
}

#[actix_rt::test]
async fn wallet_debits_never_exceed_the_balance() {
    let f = fixture();
    let app = spawn_app(f.state.clone()).await;

    let response = post_json(
        &app,
        f.investor,
        "/wallet/credit",
        &json!({ "amountMinor": 100 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["balanceMinor"], 100);

    let response = post_json(
        &app,
        f.investor,
        "/wallet/debit",
        &json!({ "amountMinor": 40 }),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["balanceMinor"], 60);

    let response = post_json(
        &app,
        f.investor,
        "/wallet/debit",
        &json!({ "amountMinor": 70 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error = body_json(response).await;
    assert_eq!(error["code"], "insufficient_funds");

    let response = get_as(&app, f.investor, "/invest/wallet").await;
    let body = body_json(response).await;
    assert_eq!(body["balanceMinor"], 60);
}

#[actix_rt::test]
async fn zero_amounts_are_rejected_everywhere() {
    let f = fixture();
    let app = spawn_app(f.state.clone()).await;
    let land_id = approved_land(&app, &f).await;

    let response = post_json(
        &app,
        f.investor,
        "/wallet/credit",
        &json!({ "amountMinor": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app,
        f.investor,
        "/invest/request",
        &json!({ "landId": land_id, "amountMinor": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Failed admission must not consume the parcel.
    let response = get_as(&app, f.investor, "/lands/available").await;
    let listings = body_json(response).await;
    assert_eq!(listings.as_array().map(Vec::len), Some(1));
}

#[actix_rt::test]
async fn admin_surface_rejects_non_admin_callers() {
    let f = fixture();
    let app = spawn_app(f.state.clone()).await;

    let response = get_as(&app, f.investor, "/admin/land-requests").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json(
        &app,
        f.owner,
        "/admin/land-approve",
        &json!({ "landId": UserId::random().to_string() }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn missing_identity_header_is_unauthorized() {
    let f = fixture();
    let app = spawn_app(f.state.clone()).await;

    let req = test::TestRequest::get().uri("/land/my-lands").to_request();
    let response = test::call_service(&app, req).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Public browsing stays open.
    let req = test::TestRequest::get().uri("/lands/available").to_request();
    let response = test::call_service(&app, req).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn review_queue_filters_by_status() {
    let f = fixture();
    let app = spawn_app(f.state.clone()).await;
    let land_id = approved_land(&app, &f).await;

    let response = post_json(
        &app,
        f.investor,
        "/invest/request",
        &json!({ "landId": land_id, "amountMinor": 500_000 }),
    )
    .await;
    let investment = body_json(response).await;
    let investment_id = investment["id"].as_str().expect("investment id");

    let response = get_as(&app, f.admin, "/admin/investor-requests").await;
    let pending = body_json(response).await;
    assert_eq!(pending.as_array().map(Vec::len), Some(1));

    let response = post_json(
        &app,
        f.admin,
        "/admin/investor-approve",
        &json!({ "investmentId": investment_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_as(
        &app,
        f.admin,
        "/admin/investor-requests?status=payment_pending",
    )
    .await;
    let waiting = body_json(response).await;
    assert_eq!(waiting.as_array().map(Vec::len), Some(1));

    let response = get_as(&app, f.admin, "/admin/investor-requests?status=bogus").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
