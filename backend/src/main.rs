//! Backend entry-point: wires repositories, services, and REST endpoints.

use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::api::health::{HealthState, live, ready};
use backend::api::{HttpState, configure_routes};
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::server::{ServerConfig, build_diesel_state, build_memory_state};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env()?;

    let (http_state, store) = match config.database_url() {
        Some(url) => (
            build_diesel_state(url, config.admin_role())
                .await
                .map_err(|err| {
                    std::io::Error::other(format!("database pool setup failed: {err}"))
                })?,
            "postgres",
        ),
        None => (build_memory_state(config.admin_role()), "memory"),
    };

    let health_state = web::Data::new(HealthState::new(store));
    let server_health_state = health_state.clone();
    let state = web::Data::new(http_state);

    let server = HttpServer::new(move || {
        build_app(state.clone(), server_health_state.clone())
    })
    .bind(config.bind_addr())?;

    info!(addr = %config.bind_addr(), "marketplace backend listening");
    health_state.mark_ready();
    server.run().await
}

fn build_app(
    state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    #[allow(unused_mut)]
    let mut app = App::new()
        .app_data(state)
        .app_data(health_state)
        .configure(configure_routes)
        .route("/health/ready", web::get().to(ready))
        .route("/health/live", web::get().to(live));

    #[cfg(debug_assertions)]
    {
        app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    app
}
