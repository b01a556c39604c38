//! Liveness and readiness probes for orchestration.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, http::header, web};
use serde_json::json;

/// Shared probe state.
///
/// Readiness flips on once the service graph is wired over its store and
/// reports which backend was selected, so an instance accidentally
/// running on the in-memory store is visible from the probe. Liveness
/// flips off when shutdown begins so load balancers drain early.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
    store: &'static str,
}

impl HealthState {
    /// Create a probe state for a service backed by the named store.
    pub fn new(store: &'static str) -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
            store,
        }
    }

    /// Mark the service as ready to take traffic.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness probes from now on; call before graceful shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Return readiness state.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Return liveness state.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool, body: serde_json::Value) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(body)
    }
}

/// Readiness probe. 200 with the backing store once wiring completes,
/// 503 before that.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Service is wired and taking traffic"),
        (status = 503, description = "Service graph is still starting")
    )
)]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_ready() {
        HealthState::probe_response(true, json!({ "status": "ready", "store": state.store }))
    } else {
        HealthState::probe_response(false, json!({ "status": "starting" }))
    }
}

/// Liveness probe. 200 while the process is alive, 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Process is alive"),
        (status = 503, description = "Process is draining")
    )
)]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_alive() {
        HealthState::probe_response(true, json!({ "status": "alive" }))
    } else {
        HealthState::probe_response(false, json!({ "status": "draining" }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body;
    use actix_web::http::StatusCode;
    use rstest::rstest;

    #[rstest]
    fn starts_live_but_not_ready() {
        let state = HealthState::new("memory");
        assert!(state.is_alive());
        assert!(!state.is_ready());
    }

    #[rstest]
    fn transitions_are_one_way() {
        let state = HealthState::new("memory");
        state.mark_ready();
        state.mark_unhealthy();
        assert!(state.is_ready());
        assert!(!state.is_alive());
    }

    #[rstest]
    #[tokio::test]
    async fn readiness_reports_the_backing_store() {
        let state = web::Data::new(HealthState::new("postgres"));

        let starting = ready(state.clone()).await;
        assert_eq!(starting.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.mark_ready();
        let response = ready(state).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = body::to_bytes(response.into_body())
            .await
            .expect("body readable");
        let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(payload["store"], "postgres");
    }
}
