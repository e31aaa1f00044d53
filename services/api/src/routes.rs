use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use talent_market::workflows::talent::reservation::{
    reservation_router, Navigator, NotificationPublisher, ReservationService,
};
use talent_market::workflows::talent::{ActivityEntry, CandidatePool};

#[derive(Debug, Serialize)]
pub(crate) struct ActivityResponse {
    pub(crate) entry: Option<ActivityEntry>,
    pub(crate) total: usize,
}

pub(crate) fn with_talent_routes<P, N, V>(service: Arc<ReservationService<P, N, V>>) -> axum::Router
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    reservation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/talent/activity",
            axum::routing::get(activity_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Current line of the rotating activity ticker.
pub(crate) async fn activity_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<ActivityResponse> {
    let feed = state.activity.lock().expect("activity mutex poisoned");
    Json(ActivityResponse {
        entry: feed.current().cloned(),
        total: feed.len(),
    })
}
