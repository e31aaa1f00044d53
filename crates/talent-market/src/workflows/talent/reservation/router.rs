use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::collaborators::{Navigator, NotificationPublisher};
use super::flow::{FlowError, SponsorshipEntryPoint};
use super::form::ReservationForm;
use super::service::{ReservationService, ReservationServiceError};
use crate::workflows::talent::domain::{CandidateId, CandidateSummary};
use crate::workflows::talent::pool::{CandidateFilter, CandidatePool, PoolError};

type SharedService<P, N, V> = Arc<ReservationService<P, N, V>>;

#[derive(Debug, Deserialize)]
pub(crate) struct MarketQuery {
    pub(crate) needed: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AllocationPreviewRequest {
    pub(crate) needed_candidates: u32,
    #[serde(default)]
    pub(crate) current_allocation: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SponsorshipRequest {
    pub(crate) entry_point: SponsorshipEntryPoint,
    pub(crate) needed_candidates: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReserveRequest {
    pub(crate) candidate_ids: Vec<CandidateId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AdjustAllocationRequest {
    pub(crate) needed_candidates: Option<u32>,
    pub(crate) current_allocation: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CallDateRequest {
    pub(crate) date: NaiveDate,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CallDatesQuery {
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequest {
    #[serde(flatten)]
    pub(crate) form: ReservationForm,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

/// Router builder exposing browsing, allocation, and reservation-flow endpoints.
pub fn reservation_router<P, N, V>(service: SharedService<P, N, V>) -> Router
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    Router::new()
        .route("/api/v1/talent/candidates", get(candidates_handler::<P, N, V>))
        .route("/api/v1/talent/market", get(market_handler::<P, N, V>))
        .route(
            "/api/v1/talent/allocation",
            post(allocation_preview_handler::<P, N, V>),
        )
        .route("/api/v1/talent/flow", get(flow_handler::<P, N, V>))
        .route(
            "/api/v1/talent/flow/sponsorship",
            post(sponsorship_handler::<P, N, V>),
        )
        .route(
            "/api/v1/talent/flow/sponsorship/dismiss",
            post(dismiss_handler::<P, N, V>),
        )
        .route(
            "/api/v1/talent/flow/consultation",
            post(consultation_handler::<P, N, V>),
        )
        .route(
            "/api/v1/talent/flow/reserve",
            post(reserve_handler::<P, N, V>),
        )
        .route(
            "/api/v1/talent/flow/allocation",
            post(adjust_allocation_handler::<P, N, V>),
        )
        .route(
            "/api/v1/talent/flow/call-date",
            post(call_date_handler::<P, N, V>),
        )
        .route(
            "/api/v1/talent/flow/call-dates",
            get(call_dates_handler::<P, N, V>),
        )
        .route("/api/v1/talent/flow/cancel", post(cancel_handler::<P, N, V>))
        .route("/api/v1/talent/flow/submit", post(submit_handler::<P, N, V>))
        .route(
            "/api/v1/talent/confirmation",
            get(confirmation_handler::<P, N, V>),
        )
        .route(
            "/api/v1/talent/confirmation/browse",
            post(browse_more_handler::<P, N, V>),
        )
        .with_state(service)
}

fn today_or_local(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

pub(crate) fn error_response(error: ReservationServiceError) -> Response {
    let status = match &error {
        ReservationServiceError::Flow(FlowError::Validation(errors)) => {
            let payload = json!({
                "error": error.to_string(),
                "field_errors": errors.errors,
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
        ReservationServiceError::Flow(FlowError::InvalidTransition { .. }) => StatusCode::CONFLICT,
        ReservationServiceError::Flow(_) | ReservationServiceError::InvalidInput(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ReservationServiceError::Pool(PoolError::UnknownCandidate(_)) => StatusCode::NOT_FOUND,
        ReservationServiceError::Pool(PoolError::AlreadyReserved(_)) => StatusCode::CONFLICT,
        ReservationServiceError::Notification(_) | ReservationServiceError::Navigation(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

fn respond<T: serde::Serialize>(
    status: StatusCode,
    result: Result<T, ReservationServiceError>,
) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn candidates_handler<P, N, V>(
    State(service): State<SharedService<P, N, V>>,
    Query(filter): Query<CandidateFilter>,
) -> Json<Vec<CandidateSummary>>
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    let listing = service
        .browse(&filter)
        .iter()
        .map(|record| record.summary())
        .collect();
    Json(listing)
}

pub(crate) async fn market_handler<P, N, V>(
    State(service): State<SharedService<P, N, V>>,
    Query(query): Query<MarketQuery>,
) -> Response
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    (StatusCode::OK, Json(service.market(query.needed))).into_response()
}

pub(crate) async fn allocation_preview_handler<P, N, V>(
    State(service): State<SharedService<P, N, V>>,
    Json(request): Json<AllocationPreviewRequest>,
) -> Response
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    let result = service
        .preview_allocation(request.needed_candidates, request.current_allocation)
        .map_err(ReservationServiceError::from);
    respond(StatusCode::OK, result)
}

pub(crate) async fn flow_handler<P, N, V>(State(service): State<SharedService<P, N, V>>) -> Response
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    (StatusCode::OK, Json(service.flow_snapshot())).into_response()
}

pub(crate) async fn sponsorship_handler<P, N, V>(
    State(service): State<SharedService<P, N, V>>,
    Json(request): Json<SponsorshipRequest>,
) -> Response
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    respond(
        StatusCode::OK,
        service.learn_about_sponsorship(request.entry_point, request.needed_candidates),
    )
}

pub(crate) async fn dismiss_handler<P, N, V>(
    State(service): State<SharedService<P, N, V>>,
) -> Response
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    respond(StatusCode::OK, service.dismiss_sponsorship_info())
}

pub(crate) async fn consultation_handler<P, N, V>(
    State(service): State<SharedService<P, N, V>>,
) -> Response
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    respond(StatusCode::OK, service.schedule_consultation())
}

pub(crate) async fn reserve_handler<P, N, V>(
    State(service): State<SharedService<P, N, V>>,
    Json(request): Json<ReserveRequest>,
) -> Response
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    respond(StatusCode::OK, service.reserve_candidates(&request.candidate_ids))
}

pub(crate) async fn adjust_allocation_handler<P, N, V>(
    State(service): State<SharedService<P, N, V>>,
    Json(request): Json<AdjustAllocationRequest>,
) -> Response
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    respond(
        StatusCode::OK,
        service.adjust_allocation(request.needed_candidates, request.current_allocation),
    )
}

pub(crate) async fn call_date_handler<P, N, V>(
    State(service): State<SharedService<P, N, V>>,
    Json(request): Json<CallDateRequest>,
) -> Response
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    respond(
        StatusCode::OK,
        service.select_call_date(request.date, today_or_local(request.today)),
    )
}

pub(crate) async fn call_dates_handler<P, N, V>(
    State(service): State<SharedService<P, N, V>>,
    Query(query): Query<CallDatesQuery>,
) -> Response
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    respond(
        StatusCode::OK,
        service.call_date_options(today_or_local(query.today)),
    )
}

pub(crate) async fn cancel_handler<P, N, V>(State(service): State<SharedService<P, N, V>>) -> Response
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    respond(StatusCode::OK, service.cancel())
}

pub(crate) async fn submit_handler<P, N, V>(
    State(service): State<SharedService<P, N, V>>,
    Json(request): Json<SubmitRequest>,
) -> Response
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    respond(
        StatusCode::CREATED,
        service.submit(request.form, today_or_local(request.today)),
    )
}

pub(crate) async fn confirmation_handler<P, N, V>(
    State(service): State<SharedService<P, N, V>>,
) -> Response
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    match service.confirmation() {
        Some(view) => (StatusCode::OK, Json(view)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no confirmed reservation" })),
        )
            .into_response(),
    }
}

pub(crate) async fn browse_more_handler<P, N, V>(
    State(service): State<SharedService<P, N, V>>,
) -> Response
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    (StatusCode::OK, Json(service.browse_more_talent())).into_response()
}
