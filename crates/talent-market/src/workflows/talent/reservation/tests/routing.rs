use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use chrono::Duration;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::talent::pool::InMemoryCandidatePool;
use crate::workflows::talent::reservation::router::{
    self, reservation_router, SponsorshipRequest,
};
use crate::workflows::talent::reservation::flow::SponsorshipEntryPoint;

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

fn form_payload(offset_days: i64) -> Value {
    let form = valid_form();
    json!({
        "company_name": form.company_name,
        "contact_name": form.contact_name,
        "email": form.email,
        "phone": form.phone,
        "scheduled_call_date": today() + Duration::days(offset_days),
        "today": today(),
    })
}

#[tokio::test]
async fn sponsorship_handler_opens_the_info_modal() {
    let (service, _, _, _) = build_service();
    let response = router::sponsorship_handler::<
        InMemoryCandidatePool,
        MemoryNotifications,
        MemoryNavigator,
    >(
        State(Arc::new(service)),
        axum::Json(SponsorshipRequest {
            entry_point: SponsorshipEntryPoint::TalentGapAlert,
            needed_candidates: 10,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["state"]["phase"], "showing_sponsorship_info");
    assert_eq!(body["state"]["request"]["available_active_count"], 3);
}

#[tokio::test]
async fn bulk_flow_over_http() {
    let (service, _, _, navigator) = build_service();
    let app = reservation_router(Arc::new(service));

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/talent/flow/sponsorship",
            json!({ "entry_point": "bulk_reservation_prompt", "needed_candidates": 10 }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json("/api/v1/talent/flow/consultation", json!({})))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["state"]["phase"], "showing_reservation_form");
    assert_eq!(body["state"]["selection"]["mode"], "bulk");
    assert_eq!(body["state"]["selection"]["allocation"]["current_allocation"], 3);

    let response = app
        .clone()
        .oneshot(post_json("/api/v1/talent/flow/submit", form_payload(5)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert!(body["reference"]
        .as_str()
        .is_some_and(|code| code.starts_with("STR-")));

    let response = app
        .clone()
        .oneshot(get("/api/v1/talent/confirmation"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["actions"],
        json!(["browse_more_talent", "save_confirmation"])
    );
    assert_eq!(navigator.events().len(), 1);
}

#[tokio::test]
async fn out_of_window_date_is_unprocessable() {
    let (service, _, notifications, _) = build_service();
    let service = Arc::new(service);
    service
        .learn_about_sponsorship(SponsorshipEntryPoint::TalentGapAlert, 4)
        .expect("sponsorship info");
    service.schedule_consultation().expect("form");
    let app = reservation_router(service);

    let response = app
        .oneshot(post_json("/api/v1/talent/flow/submit", form_payload(20)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["field_errors"][0]["field"], "scheduled_call_date");
    assert_eq!(notifications.events().len(), 1);
}

#[tokio::test]
async fn call_dates_route_lists_the_two_week_window() {
    let (service, _, _, _) = build_service();
    let service = Arc::new(service);
    service
        .learn_about_sponsorship(SponsorshipEntryPoint::TalentGapAlert, 4)
        .expect("sponsorship info");
    service.schedule_consultation().expect("form");
    service
        .select_call_date(today() + Duration::days(3), today())
        .expect("date in window");
    let app = reservation_router(service);

    let response = app
        .oneshot(get(&format!(
            "/api/v1/talent/flow/call-dates?today={}",
            today()
        )))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let dates = body["dates"].as_array().expect("dates array");
    assert_eq!(dates.len(), 14);
    assert_eq!(dates[0], json!(today() + Duration::days(1)));
    assert_eq!(dates[13], json!(today() + Duration::days(14)));
    assert_eq!(body["earliest"], json!(today() + Duration::days(1)));
    assert_eq!(body["latest"], json!(today() + Duration::days(14)));
    assert_eq!(body["selected"], json!(today() + Duration::days(3)));
}

#[tokio::test]
async fn call_dates_without_open_form_conflicts() {
    let (service, _, _, _) = build_service();
    let app = reservation_router(Arc::new(service));
    let response = app
        .oneshot(get("/api/v1/talent/flow/call-dates"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn submit_without_open_form_conflicts() {
    let (service, _, _, _) = build_service();
    let app = reservation_router(Arc::new(service));
    let response = app
        .oneshot(post_json("/api/v1/talent/flow/submit", form_payload(5)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn reserving_unknown_candidate_is_not_found() {
    let (service, _, _, _) = build_service();
    let app = reservation_router(Arc::new(service));
    let response = app
        .oneshot(post_json(
            "/api/v1/talent/flow/reserve",
            json!({ "candidate_ids": ["cur-404"] }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn zero_need_preview_is_unprocessable() {
    let (service, _, _, _) = build_service();
    let app = reservation_router(Arc::new(service));
    let response = app
        .oneshot(post_json(
            "/api/v1/talent/allocation",
            json!({ "needed_candidates": 0 }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn candidates_route_hides_off_market_by_default() {
    let (service, _, _, _) = build_service();
    let app = reservation_router(Arc::new(service));

    let response = app
        .clone()
        .oneshot(get("/api/v1/talent/candidates?kind=current"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(3));

    let response = app
        .oneshot(get(
            "/api/v1/talent/candidates?kind=current&include_off_market=true",
        ))
        .await
        .expect("response");
    let body = json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(40));
}

#[tokio::test]
async fn market_route_reports_gap() {
    let (service, _, _, _) = build_service();
    let app = reservation_router(Arc::new(service));
    let response = app
        .oneshot(get("/api/v1/talent/market?needed=10"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["available_current"], 3);
    assert_eq!(body["gap_alert"]["gap"], 7);
}

#[tokio::test]
async fn confirmation_is_missing_before_submit() {
    let (service, _, _, _) = build_service();
    let app = reservation_router(Arc::new(service));
    let response = app
        .oneshot(get("/api/v1/talent/confirmation"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
