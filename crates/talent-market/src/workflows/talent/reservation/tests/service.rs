use std::sync::Arc;

use super::common::*;
use crate::workflows::talent::domain::CandidateId;
use crate::workflows::talent::pool::{CandidateFilter, CandidatePool, PoolError};
use crate::workflows::talent::reservation::collaborators::{
    NotificationLevel, RESERVATION_CONFIRMED_MESSAGE,
};
use crate::workflows::talent::reservation::flow::{FlowError, FlowPhase, SponsorshipEntryPoint};
use crate::workflows::talent::reservation::form::{FormField, ReservationForm};
use crate::workflows::talent::reservation::service::{ReservationService, ReservationServiceError};

#[test]
fn bulk_flow_confirms_with_live_supply() {
    let (service, pool, notifications, navigator) = build_service();

    service
        .learn_about_sponsorship(SponsorshipEntryPoint::BulkReservationPrompt, 10)
        .expect("sponsorship info");
    service.schedule_consultation().expect("form");
    let view = service.submit(valid_form(), today()).expect("confirmed");

    assert_eq!(view.record().current_allocation(), 3);
    assert_eq!(view.record().prospective_allocation(), 7);
    assert_eq!(view.current_percent(), 30);
    assert!(view.is_bulk());
    assert_eq!(service.flow_snapshot().state.phase(), FlowPhase::Confirmed);

    assert_eq!(navigator.events().len(), 1);
    let events = notifications.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, NotificationLevel::Success);
    assert_eq!(events[0].message, RESERVATION_CONFIRMED_MESSAGE);

    // Bulk requests reserve no specific candidate.
    assert_eq!(pool.available_active_count(), 3);
}

#[test]
fn individual_reservation_takes_candidates_off_market() {
    let (service, pool, _, navigator) = build_service();
    service
        .reserve_candidates(&[available_current_id(), prospective_id()])
        .expect("form");
    let view = service.submit(valid_form(), today()).expect("confirmed");

    assert_eq!(view.candidates().len(), 2);
    assert_eq!(pool.available_active_count(), 2);
    assert!(record(&pool, &available_current_id()).is_off_market());
    assert!(record(&pool, &prospective_id()).is_reserved());
    assert!(!record(&pool, &prospective_id()).is_off_market());
    assert_eq!(navigator.events().len(), 1);
    assert_eq!(
        service
            .browse(&CandidateFilter::default())
            .iter()
            .filter(|candidate| candidate.id == available_current_id())
            .count(),
        0
    );
}

#[test]
fn validation_failures_publish_field_errors_and_stay_open() {
    let (service, _, notifications, navigator) = build_service();
    service
        .learn_about_sponsorship(SponsorshipEntryPoint::TalentGapAlert, 4)
        .expect("sponsorship info");
    service.schedule_consultation().expect("form");

    let form = ReservationForm {
        email: "nope".to_string(),
        phone: "12".to_string(),
        ..valid_form()
    };
    let error = service.submit(form, today()).expect_err("invalid");
    assert!(matches!(
        error,
        ReservationServiceError::Flow(FlowError::Validation(_))
    ));

    let events = notifications.events();
    assert_eq!(events.len(), 2);
    assert!(events
        .iter()
        .all(|event| event.level == NotificationLevel::Error));
    assert_eq!(events[0].field, Some(FormField::Email));
    assert_eq!(events[1].field, Some(FormField::Phone));
    assert!(navigator.events().is_empty());
    assert_eq!(
        service.flow_snapshot().state.phase(),
        FlowPhase::ShowingReservationForm
    );
    assert!(service.confirmation().is_none());
}

#[test]
fn unknown_candidates_are_reported() {
    let (service, _, _, _) = build_service();
    let missing = CandidateId("cur-999".to_string());
    let error = service
        .reserve_candidates(&[missing.clone()])
        .expect_err("unknown id");
    assert!(matches!(
        error,
        ReservationServiceError::Pool(PoolError::UnknownCandidate(id)) if id == missing
    ));
    assert_eq!(service.flow_snapshot().state.phase(), FlowPhase::Closed);
}

#[test]
fn candidate_taken_before_submit_resets_the_flow() {
    let (service, pool, notifications, navigator) = build_service();
    service
        .reserve_candidates(&[available_current_id()])
        .expect("form");
    pool.mark_reserved(&[available_current_id()])
        .expect("someone else reserves first");

    let before = service.flow_snapshot().instance;
    let error = service.submit(valid_form(), today()).expect_err("conflict");
    assert!(matches!(
        error,
        ReservationServiceError::Pool(PoolError::AlreadyReserved(_))
    ));
    let snapshot = service.flow_snapshot();
    assert_eq!(snapshot.state.phase(), FlowPhase::Closed);
    assert_eq!(snapshot.instance, before + 1);
    assert!(navigator.events().is_empty());
    assert!(notifications.events().is_empty());
}

#[test]
fn sponsored_candidate_is_confirmed_only_once() {
    let (service, _, notifications, navigator) = build_service();
    service
        .reserve_candidates(&[prospective_id()])
        .expect("form");
    service.submit(valid_form(), today()).expect("confirmed");
    service.browse_more_talent();

    let error = service
        .reserve_candidates(&[prospective_id()])
        .expect_err("already sponsored");
    assert!(matches!(
        error,
        ReservationServiceError::Flow(FlowError::CandidateUnavailable(id)) if id == prospective_id()
    ));
    assert_eq!(service.flow_snapshot().state.phase(), FlowPhase::Closed);
    assert_eq!(navigator.events().len(), 1);
    assert_eq!(notifications.events().len(), 1);
}

#[test]
fn browse_more_talent_starts_a_fresh_flow() {
    let (service, _, _, _) = build_service();
    service
        .learn_about_sponsorship(SponsorshipEntryPoint::CardSponsorButton, 2)
        .expect("sponsorship info");
    service.schedule_consultation().expect("form");
    service.submit(valid_form(), today()).expect("confirmed");
    assert!(service.confirmation().is_some());

    let snapshot = service.browse_more_talent();
    assert_eq!(snapshot.state.phase(), FlowPhase::Closed);
    assert_eq!(snapshot.instance, 2);
    assert!(service.confirmation().is_none());

    service
        .learn_about_sponsorship(SponsorshipEntryPoint::CardSponsorButton, 2)
        .expect("new flow accepts sponsorship");
}

#[test]
fn adjust_allocation_applies_need_before_slider() {
    let (service, _, _, _) = build_service();
    service
        .learn_about_sponsorship(SponsorshipEntryPoint::TalentGapAlert, 10)
        .expect("sponsorship info");
    service.schedule_consultation().expect("form");

    let allocation = service
        .adjust_allocation(Some(6), Some(2))
        .expect("adjusted");
    assert_eq!(allocation.current_allocation, 2);
    assert_eq!(allocation.prospective_allocation, 4);

    let unchanged = service.adjust_allocation(None, None).expect("read back");
    assert_eq!(unchanged, allocation);
}

#[test]
fn adjusting_without_a_form_is_an_invalid_transition() {
    let (service, _, _, _) = build_service();
    let error = service
        .adjust_allocation(None, None)
        .expect_err("no form open");
    assert!(matches!(
        error,
        ReservationServiceError::Flow(FlowError::InvalidTransition { .. })
    ));
}

#[test]
fn navigation_failure_surfaces_without_success_toast() {
    let pool = Arc::new(pool());
    let notifications = Arc::new(MemoryNotifications::default());
    let service = ReservationService::new(pool, notifications.clone(), Arc::new(FailingNavigator));
    service
        .learn_about_sponsorship(SponsorshipEntryPoint::TalentGapAlert, 5)
        .expect("sponsorship info");
    service.schedule_consultation().expect("form");

    let error = service.submit(valid_form(), today()).expect_err("navigator down");
    assert!(matches!(error, ReservationServiceError::Navigation(_)));
    assert!(notifications.events().is_empty());
}

#[test]
fn zero_need_is_refused_before_the_flow_moves() {
    let (service, _, _, _) = build_service();
    let error = service
        .learn_about_sponsorship(SponsorshipEntryPoint::TalentGapAlert, 0)
        .expect_err("zero need");
    assert!(matches!(error, ReservationServiceError::InvalidInput(_)));
    assert_eq!(service.flow_snapshot().state.phase(), FlowPhase::Closed);
}

#[test]
fn market_reflects_reservations() {
    let (service, _, _, _) = build_service();
    assert_eq!(service.market(None).available_current, 3);
    service
        .reserve_candidates(&[available_current_id()])
        .expect("form");
    service.submit(valid_form(), today()).expect("confirmed");
    let snapshot = service.market(Some(5));
    assert_eq!(snapshot.available_current, 2);
    assert_eq!(snapshot.gap_alert.expect("gap").gap, 3);
}
