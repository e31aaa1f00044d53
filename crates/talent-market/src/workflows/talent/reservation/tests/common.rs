use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, NaiveDate};
use serde_json::Value;

use crate::workflows::talent::domain::{CandidateId, CandidateRecord};
use crate::workflows::talent::generator::{MockCandidateGenerator, PoolShape};
use crate::workflows::talent::pool::{CandidatePool, InMemoryCandidatePool};
use crate::workflows::talent::reservation::collaborators::{
    NavigationError, Navigator, Notification, NotificationError, NotificationPublisher,
};
use crate::workflows::talent::reservation::flow::NavigationEvent;
use crate::workflows::talent::reservation::form::ReservationForm;
use crate::workflows::talent::reservation::service::ReservationService;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

pub(super) fn records() -> Vec<CandidateRecord> {
    MockCandidateGenerator::new(PoolShape::default()).generate(today())
}

pub(super) fn pool() -> InMemoryCandidatePool {
    InMemoryCandidatePool::new(records())
}

/// One of the three current candidates still on the market in the default pool.
pub(super) fn available_current_id() -> CandidateId {
    CandidateId("cur-040".to_string())
}

pub(super) fn off_market_id() -> CandidateId {
    CandidateId("cur-001".to_string())
}

pub(super) fn prospective_id() -> CandidateId {
    CandidateId("pro-001".to_string())
}

pub(super) fn record(pool: &InMemoryCandidatePool, id: &CandidateId) -> CandidateRecord {
    pool.get(id).expect("candidate present in fixture pool")
}

pub(super) fn valid_form() -> ReservationForm {
    ReservationForm {
        company_name: "Northwind Logistics".to_string(),
        contact_name: "Jordan Reyes".to_string(),
        email: "jordan.reyes@northwind.example".to_string(),
        phone: "(515) 555-0142".to_string(),
        scheduled_call_date: Some(today() + Duration::days(5)),
        hiring_needs: Some("Two analysts for the Q1 reporting push".to_string()),
    }
}

pub(super) type TestService = ReservationService<InMemoryCandidatePool, MemoryNotifications, MemoryNavigator>;

pub(super) fn build_service() -> (
    TestService,
    Arc<InMemoryCandidatePool>,
    Arc<MemoryNotifications>,
    Arc<MemoryNavigator>,
) {
    let pool = Arc::new(pool());
    let notifications = Arc::new(MemoryNotifications::default());
    let navigator = Arc::new(MemoryNavigator::default());
    let service = ReservationService::new(pool.clone(), notifications.clone(), navigator.clone());
    (service, pool, notifications, navigator)
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, notification: Notification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNavigator {
    events: Arc<Mutex<Vec<NavigationEvent>>>,
}

impl MemoryNavigator {
    pub(super) fn events(&self) -> Vec<NavigationEvent> {
        self.events.lock().expect("navigator mutex poisoned").clone()
    }
}

impl Navigator for MemoryNavigator {
    fn navigate(&self, event: &NavigationEvent) -> Result<(), NavigationError> {
        self.events
            .lock()
            .expect("navigator mutex poisoned")
            .push(event.clone());
        Ok(())
    }
}

pub(super) struct FailingNavigator;

impl Navigator for FailingNavigator {
    fn navigate(&self, _event: &NavigationEvent) -> Result<(), NavigationError> {
        Err(NavigationError::Rejected("router offline".to_string()))
    }
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
