use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use talent_market::config::MarketConfig;
use talent_market::error::AppError;
use talent_market::workflows::talent::reservation::{
    NavigationError, NavigationEvent, Navigator, Notification, NotificationError,
    NotificationLevel, NotificationPublisher,
};
use talent_market::workflows::talent::{
    ActivityFeed, InMemoryCandidatePool, MockCandidateGenerator, RosterImporter,
};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) activity: Arc<Mutex<ActivityFeed>>,
}

/// Keeps every toast and logs it; stands in for the browser's toast surface.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationLog {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationPublisher for InMemoryNotificationLog {
    fn publish(&self, notification: Notification) -> Result<(), NotificationError> {
        match notification.level {
            NotificationLevel::Success => info!(message = %notification.message, "notification"),
            NotificationLevel::Error => warn!(
                field = ?notification.field,
                message = %notification.message,
                "field error"
            ),
        }
        let mut guard = self.events.lock().expect("notification mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotificationLog {
    pub(crate) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

/// Records the confirmation screens that were presented.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNavigator {
    screens: Arc<Mutex<Vec<NavigationEvent>>>,
}

impl Navigator for InMemoryNavigator {
    fn navigate(&self, event: &NavigationEvent) -> Result<(), NavigationError> {
        info!(
            company = event.record.company_name(),
            total = event.record.total_candidates(),
            "presenting confirmation"
        );
        let mut guard = self.screens.lock().expect("navigator mutex poisoned");
        guard.push(event.clone());
        Ok(())
    }
}

impl InMemoryNavigator {
    pub(crate) fn presented(&self) -> usize {
        self.screens.lock().expect("navigator mutex poisoned").len()
    }
}

/// Build the session pool from a roster export when given one, otherwise generate it.
pub(crate) fn load_pool(
    market: &MarketConfig,
    roster: Option<&Path>,
    today: NaiveDate,
) -> Result<InMemoryCandidatePool, AppError> {
    let records = match roster {
        Some(path) => {
            let records = RosterImporter::from_path(path)?;
            info!(path = %path.display(), candidates = records.len(), "roster imported");
            records
        }
        None => MockCandidateGenerator::new(market.shape).generate(today),
    };
    let pool = InMemoryCandidatePool::new(records);
    if pool.is_empty() {
        warn!("candidate pool is empty; every hiring need will be fully sponsored");
    }
    Ok(pool)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
