use crate::cli::ServeArgs;
use crate::infra::{load_pool, AppState, InMemoryNavigator, InMemoryNotificationLog};
use crate::routes::with_talent_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use talent_market::config::AppConfig;
use talent_market::error::AppError;
use talent_market::telemetry;
use talent_market::workflows::talent::reservation::ReservationService;
use talent_market::workflows::talent::{ActivityFeed, CandidatePool};
use tracing::{debug, info};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let today = Local::now().date_naive();
    let pool = Arc::new(load_pool(&config.market, args.roster.as_deref(), today)?);
    let activity = Arc::new(Mutex::new(ActivityFeed::from_pool(pool.as_ref())));
    info!(
        current = pool.list_current().len(),
        available = pool.available_active_count(),
        prospective = pool.list_prospective().len(),
        "candidate pool loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        activity: activity.clone(),
    };

    let service = Arc::new(ReservationService::new(
        pool.clone(),
        Arc::new(InMemoryNotificationLog::default()),
        Arc::new(InMemoryNavigator::default()),
    ));

    let app = with_talent_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    tokio::spawn(rotate_activity(
        activity,
        pool,
        config.market.activity_rotation,
    ));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "talent marketplace ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Advance the ticker on a fixed cadence for as long as the server runs, re-reading
/// the pool first so reservations confirmed during the session join the rotation.
async fn rotate_activity<P: CandidatePool + 'static>(
    feed: Arc<Mutex<ActivityFeed>>,
    pool: Arc<P>,
    every: Duration,
) {
    let mut ticker = tokio::time::interval(every);
    // The first tick completes immediately.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let mut guard = feed.lock().expect("activity mutex poisoned");
        guard.refresh(pool.as_ref());
        if let Some(entry) = guard.advance() {
            debug!(headline = %entry.headline, "activity ticker advanced");
        }
    }
}
