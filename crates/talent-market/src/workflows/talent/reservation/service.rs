use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::allocation::{Allocation, AllocationRequest, InvalidInputError};
use super::collaborators::{
    NavigationError, Navigator, Notification, NotificationError, NotificationPublisher,
};
use super::confirmation::{ConfirmationView, ReferenceCode};
use super::flow::{FlowAction, FlowController, FlowError, FlowState, SponsorshipEntryPoint};
use super::form::{CallDateOptions, ReservationForm};
use crate::workflows::talent::domain::{CandidateId, CandidateRecord};
use crate::workflows::talent::market::MarketSnapshot;
use crate::workflows::talent::pool::{CandidateFilter, CandidatePool, PoolError};

/// Serializable view of the flow for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct FlowSnapshot {
    pub instance: u64,
    pub state: FlowState,
}

/// Composes the candidate pool, the flow controller, and the outbound hooks for one session.
pub struct ReservationService<P, N, V> {
    pool: Arc<P>,
    notifications: Arc<N>,
    navigator: Arc<V>,
    flow: Mutex<FlowController>,
    confirmation: Mutex<Option<ConfirmationView>>,
}

impl<P, N, V> ReservationService<P, N, V>
where
    P: CandidatePool + 'static,
    N: NotificationPublisher + 'static,
    V: Navigator + 'static,
{
    pub fn new(pool: Arc<P>, notifications: Arc<N>, navigator: Arc<V>) -> Self {
        Self {
            pool,
            notifications,
            navigator,
            flow: Mutex::new(FlowController::new()),
            confirmation: Mutex::new(None),
        }
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }

    fn flow(&self) -> MutexGuard<'_, FlowController> {
        self.flow.lock().expect("flow mutex poisoned")
    }

    fn snapshot_of(flow: &FlowController) -> FlowSnapshot {
        FlowSnapshot {
            instance: flow.instance(),
            state: flow.state().clone(),
        }
    }

    pub fn flow_snapshot(&self) -> FlowSnapshot {
        Self::snapshot_of(&self.flow())
    }

    pub fn browse(&self, filter: &CandidateFilter) -> Vec<CandidateRecord> {
        filter.apply(self.pool.as_ref())
    }

    /// Build a request against the pool's live current supply.
    pub fn allocation_request(&self, needed: u32) -> Result<AllocationRequest, InvalidInputError> {
        AllocationRequest::new(needed, self.pool.available_active_count())
    }

    /// Split `needed` against live supply, optionally at a given slider position.
    pub fn preview_allocation(
        &self,
        needed: u32,
        current: Option<u32>,
    ) -> Result<Allocation, InvalidInputError> {
        let request = self.allocation_request(needed)?;
        match current {
            Some(desired) => Allocation::with_current(&request, desired),
            None => request.allocate(),
        }
    }

    pub fn market(&self, needed: Option<u32>) -> MarketSnapshot {
        MarketSnapshot::from_pool(self.pool.as_ref(), needed)
    }

    pub fn learn_about_sponsorship(
        &self,
        entry_point: SponsorshipEntryPoint,
        needed: u32,
    ) -> Result<FlowSnapshot, ReservationServiceError> {
        let request = self.allocation_request(needed)?;
        let mut flow = self.flow();
        flow.learn_about_sponsorship(entry_point, request)?;
        info!(instance = flow.instance(), ?entry_point, needed, "sponsorship info opened");
        Ok(Self::snapshot_of(&flow))
    }

    pub fn dismiss_sponsorship_info(&self) -> Result<FlowSnapshot, ReservationServiceError> {
        let mut flow = self.flow();
        flow.dismiss_sponsorship_info()?;
        Ok(Self::snapshot_of(&flow))
    }

    pub fn schedule_consultation(&self) -> Result<FlowSnapshot, ReservationServiceError> {
        let mut flow = self.flow();
        flow.schedule_consultation()?;
        info!(instance = flow.instance(), "consultation form opened");
        Ok(Self::snapshot_of(&flow))
    }

    /// Open the form for hand-picked candidates, resolved from the pool by id.
    pub fn reserve_candidates(
        &self,
        ids: &[CandidateId],
    ) -> Result<FlowSnapshot, ReservationServiceError> {
        let candidates = ids
            .iter()
            .map(|id| {
                self.pool
                    .get(id)
                    .ok_or_else(|| PoolError::UnknownCandidate(id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut flow = self.flow();
        flow.reserve_candidates(candidates)?;
        info!(instance = flow.instance(), selected = ids.len(), "reservation form opened");
        Ok(Self::snapshot_of(&flow))
    }

    /// Apply slider and hiring-need edits. The need is applied first so the slider
    /// is clamped against the new total.
    pub fn adjust_allocation(
        &self,
        needed: Option<u32>,
        current: Option<u32>,
    ) -> Result<Allocation, ReservationServiceError> {
        let mut flow = self.flow();
        let mut allocation = None;
        if let Some(needed) = needed {
            allocation = Some(flow.adjust_needed_candidates(needed)?);
        }
        if let Some(current) = current {
            allocation = Some(flow.adjust_current_allocation(current)?);
        }
        match allocation {
            Some(allocation) => Ok(allocation),
            None => match flow.draft() {
                Some(draft) => Ok(draft.selection.allocation()?),
                None => Err(FlowError::InvalidTransition {
                    from: flow.phase(),
                    action: FlowAction::AdjustAllocation,
                }
                .into()),
            },
        }
    }

    pub fn select_call_date(
        &self,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<FlowSnapshot, ReservationServiceError> {
        let mut flow = self.flow();
        flow.select_call_date(date, today)?;
        Ok(Self::snapshot_of(&flow))
    }

    pub fn call_date_options(
        &self,
        today: NaiveDate,
    ) -> Result<CallDateOptions, ReservationServiceError> {
        Ok(self.flow().call_date_options(today)?)
    }

    pub fn cancel(&self) -> Result<FlowSnapshot, ReservationServiceError> {
        let mut flow = self.flow();
        flow.cancel()?;
        info!(instance = flow.instance(), "reservation form cancelled");
        Ok(Self::snapshot_of(&flow))
    }

    /// Validate and confirm the open reservation. Field errors are published one per
    /// field and the flow stays on the form.
    pub fn submit(
        &self,
        form: ReservationForm,
        today: NaiveDate,
    ) -> Result<ConfirmationView, ReservationServiceError> {
        let mut flow = self.flow();
        let event = match flow.submit(form, today) {
            Ok(event) => event,
            Err(FlowError::Validation(errors)) => {
                warn!(
                    instance = flow.instance(),
                    invalid = errors.errors.len(),
                    "reservation form rejected"
                );
                for error in &errors.errors {
                    self.notifications.publish(Notification::field_error(error))?;
                }
                return Err(FlowError::Validation(errors).into());
            }
            Err(other) => return Err(other.into()),
        };

        let ids = event.selection.reserved_ids();
        if let Err(error) = self.pool.mark_reserved(&ids) {
            warn!(instance = flow.instance(), %error, "pool changed under the reservation");
            flow.reset();
            return Err(error.into());
        }

        let reference = ReferenceCode::generate(&mut rand::thread_rng());
        self.navigator.navigate(&event)?;
        self.notifications.publish(Notification::reservation_confirmed())?;

        let view = ConfirmationView::new(event, reference)?;
        info!(
            instance = flow.instance(),
            reference = %reference,
            current = view.record().current_allocation(),
            prospective = view.record().prospective_allocation(),
            "reservation confirmed"
        );

        *self.confirmation.lock().expect("confirmation mutex poisoned") = Some(view.clone());
        Ok(view)
    }

    pub fn confirmation(&self) -> Option<ConfirmationView> {
        self.confirmation
            .lock()
            .expect("confirmation mutex poisoned")
            .clone()
    }

    /// "Browse more talent": drop the confirmation and start a new flow instance.
    pub fn browse_more_talent(&self) -> FlowSnapshot {
        self.confirmation
            .lock()
            .expect("confirmation mutex poisoned")
            .take();
        let mut flow = self.flow();
        flow.reset();
        Self::snapshot_of(&flow)
    }
}

/// Error raised by the reservation service.
#[derive(Debug, thiserror::Error)]
pub enum ReservationServiceError {
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}
