use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::allocation::{Allocation, AllocationRequest, InvalidInputError};
use super::form::{
    CallDateOptions, CallWindow, FieldError, ReservationForm, ReservationRecord, ValidationErrors,
};
use crate::workflows::talent::domain::{CandidateId, CandidateRecord};

/// Where the employer clicked "Learn about sponsorship".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SponsorshipEntryPoint {
    BulkReservationPrompt,
    TalentGapAlert,
    CardSponsorButton,
}

/// What the flow is reserving: an aggregate hiring need or hand-picked candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SelectionContext {
    Bulk {
        request: AllocationRequest,
        allocation: Allocation,
    },
    Individual {
        candidates: Vec<CandidateRecord>,
    },
}

impl SelectionContext {
    pub fn is_bulk(&self) -> bool {
        matches!(self, SelectionContext::Bulk { .. })
    }

    /// The current/prospective split this selection resolves to.
    pub fn allocation(&self) -> Result<Allocation, InvalidInputError> {
        match self {
            SelectionContext::Bulk { allocation, .. } => Ok(*allocation),
            SelectionContext::Individual { candidates } => {
                let current = candidates
                    .iter()
                    .filter(|candidate| !candidate.is_prospective())
                    .count();
                let current = u32::try_from(current).map_err(|_| InvalidInputError)?;
                let total = u32::try_from(candidates.len()).map_err(|_| InvalidInputError)?;
                Allocation::from_counts(current, total - current)
            }
        }
    }

    /// Candidates whose reservation flags flip when the flow confirms.
    pub fn reserved_ids(&self) -> Vec<CandidateId> {
        match self {
            SelectionContext::Bulk { .. } => Vec::new(),
            SelectionContext::Individual { candidates } => candidates
                .iter()
                .map(|candidate| candidate.id.clone())
                .collect(),
        }
    }
}

/// In-progress reservation form state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationDraft {
    pub selection: SelectionContext,
    pub selected_call_date: Option<NaiveDate>,
}

/// The modal currently on screen. Being one enum, two modals can never be open at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum FlowState {
    Closed,
    ShowingSponsorshipInfo {
        entry_point: SponsorshipEntryPoint,
        request: AllocationRequest,
    },
    ShowingReservationForm(ReservationDraft),
    Confirmed,
}

impl FlowState {
    pub fn phase(&self) -> FlowPhase {
        match self {
            FlowState::Closed => FlowPhase::Closed,
            FlowState::ShowingSponsorshipInfo { .. } => FlowPhase::ShowingSponsorshipInfo,
            FlowState::ShowingReservationForm(_) => FlowPhase::ShowingReservationForm,
            FlowState::Confirmed => FlowPhase::Confirmed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPhase {
    Closed,
    ShowingSponsorshipInfo,
    ShowingReservationForm,
    Confirmed,
}

impl FlowPhase {
    pub const fn label(self) -> &'static str {
        match self {
            FlowPhase::Closed => "closed",
            FlowPhase::ShowingSponsorshipInfo => "showing_sponsorship_info",
            FlowPhase::ShowingReservationForm => "showing_reservation_form",
            FlowPhase::Confirmed => "confirmed",
        }
    }
}

impl std::fmt::Display for FlowPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowAction {
    LearnAboutSponsorship,
    DismissSponsorshipInfo,
    ScheduleConsultation,
    ReserveCandidates,
    AdjustAllocation,
    SelectCallDate,
    Cancel,
    Submit,
}

/// Emitted exactly once per flow, when it confirms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationEvent {
    pub record: ReservationRecord,
    pub selection: SelectionContext,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FlowError {
    #[error("cannot {action:?} while {from}")]
    InvalidTransition { from: FlowPhase, action: FlowAction },
    #[error("select at least one candidate to reserve")]
    EmptySelection,
    #[error("candidate {0} is already reserved")]
    CandidateUnavailable(CandidateId),
    #[error("allocation can only be adjusted for bulk reservations")]
    NotBulk,
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
    #[error(transparent)]
    CallDate(FieldError),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

/// Owns the reservation flow for one browsing session.
#[derive(Debug)]
pub struct FlowController {
    state: FlowState,
    instance: u64,
}

impl Default for FlowController {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowController {
    pub fn new() -> Self {
        Self {
            state: FlowState::Closed,
            instance: 1,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn phase(&self) -> FlowPhase {
        self.state.phase()
    }

    /// Incremented each time the flow is reset; lets callers tell flows apart.
    pub fn instance(&self) -> u64 {
        self.instance
    }

    pub fn draft(&self) -> Option<&ReservationDraft> {
        match &self.state {
            FlowState::ShowingReservationForm(draft) => Some(draft),
            _ => None,
        }
    }

    fn invalid(&self, action: FlowAction) -> FlowError {
        FlowError::InvalidTransition {
            from: self.phase(),
            action,
        }
    }

    /// `Closed -> ShowingSponsorshipInfo`.
    pub fn learn_about_sponsorship(
        &mut self,
        entry_point: SponsorshipEntryPoint,
        request: AllocationRequest,
    ) -> Result<&FlowState, FlowError> {
        if !matches!(self.state, FlowState::Closed) {
            return Err(self.invalid(FlowAction::LearnAboutSponsorship));
        }
        if request.needed_candidates == 0 {
            return Err(InvalidInputError.into());
        }
        self.state = FlowState::ShowingSponsorshipInfo {
            entry_point,
            request,
        };
        Ok(&self.state)
    }

    /// `ShowingSponsorshipInfo -> Closed`.
    pub fn dismiss_sponsorship_info(&mut self) -> Result<&FlowState, FlowError> {
        if !matches!(self.state, FlowState::ShowingSponsorshipInfo { .. }) {
            return Err(self.invalid(FlowAction::DismissSponsorshipInfo));
        }
        self.state = FlowState::Closed;
        Ok(&self.state)
    }

    /// `ShowingSponsorshipInfo -> ShowingReservationForm`, seeded with the computed split.
    pub fn schedule_consultation(&mut self) -> Result<&FlowState, FlowError> {
        let request = match &self.state {
            FlowState::ShowingSponsorshipInfo { request, .. } => *request,
            _ => return Err(self.invalid(FlowAction::ScheduleConsultation)),
        };
        let allocation = request.allocate()?;
        self.state = FlowState::ShowingReservationForm(ReservationDraft {
            selection: SelectionContext::Bulk {
                request,
                allocation,
            },
            selected_call_date: None,
        });
        Ok(&self.state)
    }

    /// `Closed -> ShowingReservationForm` for hand-picked candidates, skipping sponsorship info.
    pub fn reserve_candidates(
        &mut self,
        candidates: Vec<CandidateRecord>,
    ) -> Result<&FlowState, FlowError> {
        if !matches!(self.state, FlowState::Closed) {
            return Err(self.invalid(FlowAction::ReserveCandidates));
        }

        let mut seen = HashSet::new();
        let mut selected = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if candidate.is_reserved() {
                return Err(FlowError::CandidateUnavailable(candidate.id));
            }
            if seen.insert(candidate.id.clone()) {
                selected.push(candidate);
            }
        }
        if selected.is_empty() {
            return Err(FlowError::EmptySelection);
        }

        self.state = FlowState::ShowingReservationForm(ReservationDraft {
            selection: SelectionContext::Individual {
                candidates: selected,
            },
            selected_call_date: None,
        });
        Ok(&self.state)
    }

    fn bulk_mut(
        &mut self,
    ) -> Result<(&mut AllocationRequest, &mut Allocation), FlowError> {
        let phase = self.phase();
        match &mut self.state {
            FlowState::ShowingReservationForm(ReservationDraft {
                selection:
                    SelectionContext::Bulk {
                        request,
                        allocation,
                    },
                ..
            }) => Ok((request, allocation)),
            FlowState::ShowingReservationForm(_) => Err(FlowError::NotBulk),
            _ => Err(FlowError::InvalidTransition {
                from: phase,
                action: FlowAction::AdjustAllocation,
            }),
        }
    }

    /// Slider move. The value is re-clamped to the available current supply every time.
    pub fn adjust_current_allocation(&mut self, desired: u32) -> Result<Allocation, FlowError> {
        let (request, allocation) = self.bulk_mut()?;
        *allocation = Allocation::with_current(request, desired)?;
        Ok(*allocation)
    }

    /// Change the total hiring need, keeping the slider's current share where it still fits.
    pub fn adjust_needed_candidates(&mut self, needed: u32) -> Result<Allocation, FlowError> {
        let (request, allocation) = self.bulk_mut()?;
        let updated = AllocationRequest::new(needed, request.available_active_count)?;
        let next = Allocation::with_current(&updated, allocation.current_allocation)?;
        *request = updated;
        *allocation = next;
        Ok(next)
    }

    /// Date picker selection; dates outside the call window are refused here too.
    pub fn select_call_date(
        &mut self,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<NaiveDate, FlowError> {
        let phase = self.phase();
        let FlowState::ShowingReservationForm(draft) = &mut self.state else {
            return Err(FlowError::InvalidTransition {
                from: phase,
                action: FlowAction::SelectCallDate,
            });
        };
        CallWindow::starting(today)
            .check(date)
            .map_err(FlowError::CallDate)?;
        draft.selected_call_date = Some(date);
        Ok(date)
    }

    /// Dates the picker may show for the open form. Out-of-window dates are never listed.
    pub fn call_date_options(&self, today: NaiveDate) -> Result<CallDateOptions, FlowError> {
        let draft = self
            .draft()
            .ok_or_else(|| self.invalid(FlowAction::SelectCallDate))?;
        Ok(CallDateOptions::new(
            CallWindow::starting(today),
            draft.selected_call_date,
        ))
    }

    /// `ShowingReservationForm -> Closed`, dropping the draft.
    pub fn cancel(&mut self) -> Result<&FlowState, FlowError> {
        if !matches!(self.state, FlowState::ShowingReservationForm(_)) {
            return Err(self.invalid(FlowAction::Cancel));
        }
        self.state = FlowState::Closed;
        Ok(&self.state)
    }

    /// `ShowingReservationForm -> Confirmed` when every field is valid. On failure the
    /// flow stays on the form and all field errors come back together.
    pub fn submit(
        &mut self,
        mut form: ReservationForm,
        today: NaiveDate,
    ) -> Result<NavigationEvent, FlowError> {
        let draft = match std::mem::replace(&mut self.state, FlowState::Confirmed) {
            FlowState::ShowingReservationForm(draft) => draft,
            other => {
                self.state = other;
                return Err(self.invalid(FlowAction::Submit));
            }
        };

        if form.scheduled_call_date.is_none() {
            form.scheduled_call_date = draft.selected_call_date;
        }
        let resolved = form.validate(today).map_err(FlowError::from).and_then(|validated| {
            let allocation = draft.selection.allocation()?;
            Ok((validated, allocation))
        });

        match resolved {
            Ok((validated, allocation)) => Ok(NavigationEvent {
                record: validated.into_record(allocation),
                selection: draft.selection,
            }),
            Err(error) => {
                self.state = FlowState::ShowingReservationForm(draft);
                Err(error)
            }
        }
    }

    /// Start a fresh flow instance from any state, discarding whatever was in progress.
    pub fn reset(&mut self) {
        self.state = FlowState::Closed;
        self.instance += 1;
    }
}
