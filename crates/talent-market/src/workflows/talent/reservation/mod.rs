//! Reservation allocation and the sponsorship/reservation modal flow.
//!
//! `allocation` holds the pure split arithmetic, `flow` the modal state machine,
//! `form` the field rules and the finalized record, and `service` wires them to the
//! candidate pool and the outbound notification and navigation hooks.

pub mod allocation;
pub mod collaborators;
pub mod confirmation;
pub mod flow;
pub mod form;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use allocation::{allocate, split_percentages, Allocation, AllocationRequest, InvalidInputError};
pub use collaborators::{
    NavigationError, Navigator, Notification, NotificationError, NotificationLevel,
    NotificationPublisher, RESERVATION_CONFIRMED_MESSAGE,
};
pub use confirmation::{ConfirmationAction, ConfirmationView, ReferenceCode};
pub use flow::{
    FlowAction, FlowController, FlowError, FlowPhase, FlowState, NavigationEvent,
    ReservationDraft, SelectionContext, SponsorshipEntryPoint,
};
pub use form::{
    CallDateOptions, CallWindow, FieldError, FormField, ReservationForm, ReservationRecord, ValidatedForm,
    ValidationErrors,
};
pub use router::reservation_router;
pub use service::{FlowSnapshot, ReservationService, ReservationServiceError};
