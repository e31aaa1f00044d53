use serde::{Deserialize, Serialize};

use super::flow::NavigationEvent;
use super::form::{FieldError, FormField};

pub const RESERVATION_CONFIRMED_MESSAGE: &str =
    "Reservation Confirmed! We've received your information and will be in touch soon.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Toast or inline message surfaced to the employer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// Set for inline field errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<FormField>,
}

impl Notification {
    pub fn reservation_confirmed() -> Self {
        Self {
            level: NotificationLevel::Success,
            message: RESERVATION_CONFIRMED_MESSAGE.to_string(),
            field: None,
        }
    }

    pub fn field_error(error: &FieldError) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: error.message.clone(),
            field: Some(error.field),
        }
    }
}

/// Outbound notification hook (toasts, inline field messages).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: Notification) -> Result<(), NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification channel unavailable: {0}")]
    Transport(String),
}

/// Routing hook that presents the confirmation screen.
pub trait Navigator: Send + Sync {
    fn navigate(&self, event: &NavigationEvent) -> Result<(), NavigationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("navigation rejected: {0}")]
    Rejected(String),
}
