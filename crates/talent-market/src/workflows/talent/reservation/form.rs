use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::allocation::Allocation;

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_PHONE_DIGITS: usize = 10;
/// Calls may be booked from tomorrow up to this many days out.
pub const CALL_WINDOW_DAYS: i64 = 14;

/// Fields collected by the reservation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    CompanyName,
    ContactName,
    Email,
    Phone,
    ScheduledCallDate,
}

impl FormField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CompanyName => "Company name",
            Self::ContactName => "Contact name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::ScheduledCallDate => "Call date",
        }
    }
}

/// One invalid field and the message shown beside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{}: {message}", .field.label())]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every field failure from a single submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("reservation form has {} invalid field(s)", .errors.len())]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn fields(&self) -> Vec<FormField> {
        self.errors.iter().map(|error| error.field).collect()
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }
}

/// Raw values as typed by the employer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationForm {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub scheduled_call_date: Option<NaiveDate>,
    pub hiring_needs: Option<String>,
}

impl ReservationForm {
    /// Run every field rule, collecting all failures.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidatedForm, ValidationErrors> {
        let mut errors = Vec::new();

        let company_name = self.company_name.trim();
        if let Err(error) = check_name(FormField::CompanyName, company_name) {
            errors.push(error);
        }

        let contact_name = self.contact_name.trim();
        if let Err(error) = check_name(FormField::ContactName, contact_name) {
            errors.push(error);
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(FieldError::new(FormField::Email, "Email is required"));
        } else if !is_valid_email(email) {
            errors.push(FieldError::new(
                FormField::Email,
                "Enter a valid email address",
            ));
        }

        let phone = self.phone.trim();
        if phone.is_empty() {
            errors.push(FieldError::new(FormField::Phone, "Phone number is required"));
        } else if phone_digits(phone) < MIN_PHONE_DIGITS {
            errors.push(FieldError::new(
                FormField::Phone,
                format!("Phone number must contain at least {MIN_PHONE_DIGITS} digits"),
            ));
        }

        let scheduled_call_date = match self.scheduled_call_date {
            None => {
                errors.push(FieldError::new(
                    FormField::ScheduledCallDate,
                    "Pick a date for the consultation call",
                ));
                None
            }
            Some(date) => match CallWindow::starting(today).check(date) {
                Ok(()) => Some(date),
                Err(error) => {
                    errors.push(error);
                    None
                }
            },
        };

        match scheduled_call_date {
            Some(scheduled_call_date) if errors.is_empty() => Ok(ValidatedForm {
                company_name: company_name.to_string(),
                contact_name: contact_name.to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                scheduled_call_date,
                hiring_needs: self
                    .hiring_needs
                    .as_deref()
                    .map(str::trim)
                    .filter(|needs| !needs.is_empty())
                    .map(str::to_string),
            }),
            _ => Err(ValidationErrors { errors }),
        }
    }
}

fn check_name(field: FormField, value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        return Err(FieldError::new(field, format!("{} is required", field.label())));
    }
    if value.chars().count() < MIN_NAME_CHARS {
        return Err(FieldError::new(
            field,
            format!(
                "{} must be at least {MIN_NAME_CHARS} characters",
                field.label()
            ),
        ));
    }
    Ok(())
}

fn phone_digits(raw: &str) -> usize {
    raw.chars().filter(char::is_ascii_digit).count()
}

/// Dot-atom local part, dotted hostname, alphabetic TLD.
pub fn is_valid_email(raw: &str) -> bool {
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if domain.contains('@') || local.is_empty() || local.len() > 64 || domain.len() > 255 {
        return false;
    }

    const LOCAL_SPECIALS: &str = "!#$%&'*+/=?^_`{|}~-";
    let local_ok = local.split('.').all(|atom| {
        !atom.is_empty()
            && atom
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || LOCAL_SPECIALS.contains(c))
    });
    if !local_ok {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));

    labels_ok && tld_ok
}

/// Bookable consultation dates: strictly after today, at most two weeks out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallWindow {
    today: NaiveDate,
}

impl CallWindow {
    pub fn starting(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn earliest(&self) -> NaiveDate {
        self.today + Duration::days(1)
    }

    pub fn latest(&self) -> NaiveDate {
        self.today + Duration::days(CALL_WINDOW_DAYS)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.earliest() && date <= self.latest()
    }

    pub fn check(&self, date: NaiveDate) -> Result<(), FieldError> {
        if self.contains(date) {
            Ok(())
        } else {
            Err(FieldError::new(
                FormField::ScheduledCallDate,
                format!(
                    "Call date must be between {} and {}",
                    self.earliest(),
                    self.latest()
                ),
            ))
        }
    }

    /// The only dates the picker offers.
    pub fn selectable_dates(&self) -> Vec<NaiveDate> {
        (1..=CALL_WINDOW_DAYS)
            .map(|offset| self.today + Duration::days(offset))
            .collect()
    }
}

/// What the date picker offers for the open form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallDateOptions {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
    pub dates: Vec<NaiveDate>,
    pub selected: Option<NaiveDate>,
}

impl CallDateOptions {
    pub fn new(window: CallWindow, selected: Option<NaiveDate>) -> Self {
        Self {
            earliest: window.earliest(),
            latest: window.latest(),
            dates: window.selectable_dates(),
            selected,
        }
    }
}

/// Form values that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedForm {
    company_name: String,
    contact_name: String,
    email: String,
    phone: String,
    scheduled_call_date: NaiveDate,
    hiring_needs: Option<String>,
}

impl ValidatedForm {
    pub(crate) fn into_record(self, allocation: Allocation) -> ReservationRecord {
        ReservationRecord {
            company_name: self.company_name,
            contact_name: self.contact_name,
            email: self.email,
            phone: self.phone,
            scheduled_call_date: self.scheduled_call_date,
            hiring_needs: self.hiring_needs,
            current_allocation: allocation.current_allocation,
            prospective_allocation: allocation.prospective_allocation,
        }
    }
}

/// The finalized reservation. Built once on a successful submit and never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationRecord {
    company_name: String,
    contact_name: String,
    email: String,
    phone: String,
    scheduled_call_date: NaiveDate,
    hiring_needs: Option<String>,
    current_allocation: u32,
    prospective_allocation: u32,
}

impl ReservationRecord {
    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn contact_name(&self) -> &str {
        &self.contact_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn scheduled_call_date(&self) -> NaiveDate {
        self.scheduled_call_date
    }

    pub fn hiring_needs(&self) -> Option<&str> {
        self.hiring_needs.as_deref()
    }

    pub fn current_allocation(&self) -> u32 {
        self.current_allocation
    }

    pub fn prospective_allocation(&self) -> u32 {
        self.prospective_allocation
    }

    pub fn total_candidates(&self) -> u32 {
        self.current_allocation + self.prospective_allocation
    }
}
