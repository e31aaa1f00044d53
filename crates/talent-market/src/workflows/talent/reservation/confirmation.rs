use std::fmt::Write as _;

use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;

use super::allocation::{split_percentages, InvalidInputError};
use super::flow::{NavigationEvent, SelectionContext};
use super::form::ReservationRecord;
use crate::workflows::talent::domain::CandidateSummary;

/// Display-only reference printed on the confirmation, `STR-` plus four digits.
/// Not unique and never used as an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceCode(u16);

impl ReferenceCode {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(0..10_000))
    }

    pub fn from_number(number: u16) -> Self {
        Self(number % 10_000)
    }
}

impl std::fmt::Display for ReferenceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "STR-{:04}", self.0)
    }
}

impl Serialize for ReferenceCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What the employer can do from the confirmation screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationAction {
    BrowseMoreTalent,
    SaveConfirmation,
}

impl ConfirmationAction {
    pub const fn label(self) -> &'static str {
        match self {
            ConfirmationAction::BrowseMoreTalent => "Browse more talent",
            ConfirmationAction::SaveConfirmation => "Save confirmation",
        }
    }
}

/// Read-only confirmation screen. Owns the record it was handed.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationView {
    reference: ReferenceCode,
    record: ReservationRecord,
    current_percent: u8,
    prospective_percent: u8,
    bulk: bool,
    candidates: Vec<CandidateSummary>,
    actions: [ConfirmationAction; 2],
}

impl ConfirmationView {
    pub fn new(event: NavigationEvent, reference: ReferenceCode) -> Result<Self, InvalidInputError> {
        let NavigationEvent { record, selection } = event;
        let (current_percent, prospective_percent) =
            split_percentages(record.current_allocation(), record.total_candidates())?;
        let (bulk, candidates) = match selection {
            SelectionContext::Bulk { .. } => (true, Vec::new()),
            SelectionContext::Individual { candidates } => (
                false,
                candidates
                    .iter()
                    .map(|candidate| candidate.summary())
                    .collect(),
            ),
        };

        Ok(Self {
            reference,
            record,
            current_percent,
            prospective_percent,
            bulk,
            candidates,
            actions: [
                ConfirmationAction::BrowseMoreTalent,
                ConfirmationAction::SaveConfirmation,
            ],
        })
    }

    pub fn reference(&self) -> ReferenceCode {
        self.reference
    }

    pub fn record(&self) -> &ReservationRecord {
        &self.record
    }

    pub fn current_percent(&self) -> u8 {
        self.current_percent
    }

    pub fn prospective_percent(&self) -> u8 {
        self.prospective_percent
    }

    pub fn is_bulk(&self) -> bool {
        self.bulk
    }

    pub fn candidates(&self) -> &[CandidateSummary] {
        &self.candidates
    }

    /// The only two things the employer can do from this screen.
    pub fn actions(&self) -> &[ConfirmationAction] {
        &self.actions
    }

    /// Plain-text rendering for the save/print action.
    pub fn printable(&self) -> String {
        let record = &self.record;
        let mut out = String::new();
        let _ = writeln!(out, "Reservation confirmation {}", self.reference);
        let _ = writeln!(out, "Company: {}", record.company_name());
        let _ = writeln!(out, "Contact: {} <{}>", record.contact_name(), record.email());
        let _ = writeln!(out, "Phone: {}", record.phone());
        let _ = writeln!(
            out,
            "Consultation call: {}",
            format_call_date(record.scheduled_call_date())
        );
        let _ = writeln!(
            out,
            "Current candidates: {} ({}%)",
            record.current_allocation(),
            self.current_percent
        );
        let _ = writeln!(
            out,
            "Sponsored candidates: {} ({}%)",
            record.prospective_allocation(),
            self.prospective_percent
        );
        if let Some(needs) = record.hiring_needs() {
            let _ = writeln!(out, "Hiring needs: {needs}");
        }
        for candidate in &self.candidates {
            let _ = writeln!(
                out,
                "- {} ({}, {})",
                candidate.name, candidate.job_role, candidate.program_label
            );
        }
        out
    }
}

fn format_call_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}
