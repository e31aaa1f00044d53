//! CSV roster import, for sessions seeded from a real export instead of the generator.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use super::domain::{CandidateId, CandidateKind, CandidateRecord, Program, ReservationStatus};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownProgram { row: usize, value: String },
    UnknownTrack { row: usize, value: String },
    InvalidReservedFlag { row: usize, value: String },
    InvalidDate { row: usize, value: String },
    DuplicateId(CandidateId),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::UnknownProgram { row, value } => {
                write!(f, "row {}: unknown program '{}'", row, value)
            }
            RosterImportError::UnknownTrack { row, value } => {
                write!(f, "row {}: track '{}' is neither current nor prospective", row, value)
            }
            RosterImportError::InvalidReservedFlag { row, value } => {
                write!(f, "row {}: reserved flag '{}' is not yes or no", row, value)
            }
            RosterImportError::InvalidDate { row, value } => {
                write!(f, "row {}: '{}' is not a YYYY-MM-DD date", row, value)
            }
            RosterImportError::DuplicateId(id) => write!(f, "candidate id {} appears twice", id),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::UnknownProgram { .. }
            | RosterImportError::UnknownTrack { .. }
            | RosterImportError::InvalidReservedFlag { .. }
            | RosterImportError::InvalidDate { .. }
            | RosterImportError::DuplicateId(_) => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Track")]
    track: String,
    #[serde(rename = "Program")]
    program: String,
    #[serde(rename = "Role", default)]
    role: String,
    #[serde(rename = "Location", default)]
    location: String,
    #[serde(rename = "Skills", default)]
    skills: String,
    #[serde(rename = "Available")]
    available: String,
    #[serde(rename = "Experience", default)]
    experience: u8,
    #[serde(rename = "Reserved", default)]
    reserved: String,
}

fn parse_track(raw: &str) -> Option<CandidateKind> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "current" => Some(CandidateKind::Current),
        "prospective" => Some(CandidateKind::Prospective),
        _ => None,
    }
}

/// A blank cell means the candidate is still available.
fn parse_reserved(raw: &str) -> Option<ReservationStatus> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(ReservationStatus::Reserved),
        "" | "no" | "n" | "false" | "0" => Some(ReservationStatus::Available),
        _ => None,
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CandidateRecord>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Columns: `ID, Name, Track, Program, Role, Location, Skills, Available, Experience, Reserved`.
    /// `Track` is `current` or `prospective`; `Skills` is semicolon separated.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CandidateRecord>, RosterImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for (index, row) in csv_reader.deserialize::<RosterRow>().enumerate() {
            let row = row?;
            // Header is line 1.
            let line = index + 2;

            let program = Program::from_label(&row.program).ok_or_else(|| {
                RosterImportError::UnknownProgram {
                    row: line,
                    value: row.program.clone(),
                }
            })?;
            let available_date = NaiveDate::parse_from_str(&row.available, "%Y-%m-%d")
                .map_err(|_| RosterImportError::InvalidDate {
                    row: line,
                    value: row.available.clone(),
                })?;
            let kind = parse_track(&row.track).ok_or_else(|| RosterImportError::UnknownTrack {
                row: line,
                value: row.track.clone(),
            })?;
            let status = parse_reserved(&row.reserved).ok_or_else(|| {
                RosterImportError::InvalidReservedFlag {
                    row: line,
                    value: row.reserved.clone(),
                }
            })?;

            let id = CandidateId(row.id);
            if !seen.insert(id.clone()) {
                return Err(RosterImportError::DuplicateId(id));
            }

            let job_role = if row.role.is_empty() {
                program.job_roles().first().copied().unwrap_or("Associate").to_string()
            } else {
                row.role
            };

            records.push(CandidateRecord {
                id,
                headline: format!("{} graduate targeting {}", program.label(), job_role),
                name: row.name,
                kind,
                status,
                program,
                job_role,
                location: row.location,
                skills: row
                    .skills
                    .split(';')
                    .map(str::trim)
                    .filter(|skill| !skill.is_empty())
                    .map(str::to_string)
                    .collect(),
                available_date,
                experience_years: row.experience,
            });
        }

        Ok(records)
    }
}
