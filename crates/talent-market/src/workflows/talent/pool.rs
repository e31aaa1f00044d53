use std::collections::BTreeSet;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use super::domain::{CandidateId, CandidateKind, CandidateRecord, Program, ReservationStatus};

/// Source of candidate records for browsing and reservation.
pub trait CandidatePool: Send + Sync {
    fn list_current(&self) -> Vec<CandidateRecord>;
    fn list_prospective(&self) -> Vec<CandidateRecord>;
    /// Flip the listed candidates to reserved. Current candidates go off-market as a consequence.
    /// Any candidate that is already reserved fails the whole batch.
    fn mark_reserved(&self, ids: &[CandidateId]) -> Result<usize, PoolError>;

    fn get(&self, id: &CandidateId) -> Option<CandidateRecord> {
        self.list_current()
            .into_iter()
            .chain(self.list_prospective())
            .find(|record| &record.id == id)
    }

    /// Count of current candidates that can still be reserved.
    fn available_active_count(&self) -> u32 {
        let count = self
            .list_current()
            .iter()
            .filter(|record| !record.is_reserved())
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

/// Errors raised while mutating the pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("candidate {0} not found")]
    UnknownCandidate(CandidateId),
    #[error("candidate {0} is already reserved")]
    AlreadyReserved(CandidateId),
}

/// Session-scoped pool held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryCandidatePool {
    records: RwLock<Vec<CandidateRecord>>,
}

impl InMemoryCandidatePool {
    pub fn new(records: Vec<CandidateRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().expect("pool lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn list_kind(&self, kind: CandidateKind) -> Vec<CandidateRecord> {
        self.records
            .read()
            .expect("pool lock poisoned")
            .iter()
            .filter(|record| record.kind == kind)
            .cloned()
            .collect()
    }
}

impl CandidatePool for InMemoryCandidatePool {
    fn list_current(&self) -> Vec<CandidateRecord> {
        self.list_kind(CandidateKind::Current)
    }

    fn list_prospective(&self) -> Vec<CandidateRecord> {
        self.list_kind(CandidateKind::Prospective)
    }

    fn mark_reserved(&self, ids: &[CandidateId]) -> Result<usize, PoolError> {
        let mut records = self.records.write().expect("pool lock poisoned");

        // Validate the whole batch before flipping anything.
        let mut indexes = Vec::with_capacity(ids.len());
        let mut seen = BTreeSet::new();
        for id in ids {
            if !seen.insert(id) {
                continue;
            }
            let index = records
                .iter()
                .position(|record| &record.id == id)
                .ok_or_else(|| PoolError::UnknownCandidate(id.clone()))?;
            if records[index].is_reserved() {
                return Err(PoolError::AlreadyReserved(id.clone()));
            }
            indexes.push(index);
        }

        for &index in &indexes {
            records[index].status = ReservationStatus::Reserved;
        }

        Ok(indexes.len())
    }
}

/// Ordering applied to browse results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSort {
    #[default]
    Availability,
    Name,
    Experience,
}

/// Browse filters selected by the employer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateFilter {
    pub kind: Option<CandidateKind>,
    pub program: Option<Program>,
    pub location: Option<String>,
    pub skill: Option<String>,
    pub search: Option<String>,
    pub include_off_market: bool,
    pub sort: CandidateSort,
}

impl CandidateFilter {
    pub fn matches(&self, record: &CandidateRecord) -> bool {
        if !self.include_off_market && record.is_off_market() {
            return false;
        }
        if self.kind.is_some_and(|kind| kind != record.kind) {
            return false;
        }
        if self.program.is_some_and(|program| program != record.program) {
            return false;
        }
        if let Some(location) = non_blank(&self.location) {
            if !contains_ignore_case(&record.location, location) {
                return false;
            }
        }
        if let Some(skill) = non_blank(&self.skill) {
            if !record.has_skill(skill) {
                return false;
            }
        }
        if let Some(search) = non_blank(&self.search) {
            let hit = contains_ignore_case(&record.name, search)
                || contains_ignore_case(&record.job_role, search)
                || contains_ignore_case(&record.headline, search)
                || record
                    .skills
                    .iter()
                    .any(|skill| contains_ignore_case(skill, search));
            if !hit {
                return false;
            }
        }
        true
    }

    /// Filter and sort the whole pool.
    pub fn apply<P>(&self, pool: &P) -> Vec<CandidateRecord>
    where
        P: CandidatePool + ?Sized,
    {
        let mut matches: Vec<CandidateRecord> = pool
            .list_current()
            .into_iter()
            .chain(pool.list_prospective())
            .filter(|record| self.matches(record))
            .collect();

        match self.sort {
            CandidateSort::Availability => matches.sort_by(|a, b| {
                a.available_date
                    .cmp(&b.available_date)
                    .then_with(|| a.id.cmp(&b.id))
            }),
            CandidateSort::Name => {
                matches.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)))
            }
            CandidateSort::Experience => matches.sort_by(|a, b| {
                b.experience_years
                    .cmp(&a.experience_years)
                    .then_with(|| a.id.cmp(&b.id))
            }),
        }

        matches
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
