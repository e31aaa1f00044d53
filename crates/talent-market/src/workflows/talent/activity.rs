use serde::Serialize;

use super::domain::{CandidateKind, CandidateRecord};
use super::pool::CandidatePool;

/// One line of the "recent activity" ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub headline: String,
    pub minutes_ago: u32,
}

/// Rotating ticker state. Independent of the reservation flow; advanced by a timer.
#[derive(Debug, Clone, Default)]
pub struct ActivityFeed {
    entries: Vec<ActivityEntry>,
    cursor: usize,
}

impl ActivityFeed {
    pub fn new(entries: Vec<ActivityEntry>) -> Self {
        Self { entries, cursor: 0 }
    }

    /// Derive ticker lines from reservations already present in the pool.
    pub fn from_records(records: &[CandidateRecord]) -> Self {
        Self::new(entries_from(records))
    }

    /// Ticker over every reserved candidate in the pool, sponsored ones included.
    pub fn from_pool<P: CandidatePool + ?Sized>(pool: &P) -> Self {
        Self::new(entries_from(&pool_records(pool)))
    }

    /// Rebuild the entries from the pool so reservations made since startup show up.
    /// The cursor stays put unless the feed shrank underneath it.
    pub fn refresh<P: CandidatePool + ?Sized>(&mut self, pool: &P) {
        self.entries = entries_from(&pool_records(pool));
        if self.cursor >= self.entries.len() {
            self.cursor = 0;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> Option<&ActivityEntry> {
        self.entries.get(self.cursor)
    }

    /// Move to the next entry, wrapping at the end.
    pub fn advance(&mut self) -> Option<&ActivityEntry> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.entries.len();
        self.current()
    }
}

fn entries_from(records: &[CandidateRecord]) -> Vec<ActivityEntry> {
    records
        .iter()
        .filter(|record| record.is_reserved())
        .enumerate()
        .map(|(index, record)| {
            let verb = match record.kind {
                CandidateKind::Current => "reserved",
                CandidateKind::Prospective => "sponsored",
            };
            ActivityEntry {
                headline: format!(
                    "An employer {verb} a {} candidate from {}",
                    record.program.label(),
                    record.location
                ),
                minutes_ago: u32::try_from(index)
                    .unwrap_or(u32::MAX)
                    .saturating_mul(7)
                    .saturating_add(2),
            }
        })
        .collect()
}

fn pool_records<P: CandidatePool + ?Sized>(pool: &P) -> Vec<CandidateRecord> {
    let mut records = pool.list_current();
    records.extend(pool.list_prospective());
    records
}
