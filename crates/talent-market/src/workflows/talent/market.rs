use serde::Serialize;

use super::domain::{CandidateKind, Program};
use super::pool::CandidatePool;
use super::reservation::allocation::{allocate, split_percentages, Allocation};

/// Supply breakdown for one training program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramSupply {
    pub program: Program,
    pub program_label: &'static str,
    pub available_current: u32,
    pub off_market_current: u32,
    pub prospective: u32,
    pub training_weeks: u16,
}

/// Shown when a hiring need outruns current supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TalentGapAlert {
    pub needed_candidates: u32,
    pub available_current: u32,
    pub gap: u32,
    pub allocation: Allocation,
}

/// Market-analysis figures derived from the pool in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketSnapshot {
    pub programs: Vec<ProgramSupply>,
    pub total_current: u32,
    pub available_current: u32,
    pub total_prospective: u32,
    /// Share of the current pool already reserved, rounded half-up.
    pub reserved_percent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_alert: Option<TalentGapAlert>,
}

impl MarketSnapshot {
    pub fn from_pool<P>(pool: &P, needed: Option<u32>) -> Self
    where
        P: CandidatePool + ?Sized,
    {
        let mut programs: Vec<ProgramSupply> = Program::ordered()
            .into_iter()
            .map(|program| ProgramSupply {
                program,
                program_label: program.label(),
                available_current: 0,
                off_market_current: 0,
                prospective: 0,
                training_weeks: program.training_weeks(),
            })
            .collect();

        let records = pool.list_current().into_iter().chain(pool.list_prospective());
        for record in records {
            let Some(entry) = programs.iter_mut().find(|entry| entry.program == record.program)
            else {
                continue;
            };
            match record.kind {
                CandidateKind::Current if record.is_off_market() => entry.off_market_current += 1,
                CandidateKind::Current => entry.available_current += 1,
                CandidateKind::Prospective => entry.prospective += 1,
            }
        }

        let available_current: u32 = programs.iter().map(|entry| entry.available_current).sum();
        let off_market: u32 = programs.iter().map(|entry| entry.off_market_current).sum();
        let total_current = available_current + off_market;
        let total_prospective = programs.iter().map(|entry| entry.prospective).sum();

        let reserved_percent = split_percentages(off_market, total_current)
            .map(|(reserved, _)| reserved)
            .unwrap_or(0);

        let gap_alert = needed.and_then(|needed| {
            let allocation = allocate(needed, available_current).ok()?;
            allocation.needs_sponsorship().then_some(TalentGapAlert {
                needed_candidates: needed,
                available_current,
                gap: allocation.prospective_allocation,
                allocation,
            })
        });

        Self {
            programs,
            total_current,
            available_current,
            total_prospective,
            reserved_percent,
            gap_alert,
        }
    }
}
