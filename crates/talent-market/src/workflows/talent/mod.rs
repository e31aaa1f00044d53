pub mod activity;
pub mod domain;
mod generator;
pub mod market;
pub mod pool;
pub mod reservation;
pub mod roster;

pub use activity::{ActivityEntry, ActivityFeed};
pub use domain::{
    CandidateId, CandidateKind, CandidateRecord, CandidateSummary, Program, ReservationStatus,
};
pub use generator::{MockCandidateGenerator, PoolShape};
pub use market::{MarketSnapshot, ProgramSupply, TalentGapAlert};
pub use pool::{CandidateFilter, CandidatePool, CandidateSort, InMemoryCandidatePool, PoolError};
pub use roster::{RosterImportError, RosterImporter};
