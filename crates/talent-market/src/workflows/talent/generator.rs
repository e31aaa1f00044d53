use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::domain::{CandidateId, CandidateKind, CandidateRecord, Program, ReservationStatus};

const FIRST_NAMES: &[&str] = &[
    "Avery", "Jordan", "Morgan", "Riley", "Casey", "Taylor", "Quinn", "Reese", "Skyler", "Dakota",
    "Harper", "Rowan", "Emerson", "Finley", "Sawyer", "Kendall",
];

const LAST_NAMES: &[&str] = &[
    "Nguyen", "Patel", "Garcia", "Okafor", "Lindqvist", "Moreno", "Chen", "Haddad", "Kowalski",
    "Brooks", "Ramirez", "Sato", "Fischer", "Mensah",
];

const LOCATIONS: &[&str] = &[
    "Des Moines, IA",
    "Cedar Rapids, IA",
    "Omaha, NE",
    "Minneapolis, MN",
    "Kansas City, MO",
    "Chicago, IL",
    "Remote",
];

/// Sizes and seed for a generated marketplace session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolShape {
    pub current: usize,
    /// How many current candidates start the session already reserved (off-market).
    pub current_off_market: usize,
    pub prospective: usize,
    pub seed: u64,
}

impl Default for PoolShape {
    fn default() -> Self {
        Self {
            current: 40,
            current_off_market: 37,
            prospective: 20,
            seed: 2024,
        }
    }
}

/// Seeded generator for the mock candidate pool.
pub struct MockCandidateGenerator {
    shape: PoolShape,
    rng: StdRng,
}

impl MockCandidateGenerator {
    pub fn new(shape: PoolShape) -> Self {
        Self {
            rng: StdRng::seed_from_u64(shape.seed),
            shape,
        }
    }

    /// Generate the full session roster. Identical shapes yield identical rosters.
    pub fn generate(mut self, today: NaiveDate) -> Vec<CandidateRecord> {
        let shape = self.shape;
        let off_market = shape.current_off_market.min(shape.current);
        let mut records = Vec::with_capacity(shape.current + shape.prospective);

        for index in 0..shape.current {
            let status = if index < off_market {
                ReservationStatus::Reserved
            } else {
                ReservationStatus::Available
            };
            records.push(self.candidate(index, CandidateKind::Current, status, today));
        }

        for index in 0..shape.prospective {
            records.push(self.candidate(
                index,
                CandidateKind::Prospective,
                ReservationStatus::Available,
                today,
            ));
        }

        records
    }

    fn candidate(
        &mut self,
        index: usize,
        kind: CandidateKind,
        status: ReservationStatus,
        today: NaiveDate,
    ) -> CandidateRecord {
        let programs = Program::ordered();
        let program = programs[index % programs.len()];
        let job_role = program
            .job_roles()
            .choose(&mut self.rng)
            .copied()
            .unwrap_or("Associate");

        let mut skills: Vec<String> = program
            .core_skills()
            .choose_multiple(&mut self.rng, 3)
            .map(|skill| skill.to_string())
            .collect();
        skills.sort();

        let first = FIRST_NAMES.choose(&mut self.rng).copied().unwrap_or("Alex");
        let last = LAST_NAMES.choose(&mut self.rng).copied().unwrap_or("Smith");
        let location = LOCATIONS.choose(&mut self.rng).copied().unwrap_or("Remote");

        let (prefix, available_date, experience_years) = match kind {
            CandidateKind::Current => (
                "cur",
                today + Duration::days(self.rng.gen_range(0..=21)),
                self.rng.gen_range(0..=4),
            ),
            // Prospective candidates become hire-ready after their sponsored track.
            CandidateKind::Prospective => (
                "pro",
                today + Duration::weeks(i64::from(program.training_weeks())),
                self.rng.gen_range(0..=2),
            ),
        };

        CandidateRecord {
            id: CandidateId(format!("{prefix}-{:03}", index + 1)),
            name: format!("{first} {last}"),
            kind,
            status,
            program,
            job_role: job_role.to_string(),
            location: location.to_string(),
            headline: format!("{} graduate targeting {}", program.label(), job_role),
            skills,
            available_date,
            experience_years,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::talent::pool::{CandidatePool, InMemoryCandidatePool};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    #[test]
    fn default_shape_leaves_three_current_candidates_available() {
        let records = MockCandidateGenerator::new(PoolShape::default()).generate(today());
        let pool = InMemoryCandidatePool::new(records);

        assert_eq!(pool.list_current().len(), 40);
        let off_market = pool
            .list_current()
            .iter()
            .filter(|record| record.is_off_market())
            .count();
        assert_eq!(off_market, 37);
        assert_eq!(pool.available_active_count(), 3);
        assert_eq!(pool.list_prospective().len(), 20);
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let first = MockCandidateGenerator::new(PoolShape::default()).generate(today());
        let second = MockCandidateGenerator::new(PoolShape::default()).generate(today());
        assert_eq!(first, second);
    }

    #[test]
    fn ids_are_unique_and_skills_drawn_from_program() {
        let records = MockCandidateGenerator::new(PoolShape::default()).generate(today());
        let mut ids: Vec<_> = records.iter().map(|record| record.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), records.len());

        for record in &records {
            assert_eq!(record.skills.len(), 3);
            assert!(record
                .skills
                .iter()
                .all(|skill| record.program.core_skills().contains(&skill.as_str())));
        }
    }

    #[test]
    fn off_market_count_is_capped_by_pool_size() {
        let shape = PoolShape {
            current: 2,
            current_off_market: 9,
            prospective: 0,
            seed: 7,
        };
        let records = MockCandidateGenerator::new(shape).generate(today());
        assert!(records.iter().all(|record| record.is_off_market()));
    }
}
