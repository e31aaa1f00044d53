use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for candidate records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which side of the marketplace a candidate sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    /// Graduates who can be hired immediately; a finite supply.
    Current,
    /// Sponsorship-track learners; not depleted by reservations.
    Prospective,
}

impl CandidateKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::Prospective => "Prospective",
        }
    }
}

/// The one canonical reservation flag carried by each candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Available,
    Reserved,
}

/// Training programs offered to candidates, with the roles they feed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Program {
    SoftwareEngineering,
    DataAnalytics,
    Cybersecurity,
    CloudOperations,
    UxDesign,
}

impl Program {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::SoftwareEngineering,
            Self::DataAnalytics,
            Self::Cybersecurity,
            Self::CloudOperations,
            Self::UxDesign,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SoftwareEngineering => "Software Engineering",
            Self::DataAnalytics => "Data Analytics",
            Self::Cybersecurity => "Cybersecurity",
            Self::CloudOperations => "Cloud Operations",
            Self::UxDesign => "UX Design",
        }
    }

    pub const fn job_roles(self) -> &'static [&'static str] {
        match self {
            Self::SoftwareEngineering => &[
                "Junior Software Engineer",
                "Full-Stack Developer",
                "QA Automation Engineer",
            ],
            Self::DataAnalytics => &["Data Analyst", "Business Intelligence Analyst"],
            Self::Cybersecurity => &["SOC Analyst", "Security Operations Technician"],
            Self::CloudOperations => &["Cloud Support Associate", "DevOps Technician"],
            Self::UxDesign => &["UX Designer", "UI Designer"],
        }
    }

    pub const fn core_skills(self) -> &'static [&'static str] {
        match self {
            Self::SoftwareEngineering => &["JavaScript", "React", "Node.js", "SQL", "Git"],
            Self::DataAnalytics => &["SQL", "Python", "Tableau", "Excel", "Statistics"],
            Self::Cybersecurity => &["Network Security", "SIEM", "Linux", "Incident Response"],
            Self::CloudOperations => &["AWS", "Linux", "Terraform", "Docker", "Networking"],
            Self::UxDesign => &["Figma", "User Research", "Prototyping", "Accessibility"],
        }
    }

    /// Length of the sponsored training track, in weeks.
    pub const fn training_weeks(self) -> u16 {
        match self {
            Self::SoftwareEngineering => 16,
            Self::DataAnalytics => 12,
            Self::Cybersecurity => 14,
            Self::CloudOperations => 12,
            Self::UxDesign => 10,
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        Self::ordered().into_iter().find(|program| {
            program.label().to_ascii_lowercase() == normalized
                || format!("{program:?}").to_ascii_lowercase() == normalized.replace(' ', "")
        })
    }
}

/// A single marketplace candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: CandidateId,
    pub name: String,
    pub kind: CandidateKind,
    pub status: ReservationStatus,
    pub program: Program,
    pub job_role: String,
    pub location: String,
    pub skills: Vec<String>,
    pub available_date: NaiveDate,
    pub experience_years: u8,
    pub headline: String,
}

impl CandidateRecord {
    pub fn is_prospective(&self) -> bool {
        self.kind == CandidateKind::Prospective
    }

    pub fn is_reserved(&self) -> bool {
        self.status == ReservationStatus::Reserved
    }

    /// Current candidates leave the browsable set once reserved. Prospective
    /// supply is never depleted, so they never go off-market.
    pub fn is_off_market(&self) -> bool {
        self.kind == CandidateKind::Current && self.is_reserved()
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills
            .iter()
            .any(|candidate_skill| candidate_skill.eq_ignore_ascii_case(skill.trim()))
    }

    pub fn summary(&self) -> CandidateSummary {
        CandidateSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            program_label: self.program.label(),
            job_role: self.job_role.clone(),
            location: self.location.clone(),
            available_date: self.available_date,
            off_market: self.is_off_market(),
            reserved: self.is_reserved(),
        }
    }
}

/// Compact projection of a candidate for listings and confirmations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSummary {
    pub id: CandidateId,
    pub name: String,
    pub kind: CandidateKind,
    pub program_label: &'static str,
    pub job_role: String,
    pub location: String,
    pub available_date: NaiveDate,
    pub off_market: bool,
    pub reserved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: CandidateKind, status: ReservationStatus) -> CandidateRecord {
        CandidateRecord {
            id: CandidateId("cur-001".to_string()),
            name: "Jordan Ellis".to_string(),
            kind,
            status,
            program: Program::DataAnalytics,
            job_role: "Data Analyst".to_string(),
            location: "Des Moines, IA".to_string(),
            skills: vec!["SQL".to_string(), "Python".to_string()],
            available_date: NaiveDate::from_ymd_opt(2026, 11, 2).expect("valid date"),
            experience_years: 1,
            headline: "Analyst".to_string(),
        }
    }

    #[test]
    fn off_market_is_derived_from_kind_and_status() {
        assert!(record(CandidateKind::Current, ReservationStatus::Reserved).is_off_market());
        assert!(!record(CandidateKind::Current, ReservationStatus::Available).is_off_market());

        let prospective = record(CandidateKind::Prospective, ReservationStatus::Reserved);
        assert!(prospective.is_reserved());
        assert!(!prospective.is_off_market());
    }

    #[test]
    fn program_lookup_accepts_labels_and_variant_names() {
        assert_eq!(Program::from_label("UX Design"), Some(Program::UxDesign));
        assert_eq!(
            Program::from_label("software_engineering"),
            Some(Program::SoftwareEngineering)
        );
        assert_eq!(Program::from_label("cloud-operations"), Some(Program::CloudOperations));
        assert_eq!(Program::from_label("astronomy"), None);
    }

    #[test]
    fn skill_match_ignores_case() {
        let candidate = record(CandidateKind::Current, ReservationStatus::Available);
        assert!(candidate.has_skill("sql"));
        assert!(!candidate.has_skill("Rust"));
    }
}
