use serde::{Deserialize, Serialize};

/// Raised when a hiring need of zero reaches the calculator. Input widgets should
/// prevent this, so callers treat it as a programming error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("needed candidates must be positive")]
pub struct InvalidInputError;

/// Hiring need paired with the current supply it is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub needed_candidates: u32,
    pub available_active_count: u32,
}

impl AllocationRequest {
    pub fn new(needed_candidates: u32, available_active_count: u32) -> Result<Self, InvalidInputError> {
        if needed_candidates == 0 {
            return Err(InvalidInputError);
        }
        Ok(Self {
            needed_candidates,
            available_active_count,
        })
    }

    /// Most current candidates this request can take.
    pub fn current_ceiling(&self) -> u32 {
        self.available_active_count.min(self.needed_candidates)
    }

    pub fn allocate(&self) -> Result<Allocation, InvalidInputError> {
        allocate(self.needed_candidates, self.available_active_count)
    }
}

/// Split of a hiring need between current and prospective candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub current_allocation: u32,
    pub prospective_allocation: u32,
    pub current_percent: u8,
    pub prospective_percent: u8,
}

impl Allocation {
    /// Re-clamp a slider position into `0..=min(available, needed)`.
    pub fn with_current(
        request: &AllocationRequest,
        desired_current: u32,
    ) -> Result<Self, InvalidInputError> {
        if request.needed_candidates == 0 {
            return Err(InvalidInputError);
        }
        let current_allocation = desired_current.min(request.current_ceiling());
        Self::from_counts(
            current_allocation,
            request.needed_candidates - current_allocation,
        )
    }

    pub(crate) fn from_counts(
        current_allocation: u32,
        prospective_allocation: u32,
    ) -> Result<Self, InvalidInputError> {
        let total = current_allocation
            .checked_add(prospective_allocation)
            .ok_or(InvalidInputError)?;
        let (current_percent, prospective_percent) = split_percentages(current_allocation, total)?;
        Ok(Self {
            current_allocation,
            prospective_allocation,
            current_percent,
            prospective_percent,
        })
    }

    pub fn total(&self) -> u32 {
        self.current_allocation + self.prospective_allocation
    }

    /// True when current supply cannot cover the need and sponsorship should be offered.
    pub fn needs_sponsorship(&self) -> bool {
        self.prospective_allocation > 0
    }
}

/// Split a hiring need, taking as many current candidates as supply allows.
pub fn allocate(
    needed_candidates: u32,
    available_active_count: u32,
) -> Result<Allocation, InvalidInputError> {
    if needed_candidates == 0 {
        return Err(InvalidInputError);
    }
    let current_allocation = available_active_count.min(needed_candidates);
    let prospective_allocation = needed_candidates - current_allocation;
    Allocation::from_counts(current_allocation, prospective_allocation)
}

/// Percent of `total` that is `current`, rounded half-up, and its complement.
pub fn split_percentages(current: u32, total: u32) -> Result<(u8, u8), InvalidInputError> {
    if total == 0 || current > total {
        return Err(InvalidInputError);
    }
    let current = u64::from(current);
    let total = u64::from(total);
    let rounded = (current * 100 + total / 2) / total;
    // current <= total bounds this to 0..=100.
    let current_percent = u8::try_from(rounded).map_err(|_| InvalidInputError)?;
    Ok((current_percent, 100 - current_percent))
}
