use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::limits::*;

use super::PlanError;

/// Budget must be a non-negative integer that fits the plan's `u32` echo.
pub(crate) fn validate_budget(budget: i64) -> Result<u32, PlanError> {
    if budget < 0 {
        return Err(PlanError::InvalidBudget(budget));
    }
    u32::try_from(budget).map_err(|_| PlanError::LimitExceeded("leave budget too large"))
}

pub(crate) fn validate_weight(weight: f64) -> Result<(), PlanError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(PlanError::InvalidWeight(weight));
    }
    Ok(())
}

pub(crate) fn validate_set_sizes(sets: &[&BTreeSet<NaiveDate>]) -> Result<(), PlanError> {
    if sets.iter().any(|s| s.len() > MAX_DATES_PER_SET) {
        return Err(PlanError::LimitExceeded("too many dates in one set"));
    }
    Ok(())
}

/// Pre-booked leave is forced, so it has to fit inside the budget.
pub(crate) fn check_prebooked_fits(prebooked: usize, budget: u32) -> Result<(), PlanError> {
    if prebooked > budget as usize {
        return Err(PlanError::BudgetExceeded {
            prebooked,
            budget: budget as i64,
        });
    }
    Ok(())
}
