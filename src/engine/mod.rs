mod assemble;
mod classify;
mod error;
mod periods;
mod scheduler;
mod timeline;
mod validation;

pub use assemble::assemble;
pub use classify::classify;
pub use error::PlanError;
pub use periods::break_periods;
pub use scheduler::{objective, schedule};
pub use timeline::{build_timeline, resolve_timeframe};

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::model::*;

use validation::{check_prebooked_fits, validate_budget, validate_set_sizes, validate_weight};

/// Default adjacency weight, the "balanced" style.
pub const DEFAULT_ADJACENCY_WEIGHT: f64 = 1.0;

/// Everything one optimization call needs. Callers own these sets; the
/// engine keeps nothing between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Public holidays and any other non-working days.
    pub holidays: BTreeSet<NaiveDate>,
    pub blocked: BTreeSet<NaiveDate>,
    pub prebooked: BTreeSet<NaiveDate>,
    pub leave_budget: i64,
    pub adjacency_weight: f64,
    /// Drop untouched Saturday+Sunday runs from `break_periods`.
    pub skip_free_weekends: bool,
}

impl OptimizeRequest {
    pub fn new(start: NaiveDate, end: NaiveDate, leave_budget: i64) -> Self {
        Self {
            start,
            end,
            holidays: BTreeSet::new(),
            blocked: BTreeSet::new(),
            prebooked: BTreeSet::new(),
            leave_budget,
            adjacency_weight: DEFAULT_ADJACENCY_WEIGHT,
            skip_free_weekends: false,
        }
    }

    pub fn for_timeframe(tf: Timeframe, leave_budget: i64) -> Result<Self, PlanError> {
        let (start, end) = resolve_timeframe(tf)?;
        Ok(Self::new(start, end, leave_budget))
    }

    pub fn with_holidays(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.holidays.extend(dates);
        self
    }

    pub fn with_blocked(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.blocked.extend(dates);
        self
    }

    pub fn with_prebooked(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.prebooked.extend(dates);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.adjacency_weight = weight;
        self
    }

    pub fn with_style(self, style: VacationStyle) -> Self {
        self.with_weight(style.adjacency_weight())
    }

    pub fn skip_free_weekends(mut self, skip: bool) -> Self {
        self.skip_free_weekends = skip;
        self
    }
}

/// Compute the optimal leave plan.
///
/// Validation runs first and any failure aborts with no partial result.
/// Pure and synchronous: safe to call from any number of threads at once.
pub fn optimize(req: &OptimizeRequest) -> Result<LeavePlan, PlanError> {
    let budget = validate_budget(req.leave_budget)?;
    validate_weight(req.adjacency_weight)?;
    validate_set_sizes(&[&req.holidays, &req.blocked, &req.prebooked])?;

    let timeline = build_timeline(req.start, req.end)?;
    let days = classify(&timeline, &req.holidays, &req.blocked, &req.prebooked)?;

    // Pre-booked dates outside the window cost nothing here.
    let prebooked = days.iter().filter(|d| d.forced_leave()).count();
    if prebooked < req.prebooked.len() {
        tracing::debug!(
            "ignoring {} pre-booked dates outside {}..={}",
            req.prebooked.len() - prebooked,
            req.start,
            req.end
        );
    }
    check_prebooked_fits(prebooked, budget)?;

    let assignment = schedule(&days, (budget as usize) - prebooked, req.adjacency_weight);
    let periods = break_periods(&assignment, req.skip_free_weekends);

    let params = PlanParams {
        start: req.start,
        end: req.end,
        leave_budget: budget,
        adjacency_weight: req.adjacency_weight,
        skip_free_weekends: req.skip_free_weekends,
    };
    Ok(assemble(&assignment, periods, params))
}
