use crate::model::*;

/// Package a published assignment and its periods into the response
/// contract. Pure repackaging: no scoring, no filtering.
pub fn assemble(assignment: &Assignment, break_periods: Vec<BreakPeriod>, params: PlanParams) -> LeavePlan {
    let break_days = assignment
        .days
        .iter()
        .filter(|d| d.is_break)
        .map(|d| d.date)
        .collect();
    let leave_days = assignment
        .days
        .iter()
        .filter(|d| d.is_leave)
        .map(|d| d.date)
        .collect();
    LeavePlan {
        break_days,
        leave_days,
        break_periods,
        params,
        objective: assignment.objective,
    }
}
