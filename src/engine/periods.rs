use crate::model::*;

/// Fold a finalized assignment into maximal runs of break days.
///
/// With `skip_free_weekends`, two-day Saturday+Sunday runs that used no
/// leave are dropped from the report. The assignment itself is untouched.
pub fn break_periods(assignment: &Assignment, skip_free_weekends: bool) -> Vec<BreakPeriod> {
    let mut periods: Vec<BreakPeriod> = Vec::new();
    let mut open: Option<BreakPeriod> = None;

    for day in &assignment.days {
        if !day.is_break {
            if let Some(done) = open.take() {
                periods.push(done);
            }
            continue;
        }
        match open.as_mut() {
            Some(run) => {
                run.end = day.date;
                run.total_days += 1;
                run.pto_used += day.is_leave as u32;
            }
            None => {
                open = Some(BreakPeriod {
                    start: day.date,
                    end: day.date,
                    total_days: 1,
                    pto_used: day.is_leave as u32,
                });
            }
        }
    }
    if let Some(done) = open {
        periods.push(done);
    }

    if skip_free_weekends {
        periods.retain(|p| !p.is_free_weekend());
    }
    periods
}
