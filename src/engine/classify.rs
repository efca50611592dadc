use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::*;

use super::PlanError;

pub(crate) fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Every date that is both blocked and pre-booked, sorted. All of them are
/// reported, not just the first.
pub(crate) fn check_no_conflict(
    blocked: &BTreeSet<NaiveDate>,
    prebooked: &BTreeSet<NaiveDate>,
) -> Result<(), PlanError> {
    let conflicts: Vec<NaiveDate> = blocked.intersection(prebooked).copied().collect();
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(PlanError::Conflict(conflicts))
    }
}

/// Label each timeline date with its forced status.
///
/// Precedence: conflict check, then weekend/holiday, then blocked, then
/// pre-booked, else workday. A pre-booked weekend or holiday keeps its
/// break category and only sets `prebooked`.
pub fn classify(
    timeline: &[NaiveDate],
    holidays: &BTreeSet<NaiveDate>,
    blocked: &BTreeSet<NaiveDate>,
    prebooked: &BTreeSet<NaiveDate>,
) -> Result<Vec<Day>, PlanError> {
    check_no_conflict(blocked, prebooked)?;

    let days = timeline
        .iter()
        .enumerate()
        .map(|(index, &date)| {
            let is_prebooked = prebooked.contains(&date);
            let category = if holidays.contains(&date) {
                DayCategory::Holiday
            } else if is_weekend(date) {
                DayCategory::Weekend
            } else if blocked.contains(&date) {
                DayCategory::Blocked
            } else if is_prebooked {
                DayCategory::Prebooked
            } else {
                DayCategory::Workday
            };
            Day {
                date,
                index,
                category,
                prebooked: is_prebooked,
            }
        })
        .collect();
    Ok(days)
}
