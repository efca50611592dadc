use chrono::NaiveDate;

use crate::limits::*;
use crate::model::Timeframe;

use super::PlanError;

/// Every calendar date in `[start, end]`, in order.
pub fn build_timeline(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, PlanError> {
    if start > end {
        return Err(PlanError::InvalidRange { start, end });
    }
    let len = (end - start).num_days() + 1;
    if len > MAX_HORIZON_DAYS {
        return Err(PlanError::LimitExceeded("date range too long"));
    }
    Ok(start.iter_days().take(len as usize).collect())
}

/// Resolve a named timeframe into an inclusive `(start, end)` pair.
pub fn resolve_timeframe(tf: Timeframe) -> Result<(NaiveDate, NaiveDate), PlanError> {
    match tf {
        Timeframe::Custom { start, end } => Ok((start, end)),
        Timeframe::CalendarYear(year) => {
            check_year(year)?;
            Ok((ymd(year, 1, 1)?, ymd(year, 12, 31)?))
        }
        Timeframe::TwelveMonths { year, month } => {
            check_year(year)?;
            if !(1..=12).contains(&month) {
                return Err(PlanError::InvalidTimeframe("month must be 1-12"));
            }
            let start = ymd(year, month, 1)?;
            let end_year = year + ((month + 10) / 12) as i32;
            let end_month = (month + 10) % 12 + 1;
            Ok((start, last_day_of_month(end_year, end_month)?))
        }
    }
}

fn check_year(year: i32) -> Result<(), PlanError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(PlanError::InvalidTimeframe("year out of supported range"));
    }
    Ok(())
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, PlanError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(PlanError::InvalidTimeframe("no such date"))
}

fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate, PlanError> {
    let first_of_next = if month == 12 {
        ymd(year + 1, 1, 1)?
    } else {
        ymd(year, month + 1, 1)?
    };
    first_of_next
        .pred_opt()
        .ok_or(PlanError::InvalidTimeframe("no such date"))
}
