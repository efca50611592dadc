use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Forced status of a calendar day, decided before optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCategory {
    /// Free choice: leave may or may not be taken.
    Workday,
    /// Saturday or Sunday.
    Weekend,
    /// Public holiday (or caller-supplied off day), weekend or not.
    Holiday,
    /// Leave may not be taken.
    Blocked,
    /// Leave is already committed.
    Prebooked,
}

impl DayCategory {
    /// Weekend or holiday: a break regardless of leave.
    pub fn is_forced_break(self) -> bool {
        matches!(self, DayCategory::Weekend | DayCategory::Holiday)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayCategory::Workday => "workday",
            DayCategory::Weekend => "weekend",
            DayCategory::Holiday => "holiday",
            DayCategory::Blocked => "blocked",
            DayCategory::Prebooked => "prebooked",
        }
    }
}

impl fmt::Display for DayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified day of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    /// 0-based position in the timeline.
    pub index: usize,
    pub category: DayCategory,
    /// Set for every pre-booked date, including weekends and holidays,
    /// whose category stays `Weekend`/`Holiday`.
    pub prebooked: bool,
}

impl Day {
    /// Leave is forced on this day.
    pub fn forced_leave(&self) -> bool {
        self.prebooked
    }

    /// Break is fixed at 1 without any decision: weekend, holiday or pre-booked.
    pub fn fixed_break(&self) -> bool {
        self.category.is_forced_break() || self.prebooked
    }

    /// The only days the scheduler decides.
    pub fn is_free(&self) -> bool {
        self.category == DayCategory::Workday
    }
}

/// Decision for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAssignment {
    pub date: NaiveDate,
    pub category: DayCategory,
    pub is_leave: bool,
    pub is_break: bool,
}

/// Finalized output of the scheduler. Immutable once published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub days: Vec<DayAssignment>,
    /// `Σ break + weight × Σ adjacent break pairs` achieved by `days`.
    pub objective: f64,
}

impl Assignment {
    pub fn leave_used(&self) -> usize {
        self.days.iter().filter(|d| d.is_leave).count()
    }
}

/// Maximal run of consecutive break days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_days: u32,
    pub pto_used: u32,
}

impl BreakPeriod {
    /// A bare Saturday+Sunday the optimizer spent nothing on.
    pub fn is_free_weekend(&self) -> bool {
        self.total_days == 2
            && self.pto_used == 0
            && self.start.weekday() == Weekday::Sat
            && self.end.weekday() == Weekday::Sun
    }
}

/// Resolved parameters echoed back for traceability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanParams {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub leave_budget: u32,
    pub adjacency_weight: f64,
    pub skip_free_weekends: bool,
}

/// Response contract handed to presentation layers. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeavePlan {
    pub break_days: Vec<NaiveDate>,
    pub leave_days: Vec<NaiveDate>,
    pub break_periods: Vec<BreakPeriod>,
    pub params: PlanParams,
    pub objective: f64,
}

impl LeavePlan {
    pub fn summary(&self) -> PlanSummary {
        let leave_used = self.leave_days.len() as u32;
        PlanSummary {
            break_days: self.break_days.len() as u32,
            leave_used,
            leave_remaining: self.params.leave_budget.saturating_sub(leave_used),
            longest_break: self
                .break_periods
                .iter()
                .map(|p| p.total_days)
                .max()
                .unwrap_or(0),
            periods: self.break_periods.len() as u32,
        }
    }
}

/// Headline numbers for summary cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub break_days: u32,
    pub leave_used: u32,
    pub leave_remaining: u32,
    pub longest_break: u32,
    pub periods: u32,
}

// ── Request shorthands ───────────────────────────────────────────

/// Named ways of picking the optimization window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    CalendarYear(i32),
    /// Twelve whole months starting at `month` of `year`.
    TwelveMonths { year: i32, month: u32 },
    Custom { start: NaiveDate, end: NaiveDate },
}

/// Vacation style presets. Each maps to an adjacency weight; higher
/// weights favour fewer, longer breaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacationStyle {
    #[default]
    Balanced,
    LongWeekends,
    MiniBreaks,
    WeekLong,
    Extended,
}

impl VacationStyle {
    pub const ALL: [VacationStyle; 5] = [
        VacationStyle::Balanced,
        VacationStyle::LongWeekends,
        VacationStyle::MiniBreaks,
        VacationStyle::WeekLong,
        VacationStyle::Extended,
    ];

    pub fn adjacency_weight(self) -> f64 {
        match self {
            VacationStyle::Balanced => 1.0,
            VacationStyle::LongWeekends => 1.8,
            VacationStyle::MiniBreaks => 1.2,
            VacationStyle::WeekLong => 2.5,
            VacationStyle::Extended => 4.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VacationStyle::Balanced => "balanced",
            VacationStyle::LongWeekends => "long_weekends",
            VacationStyle::MiniBreaks => "mini_breaks",
            VacationStyle::WeekLong => "week_long",
            VacationStyle::Extended => "extended",
        }
    }
}

impl FromStr for VacationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_lowercase().replace(['-', ' '], "_");
        VacationStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == norm)
            .ok_or_else(|| format!("unknown vacation style: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn free_weekend_detection() {
        let weekend = BreakPeriod { start: d(2025, 1, 4), end: d(2025, 1, 5), total_days: 2, pto_used: 0 };
        assert!(weekend.is_free_weekend());

        let with_leave = BreakPeriod { pto_used: 1, ..weekend };
        assert!(!with_leave.is_free_weekend());

        // Sunday + Monday holiday is not a plain weekend
        let sun_mon = BreakPeriod { start: d(2025, 1, 5), end: d(2025, 1, 6), total_days: 2, pto_used: 0 };
        assert!(!sun_mon.is_free_weekend());
    }

    #[test]
    fn style_parsing_is_lenient() {
        assert_eq!("Long Weekends".parse::<VacationStyle>().unwrap(), VacationStyle::LongWeekends);
        assert_eq!("week-long".parse::<VacationStyle>().unwrap(), VacationStyle::WeekLong);
        assert!("forever".parse::<VacationStyle>().is_err());
    }

    #[test]
    fn style_weights() {
        assert_eq!(VacationStyle::default().adjacency_weight(), 1.0);
        assert_eq!(VacationStyle::Extended.adjacency_weight(), 4.0);
    }

    #[test]
    fn summary_derives_from_plan() {
        let plan = LeavePlan {
            break_days: vec![d(2025, 1, 3), d(2025, 1, 4), d(2025, 1, 5), d(2025, 1, 6)],
            leave_days: vec![d(2025, 1, 3), d(2025, 1, 6)],
            break_periods: vec![BreakPeriod { start: d(2025, 1, 3), end: d(2025, 1, 6), total_days: 4, pto_used: 2 }],
            params: PlanParams {
                start: d(2025, 1, 1),
                end: d(2025, 1, 10),
                leave_budget: 5,
                adjacency_weight: 1.0,
                skip_free_weekends: false,
            },
            objective: 7.0,
        };
        let s = plan.summary();
        assert_eq!(s.break_days, 4);
        assert_eq!(s.leave_used, 2);
        assert_eq!(s.leave_remaining, 3);
        assert_eq!(s.longest_break, 4);
        assert_eq!(s.periods, 1);
    }
}
