use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    /// `start > end`: the timeline would be empty.
    InvalidRange { start: NaiveDate, end: NaiveDate },
    InvalidTimeframe(&'static str),
    InvalidBudget(i64),
    InvalidWeight(f64),
    /// Dates present in both the blocked and the pre-booked set.
    Conflict(Vec<NaiveDate>),
    BudgetExceeded { prebooked: usize, budget: i64 },
    LimitExceeded(&'static str),
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::InvalidRange { start, end } => {
                write!(f, "invalid range: start {start} is after end {end}")
            }
            PlanError::InvalidTimeframe(msg) => write!(f, "invalid timeframe: {msg}"),
            PlanError::InvalidBudget(b) => {
                write!(f, "invalid leave budget {b}: must not be negative")
            }
            PlanError::InvalidWeight(w) => {
                write!(f, "invalid adjacency weight {w}: must be finite and not negative")
            }
            PlanError::Conflict(dates) => {
                let list: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
                write!(f, "dates both blocked and pre-booked: {}", list.join(", "))
            }
            PlanError::BudgetExceeded { prebooked, budget } => write!(
                f,
                "{prebooked} pre-booked leave days exceed the leave budget of {budget}"
            ),
            PlanError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for PlanError {}
