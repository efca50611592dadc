use chrono::NaiveDate;
use sqlparser::ast::{self, Expr, FromTable, ObjectNamePart, SetExpr, Statement, TableFactor, TableObject, Value, ValueWithSpan};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use crate::model::*;

/// Parsed command from SQL input.
#[derive(Debug, PartialEq)]
pub enum Command {
    SelectPlan {
        view: PlanView,
        query: PlanQuery,
    },
    SelectHolidays {
        country: String,
        year: Option<i32>,
    },
    InsertHolidays {
        rows: Vec<(String, NaiveDate, String)>, // (country, date, name)
    },
    DeleteHolidays {
        country: String,
        date: Option<NaiveDate>,
    },
}

/// Which slice of a plan a SELECT returns. Every view runs the same
/// optimization; they differ only in row shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanView {
    LeaveDays,
    BreakDays,
    BreakPeriods,
    Summary,
}

impl PlanView {
    pub fn from_table(name: &str) -> Option<Self> {
        match name {
            "leave_days" => Some(PlanView::LeaveDays),
            "break_days" => Some(PlanView::BreakDays),
            "break_periods" => Some(PlanView::BreakPeriods),
            "plan_summary" => Some(PlanView::Summary),
            _ => None,
        }
    }

    pub fn table_name(self) -> &'static str {
        match self {
            PlanView::LeaveDays => "leave_days",
            PlanView::BreakDays => "break_days",
            PlanView::BreakPeriods => "break_periods",
            PlanView::Summary => "plan_summary",
        }
    }
}

/// Filters of a plan SELECT, before holidays are looked up.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanQuery {
    pub timeframe: Timeframe,
    pub budget: i64,
    pub weight: Option<f64>,
    pub style: Option<VacationStyle>,
    pub country: Option<String>,
    /// Extra non-working days on top of the country's holidays.
    pub holidays: Vec<NaiveDate>,
    pub blocked: Vec<NaiveDate>,
    pub prebooked: Vec<NaiveDate>,
    pub skip_free_weekends: bool,
}

pub fn parse_sql(sql: &str) -> Result<Command, SqlError> {
    let dialect = PostgreSqlDialect {};
    let stmts = Parser::parse_sql(&dialect, sql).map_err(|e| SqlError::Parse(e.to_string()))?;
    if stmts.is_empty() {
        return Err(SqlError::Empty);
    }

    match &stmts[0] {
        Statement::Insert(insert) => parse_insert(insert),
        Statement::Delete(delete) => parse_delete(delete),
        Statement::Query(query) => parse_select(query),
        other => Err(SqlError::Unsupported(format!("{other}"))),
    }
}

fn parse_insert(insert: &ast::Insert) -> Result<Command, SqlError> {
    let table = insert_table_name(insert)?;
    if table != "holidays" {
        return Err(SqlError::UnknownTable(table));
    }

    let all_rows = extract_all_insert_rows(insert)?;
    let mut rows = Vec::with_capacity(all_rows.len());
    for (i, row) in all_rows.iter().enumerate() {
        if row.len() < 3 {
            return Err(SqlError::WrongArity("holidays row", 3, row.len()));
        }
        rows.push((
            parse_string(&row[0]).map_err(|e| SqlError::Parse(format!("row {i}: {e}")))?,
            parse_date(&row[1]).map_err(|e| SqlError::Parse(format!("row {i}: {e}")))?,
            parse_string(&row[2]).map_err(|e| SqlError::Parse(format!("row {i}: {e}")))?,
        ));
    }
    Ok(Command::InsertHolidays { rows })
}

fn parse_delete(delete: &ast::Delete) -> Result<Command, SqlError> {
    let table = delete_table_name(delete)?;
    if table != "holidays" {
        return Err(SqlError::UnknownTable(table));
    }

    let mut filters = Vec::new();
    if let Some(selection) = &delete.selection {
        collect_filters(selection, &mut filters)?;
    }
    let (mut country, mut date) = (None, None);
    for (col, value) in filters {
        match (col.as_str(), value) {
            ("country", Filter::Eq(e)) => country = Some(parse_string(&e)?),
            ("date", Filter::Eq(e)) => date = Some(parse_date(&e)?),
            (other, _) => return Err(SqlError::UnknownFilter(other.to_string())),
        }
    }

    Ok(Command::DeleteHolidays {
        country: country.ok_or(SqlError::MissingFilter("country"))?,
        date,
    })
}

fn parse_select(query: &ast::Query) -> Result<Command, SqlError> {
    let select = match query.body.as_ref() {
        SetExpr::Select(s) => s,
        _ => return Err(SqlError::Unsupported("non-SELECT query".into())),
    };

    if select.from.is_empty() {
        return Err(SqlError::Parse("SELECT without FROM".into()));
    }
    let table = table_factor_name(&select.from[0].relation)?;

    let mut filters = Vec::new();
    if let Some(selection) = &select.selection {
        collect_filters(selection, &mut filters)?;
    }

    if table == "holidays" {
        return parse_select_holidays(filters);
    }
    let view = PlanView::from_table(&table).ok_or(SqlError::UnknownTable(table))?;
    Ok(Command::SelectPlan {
        view,
        query: parse_plan_query(filters)?,
    })
}

fn parse_select_holidays(filters: Vec<(String, Filter)>) -> Result<Command, SqlError> {
    let (mut country, mut year) = (None, None);
    for (col, value) in filters {
        match (col.as_str(), value) {
            ("country", Filter::Eq(e)) => country = Some(parse_string(&e)?),
            ("year", Filter::Eq(e)) => year = Some(parse_i32(&e)?),
            (other, _) => return Err(SqlError::UnknownFilter(other.to_string())),
        }
    }
    Ok(Command::SelectHolidays {
        country: country.ok_or(SqlError::MissingFilter("country"))?,
        year,
    })
}

fn parse_plan_query(filters: Vec<(String, Filter)>) -> Result<PlanQuery, SqlError> {
    let (mut start, mut end, mut year, mut from_month) = (None, None, None, None);
    let mut budget = None;
    let mut weight = None;
    let mut style = None;
    let mut country = None;
    let mut holidays = Vec::new();
    let mut blocked = Vec::new();
    let mut prebooked = Vec::new();
    let mut skip_free_weekends = false;

    for (col, value) in filters {
        match (col.as_str(), value) {
            ("start", Filter::Eq(e)) => start = Some(parse_date(&e)?),
            ("end", Filter::Eq(e)) => end = Some(parse_date(&e)?),
            ("year", Filter::Eq(e)) => year = Some(parse_i32(&e)?),
            ("from_month", Filter::Eq(e)) => from_month = Some(parse_month(&e)?),
            ("budget", Filter::Eq(e)) => budget = Some(parse_i64(&e)?),
            ("weight", Filter::Eq(e)) => weight = Some(parse_f64(&e)?),
            ("style", Filter::Eq(e)) => {
                let name = parse_string(&e)?;
                style = Some(name.parse::<VacationStyle>().map_err(SqlError::Parse)?);
            }
            ("country", Filter::Eq(e)) => country = Some(parse_string(&e)?),
            ("skip_free_weekends", Filter::Eq(e)) => skip_free_weekends = parse_bool(&e)?,
            ("holidays", f) => holidays.extend(parse_dates(f)?),
            ("blocked", f) => blocked.extend(parse_dates(f)?),
            ("prebooked", f) => prebooked.extend(parse_dates(f)?),
            (other, _) => return Err(SqlError::UnknownFilter(other.to_string())),
        }
    }

    let timeframe = match (start, end, year, from_month) {
        (Some(start), Some(end), None, None) => Timeframe::Custom { start, end },
        (None, None, Some(year), None) => Timeframe::CalendarYear(year),
        (None, None, None, Some((year, month))) => Timeframe::TwelveMonths { year, month },
        (None, None, None, None) => return Err(SqlError::MissingFilter("start/end, year or from_month")),
        (Some(_), None, None, None) => return Err(SqlError::MissingFilter("end")),
        (None, Some(_), None, None) => return Err(SqlError::MissingFilter("start")),
        _ => return Err(SqlError::Parse("use only one of start/end, year or from_month".into())),
    };

    Ok(PlanQuery {
        timeframe,
        budget: budget.ok_or(SqlError::MissingFilter("budget"))?,
        weight,
        style,
        country,
        holidays,
        blocked,
        prebooked,
        skip_free_weekends,
    })
}

// ── Filters ───────────────────────────────────────────────────

#[derive(Debug)]
enum Filter {
    Eq(Expr),
    In(Vec<Expr>),
}

/// Flatten an AND-tree of `col = v` and `col IN (...)` predicates.
fn collect_filters(expr: &Expr, out: &mut Vec<(String, Filter)>) -> Result<(), SqlError> {
    match expr {
        Expr::BinaryOp { left, op, right } => match op {
            ast::BinaryOperator::And => {
                collect_filters(left, out)?;
                collect_filters(right, out)?;
            }
            ast::BinaryOperator::Eq => {
                let col = expr_column_name(left)
                    .ok_or_else(|| SqlError::Parse(format!("expected column, got {left}")))?;
                out.push((col, Filter::Eq(right.as_ref().clone())));
            }
            other => return Err(SqlError::Unsupported(format!("operator {other}"))),
        },
        Expr::InList { expr, list, negated: false } => {
            let col = expr_column_name(expr)
                .ok_or_else(|| SqlError::Parse(format!("expected column, got {expr}")))?;
            out.push((col, Filter::In(list.clone())));
        }
        Expr::Nested(inner) => collect_filters(inner, out)?,
        other => return Err(SqlError::Unsupported(format!("predicate {other}"))),
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────

fn object_name_last(name: &ast::ObjectName) -> Option<String> {
    name.0.last().and_then(|part| match part {
        ObjectNamePart::Identifier(ident) => Some(ident.value.to_lowercase()),
        _ => None,
    })
}

fn insert_table_name(insert: &ast::Insert) -> Result<String, SqlError> {
    match &insert.table {
        TableObject::TableName(name) => {
            object_name_last(name).ok_or_else(|| SqlError::Parse("empty table name".into()))
        }
        _ => Err(SqlError::Parse("unsupported table object in INSERT".into())),
    }
}

fn delete_table_name(delete: &ast::Delete) -> Result<String, SqlError> {
    let tables_with_joins = match &delete.from {
        FromTable::WithFromKeyword(t) | FromTable::WithoutKeyword(t) => t,
    };
    if let Some(first) = tables_with_joins.first() {
        table_factor_name(&first.relation)
    } else {
        Err(SqlError::Parse("DELETE without table".into()))
    }
}

fn table_factor_name(tf: &TableFactor) -> Result<String, SqlError> {
    match tf {
        TableFactor::Table { name, .. } => {
            object_name_last(name).ok_or_else(|| SqlError::Parse("empty table name".into()))
        }
        _ => Err(SqlError::Parse("complex table expression".into())),
    }
}

fn extract_all_insert_rows(insert: &ast::Insert) -> Result<Vec<Vec<Expr>>, SqlError> {
    let body = insert
        .source
        .as_ref()
        .ok_or(SqlError::Parse("no VALUES".into()))?;
    match body.body.as_ref() {
        SetExpr::Values(values) => {
            if values.rows.is_empty() {
                return Err(SqlError::Parse("empty VALUES".into()));
            }
            Ok(values.rows.clone())
        }
        _ => Err(SqlError::Parse("expected VALUES".into())),
    }
}

fn expr_column_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Identifier(ident) => Some(ident.value.to_lowercase()),
        Expr::CompoundIdentifier(parts) => parts.last().map(|i| i.value.to_lowercase()),
        _ => None,
    }
}

fn extract_value(expr: &Expr) -> Option<&Value> {
    match expr {
        Expr::Value(ValueWithSpan { value, .. }) => Some(value),
        _ => None,
    }
}

fn parse_string(expr: &Expr) -> Result<String, SqlError> {
    match extract_value(expr) {
        Some(Value::SingleQuotedString(s)) => Ok(s.clone()),
        Some(value) => Err(SqlError::Parse(format!("expected string, got {value}"))),
        None => Err(SqlError::Parse(format!("expected value, got {expr}"))),
    }
}

fn parse_date(expr: &Expr) -> Result<NaiveDate, SqlError> {
    let s = parse_string(expr)?;
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| SqlError::Parse(format!("bad date {s:?}: {e}")))
}

fn parse_dates(filter: Filter) -> Result<Vec<NaiveDate>, SqlError> {
    match filter {
        Filter::Eq(e) => Ok(vec![parse_date(&e)?]),
        Filter::In(list) => list.iter().map(parse_date).collect(),
    }
}

/// `'YYYY-MM'` as `(year, month)`.
fn parse_month(expr: &Expr) -> Result<(i32, u32), SqlError> {
    let s = parse_string(expr)?;
    let bad = || SqlError::Parse(format!("bad month {s:?}, expected YYYY-MM"));
    let (y, m) = s.trim().split_once('-').ok_or_else(bad)?;
    Ok((y.parse().map_err(|_| bad())?, m.parse().map_err(|_| bad())?))
}

fn parse_i64(expr: &Expr) -> Result<i64, SqlError> {
    if let Some(value) = extract_value(expr) {
        match value {
            Value::Number(s, _) => s
                .parse()
                .map_err(|e| SqlError::Parse(format!("bad integer: {e}"))),
            Value::SingleQuotedString(s) => s
                .trim()
                .parse()
                .map_err(|e| SqlError::Parse(format!("bad integer: {e}"))),
            _ => Err(SqlError::Parse(format!("expected number, got {value}"))),
        }
    } else if let Expr::UnaryOp {
        op: ast::UnaryOperator::Minus,
        expr,
    } = expr
    {
        Ok(-parse_i64(expr)?)
    } else {
        Err(SqlError::Parse(format!("expected value, got {expr}")))
    }
}

fn parse_i32(expr: &Expr) -> Result<i32, SqlError> {
    let v = parse_i64(expr)?;
    i32::try_from(v).map_err(|_| SqlError::Parse(format!("{v} out of range")))
}

fn parse_f64(expr: &Expr) -> Result<f64, SqlError> {
    if let Some(value) = extract_value(expr) {
        match value {
            Value::Number(s, _) | Value::SingleQuotedString(s) => s
                .trim()
                .parse()
                .map_err(|e| SqlError::Parse(format!("bad number: {e}"))),
            _ => Err(SqlError::Parse(format!("expected number, got {value}"))),
        }
    } else if let Expr::UnaryOp {
        op: ast::UnaryOperator::Minus,
        expr,
    } = expr
    {
        Ok(-parse_f64(expr)?)
    } else {
        Err(SqlError::Parse(format!("expected value, got {expr}")))
    }
}

fn parse_bool(expr: &Expr) -> Result<bool, SqlError> {
    if let Some(value) = extract_value(expr) {
        match value {
            Value::Boolean(b) => Ok(*b),
            Value::SingleQuotedString(s) => match s.to_lowercase().as_str() {
                "true" | "t" | "1" => Ok(true),
                "false" | "f" | "0" => Ok(false),
                _ => Err(SqlError::Parse(format!("bad bool: {s}"))),
            },
            Value::Number(n, _) => Ok(n != "0"),
            _ => Err(SqlError::Parse(format!("expected bool, got {value}"))),
        }
    } else {
        Err(SqlError::Parse(format!("expected value, got {expr}")))
    }
}

// ── Errors ────────────────────────────────────────────────────

#[derive(Debug)]
pub enum SqlError {
    Parse(String),
    Empty,
    Unsupported(String),
    UnknownTable(String),
    UnknownFilter(String),
    WrongArity(&'static str, usize, usize),
    MissingFilter(&'static str),
}

impl std::fmt::Display for SqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlError::Parse(s) => write!(f, "parse error: {s}"),
            SqlError::Empty => write!(f, "empty query"),
            SqlError::Unsupported(s) => write!(f, "unsupported: {s}"),
            SqlError::UnknownTable(t) => write!(f, "unknown table: {t}"),
            SqlError::UnknownFilter(c) => write!(f, "unknown filter: {c}"),
            SqlError::WrongArity(t, expected, got) => {
                write!(f, "{t}: expected {expected} values, got {got}")
            }
            SqlError::MissingFilter(col) => write!(f, "missing filter: {col}"),
        }
    }
}

impl std::error::Error for SqlError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn plan_query(sql: &str) -> (PlanView, PlanQuery) {
        match parse_sql(sql).unwrap() {
            Command::SelectPlan { view, query } => (view, query),
            other => panic!("expected SelectPlan, got {other:?}"),
        }
    }

    #[test]
    fn parse_select_leave_days_with_range() {
        let sql = r#"SELECT * FROM leave_days WHERE start = '2025-01-01' AND "end" = '2025-01-10' AND budget = 2"#;
        let (view, q) = plan_query(sql);
        assert_eq!(view, PlanView::LeaveDays);
        assert_eq!(q.timeframe, Timeframe::Custom { start: d(2025, 1, 1), end: d(2025, 1, 10) });
        assert_eq!(q.budget, 2);
        assert_eq!(q.weight, None);
        assert_eq!(q.style, None);
        assert!(!q.skip_free_weekends);
    }

    #[test]
    fn parse_every_view() {
        for (table, view) in [
            ("leave_days", PlanView::LeaveDays),
            ("break_days", PlanView::BreakDays),
            ("break_periods", PlanView::BreakPeriods),
            ("plan_summary", PlanView::Summary),
        ] {
            let (got, _) = plan_query(&format!("SELECT * FROM {table} WHERE year = 2025 AND budget = 5"));
            assert_eq!(got, view);
            assert_eq!(got.table_name(), table);
        }
    }

    #[test]
    fn parse_named_timeframes() {
        let (_, q) = plan_query("SELECT * FROM leave_days WHERE year = 2026 AND budget = 14");
        assert_eq!(q.timeframe, Timeframe::CalendarYear(2026));

        let (_, q) = plan_query("SELECT * FROM leave_days WHERE from_month = '2025-07' AND budget = 14");
        assert_eq!(q.timeframe, Timeframe::TwelveMonths { year: 2025, month: 7 });
    }

    #[test]
    fn parse_date_sets() {
        let sql = "SELECT * FROM break_periods WHERE year = 2025 AND budget = 10 \
                   AND holidays IN ('2025-03-03') \
                   AND blocked IN ('2025-04-01', '2025-04-02') \
                   AND prebooked = '2025-06-02'";
        let (_, q) = plan_query(sql);
        assert_eq!(q.holidays, vec![d(2025, 3, 3)]);
        assert_eq!(q.blocked, vec![d(2025, 4, 1), d(2025, 4, 2)]);
        assert_eq!(q.prebooked, vec![d(2025, 6, 2)]);
    }

    #[test]
    fn parse_weight_style_country_and_flag() {
        let sql = "SELECT * FROM plan_summary WHERE year = 2025 AND budget = 10 \
                   AND weight = 2.5 AND country = 'SG' AND skip_free_weekends = true";
        let (_, q) = plan_query(sql);
        assert_eq!(q.weight, Some(2.5));
        assert_eq!(q.country.as_deref(), Some("SG"));
        assert!(q.skip_free_weekends);

        let (_, q) = plan_query("SELECT * FROM leave_days WHERE year = 2025 AND budget = 10 AND style = 'long weekends'");
        assert_eq!(q.style, Some(VacationStyle::LongWeekends));
    }

    #[test]
    fn negative_budget_passes_through() {
        // Rejected by the optimizer, not the parser.
        let (_, q) = plan_query("SELECT * FROM leave_days WHERE year = 2025 AND budget = -1");
        assert_eq!(q.budget, -1);
    }

    #[test]
    fn plan_without_budget_errors() {
        let err = parse_sql("SELECT * FROM leave_days WHERE year = 2025").unwrap_err();
        assert!(matches!(err, SqlError::MissingFilter("budget")));
    }

    #[test]
    fn plan_window_errors() {
        assert!(matches!(
            parse_sql("SELECT * FROM leave_days WHERE budget = 1"),
            Err(SqlError::MissingFilter(_))
        ));
        assert!(matches!(
            parse_sql("SELECT * FROM leave_days WHERE start = '2025-01-01' AND budget = 1"),
            Err(SqlError::MissingFilter("end"))
        ));
        assert!(matches!(
            parse_sql("SELECT * FROM leave_days WHERE year = 2025 AND from_month = '2025-03' AND budget = 1"),
            Err(SqlError::Parse(_))
        ));
        assert!(matches!(
            parse_sql("SELECT * FROM leave_days WHERE from_month = 'March' AND budget = 1"),
            Err(SqlError::Parse(_))
        ));
    }

    #[test]
    fn weight_and_style_both_kept() {
        // The handler applies the explicit weight last.
        let sql = "SELECT * FROM leave_days WHERE year = 2025 AND budget = 1 AND weight = 1 AND style = 'extended'";
        let (_, q) = plan_query(sql);
        assert_eq!(q.weight, Some(1.0));
        assert_eq!(q.style, Some(VacationStyle::Extended));
    }

    #[test]
    fn unknown_style_errors() {
        let sql = "SELECT * FROM leave_days WHERE year = 2025 AND budget = 1 AND style = 'sabbatical'";
        assert!(matches!(parse_sql(sql), Err(SqlError::Parse(_))));
    }

    #[test]
    fn bad_date_errors() {
        let sql = r#"SELECT * FROM leave_days WHERE start = '2025-02-30' AND "end" = '2025-03-01' AND budget = 1"#;
        assert!(matches!(parse_sql(sql), Err(SqlError::Parse(_))));
    }

    #[test]
    fn unknown_filter_errors() {
        let sql = "SELECT * FROM leave_days WHERE year = 2025 AND budget = 1 AND colour = 'red'";
        assert!(matches!(parse_sql(sql), Err(SqlError::UnknownFilter(c)) if c == "colour"));
    }

    #[test]
    fn unsupported_operator_errors() {
        let sql = "SELECT * FROM leave_days WHERE year = 2025 AND budget > 1";
        assert!(matches!(parse_sql(sql), Err(SqlError::Unsupported(_))));
    }

    #[test]
    fn parse_select_holidays() {
        let cmd = parse_sql("SELECT * FROM holidays WHERE country = 'SG' AND year = 2025").unwrap();
        assert_eq!(cmd, Command::SelectHolidays { country: "SG".into(), year: Some(2025) });

        let cmd = parse_sql("SELECT * FROM holidays WHERE country = 'SG'").unwrap();
        assert_eq!(cmd, Command::SelectHolidays { country: "SG".into(), year: None });

        assert!(matches!(
            parse_sql("SELECT * FROM holidays"),
            Err(SqlError::MissingFilter("country"))
        ));
    }

    #[test]
    fn parse_insert_holidays() {
        let sql = "INSERT INTO holidays (country, date, name) VALUES \
                   ('SG', '2025-01-01', 'New Year''s Day'), ('SG', '2025-08-09', 'National Day')";
        match parse_sql(sql).unwrap() {
            Command::InsertHolidays { rows } => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0], ("SG".into(), d(2025, 1, 1), "New Year's Day".into()));
                assert_eq!(rows[1].1, d(2025, 8, 9));
            }
            other => panic!("expected InsertHolidays, got {other:?}"),
        }
    }

    #[test]
    fn parse_insert_holidays_short_row_errors() {
        let sql = "INSERT INTO holidays (country, date) VALUES ('SG', '2025-01-01')";
        assert!(matches!(parse_sql(sql), Err(SqlError::WrongArity(_, 3, 2))));
    }

    #[test]
    fn parse_delete_holidays() {
        let cmd = parse_sql("DELETE FROM holidays WHERE country = 'SG'").unwrap();
        assert_eq!(cmd, Command::DeleteHolidays { country: "SG".into(), date: None });

        let cmd = parse_sql("DELETE FROM holidays WHERE country = 'SG' AND date = '2025-08-09'").unwrap();
        assert_eq!(cmd, Command::DeleteHolidays { country: "SG".into(), date: Some(d(2025, 8, 9)) });

        assert!(matches!(
            parse_sql("DELETE FROM holidays"),
            Err(SqlError::MissingFilter("country"))
        ));
    }

    #[test]
    fn parse_unknown_table_errors() {
        assert!(matches!(
            parse_sql("SELECT * FROM bookings WHERE year = 2025"),
            Err(SqlError::UnknownTable(_))
        ));
        assert!(matches!(
            parse_sql("INSERT INTO foobar (id) VALUES ('x')"),
            Err(SqlError::UnknownTable(_))
        ));
    }

    #[test]
    fn parse_empty_errors() {
        assert!(matches!(parse_sql(""), Err(SqlError::Empty)));
    }
}
