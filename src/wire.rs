use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::stream;
use futures::Sink;
use pgwire::api::auth::cleartext::CleartextPasswordAuthStartupHandler;
use pgwire::api::auth::{DefaultServerParameterProvider, StartupHandler};
use pgwire::api::copy::CopyHandler;
use pgwire::api::portal::{Format, Portal};
use pgwire::api::query::{ExtendedQueryHandler, SimpleQueryHandler};
use pgwire::api::results::{
    DataRowEncoder, DescribePortalResponse, DescribeStatementResponse, FieldFormat, FieldInfo,
    QueryResponse, Response, Tag,
};
use pgwire::api::stmt::{QueryParser, StoredStatement};
use pgwire::api::store::PortalStore;
use pgwire::api::{ClientInfo, ClientPortalStore, NoopHandler, PgWireServerHandlers, Type};
use pgwire::error::{ErrorInfo, PgWireError, PgWireResult};
use pgwire::messages::data::DataRow;
use pgwire::messages::PgWireBackendMessage;
use pgwire::tokio::TlsAcceptor;
use tokio::net::TcpStream;

use crate::auth::LeaveOptAuthSource;
use crate::engine::{self, OptimizeRequest, PlanError};
use crate::holidays::{Holiday, HolidayError, HolidayRegistry, HolidaySource};
use crate::model::*;
use crate::observability::{self, command_label};
use crate::sql::{self, Command, PlanQuery, PlanView};

pub struct LeaveOptHandler {
    holidays: Arc<HolidayRegistry>,
    query_parser: Arc<LeaveOptQueryParser>,
}

impl LeaveOptHandler {
    pub fn new(holidays: Arc<HolidayRegistry>) -> Self {
        Self {
            holidays,
            query_parser: Arc::new(LeaveOptQueryParser),
        }
    }

    fn run(&self, sql: &str) -> PgWireResult<Response> {
        let cmd = sql::parse_sql(sql).map_err(sql_err)?;
        let label = command_label(&cmd);
        let result = self.execute_command(cmd);
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(observability::QUERIES_TOTAL, "command" => label, "status" => status)
            .increment(1);
        result
    }

    fn execute_command(&self, cmd: Command) -> PgWireResult<Response> {
        match cmd {
            Command::SelectPlan { view, query } => {
                let prebooked = query.prebooked.clone();
                let plan = self.plan(query).map_err(|e| {
                    tracing::debug!("{} plan rejected: {e}", view.table_name());
                    plan_err(e)
                })?;
                Ok(plan_response(view, &plan, &prebooked))
            }
            Command::SelectHolidays { country, year } => {
                let found = match year {
                    Some(year) => self.holidays.holidays(&country, year),
                    None => self.holidays.country_holidays(&country),
                };
                Ok(holidays_response(country.trim().to_uppercase(), found))
            }
            Command::InsertHolidays { rows } => {
                let mut by_country: BTreeMap<String, Vec<Holiday>> = BTreeMap::new();
                for (country, date, name) in rows {
                    by_country.entry(country).or_default().push(Holiday { date, name });
                }
                let mut written = 0;
                for (country, holidays) in by_country {
                    written += self.holidays.insert(&country, holidays).map_err(holiday_err)?;
                }
                self.report_registry_size();
                Ok(Response::Execution(Tag::new("INSERT").with_rows(written)))
            }
            Command::DeleteHolidays { country, date } => {
                let removed = match date {
                    Some(date) => self.holidays.remove_date(&country, date) as usize,
                    None => self.holidays.remove_country(&country),
                };
                self.report_registry_size();
                Ok(Response::Execution(Tag::new("DELETE").with_rows(removed)))
            }
        }
    }

    /// Turn query filters into a request, folding in the country's
    /// holidays, and run the optimizer.
    fn plan(&self, query: PlanQuery) -> Result<LeavePlan, PlanError> {
        let mut req = OptimizeRequest::for_timeframe(query.timeframe, query.budget)?
            .with_holidays(query.holidays)
            .with_blocked(query.blocked)
            .with_prebooked(query.prebooked)
            .skip_free_weekends(query.skip_free_weekends);
        if let Some(country) = &query.country {
            engine::build_timeline(req.start, req.end)?;
            let official = self.holidays.holidays_between(country, req.start, req.end);
            tracing::debug!("{} holidays for {country} in window", official.len());
            req = req.with_holidays(official.into_iter().map(|h| h.date));
        }
        if let Some(style) = query.style {
            req = req.with_style(style);
        }
        if let Some(weight) = query.weight {
            req = req.with_weight(weight);
        }

        let started = Instant::now();
        let result = engine::optimize(&req);
        metrics::histogram!(observability::SOLVE_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        match &result {
            Ok(_) => {
                let horizon = (req.end - req.start).num_days() + 1;
                metrics::histogram!(observability::HORIZON_DAYS).record(horizon as f64);
                metrics::counter!(observability::PLANS_TOTAL, "status" => "ok").increment(1);
            }
            Err(_) => {
                metrics::counter!(observability::PLANS_TOTAL, "status" => "invalid").increment(1);
            }
        }
        result
    }

    fn report_registry_size(&self) {
        metrics::gauge!(observability::HOLIDAYS_LOADED).set(self.holidays.len() as f64);
    }
}

// ── Row shapes ───────────────────────────────────────────────────

fn field(name: &str, ty: Type) -> FieldInfo {
    FieldInfo::new(name.into(), None, None, ty, FieldFormat::Text)
}

fn plan_schema(view: PlanView) -> Vec<FieldInfo> {
    match view {
        PlanView::LeaveDays => vec![field("date", Type::DATE), field("category", Type::VARCHAR)],
        PlanView::BreakDays => vec![field("date", Type::DATE), field("is_leave", Type::BOOL)],
        PlanView::BreakPeriods => vec![
            field("start", Type::DATE),
            field("end", Type::DATE),
            field("total_days", Type::INT4),
            field("pto_used", Type::INT4),
        ],
        PlanView::Summary => vec![
            field("start", Type::DATE),
            field("end", Type::DATE),
            field("leave_budget", Type::INT8),
            field("adjacency_weight", Type::FLOAT8),
            field("leave_used", Type::INT8),
            field("leave_remaining", Type::INT8),
            field("break_days", Type::INT4),
            field("longest_break", Type::INT4),
            field("periods", Type::INT4),
            field("objective", Type::FLOAT8),
        ],
    }
}

fn holidays_schema() -> Vec<FieldInfo> {
    vec![
        field("country", Type::VARCHAR),
        field("date", Type::DATE),
        field("name", Type::VARCHAR),
    ]
}

fn plan_response(view: PlanView, plan: &LeavePlan, prebooked: &[chrono::NaiveDate]) -> Response {
    let schema = Arc::new(plan_schema(view));

    let rows: Vec<PgWireResult<_>> = match view {
        PlanView::LeaveDays => plan
            .leave_days
            .iter()
            .map(|date| {
                let category = if prebooked.contains(date) {
                    DayCategory::Prebooked
                } else {
                    DayCategory::Workday
                };
                let mut encoder = DataRowEncoder::new(schema.clone());
                encoder.encode_field(&date.to_string())?;
                encoder.encode_field(&category.to_string())?;
                Ok(encoder.take_row())
            })
            .collect(),
        PlanView::BreakDays => plan
            .break_days
            .iter()
            .map(|date| {
                let mut encoder = DataRowEncoder::new(schema.clone());
                encoder.encode_field(&date.to_string())?;
                encoder.encode_field(&plan.leave_days.binary_search(date).is_ok())?;
                Ok(encoder.take_row())
            })
            .collect(),
        PlanView::BreakPeriods => plan
            .break_periods
            .iter()
            .map(|p| {
                let mut encoder = DataRowEncoder::new(schema.clone());
                encoder.encode_field(&p.start.to_string())?;
                encoder.encode_field(&p.end.to_string())?;
                encoder.encode_field(&(p.total_days as i32))?;
                encoder.encode_field(&(p.pto_used as i32))?;
                Ok(encoder.take_row())
            })
            .collect(),
        PlanView::Summary => vec![summary_row(schema.clone(), plan)],
    };

    Response::Query(QueryResponse::new(schema, stream::iter(rows)))
}

fn summary_row(schema: Arc<Vec<FieldInfo>>, plan: &LeavePlan) -> PgWireResult<DataRow> {
    let summary = plan.summary();
    let mut encoder = DataRowEncoder::new(schema);
    encoder.encode_field(&plan.params.start.to_string())?;
    encoder.encode_field(&plan.params.end.to_string())?;
    encoder.encode_field(&i64::from(plan.params.leave_budget))?;
    encoder.encode_field(&plan.params.adjacency_weight)?;
    encoder.encode_field(&i64::from(summary.leave_used))?;
    encoder.encode_field(&i64::from(summary.leave_remaining))?;
    encoder.encode_field(&(summary.break_days as i32))?;
    encoder.encode_field(&(summary.longest_break as i32))?;
    encoder.encode_field(&(summary.periods as i32))?;
    encoder.encode_field(&plan.objective)?;
    Ok(encoder.take_row())
}

fn holidays_response(country: String, holidays: Vec<Holiday>) -> Response {
    let schema = Arc::new(holidays_schema());
    let rows: Vec<PgWireResult<_>> = holidays
        .into_iter()
        .map(|h| {
            let mut encoder = DataRowEncoder::new(schema.clone());
            encoder.encode_field(&country)?;
            encoder.encode_field(&h.date.to_string())?;
            encoder.encode_field(&h.name)?;
            Ok(encoder.take_row())
        })
        .collect();
    Response::Query(QueryResponse::new(schema, stream::iter(rows)))
}

/// Result columns for a statement, found from its FROM table alone so
/// that `$n` placeholders need not be bound yet.
fn describe_schema(sql: &str) -> Vec<FieldInfo> {
    let lower = sql.to_lowercase();
    let mut words = lower.split_whitespace();
    if words.next() != Some("select") {
        return vec![];
    }
    let table = words
        .skip_while(|w| *w != "from")
        .nth(1)
        .map(|t| t.trim_matches(|c: char| c == ';' || c == '"'));
    match table {
        Some("holidays") => holidays_schema(),
        Some(t) => PlanView::from_table(t).map(plan_schema).unwrap_or_default(),
        None => vec![],
    }
}

#[async_trait]
impl SimpleQueryHandler for LeaveOptHandler {
    async fn do_query<C>(
        &self,
        _client: &mut C,
        query: &str,
    ) -> PgWireResult<Vec<Response>>
    where
        C: ClientInfo + ClientPortalStore + Sink<PgWireBackendMessage> + Unpin + Send + Sync,
        C::Error: Debug,
        PgWireError: From<C::Error>,
    {
        Ok(vec![self.run(query)?])
    }
}

// ── Extended Query Protocol ──────────────────────────────────────

#[derive(Debug)]
pub struct LeaveOptQueryParser;

#[async_trait]
impl QueryParser for LeaveOptQueryParser {
    type Statement = String;

    async fn parse_sql<C>(
        &self,
        _client: &C,
        sql: &str,
        _types: &[Option<Type>],
    ) -> PgWireResult<String>
    where
        C: ClientInfo + Unpin + Send + Sync,
    {
        Ok(sql.to_string())
    }

    fn get_parameter_types(&self, stmt: &String) -> PgWireResult<Vec<Type>> {
        Ok(vec![Type::VARCHAR; count_params(stmt)])
    }

    fn get_result_schema(
        &self,
        stmt: &String,
        _column_format: Option<&Format>,
    ) -> PgWireResult<Vec<FieldInfo>> {
        Ok(describe_schema(stmt))
    }
}

#[async_trait]
impl ExtendedQueryHandler for LeaveOptHandler {
    type Statement = String;
    type QueryParser = LeaveOptQueryParser;

    fn query_parser(&self) -> Arc<Self::QueryParser> {
        self.query_parser.clone()
    }

    async fn do_query<C>(
        &self,
        _client: &mut C,
        portal: &Portal<Self::Statement>,
        _max_rows: usize,
    ) -> PgWireResult<Response>
    where
        C: ClientInfo + ClientPortalStore + Sink<PgWireBackendMessage> + Unpin + Send + Sync,
        C::PortalStore: PortalStore<Statement = Self::Statement>,
        C::Error: Debug,
        PgWireError: From<C::Error>,
    {
        let sql = substitute_params(portal);
        self.run(&sql)
    }

    async fn do_describe_statement<C>(
        &self,
        _client: &mut C,
        target: &StoredStatement<Self::Statement>,
    ) -> PgWireResult<DescribeStatementResponse>
    where
        C: ClientInfo + ClientPortalStore + Sink<PgWireBackendMessage> + Unpin + Send + Sync,
        C::PortalStore: PortalStore<Statement = Self::Statement>,
        C::Error: Debug,
        PgWireError: From<C::Error>,
    {
        let param_types = vec![Type::VARCHAR; count_params(&target.statement)];
        Ok(DescribeStatementResponse::new(
            param_types,
            describe_schema(&target.statement),
        ))
    }

    async fn do_describe_portal<C>(
        &self,
        _client: &mut C,
        target: &Portal<Self::Statement>,
    ) -> PgWireResult<DescribePortalResponse>
    where
        C: ClientInfo + ClientPortalStore + Sink<PgWireBackendMessage> + Unpin + Send + Sync,
        C::PortalStore: PortalStore<Statement = Self::Statement>,
        C::Error: Debug,
        PgWireError: From<C::Error>,
    {
        Ok(DescribePortalResponse::new(describe_schema(
            &target.statement.statement,
        )))
    }
}

/// Count the highest $N parameter placeholder in the SQL string.
fn count_params(sql: &str) -> usize {
    let mut max = 0usize;
    let bytes = sql.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' {
            i += 1;
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if let Ok(n) = sql[start..i].parse::<usize>() {
                max = max.max(n);
            }
        } else {
            i += 1;
        }
    }
    max
}

/// Substitute $1, $2, ... placeholders with bound parameter values (text format).
fn substitute_params(portal: &Portal<String>) -> String {
    let params: Vec<Option<String>> = portal
        .parameters
        .iter()
        .map(|p| p.as_ref().map(|bytes| String::from_utf8_lossy(bytes).into_owned()))
        .collect();
    substitute(&portal.statement.statement, &params)
}

fn substitute(sql: &str, params: &[Option<String>]) -> String {
    // One left-to-right scan; bound text is never rescanned.
    let mut result = String::with_capacity(sql.len());
    let mut rest = sql;
    while let Some(pos) = rest.find('$') {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let digits = after.bytes().take_while(|b| b.is_ascii_digit()).count();
        let bound = after[..digits]
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| params.get(i));
        match bound {
            Some(Some(text)) => {
                result.push('\'');
                result.push_str(&text.replace('\'', "''"));
                result.push('\'');
            }
            Some(None) => result.push_str("NULL"),
            None => result.push_str(&rest[pos..pos + 1 + digits]),
        }
        rest = &after[digits..];
    }
    result.push_str(rest);
    result
}

// ── Factory ──────────────────────────────────────────────────────

pub struct LeaveOptFactory {
    handler: Arc<LeaveOptHandler>,
    auth_handler:
        Arc<CleartextPasswordAuthStartupHandler<LeaveOptAuthSource, DefaultServerParameterProvider>>,
    noop: Arc<NoopHandler>,
}

impl LeaveOptFactory {
    pub fn new(holidays: Arc<HolidayRegistry>, password: String) -> Self {
        let auth_source = LeaveOptAuthSource::new(password);
        let param_provider = DefaultServerParameterProvider::default();
        Self {
            handler: Arc::new(LeaveOptHandler::new(holidays)),
            auth_handler: Arc::new(CleartextPasswordAuthStartupHandler::new(
                auth_source,
                param_provider,
            )),
            noop: Arc::new(NoopHandler),
        }
    }
}

impl PgWireServerHandlers for LeaveOptFactory {
    fn simple_query_handler(&self) -> Arc<impl SimpleQueryHandler> {
        self.handler.clone()
    }

    fn extended_query_handler(&self) -> Arc<impl ExtendedQueryHandler> {
        self.handler.clone()
    }

    fn startup_handler(&self) -> Arc<impl StartupHandler> {
        self.auth_handler.clone()
    }

    fn copy_handler(&self) -> Arc<impl CopyHandler> {
        self.noop.clone()
    }
}

/// Serve one client socket until it disconnects.
pub async fn process_connection(
    socket: TcpStream,
    holidays: Arc<HolidayRegistry>,
    password: String,
    tls: Option<TlsAcceptor>,
) -> std::io::Result<()> {
    let factory = LeaveOptFactory::new(holidays, password);
    pgwire::tokio::process_socket(socket, tls, factory).await
}

fn plan_err(e: PlanError) -> PgWireError {
    PgWireError::UserError(Box::new(ErrorInfo::new(
        "ERROR".into(),
        "P0001".into(),
        e.to_string(),
    )))
}

fn holiday_err(e: HolidayError) -> PgWireError {
    PgWireError::UserError(Box::new(ErrorInfo::new(
        "ERROR".into(),
        "P0001".into(),
        e.to_string(),
    )))
}

fn sql_err(e: crate::sql::SqlError) -> PgWireError {
    PgWireError::UserError(Box::new(ErrorInfo::new(
        "ERROR".into(),
        "42601".into(),
        e.to_string(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(fields: &[FieldInfo]) -> Vec<&str> {
        fields.iter().map(|f| f.name()).collect()
    }

    #[test]
    fn count_params_finds_highest() {
        assert_eq!(count_params("SELECT * FROM leave_days WHERE year = 2025"), 0);
        assert_eq!(count_params("SELECT * FROM leave_days WHERE year = $1 AND budget = $2"), 2);
        assert_eq!(count_params("... $3 ... $1"), 3);
        assert_eq!(count_params("$"), 0);
    }

    #[test]
    fn substitute_quotes_and_nulls() {
        let sql = "INSERT INTO holidays (country, date, name) VALUES ($1, $2, $3)";
        let out = substitute(
            sql,
            &[Some("SG".into()), Some("2025-01-01".into()), Some("New Year's Day".into())],
        );
        assert_eq!(
            out,
            "INSERT INTO holidays (country, date, name) VALUES ('SG', '2025-01-01', 'New Year''s Day')"
        );
        assert_eq!(substitute("x = $1", &[None]), "x = NULL");
    }

    #[test]
    fn substitute_handles_two_digit_placeholders() {
        let params: Vec<Option<String>> = (1..=10).map(|i| Some(i.to_string())).collect();
        assert_eq!(substitute("$1 $10", &params), "'1' '10'");
    }

    #[test]
    fn substitute_never_rescans_bound_text() {
        let out = substitute("name = $2 AND country = $1", &[Some("SG".into()), Some("cost $1".into())]);
        assert_eq!(out, "name = 'cost $1' AND country = 'SG'");
        assert_eq!(substitute("x = $3 AND y = $", &[None]), "x = $3 AND y = $");
    }

    #[test]
    fn describe_by_table() {
        assert_eq!(
            names(&describe_schema("SELECT * FROM leave_days WHERE year = $1 AND budget = $2")),
            vec!["date", "category"]
        );
        assert_eq!(
            names(&describe_schema("select * from break_periods where year = $1")),
            vec!["start", "end", "total_days", "pto_used"]
        );
        assert_eq!(names(&describe_schema("SELECT * FROM plan_summary")).len(), 10);
        assert_eq!(
            names(&describe_schema("SELECT * FROM holidays WHERE country = $1")),
            vec!["country", "date", "name"]
        );
        assert!(describe_schema("DELETE FROM holidays WHERE country = $1").is_empty());
        assert!(describe_schema("SELECT * FROM bookings").is_empty());
    }
}
