use std::net::SocketAddr;

use crate::sql::{Command, PlanView};

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: total queries executed. Labels: command, status.
pub const QUERIES_TOTAL: &str = "leaveopt_queries_total";

/// Counter: optimizations run. Labels: status (ok, invalid).
pub const PLANS_TOTAL: &str = "leaveopt_plans_total";

/// Histogram: optimizer wall time in seconds.
pub const SOLVE_DURATION_SECONDS: &str = "leaveopt_solve_duration_seconds";

/// Histogram: days in each planned window.
pub const HORIZON_DAYS: &str = "leaveopt_horizon_days";

// ── USE metrics (resource utilization) ──────────────────────────

/// Gauge: active TCP connections.
pub const CONNECTIONS_ACTIVE: &str = "leaveopt_connections_active";

/// Counter: total connections accepted.
pub const CONNECTIONS_TOTAL: &str = "leaveopt_connections_total";

/// Counter: connections rejected due to limit.
pub const CONNECTIONS_REJECTED_TOTAL: &str = "leaveopt_connections_rejected_total";

/// Gauge: holidays held in the registry, all countries.
pub const HOLIDAYS_LOADED: &str = "leaveopt_holidays_loaded";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Map a Command variant to a short label for metrics.
pub fn command_label(cmd: &Command) -> &'static str {
    match cmd {
        Command::SelectPlan { view, .. } => match view {
            PlanView::LeaveDays => "select_leave_days",
            PlanView::BreakDays => "select_break_days",
            PlanView::BreakPeriods => "select_break_periods",
            PlanView::Summary => "select_plan_summary",
        },
        Command::SelectHolidays { .. } => "select_holidays",
        Command::InsertHolidays { .. } => "insert_holidays",
        Command::DeleteHolidays { .. } => "delete_holidays",
    }
}
